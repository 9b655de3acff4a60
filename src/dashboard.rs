// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use crate::errors::{LedgerError, LedgerResult};
use crate::ledger;
use crate::models::{DateRange, ExpenseRecord, IncomeRecord, SavingsRecord, StockHolding, UserId};
use crate::prices::PriceSource;
use crate::utils::round_money;

#[derive(Debug, Clone, Serialize)]
pub struct HoldingValuation {
    pub id: i64,
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    /// `None` when the price source could not provide a quote.
    pub current_price: Option<Decimal>,
    pub current_value: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub owner: UserId,
    pub expense_by_category: BTreeMap<String, Decimal>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub deficit: Decimal,
    pub total_savings: Decimal,
    pub holdings: Vec<HoldingValuation>,
    pub total_stock_value: Decimal,
    pub net_worth: Decimal,
}

struct LedgerSnapshot {
    income: Vec<IncomeRecord>,
    expenses: Vec<ExpenseRecord>,
    savings: Vec<SavingsRecord>,
    stocks: Vec<StockHolding>,
}

/// Reads every family the dashboard needs inside one transaction so that
/// concurrent writers cannot produce a half-updated view.
fn snapshot(conn: &mut Connection, owner: UserId, period: &DateRange) -> LedgerResult<LedgerSnapshot> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
    let snap = LedgerSnapshot {
        income: ledger::list_income(&tx, owner, period)?,
        expenses: ledger::list_expenses(&tx, owner, period)?,
        savings: ledger::list_savings(&tx, owner)?,
        stocks: ledger::list_stocks(&tx, owner)?,
    };
    tx.commit()?;
    Ok(snap)
}

fn overflow(what: &str) -> LedgerError {
    LedgerError::invalid(format!("{} exceeds the supported numeric range", what))
}

fn checked_add(a: Decimal, b: Decimal, what: &str) -> LedgerResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(what))
}

fn checked_mul(a: Decimal, b: Decimal, what: &str) -> LedgerResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

fn checked_sum<I>(values: I, what: &str) -> LedgerResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_add(acc, v, what))
}

/// Computes the dashboard figures for `owner`.
///
/// `period` narrows the income and expense rows feeding `deficit` and the
/// category totals; savings and holdings always cover everything. Prices
/// are fetched after the ledger read, once per distinct ticker.
pub fn build(
    conn: &mut Connection,
    owner: UserId,
    period: &DateRange,
    prices: &dyn PriceSource,
) -> LedgerResult<DashboardView> {
    let snap = snapshot(conn, owner, period)?;

    let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in &snap.expenses {
        let total = expense_by_category.entry(e.category.clone()).or_default();
        *total = checked_add(*total, e.amount, "expense total")?;
    }
    for total in expense_by_category.values_mut() {
        *total = round_money(*total);
    }

    let income_sum = checked_sum(snap.income.iter().map(|r| r.amount), "income total")?;
    let expense_sum = checked_sum(snap.expenses.iter().map(|r| r.amount), "expense total")?;
    let deficit = round_money(
        income_sum
            .checked_sub(expense_sum)
            .ok_or_else(|| overflow("deficit"))?,
    );
    let total_income = round_money(income_sum);
    let total_expense = round_money(expense_sum);
    let total_savings = round_money(checked_sum(
        snap.savings.iter().map(|r| r.amount),
        "savings total",
    )?);

    let mut quotes: HashMap<String, Option<Decimal>> = HashMap::new();
    let mut holdings = Vec::with_capacity(snap.stocks.len());
    for h in snap.stocks {
        let current_price = match quotes.entry(h.ticker.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(prices.current_price(&h.ticker)),
        };
        let current_value = round_money(checked_mul(
            current_price.unwrap_or(Decimal::ZERO),
            h.quantity,
            &h.ticker,
        )?);
        let cost = checked_mul(h.quantity, h.purchase_price, &h.ticker)?;
        let profit = round_money(
            current_value
                .checked_sub(cost)
                .ok_or_else(|| overflow(&h.ticker))?,
        );
        holdings.push(HoldingValuation {
            id: h.id,
            ticker: h.ticker,
            quantity: h.quantity,
            purchase_price: h.purchase_price,
            current_price,
            current_value,
            profit,
        });
    }

    let total_stock_value = round_money(checked_sum(
        holdings.iter().map(|h| h.current_value),
        "stock value",
    )?);
    let net_worth = round_money(checked_add(total_savings, total_stock_value, "net worth")?);

    tracing::debug!(
        user_id = %owner,
        holdings = holdings.len(),
        priced = quotes.values().filter(|p| p.is_some()).count(),
        "dashboard computed"
    );

    Ok(DashboardView {
        owner,
        expense_by_category,
        total_income,
        total_expense,
        deficit,
        total_savings,
        holdings,
        total_stock_value,
        net_worth,
    })
}
