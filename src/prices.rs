// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Best-effort market prices. A lookup never fails: any provider error,
//! unknown symbol or empty history collapses to `None`.

use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use crate::utils::{http_client, round_money};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// History endpoint for `symbol`, with the symbol pushed as one escaped path
/// segment.
fn chart_url(symbol: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(CHART_URL)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("chart url cannot take a path"))?
        .push(symbol);
    Ok(url)
}

pub const POPULAR_TICKERS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NFLX", "NVDA", "META", "INTC", "ADBE",
];

pub trait PriceSource {
    /// Latest known price rounded to cents, or `None` when unavailable.
    fn current_price(&self, ticker: &str) -> Option<Decimal>;

    /// Human-readable security name when the source knows one.
    fn display_name(&self, ticker: &str) -> Option<String>;
}

/// Curated symbols paired with a display name, falling back to the symbol.
pub fn popular_tickers(source: &dyn PriceSource) -> Vec<(String, String)> {
    POPULAR_TICKERS
        .iter()
        .map(|sym| {
            let name = source
                .display_name(sym)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| sym.to_string());
            (sym.to_string(), name)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct YahooResponse {
    quoteResponse: QuoteResponse,
}
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: Vec<YahooQuote>,
}
#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    symbol: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketPreviousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}
#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}
#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}
#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<ChartQuote>,
}
#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn to_price(px: f64) -> Option<Decimal> {
    if !px.is_finite() || px < 0.0 {
        return None;
    }
    Decimal::from_f64_retain(px).map(round_money)
}

/// Live quote field first, then the previous close reported with it.
fn quote_price(q: &YahooQuote) -> Option<Decimal> {
    q.regular_market_price
        .and_then(to_price)
        .or_else(|| q.previous_close.and_then(to_price))
}

/// Most recent non-null daily close from a chart payload.
fn last_close(chart: &ChartResponse) -> Option<Decimal> {
    chart
        .chart
        .result
        .as_ref()?
        .first()?
        .indicators
        .quote
        .first()?
        .close
        .iter()
        .rev()
        .flatten()
        .find_map(|px| to_price(*px))
}

/// Yahoo Finance over a blocking HTTP client.
pub struct YahooPrices {
    client: reqwest::blocking::Client,
}

impl YahooPrices {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }

    fn fetch_quote(&self, symbol: &str) -> Result<YahooQuote> {
        let resp = self
            .client
            .get("https://query1.finance.yahoo.com/v7/finance/quote")
            .query(&[("symbols", symbol)])
            .send()?
            .error_for_status()?;
        let yr: YahooResponse = resp.json().context("Malformed quote response")?;
        yr.quoteResponse
            .result
            .into_iter()
            .find(|q| {
                q.symbol
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(symbol))
            })
            .ok_or_else(|| anyhow!("No quote for {}", symbol))
    }

    fn fetch_last_close(&self, symbol: &str) -> Result<Decimal> {
        let url = chart_url(symbol)?;
        let resp = self
            .client
            .get(url)
            .query(&[("range", "5d"), ("interval", "1d")])
            .send()?
            .error_for_status()?;
        let chart: ChartResponse = resp.json().context("Malformed chart response")?;
        last_close(&chart).ok_or_else(|| anyhow!("Empty price history for {}", symbol))
    }

    fn lookup(&self, symbol: &str) -> Result<Decimal> {
        match self.fetch_quote(symbol) {
            Ok(q) => {
                if let Some(px) = quote_price(&q) {
                    return Ok(px);
                }
                tracing::debug!("quote for {} carried no price, trying history", symbol);
            }
            Err(e) => tracing::debug!("quote lookup for {} failed: {:#}", symbol, e),
        }
        self.fetch_last_close(symbol)
    }
}

impl PriceSource for YahooPrices {
    fn current_price(&self, ticker: &str) -> Option<Decimal> {
        let symbol = match crate::ledger::normalize_ticker(ticker) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("not quoting '{}': {}", ticker.trim(), e);
                return None;
            }
        };
        match self.lookup(&symbol) {
            Ok(px) => {
                tracing::debug!("price {} = {}", symbol, px);
                Some(px)
            }
            Err(e) => {
                tracing::warn!("price unavailable for {}: {:#}", symbol, e);
                None
            }
        }
    }

    fn display_name(&self, ticker: &str) -> Option<String> {
        let symbol = ticker.trim().to_uppercase();
        match self.fetch_quote(&symbol) {
            Ok(q) => q.short_name.or(q.long_name),
            Err(e) => {
                tracing::debug!("name lookup for {} failed: {:#}", symbol, e);
                None
            }
        }
    }
}

/// In-memory prices. Symbols without an entry are unavailable.
#[derive(Debug, Default)]
pub struct FixedPrices {
    prices: HashMap<String, Decimal>,
    names: HashMap<String, String>,
    lookups: Cell<usize>,
    requested: RefCell<Vec<String>>,
}

impl FixedPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, ticker: &str, price: Decimal) -> Self {
        self.prices.insert(ticker.to_uppercase(), price);
        self
    }

    pub fn with_name(mut self, ticker: &str, name: &str) -> Self {
        self.names.insert(ticker.to_uppercase(), name.to_string());
        self
    }

    /// How many price lookups have been served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl PriceSource for FixedPrices {
    fn current_price(&self, ticker: &str) -> Option<Decimal> {
        let symbol = ticker.trim().to_uppercase();
        self.lookups.set(self.lookups.get() + 1);
        self.requested.borrow_mut().push(symbol.clone());
        self.prices.get(&symbol).copied().map(round_money)
    }

    fn display_name(&self, ticker: &str) -> Option<String> {
        self.names.get(&ticker.trim().to_uppercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn quote_prefers_live_price_over_previous_close() {
        let q: YahooQuote = serde_json::from_str(
            r#"{"symbol":"AAPL","regularMarketPrice":187.456,"regularMarketPreviousClose":180.0}"#,
        )
        .unwrap();
        assert_eq!(quote_price(&q), Some(Decimal::from_str("187.46").unwrap()));
    }

    #[test]
    fn quote_falls_back_to_previous_close() {
        let q: YahooQuote =
            serde_json::from_str(r#"{"symbol":"AAPL","regularMarketPreviousClose":180.1}"#)
                .unwrap();
        assert_eq!(quote_price(&q), Some(Decimal::from_str("180.10").unwrap()));

        let empty = YahooQuote::default();
        assert_eq!(quote_price(&empty), None);
    }

    #[test]
    fn chart_url_keeps_symbol_in_one_segment() {
        let url = chart_url("BRK.B").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BRK.B");
        assert_eq!(url.query(), None);

        let url = chart_url("../quote?symbols=X").unwrap();
        assert!(url.path().starts_with("/v8/finance/chart/"));
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn chart_uses_last_non_null_close() {
        let chart: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[101.5,102.25,null]}]}}],"error":null}}"#,
        )
        .unwrap();
        assert_eq!(last_close(&chart), Some(Decimal::from_str("102.25").unwrap()));
    }

    #[test]
    fn chart_without_history_is_unavailable() {
        let missing: ChartResponse =
            serde_json::from_str(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#)
                .unwrap();
        assert_eq!(last_close(&missing), None);

        let nulls: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[null,null]}]}}]}}"#,
        )
        .unwrap();
        assert_eq!(last_close(&nulls), None);
    }

    #[test]
    fn negative_or_non_finite_prices_are_rejected() {
        assert_eq!(to_price(-1.0), None);
        assert_eq!(to_price(f64::NAN), None);
        assert_eq!(to_price(0.0), Some(Decimal::ZERO));
    }

    #[test]
    fn popular_tickers_fall_back_to_symbol() {
        let source = FixedPrices::new().with_name("aapl", "Apple Inc.");
        let list = popular_tickers(&source);
        assert_eq!(list.len(), POPULAR_TICKERS.len());
        assert_eq!(list[0], ("AAPL".to_string(), "Apple Inc.".to_string()));
        assert_eq!(list[1], ("MSFT".to_string(), "MSFT".to_string()));
    }

    #[test]
    fn fixed_prices_normalize_symbols_and_count_lookups() {
        let source = FixedPrices::new().with_price("msft", Decimal::from_str("410.129").unwrap());
        assert_eq!(
            source.current_price(" msft "),
            Some(Decimal::from_str("410.13").unwrap())
        );
        assert_eq!(source.current_price("ZZZZ"), None);
        assert_eq!(source.lookups(), 2);
        assert_eq!(source.requested(), vec!["MSFT", "ZZZZ"]);
    }
}
