// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod cashflow;
pub mod dashboard;
pub mod debts;
pub mod portfolio;
pub mod transactions;

use anyhow::{Context, Result};

use crate::models::DateRange;
use crate::utils::parse_date;

/// Settings key holding the token of the active login.
pub const SESSION_TOKEN_KEY: &str = "session_token";

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("Missing --{}", name))
}

pub(crate) fn optional<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub(crate) fn date_range(m: &clap::ArgMatches) -> Result<DateRange> {
    let start = optional(m, "from").map(parse_date).transpose()?;
    let end = optional(m, "to").map(parse_date).transpose()?;
    Ok(DateRange::new(start, end))
}
