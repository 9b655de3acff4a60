// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
const DEFAULT_PRICE_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub session_ttl: chrono::Duration,
    pub price_timeout: Duration,
    /// No network price source; every lookup reports unavailable.
    pub offline: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match get("FINTRACK_DB_PATH").filter(|s| !s.trim().is_empty()) {
            Some(p) => PathBuf::from(p.trim()),
            None => crate::db::default_db_path()?,
        };
        let ttl_hours = get("FINTRACK_SESSION_TTL_HOURS")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        let timeout_secs = get("FINTRACK_PRICE_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PRICE_TIMEOUT_SECS);
        let offline = get("FINTRACK_OFFLINE")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            db_path,
            session_ttl: chrono::Duration::hours(ttl_hours),
            price_timeout: Duration::from_secs(timeout_secs),
            offline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("FINTRACK_DB_PATH", " /tmp/ledger.sqlite "),
            ("FINTRACK_SESSION_TTL_HOURS", "2"),
            ("FINTRACK_PRICE_TIMEOUT_SECS", "3"),
            ("FINTRACK_OFFLINE", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/ledger.sqlite"));
        assert_eq!(cfg.session_ttl, chrono::Duration::hours(2));
        assert_eq!(cfg.price_timeout, Duration::from_secs(3));
        assert!(cfg.offline);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("FINTRACK_DB_PATH", "/tmp/ledger.sqlite"),
            ("FINTRACK_SESSION_TTL_HOURS", "-4"),
            ("FINTRACK_PRICE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(cfg.session_ttl, chrono::Duration::hours(12));
        assert_eq!(cfg.price_timeout, Duration::from_secs(15));
        assert!(!cfg.offline);
    }
}
