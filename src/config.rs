//! Configuration Module
//!
//! Loads cache limits from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum number of entries.
pub const DEFAULT_COUNT_LIMIT: usize = 1000;

/// Cache limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries, 0 = unbounded
    pub count_limit: usize,
    /// Maximum age since creation, zero = disabled
    pub time_to_live: Duration,
    /// Maximum time since last access, zero = disabled
    pub time_to_idle: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `COUNT_LIMIT` - Maximum entries, 0 = unbounded (default: 1000)
    /// - `TIME_TO_LIVE` - Seconds since creation, <= 0 disables (default: 0)
    /// - `TIME_TO_IDLE` - Seconds since last access, <= 0 disables (default: 0)
    ///
    /// Unset variables fall back to defaults; malformed values are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let count_limit = match lookup("COUNT_LIMIT") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                CacheError::InvalidConfig(format!(
                    "COUNT_LIMIT must be a non-negative integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.count_limit,
        };

        let time_to_live = match lookup("TIME_TO_LIVE") {
            Some(raw) => parse_seconds("TIME_TO_LIVE", &raw)?,
            None => defaults.time_to_live,
        };

        let time_to_idle = match lookup("TIME_TO_IDLE") {
            Some(raw) => parse_seconds("TIME_TO_IDLE", &raw)?,
            None => defaults.time_to_idle,
        };

        Ok(Self {
            count_limit,
            time_to_live,
            time_to_idle,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count_limit: DEFAULT_COUNT_LIMIT,
            time_to_live: Duration::ZERO,
            time_to_idle: Duration::ZERO,
        }
    }
}

/// Parses fractional seconds. Zero or negative values disable the limit.
pub fn parse_seconds(name: &str, raw: &str) -> Result<Duration> {
    let seconds: f64 = raw.trim().parse().map_err(|_| {
        CacheError::InvalidConfig(format!("{} must be a number of seconds, got '{}'", name, raw))
    })?;

    if !seconds.is_finite() {
        return Err(CacheError::InvalidConfig(format!(
            "{} must be finite, got '{}'",
            name, raw
        )));
    }
    if seconds <= 0.0 {
        return Ok(Duration::ZERO);
    }

    Duration::try_from_secs_f64(seconds)
        .map_err(|_| CacheError::InvalidConfig(format!("{} is out of range: '{}'", name, raw)))
}
