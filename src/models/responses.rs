//! Response DTOs for the driver
//!
//! Each command produces one of these, printed as a single JSON line.

use serde::Serialize;

use crate::cache::CacheStats;

/// Any reply the driver can print.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Get(GetResponse),
    Set(SetResponse),
    Delete(DeleteResponse),
    Keys(KeysResponse),
    Values(ValuesResponse),
    Count(CountResponse),
    Stats(StatsResponse),
    Limits(LimitsResponse),
    Pin(PinResponse),
    Message(MessageResponse),
    Help(HelpResponse),
    Error(ErrorResponse),
}

/// Reply to `get`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    /// None when the key is absent or expired
    pub value: Option<String>,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Reply to `set`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
    /// Entries stored after the write and any evictions
    pub count: usize,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, count: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            count,
        }
    }
}

/// Reply to `del`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether the key was present
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Reply to `keys`, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Reply to `values`, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct ValuesResponse {
    pub values: Vec<String>,
}

/// Reply to `count`
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: usize,
    pub count_limit: usize,
}

/// Reply to `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub vetoes: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
    /// RFC 3339 time the snapshot was taken
    pub timestamp: String,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            vetoes: stats.vetoes,
            total_entries: stats.total_entries,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Reply to `limit`, `ttl` and `tti`: the limits now in force
#[derive(Debug, Clone, Serialize)]
pub struct LimitsResponse {
    pub count_limit: usize,
    /// Seconds, 0 = disabled
    pub time_to_live: f64,
    /// Seconds, 0 = disabled
    pub time_to_idle: f64,
}

/// Reply to `pin` and `unpin`
#[derive(Debug, Clone, Serialize)]
pub struct PinResponse {
    pub key: String,
    pub pinned: bool,
    /// False when the key was already in the requested state
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HelpResponse {
    pub commands: Vec<&'static str>,
}

/// Reply to a rejected line
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<crate::error::CacheError> for Response {
    fn from(err: crate::error::CacheError) -> Self {
        Response::Error(ErrorResponse {
            error: err.to_string(),
        })
    }
}
