//! Command Module
//!
//! Line protocol understood by the driver binary.
//!
//! ```text
//! set <key> <value...>   get <key>      del <key>      clear
//! keys                   values         count          stats
//! limit <n>              ttl <secs>     tti <secs>
//! pin <key>              unpin <key>    help           quit
//! ```

use std::time::Duration;

use crate::config::parse_seconds;
use crate::error::{CacheError, Result};

/// Usage lines printed by `help`.
pub const USAGE: &[&str] = &[
    "set <key> <value...>  store a value",
    "get <key>             look up a value",
    "del <key>             remove a key",
    "clear                 remove every key",
    "keys                  list keys, most recently used first",
    "values                list values, most recently used first",
    "count                 number of stored entries",
    "stats                 hit/miss/eviction counters",
    "limit <n>             set the count limit (0 = unbounded)",
    "ttl <secs>            set time-to-live (<= 0 disables)",
    "tti <secs>            set time-to-idle (<= 0 disables)",
    "pin <key>             protect a key from eviction",
    "unpin <key>           remove protection",
    "help                  show this list",
    "quit                  exit",
];

// == Command ==
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Clear,
    Keys,
    Values,
    Count,
    Stats,
    Limit(usize),
    TimeToLive(Duration),
    TimeToIdle(Duration),
    Pin { key: String },
    Unpin { key: String },
    Help,
    Quit,
}

impl Command {
    // == Parse ==
    /// Parses one input line. Verbs are case-insensitive; the value of `set`
    /// is the rest of the line with surrounding whitespace trimmed.
    pub fn parse(line: &str) -> Result<Self> {
        let (verb, rest) = split_word(line.trim());
        let verb = verb.to_ascii_lowercase();

        let command = match verb.as_str() {
            "set" => {
                let (key, value) = split_word(rest);
                Command::Set {
                    key: require(key, "set", "<key>")?,
                    value: require(value, "set", "<value>")?,
                }
            }
            "get" => Command::Get {
                key: single_key(rest, "get")?,
            },
            "del" | "delete" => Command::Delete {
                key: single_key(rest, "del")?,
            },
            "clear" => no_args(rest, "clear", Command::Clear)?,
            "keys" => no_args(rest, "keys", Command::Keys)?,
            "values" => no_args(rest, "values", Command::Values)?,
            "count" => no_args(rest, "count", Command::Count)?,
            "stats" => no_args(rest, "stats", Command::Stats)?,
            "limit" => {
                let raw = require(rest, "limit", "<n>")?;
                let limit = raw.parse::<usize>().map_err(|_| {
                    CacheError::InvalidCommand(format!(
                        "limit expects a non-negative integer, got '{}'",
                        raw
                    ))
                })?;
                Command::Limit(limit)
            }
            "ttl" => Command::TimeToLive(seconds(rest, "ttl")?),
            "tti" => Command::TimeToIdle(seconds(rest, "tti")?),
            "pin" => Command::Pin {
                key: single_key(rest, "pin")?,
            },
            "unpin" => Command::Unpin {
                key: single_key(rest, "unpin")?,
            },
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err(CacheError::InvalidCommand("empty command".to_string())),
            other => {
                return Err(CacheError::InvalidCommand(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        Ok(command)
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn require(arg: &str, verb: &str, what: &str) -> Result<String> {
    if arg.is_empty() {
        Err(CacheError::InvalidCommand(format!("{} requires {}", verb, what)))
    } else {
        Ok(arg.to_string())
    }
}

fn single_key(rest: &str, verb: &str) -> Result<String> {
    let (key, extra) = split_word(rest);
    if !extra.is_empty() {
        return Err(CacheError::InvalidCommand(format!(
            "{} takes a single key",
            verb
        )));
    }
    require(key, verb, "<key>")
}

fn no_args(rest: &str, verb: &str, command: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CacheError::InvalidCommand(format!(
            "{} takes no arguments",
            verb
        )))
    }
}

fn seconds(rest: &str, verb: &str) -> Result<Duration> {
    let raw = require(rest, verb, "<secs>")?;
    parse_seconds(verb, &raw).map_err(|err| match err {
        CacheError::InvalidConfig(msg) | CacheError::InvalidCommand(msg) => {
            CacheError::InvalidCommand(msg)
        }
    })
}
