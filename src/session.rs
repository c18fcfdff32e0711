//! Driver Session
//!
//! Executes parsed commands against a string cache and builds the replies.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::cache::{BoundedCache, EvictionDelegate};
use crate::clock::{Clock, SystemClock};
use crate::command::{Command, USAGE};
use crate::config::Config;
use crate::models::{
    CountResponse, DeleteResponse, GetResponse, HelpResponse, KeysResponse, LimitsResponse,
    MessageResponse, PinResponse, Response, SetResponse, StatsResponse, ValuesResponse,
};

// == Pinned Keys ==
/// Eviction delegate that keeps a set of keys resident.
#[derive(Debug, Default)]
pub struct PinnedKeys {
    keys: RwLock<HashSet<String>>,
}

impl PinnedKeys {
    /// Pins `key`. Returns false if it was already pinned.
    pub fn pin(&self, key: &str) -> bool {
        self.keys
            .write()
            .map(|mut keys| keys.insert(key.to_string()))
            .unwrap_or(false)
    }

    /// Unpins `key`. Returns false if it was not pinned.
    pub fn unpin(&self, key: &str) -> bool {
        self.keys
            .write()
            .map(|mut keys| keys.remove(key))
            .unwrap_or(false)
    }

    pub fn is_pinned(&self, key: &str) -> bool {
        self.keys
            .read()
            .map(|keys| keys.contains(key))
            .unwrap_or(false)
    }
}

impl EvictionDelegate<String, String> for PinnedKeys {
    fn should_evict(&self, _value: &String, key: &String) -> bool {
        !self.is_pinned(key)
    }
}

// == Session ==
/// A string-keyed cache plus the pin set registered as its delegate.
pub struct Session<C: Clock = SystemClock> {
    cache: BoundedCache<String, String, C>,
    pins: Arc<PinnedKeys>,
}

impl Session<SystemClock> {
    pub fn new(config: &Config) -> Self {
        Self::with_cache(BoundedCache::from_config(config))
    }
}

impl<C: Clock> Session<C> {
    /// Wraps an existing cache and registers a fresh pin set on it.
    pub fn with_cache(mut cache: BoundedCache<String, String, C>) -> Self {
        let pins = Arc::new(PinnedKeys::default());
        cache.set_delegate(&pins);
        Self { cache, pins }
    }

    pub fn cache(&self) -> &BoundedCache<String, String, C> {
        &self.cache
    }

    pub fn pins(&self) -> &PinnedKeys {
        &self.pins
    }

    // == Execute ==
    pub fn execute(&mut self, command: Command) -> Response {
        debug!(?command, "executing command");

        match command {
            Command::Set { key, value } => {
                self.cache.set(key.clone(), value);
                Response::Set(SetResponse::new(key, self.cache.count()))
            }
            Command::Get { key } => {
                let value = self.cache.get(&key);
                Response::Get(GetResponse::new(key, value))
            }
            Command::Delete { key } => {
                let removed = self.cache.remove(&key).is_some();
                Response::Delete(DeleteResponse::new(key, removed))
            }
            Command::Clear => {
                self.cache.remove_all();
                Response::Message(MessageResponse::new("Cache cleared"))
            }
            Command::Keys => Response::Keys(KeysResponse {
                keys: self.cache.all_keys(),
            }),
            Command::Values => Response::Values(ValuesResponse {
                values: self.cache.all_values(),
            }),
            Command::Count => Response::Count(CountResponse {
                count: self.cache.count(),
                count_limit: self.cache.count_limit(),
            }),
            Command::Stats => Response::Stats(StatsResponse::from(self.cache.stats())),
            Command::Limit(limit) => {
                self.cache.set_count_limit(limit);
                info!(count_limit = limit, "count limit changed");
                self.limits()
            }
            Command::TimeToLive(ttl) => {
                self.cache.set_time_to_live(ttl);
                info!(time_to_live = ?ttl, "time-to-live changed");
                self.limits()
            }
            Command::TimeToIdle(tti) => {
                self.cache.set_time_to_idle(tti);
                info!(time_to_idle = ?tti, "time-to-idle changed");
                self.limits()
            }
            Command::Pin { key } => {
                let changed = self.pins.pin(&key);
                Response::Pin(PinResponse {
                    key,
                    pinned: true,
                    changed,
                })
            }
            Command::Unpin { key } => {
                let changed = self.pins.unpin(&key);
                Response::Pin(PinResponse {
                    key,
                    pinned: false,
                    changed,
                })
            }
            Command::Help => Response::Help(HelpResponse {
                commands: USAGE.to_vec(),
            }),
            Command::Quit => Response::Message(MessageResponse::new("Bye")),
        }
    }

    fn limits(&self) -> Response {
        Response::Limits(LimitsResponse {
            count_limit: self.cache.count_limit(),
            time_to_live: self.cache.time_to_live().as_secs_f64(),
            time_to_idle: self.cache.time_to_idle().as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use std::time::Duration;

    fn session(count_limit: usize) -> (Session<MockClock>, MockClock) {
        let clock = MockClock::new();
        let cache = BoundedCache::with_clock(count_limit, Duration::ZERO, Duration::ZERO, clock.clone());
        (Session::with_cache(cache), clock)
    }

    fn run(session: &mut Session<MockClock>, line: &str) -> serde_json::Value {
        let response = match Command::parse(line) {
            Ok(command) => session.execute(command),
            Err(err) => Response::from(err),
        };
        serde_json::to_value(&response).unwrap()
    }

    #[test]
    fn test_pinned_keys() {
        let pins = PinnedKeys::default();
        assert!(pins.pin("a"));
        assert!(!pins.pin("a"));
        assert!(pins.is_pinned("a"));
        assert!(!pins.should_evict(&"v".to_string(), &"a".to_string()));
        assert!(pins.should_evict(&"v".to_string(), &"b".to_string()));
        assert!(pins.unpin("a"));
        assert!(!pins.unpin("a"));
    }

    #[test]
    fn test_session_registers_delegate() {
        let (session, _) = session(10);
        assert!(session.cache().has_delegate());
    }

    #[test]
    fn test_session_set_get_del() {
        let (mut session, _) = session(10);

        assert_eq!(run(&mut session, "set a one")["count"], 1);
        assert_eq!(run(&mut session, "get a")["value"], "one");
        assert_eq!(run(&mut session, "del a")["removed"], true);
        assert_eq!(run(&mut session, "del a")["removed"], false);
        assert!(run(&mut session, "get a")["value"].is_null());
    }

    #[test]
    fn test_session_pin_survives_eviction() {
        let (mut session, _) = session(1);

        run(&mut session, "set keep 1");
        run(&mut session, "pin keep");
        run(&mut session, "set other 2");
        run(&mut session, "set third 3");

        let keys = run(&mut session, "keys");
        assert_eq!(keys["keys"], serde_json::json!(["keep"]));
        assert!(session.pins().is_pinned("keep"));
    }

    #[test]
    fn test_session_pin_reports_change() {
        let (mut session, _) = session(10);

        assert_eq!(run(&mut session, "pin a")["changed"], true);
        assert_eq!(run(&mut session, "pin a")["changed"], false);

        let reply = run(&mut session, "unpin a");
        assert_eq!(reply["pinned"], false);
        assert_eq!(reply["changed"], true);
        assert_eq!(run(&mut session, "unpin a")["changed"], false);
    }

    #[test]
    fn test_session_pin_survives_expiry() {
        let (mut session, clock) = session(10);
        run(&mut session, "ttl 5");
        run(&mut session, "set keep 1");
        run(&mut session, "set drop 2");
        run(&mut session, "pin keep");

        clock.advance(Duration::from_secs(6));

        assert_eq!(run(&mut session, "get keep")["value"], "1");
        assert!(run(&mut session, "get drop")["value"].is_null());
    }

    #[test]
    fn test_session_limits() {
        let (mut session, _) = session(10);

        let reply = run(&mut session, "limit 3");
        assert_eq!(reply["count_limit"], 3);

        let reply = run(&mut session, "tti 2.5");
        assert_eq!(reply["time_to_idle"], 2.5);
        assert_eq!(reply["time_to_live"], 0.0);
    }

    #[test]
    fn test_session_stats_and_count() {
        let (mut session, _) = session(10);
        run(&mut session, "set a 1");
        run(&mut session, "get a");
        run(&mut session, "get b");

        let stats = run(&mut session, "stats");
        assert_eq!(stats["hits"], 1);
        assert_eq!(stats["misses"], 1);

        let count = run(&mut session, "count");
        assert_eq!(count["count"], 1);
        assert_eq!(count["count_limit"], 10);
    }

    #[test]
    fn test_session_clear_and_values() {
        let (mut session, _) = session(10);
        run(&mut session, "set a 1");
        run(&mut session, "set b 2");

        assert_eq!(run(&mut session, "values")["values"], serde_json::json!(["2", "1"]));

        run(&mut session, "clear");
        assert_eq!(run(&mut session, "count")["count"], 0);
    }

    #[test]
    fn test_session_reports_parse_errors() {
        let (mut session, _) = session(10);
        let reply = run(&mut session, "bogus");
        assert!(reply["error"].as_str().unwrap().contains("bogus"));
    }
}
