use std::env;
use std::time::Duration;

use log::LevelFilter;

use crate::standings::TeamPolicy;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct StandingsConfig {
    /// Base directory or `http(s)` base URL holding the championship file.
    pub source: String,
    /// Where to look for the entry list; defaults to `source`.
    pub entrylist_source: Option<String>,
    pub team_policy: TeamPolicy,
    pub hide_points: bool,
    pub http_timeout: Duration,
    pub cache_bust: bool,
    pub log_level: LevelFilter,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        Self {
            source: ".".to_string(),
            entrylist_source: None,
            team_policy: TeamPolicy::default(),
            hide_points: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache_bust: false,
            log_level: LevelFilter::Warn,
        }
    }
}

impl StandingsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            source: opt_env("STANDINGS_SOURCE").unwrap_or(defaults.source),
            entrylist_source: opt_env("STANDINGS_ENTRYLIST_SOURCE"),
            team_policy: opt_env("STANDINGS_TEAM_POLICY")
                .and_then(|val| TeamPolicy::parse(&val))
                .unwrap_or(defaults.team_policy),
            hide_points: bool_env("STANDINGS_HIDE_POINTS", defaults.hide_points),
            http_timeout: Duration::from_secs(
                env::var("STANDINGS_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|val| val.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                    .clamp(1, 120),
            ),
            cache_bust: bool_env("STANDINGS_CACHE_BUST", defaults.cache_bust),
            log_level: opt_env("STANDINGS_LOG")
                .and_then(|val| parse_level(&val))
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn entrylist_source(&self) -> &str {
        self.entrylist_source.as_deref().unwrap_or(&self.source)
    }
}

pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

fn bool_env(key: &str, default: bool) -> bool {
    opt_env(key)
        .and_then(|val| parse_bool(&val))
        .unwrap_or(default)
}
