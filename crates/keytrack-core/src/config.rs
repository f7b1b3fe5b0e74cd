use std::{env, path::PathBuf};

use crate::{errors::Error, Result};

pub const DEFAULT_CATALOG_PATH: &str = "numbers.json";
pub const DEFAULT_TRACK_DIR: &str = "music";
pub const DEFAULT_TRACK_EXTENSION: &str = ".mp3";
pub const DEFAULT_AUDIT_LOG_PATH: &str = "/tmp/keytrack-audit.log";

pub const DEFAULT_KEYGEN_COUNT: usize = 500;
pub const DEFAULT_KEYGEN_MIN: u64 = 1000;
pub const DEFAULT_KEYGEN_MAX: u64 = 9999;

/// Typed configuration for the bot service.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // Catalog + tracks
    pub catalog_path: PathBuf,
    pub track_dir: PathBuf,
    pub track_extension: String,

    // Audit
    pub audit_log_path: PathBuf,
    pub audit_log_json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv();

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .or_else(|| env_str("BOT_TOKEN").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let catalog_path = env_path("KEY_CATALOG_PATH").unwrap_or(DEFAULT_CATALOG_PATH.into());
        let track_dir = env_path("TRACK_DIR").unwrap_or(DEFAULT_TRACK_DIR.into());
        let track_extension = env_str("TRACK_EXTENSION")
            .and_then(non_empty)
            .unwrap_or(DEFAULT_TRACK_EXTENSION.to_string());

        // Audit logging
        let audit_log_path =
            env_path("AUDIT_LOG_PATH").unwrap_or(DEFAULT_AUDIT_LOG_PATH.into());
        let audit_log_json = env_bool("AUDIT_LOG_JSON").unwrap_or(false);

        Ok(Self {
            telegram_bot_token,
            catalog_path,
            track_dir,
            track_extension,
            audit_log_path,
            audit_log_json,
        })
    }
}

/// Configuration for the one-off key generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    pub count: usize,
    /// Inclusive lower bound.
    pub min: u64,
    /// Exclusive upper bound.
    pub max: u64,
    pub output: PathBuf,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_KEYGEN_COUNT,
            min: DEFAULT_KEYGEN_MIN,
            max: DEFAULT_KEYGEN_MAX,
            output: DEFAULT_CATALOG_PATH.into(),
        }
    }
}

impl KeygenConfig {
    pub fn load() -> Result<Self> {
        load_dotenv();
        let defaults = Self::default();

        let count = env_parsed("KEYGEN_COUNT")?.unwrap_or(defaults.count);
        let min = env_parsed("KEYGEN_MIN")?.unwrap_or(defaults.min);
        let max = env_parsed("KEYGEN_MAX")?.unwrap_or(defaults.max);
        let output = env_path("KEY_CATALOG_PATH").unwrap_or(defaults.output);

        Ok(Self {
            count,
            min,
            max,
            output,
        })
    }
}

fn load_dotenv() {
    // Existing env always wins over `.env`.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to read .env file");
        }
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Missing or blank is `None`; anything unparseable is a config error.
fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    let Some(raw) = env_str(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a non-negative integer, got {raw:?}")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_defaults_match_catalog_shape() {
        let cfg = KeygenConfig::default();
        assert_eq!(cfg.count, 500);
        assert_eq!(cfg.min, 1000);
        assert_eq!(cfg.max, 9999);
        assert_eq!(cfg.output, PathBuf::from("numbers.json"));
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" x ".to_string()), Some(" x ".to_string()));
    }

    #[test]
    fn env_parsed_reports_bad_numbers() {
        let key = "KEYTRACK_TEST_ENV_PARSED_BAD";
        env::set_var(key, "twelve");
        let res = env_parsed::<u64>(key);
        env::remove_var(key);
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn bot_token_is_required_and_falls_back_to_bot_token() {
        // Both cases share one test so they never race on the same env vars.
        let saved: Vec<_> = ["TELEGRAM_BOT_TOKEN", "BOT_TOKEN"]
            .into_iter()
            .map(|k| (k, env::var_os(k)))
            .collect();
        env::remove_var("TELEGRAM_BOT_TOKEN");
        env::remove_var("BOT_TOKEN");

        let missing = Config::load();

        env::set_var("BOT_TOKEN", "123:fallback");
        let fallback = Config::load();

        for (k, v) in saved {
            match v {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }

        assert!(matches!(missing, Err(Error::Config(_))));
        assert_eq!(fallback.unwrap().telegram_bot_token, "123:fallback");
    }

    #[test]
    fn env_parsed_missing_is_none() {
        let res = env_parsed::<u64>("KEYTRACK_TEST_ENV_PARSED_MISSING").unwrap();
        assert_eq!(res, None);
    }
}
