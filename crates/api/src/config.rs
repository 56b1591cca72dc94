//! Application configuration loaded from environment variables.
//!
//! This is the only place the environment is read; everything downstream
//! receives resolved values.

use std::path::PathBuf;
use std::str::FromStr;

use directory::{DirectoryError, Preferences};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `ROSTER_PATH` — JSON roster served by the file provider (default: `"data/roster.json"`)
/// - `DIRECTORY_EMAIL_DOMAIN` — the only domain allowed to sign up (default: `"hogwarts.edu"`)
/// - `DIRECTORY_THEME`, `DIRECTORY_MOTION`, `DIRECTORY_LAYOUT` — default preferences
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub roster_path: PathBuf,
    pub email_domain: String,
    pub preferences: Preferences,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Unparseable preference values fall back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            roster_path: lookup("ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.roster_path),
            email_domain: lookup("DIRECTORY_EMAIL_DOMAIN").unwrap_or(defaults.email_domain),
            preferences: Preferences {
                theme: preference(&lookup, "DIRECTORY_THEME", defaults.preferences.theme),
                motion: preference(&lookup, "DIRECTORY_MOTION", defaults.preferences.motion),
                layout: preference(&lookup, "DIRECTORY_LAYOUT", defaults.preferences.layout),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn preference<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr<Err = DirectoryError>,
{
    match lookup(key).map(|raw| raw.parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            tracing::warn!(key, error = %err, "ignoring invalid preference, using default");
            default
        }
        None => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            roster_path: PathBuf::from("data/roster.json"),
            email_domain: "hogwarts.edu".to_string(),
            preferences: Preferences::default(),
        }
    }
}
