//! Runtime configuration read from the environment.

use std::time::Duration;

use wordclash_session::domain::settings::{GameVariant, SessionSettings};

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_PLAYERS: &str = "Ashima,Anjali";
const DEFAULT_WORD_COUNT: usize = 5;
const DEFAULT_TURN_LIMIT: u32 = 20;
const DEFAULT_GUESS_BUDGET: u32 = 6;
const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const DEFAULT_DICTIONARY_TIMEOUT_MS: u64 = 5000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Rules every new session is created with.
    pub settings: SessionSettings,
    /// Base URL of the dictionary service.
    pub dictionary_url: String,
    /// Per-lookup timeout.
    pub dictionary_timeout: Duration,
}

impl ApiConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// absent keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let players = lookup("WORDCLASH_PLAYERS").unwrap_or_else(|| DEFAULT_PLAYERS.to_owned());
        let names: Vec<String> = players.split(',').map(|n| n.trim().to_owned()).collect();
        let names: [String; 2] = names.try_into().map_err(|_| {
            AppError::Config("WORDCLASH_PLAYERS must name exactly two players".to_owned())
        })?;

        let variant = match lookup("WORDCLASH_VARIANT").as_deref().unwrap_or("multi") {
            "multi" => GameVariant::MultiWord {
                word_count: parse_or(&lookup, "WORDCLASH_WORD_COUNT", DEFAULT_WORD_COUNT)?,
                turn_limit: parse_or(&lookup, "WORDCLASH_TURN_LIMIT", DEFAULT_TURN_LIMIT)?,
            },
            "single" => GameVariant::SingleWord {
                guess_budget: parse_or(&lookup, "WORDCLASH_GUESS_BUDGET", DEFAULT_GUESS_BUDGET)?,
            },
            other => {
                return Err(AppError::Config(format!(
                    "WORDCLASH_VARIANT must be `multi` or `single`, got `{other}`"
                )));
            }
        };
        let settings =
            SessionSettings::new(names, variant).map_err(|e| AppError::Config(e.to_string()))?;

        let dictionary_url =
            lookup("DICTIONARY_API_URL").unwrap_or_else(|| DEFAULT_DICTIONARY_URL.to_owned());
        let timeout_ms = parse_or(&lookup, "DICTIONARY_TIMEOUT_MS", DEFAULT_DICTIONARY_TIMEOUT_MS)?;

        Ok(Self {
            host,
            port,
            settings,
            dictionary_url,
            dictionary_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}
