//! # Configuration
//!
//! Environment-driven settings for the reminder daemon. Values are read once at
//! startup; `.env` files are loaded by the binary before `Config::from_env` runs.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add NOTIFICATIONS_PERMITTED for hosts without a runtime permission prompt
//! - 1.0.0: Initial release

use anyhow::{bail, Context, Result};
use std::env;

/// Default snooze length applied by the Snooze action
pub const DEFAULT_SNOOZE_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Default `env_logger` filter
    pub log_level: String,
    /// YAML fixture backing the in-memory database
    pub data_path: String,
    /// Signed-in user, if any
    pub user_id: Option<String>,
    pub snooze_minutes: i64,
    /// Whether the host has granted notification permission
    pub notifications_permitted: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let data_path =
            env::var("VITALRITE_DATA_PATH").unwrap_or_else(|_| "vitalrite.yaml".to_string());
        let user_id = env::var("VITALRITE_USER_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let snooze_minutes =
            parse_snooze_minutes(env::var("REMINDER_SNOOZE_MINUTES").ok().as_deref())?;

        let notifications_permitted = env::var("NOTIFICATIONS_PERMITTED")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);

        Ok(Config {
            log_level,
            data_path,
            user_id,
            snooze_minutes,
            notifications_permitted,
        })
    }
}

/// Unset falls back to the default; anything else must be a positive number
fn parse_snooze_minutes(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SNOOZE_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("REMINDER_SNOOZE_MINUTES is not a number: {raw}"))?;
    if minutes <= 0 {
        bail!("REMINDER_SNOOZE_MINUTES must be positive, got {minutes}");
    }
    Ok(minutes)
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off" | "disabled"
    )
}
