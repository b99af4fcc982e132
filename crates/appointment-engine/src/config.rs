//! Business-hours configuration, loaded once at startup.
//!
//! Precedence, lowest first: built-in defaults, a JSON config file, then the
//! `APPT_*` environment variables.

use std::path::Path;

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hours::BusinessHours;

pub const ENV_HOME_ZONE: &str = "APPT_HOME_ZONE";
pub const ENV_OPENING: &str = "APPT_OPENING";
pub const ENV_SHIFT_MINUTES: &str = "APPT_SHIFT_MINUTES";
pub const ENV_SLOT_MINUTES: &str = "APPT_SLOT_MINUTES";

/// Raw, unvalidated policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// IANA zone the business hours are defined in.
    pub home_zone: String,
    /// Opening wall-clock time in the home zone, `HH:MM`.
    pub opening: String,
    pub shift_minutes: u32,
    pub slot_minutes: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            home_zone: "America/New_York".to_string(),
            opening: "08:00".to_string(),
            shift_minutes: 14 * 60,
            slot_minutes: 10,
        }
    }
}

impl PolicyConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Apply `APPT_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unset keys keep their value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(zone) = lookup(ENV_HOME_ZONE) {
            self.home_zone = zone;
        }
        if let Some(opening) = lookup(ENV_OPENING) {
            self.opening = opening;
        }
        if let Some(raw) = lookup(ENV_SHIFT_MINUTES) {
            self.shift_minutes = parse_minutes(ENV_SHIFT_MINUTES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SLOT_MINUTES) {
            self.slot_minutes = parse_minutes(ENV_SLOT_MINUTES, &raw)?;
        }
        Ok(self)
    }

    /// Validate into an immutable policy.
    pub fn into_policy(self) -> Result<BusinessHours, ConfigError> {
        let zone = parse_zone(&self.home_zone)?;
        let opening = NaiveTime::parse_from_str(self.opening.trim(), "%H:%M")
            .map_err(|_| ConfigError::InvalidTime(self.opening.clone()))?;
        BusinessHours::new(
            zone,
            opening,
            Duration::minutes(i64::from(self.shift_minutes)),
            Duration::minutes(i64::from(self.slot_minutes)),
        )
    }
}

/// Parse an IANA zone name such as `America/Los_Angeles`.
pub fn parse_zone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}

fn parse_minutes(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
