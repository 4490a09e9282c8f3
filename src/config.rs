use chrono::{Local, NaiveDate};

use crate::engine::SearchScope;
use crate::limits::MAX_HORIZON_DAYS;
use crate::model::{Minute, WorkingHours, parse_hhmm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
    InvertedHours,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "invalid value for {key}: {value:?}"),
            ConfigError::InvertedHours => {
                write!(f, "SLOTFIT_DAY_START must be before SLOTFIT_DAY_END")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which days the CLI searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Horizon,
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub hours: WorkingHours,
    pub horizon_days: u32,
    pub buffer_minutes: u32,
    pub scope: ScopeKind,
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hours: WorkingHours::default(),
            horizon_days: 30,
            buffer_minutes: 0,
            scope: ScopeKind::Horizon,
            metrics_port: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a lookup function; unset keys keep their defaults.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();

        let day_start = match get("SLOTFIT_DAY_START") {
            Some(v) => parse_hhmm(&v).ok_or(ConfigError::Invalid { key: "SLOTFIT_DAY_START", value: v })?,
            None => cfg.hours.day_start,
        };
        let day_end = match get("SLOTFIT_DAY_END") {
            Some(v) => parse_hhmm(&v).ok_or(ConfigError::Invalid { key: "SLOTFIT_DAY_END", value: v })?,
            None => cfg.hours.day_end,
        };
        cfg.hours = WorkingHours::new(day_start, day_end).ok_or(ConfigError::InvertedHours)?;

        if let Some(v) = get("SLOTFIT_HORIZON_DAYS") {
            cfg.horizon_days = v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| *d <= MAX_HORIZON_DAYS)
                .ok_or(ConfigError::Invalid { key: "SLOTFIT_HORIZON_DAYS", value: v })?;
        }
        if let Some(v) = get("SLOTFIT_BUFFER_MINUTES") {
            let window = cfg.hours.day_end - cfg.hours.day_start;
            cfg.buffer_minutes = v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|b| Minute::from(*b) < window)
                .ok_or(ConfigError::Invalid { key: "SLOTFIT_BUFFER_MINUTES", value: v })?;
        }
        if let Some(v) = get("SLOTFIT_SCOPE") {
            cfg.scope = match v.trim() {
                "horizon" => ScopeKind::Horizon,
                "scheduled" => ScopeKind::Scheduled,
                _ => return Err(ConfigError::Invalid { key: "SLOTFIT_SCOPE", value: v }),
            };
        }
        if let Some(v) = get("SLOTFIT_METRICS_PORT") {
            let port = v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "SLOTFIT_METRICS_PORT", value: v })?;
            cfg.metrics_port = Some(port);
        }
        Ok(cfg)
    }

    /// Search scope for a run starting on `today`.
    pub fn scope_from(&self, today: NaiveDate) -> SearchScope {
        match self.scope {
            ScopeKind::Horizon => SearchScope::Horizon { start_day: today, days: self.horizon_days },
            ScopeKind::Scheduled => SearchScope::ScheduledDays,
        }
    }

    pub fn scope_from_today(&self) -> SearchScope {
        self.scope_from(Local::now().date_naive())
    }
}
