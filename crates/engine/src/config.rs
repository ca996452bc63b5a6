use crate::error::{EngineError, Result};
use std::time::Duration;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

pub const SESSION_TTL_ENV: &str = "CODEHEIST_SESSION_TTL_MS";
pub const SWEEP_INTERVAL_ENV: &str = "CODEHEIST_SWEEP_INTERVAL_MS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Idle time after which a session is evicted.
    pub session_ttl: Duration,
    /// How often the sweeper scans for idle sessions.
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whichever millisecond variables `lookup` yields.
    /// Blank, non-numeric and zero values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            session_ttl: duration_from_ms(lookup(SESSION_TTL_ENV)).unwrap_or(defaults.session_ttl),
            sweep_interval: duration_from_ms(lookup(SWEEP_INTERVAL_ENV))
                .unwrap_or(defaults.sweep_interval),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_ttl.is_zero() {
            return Err(EngineError::InvalidConfig(
                "session ttl must be positive".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(EngineError::InvalidConfig(
                "sweep interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn duration_from_ms(raw: Option<String>) -> Option<Duration> {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_two_hours_and_thirty_minutes() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.session_ttl, Duration::from_secs(7200));
        assert_eq!(cfg.sweep_interval, Duration::from_secs(1800));
        cfg.validate().unwrap();
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let cfg = EngineConfig::from_lookup(|var| match var {
            SESSION_TTL_ENV => Some(" 1500 ".to_string()),
            SWEEP_INTERVAL_ENV => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(cfg.session_ttl, Duration::from_millis(1500));
        assert_eq!(cfg.sweep_interval, DEFAULT_SWEEP_INTERVAL);

        let cfg = EngineConfig::from_lookup(|_| Some("0".to_string()));
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn validate_rejects_zero_durations() {
        let cfg = EngineConfig {
            session_ttl: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }
}
