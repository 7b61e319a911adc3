//! Engine configuration.
//!
//! # Responsibility
//! - Carry deployment-level defaults into services explicitly.
//! - Reject values that would break ranking invariants.
//!
//! # Invariants
//! - `default_rank_limit >= 1`.

use crate::rank::DEFAULT_RANK_LIMIT;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Settings injected into the ranking services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rank-slot limit for scopes that never had an explicit limit set.
    pub default_rank_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rank_limit: DEFAULT_RANK_LIMIT,
        }
    }
}

impl EngineConfig {
    pub fn with_default_rank_limit(limit: u32) -> Result<Self, ConfigError> {
        let config = Self {
            default_rank_limit: limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_rank_limit == 0 {
            return Err(ConfigError::ZeroRankLimit);
        }
        Ok(())
    }

    /// Parses a rank limit from raw text such as an environment variable.
    pub fn parse_rank_limit(raw: &str) -> Result<u32, ConfigError> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidRankLimit(raw.trim().to_string()))?;
        if value == 0 {
            return Err(ConfigError::ZeroRankLimit);
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroRankLimit,
    InvalidRankLimit(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroRankLimit => write!(f, "rank limit must be >= 1"),
            Self::InvalidRankLimit(raw) => {
                write!(f, "invalid rank limit `{raw}`; expected a positive integer")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};

    #[test]
    fn default_limit_is_three() {
        assert_eq!(EngineConfig::default().default_rank_limit, 3);
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert_eq!(
            EngineConfig::with_default_rank_limit(0).unwrap_err(),
            ConfigError::ZeroRankLimit
        );
        assert_eq!(
            EngineConfig::parse_rank_limit(" 0 ").unwrap_err(),
            ConfigError::ZeroRankLimit
        );
    }

    #[test]
    fn parse_rank_limit_accepts_trimmed_integers() {
        assert_eq!(EngineConfig::parse_rank_limit(" 5\n").unwrap(), 5);
        assert!(matches!(
            EngineConfig::parse_rank_limit("five"),
            Err(ConfigError::InvalidRankLimit(raw)) if raw == "five"
        ));
    }
}
