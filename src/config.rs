//! Environment configuration.
//!
//! Loads `.env` (when present) and reads `SEATING_*` variables into the
//! telemetry and solver settings. Unset variables fall back to defaults.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::models::{AdjacencyPolicy, ConflictRule};
use crate::solver::SolverConfig;

/// Top-level configuration for the allocator binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub solver: SolverConfig,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SEATING_ADJACENCY must be 'orthogonal' or 'diagonal', got '{0}'")]
    InvalidAdjacency(String),
    #[error(
        "SEATING_CONFLICT_RULE must be 'section-and-gender', 'section' or 'section-or-gender', got '{0}'"
    )]
    InvalidConflictRule(String),
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

impl AppConfig {
    /// Reads `.env` (when present) and the `SEATING_*` environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level = env::var("SEATING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = SolverConfig::default();
        let adjacency = match env::var("SEATING_ADJACENCY") {
            Ok(value) => {
                AdjacencyPolicy::parse(&value).ok_or(ConfigError::InvalidAdjacency(value))?
            }
            Err(_) => defaults.adjacency,
        };
        let conflict_rule = match env::var("SEATING_CONFLICT_RULE") {
            Ok(value) => {
                ConflictRule::parse(&value).ok_or(ConfigError::InvalidConflictRule(value))?
            }
            Err(_) => defaults.conflict_rule,
        };

        let max_swap_attempts = number("SEATING_MAX_SWAP_ATTEMPTS")?
            .map_or(defaults.max_swap_attempts, |n| n as usize);
        let search_node_limit =
            number("SEATING_SEARCH_NODE_LIMIT")?.unwrap_or(defaults.search_node_limit);
        let search_time_limit = number("SEATING_SEARCH_TIME_LIMIT_MS")?
            .map_or(defaults.search_time_limit, Duration::from_millis);
        let shuffle_seed = number("SEATING_SHUFFLE_SEED")?;

        Ok(Self {
            telemetry: TelemetryConfig { log_level },
            solver: SolverConfig {
                adjacency,
                conflict_rule,
                max_swap_attempts,
                search_node_limit,
                search_time_limit,
                shuffle_seed,
            },
        })
    }
}

fn number(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}
