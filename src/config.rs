// ⚙️ Configuration - Matching thresholds and squad shape
//
// Every field has a default; a settings file only needs the values it changes.

use crate::error::{Result, SquadError};
use crate::roster::{DEFAULT_RATING, MAX_RATING};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment override for `resolver.fuzzy_threshold`
pub const ENV_FUZZY_THRESHOLD: &str = "SQUAD_FUZZY_THRESHOLD";

/// Environment override for `balancer.team_size`
pub const ENV_TEAM_SIZE: &str = "SQUAD_TEAM_SIZE";

/// Log filter used when neither RUST_LOG nor the settings file set one
pub const DEFAULT_LOG_FILTER: &str = "squad_balancer=info";

// ============================================================================
// RESOLVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Max weighted distance accepted by the fuzzy stage (default: 0.4)
    pub fuzzy_threshold: f64,

    /// Weight applied to similarity against a record's name (default: 1.0)
    pub name_weight: f64,

    /// Weight applied to similarity against an alias (default: 0.8)
    pub alias_weight: f64,

    /// Max distance for candidates listed by `find_all_matches` (default: 0.6)
    pub candidate_threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            fuzzy_threshold: 0.4,
            name_weight: 1.0,
            alias_weight: 0.8,
            candidate_threshold: 0.6,
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("resolver.fuzzy_threshold", self.fuzzy_threshold)?;
        check_unit("resolver.candidate_threshold", self.candidate_threshold)?;
        check_weight("resolver.name_weight", self.name_weight)?;
        check_weight("resolver.alias_weight", self.alias_weight)?;
        Ok(())
    }
}

// ============================================================================
// BALANCER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Players per side before the cap rules kick in (default: 6)
    pub team_size: usize,

    /// Rating given to names the resolver could not match (default: 70)
    pub default_rating: u8,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        BalancerConfig {
            team_size: 6,
            default_rating: DEFAULT_RATING,
        }
    }
}

impl BalancerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.team_size == 0 {
            return Err(SquadError::invalid_config(
                "balancer.team_size",
                self.team_size,
                "must be at least 1",
            ));
        }
        if self.default_rating > MAX_RATING {
            return Err(SquadError::invalid_config(
                "balancer.default_rating",
                self.default_rating,
                format!("must be at most {}", MAX_RATING),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SETTINGS (file + env)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverConfig,
    pub balancer: BalancerConfig,

    /// tracing EnvFilter directive, e.g. "squad_balancer=debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Settings {
    /// Load settings from a JSON file, then apply env overrides and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut settings = Settings::from_json(&content)?;
        settings.apply_env_overrides()?;
        settings.validate()?;
        debug!(path = ?path.as_ref(), "Settings loaded");
        Ok(settings)
    }

    /// Parse settings from a JSON string (no env overrides)
    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults plus env overrides
    pub fn from_env() -> Result<Self> {
        let mut settings = Settings::default();
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `SQUAD_FUZZY_THRESHOLD` / `SQUAD_TEAM_SIZE` if set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var(ENV_FUZZY_THRESHOLD) {
            self.resolver.fuzzy_threshold = value.trim().parse().map_err(|_| {
                SquadError::invalid_config(ENV_FUZZY_THRESHOLD, &value, "not a number")
            })?;
        }

        if let Ok(value) = std::env::var(ENV_TEAM_SIZE) {
            self.balancer.team_size = value.trim().parse().map_err(|_| {
                SquadError::invalid_config(ENV_TEAM_SIZE, &value, "not a positive integer")
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        self.balancer.validate()
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

fn check_unit(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SquadError::invalid_config(field, value, "must be within 0.0..=1.0"));
    }
    Ok(())
}

fn check_weight(field: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(SquadError::invalid_config(field, value, "must be within (0.0, 1.0]"));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
