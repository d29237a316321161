//! Service configuration.
//!
//! Read from an optional JSON file; any field left out keeps its default.
//! `SHOP_RECS_STRATEGY` in the environment overrides the default strategy.

use std::{env, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pipeline::{ScoringConfig, StrategyKind};
use sources::AnchorSource;

pub const STRATEGY_ENV: &str = "SHOP_RECS_STRATEGY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub scoring: ScoringConfig,
    /// Strategy used when a request doesn't name one
    pub default_strategy: StrategyKind,
    /// Anchor source used when a request doesn't name one
    pub default_source: AnchorSource,
    /// Drop products with no stock from the candidate pool
    pub exclude_out_of_stock: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            default_strategy: StrategyKind::default(),
            default_source: AnchorSource::default(),
            exclude_out_of_stock: true,
        }
    }
}

impl ServiceConfig {
    /// Load from `path` (or defaults when `None`), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                info!("No config file given, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(strategy) = try_load::<StrategyKind>(STRATEGY_ENV) {
            info!("{STRATEGY_ENV} overrides default strategy: {strategy}");
            self.default_strategy = strategy;
        }
    }
}

/// Parse an environment variable. Unset or invalid values yield `None`;
/// invalid ones are logged.
fn try_load<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).ok()?;
    raw.parse()
        .map_err(|e| {
            warn!("Invalid {key} value `{raw}`: {e}");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.default_strategy, StrategyKind::Attribute);
        assert_eq!(config.default_source, AnchorSource::Cart);
        assert!(config.exclude_out_of_stock);
        assert_eq!(config.scoring.overall_limit, 10);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "default_strategy": "co-purchase",
                "default_source": "order-history",
                "scoring": {{ "per_anchor_limit": 3 }}
            }}"#
        )
        .unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_strategy, StrategyKind::CoPurchase);
        assert_eq!(config.default_source, AnchorSource::OrderHistory);
        assert_eq!(config.scoring.per_anchor_limit, 3);
        assert_eq!(config.scoring.category_weight, 10.0);
        assert!(config.exclude_out_of_stock);
    }

    #[test]
    fn test_from_file_errors() {
        assert!(ServiceConfig::from_file(Path::new("/nonexistent/config.json")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(ServiceConfig::from_file(file.path()).is_err());
    }
}
