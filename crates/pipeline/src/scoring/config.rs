//! Tunable weights and limits for the scorer.

use serde::{Deserialize, Serialize};

/// Weights, tolerances and result limits.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Candidate shares the anchor's category
    pub category_weight: f32,
    /// Candidate shares the anchor's brand
    pub brand_weight: f32,
    /// Price within `close_price_tolerance` of the anchor's
    pub close_price_weight: f32,
    /// Price within `near_price_tolerance` of the anchor's
    pub near_price_weight: f32,
    /// Candidate rating strictly above `rating_threshold`
    pub rating_weight: f32,

    pub close_price_tolerance: f64,
    pub near_price_tolerance: f64,
    pub rating_threshold: f32,

    /// Lower edge of the anchor price band, as a factor of its price
    pub band_low: f64,
    /// Upper edge of the anchor price band, as a factor of its price
    pub band_high: f64,

    /// Best candidates kept per anchor before merging
    pub per_anchor_limit: usize,
    /// Final result size
    pub overall_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weight: 10.0,
            brand_weight: 7.0,
            close_price_weight: 5.0,
            near_price_weight: 3.0,
            rating_weight: 2.0,
            close_price_tolerance: 0.10,
            near_price_tolerance: 0.20,
            rating_threshold: 4.0,
            band_low: 0.7,
            band_high: 1.3,
            per_anchor_limit: 5,
            overall_limit: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "brand_weight": 1.5, "overall_limit": 3 }"#).unwrap();

        assert_eq!(config.brand_weight, 1.5);
        assert_eq!(config.overall_limit, 3);
        assert_eq!(config.category_weight, 10.0);
        assert_eq!(config.per_anchor_limit, 5);
    }
}
