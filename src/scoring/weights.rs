use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{DimensionCategory, EvaluationKind};

/// A scoring dimension: stable key, display label, default weight and
/// the half of the radar it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct DimensionSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub default_weight: f64,
    pub category: DimensionCategory,
}

pub const INNOVATION_DIMENSIONS: &[DimensionSpec] = &[
    DimensionSpec {
        key: "tech_implementation",
        label: "Technical implementation",
        default_weight: 13.0,
        category: DimensionCategory::Tech,
    },
    DimensionSpec {
        key: "architecture_design",
        label: "Architecture design",
        default_weight: 13.0,
        category: DimensionCategory::Tech,
    },
    DimensionSpec {
        key: "engineering_sustainability",
        label: "Engineering sustainability",
        default_weight: 14.0,
        category: DimensionCategory::Tech,
    },
    DimensionSpec {
        key: "problem_value",
        label: "Problem definition and value",
        default_weight: 18.0,
        category: DimensionCategory::Scenario,
    },
    DimensionSpec {
        key: "scenario_innovation",
        label: "Scenario innovation",
        default_weight: 24.0,
        category: DimensionCategory::Scenario,
    },
    DimensionSpec {
        key: "market_fit",
        label: "Market fit",
        default_weight: 18.0,
        category: DimensionCategory::Scenario,
    },
];

pub const SOCIAL_VALUE_DIMENSIONS: &[DimensionSpec] = &[
    DimensionSpec {
        key: "ethics_redline",
        label: "Ethics redline",
        default_weight: 10.0,
        category: DimensionCategory::Basic,
    },
    DimensionSpec {
        key: "privacy_protection",
        label: "Privacy protection",
        default_weight: 10.0,
        category: DimensionCategory::Basic,
    },
    DimensionSpec {
        key: "algorithm_fairness",
        label: "Algorithmic fairness",
        default_weight: 10.0,
        category: DimensionCategory::Basic,
    },
    DimensionSpec {
        key: "social_impact",
        label: "Social impact depth",
        default_weight: 25.0,
        category: DimensionCategory::Bonus,
    },
    DimensionSpec {
        key: "environmental_friendliness",
        label: "Environmental friendliness",
        default_weight: 15.0,
        category: DimensionCategory::Bonus,
    },
    DimensionSpec {
        key: "charity_orientation",
        label: "Public-good orientation",
        default_weight: 15.0,
        category: DimensionCategory::Bonus,
    },
    DimensionSpec {
        key: "long_term_vision",
        label: "Long-term vision",
        default_weight: 15.0,
        category: DimensionCategory::Bonus,
    },
];

/// Per-dimension weights for one scorer, in dimension order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    kind: EvaluationKind,
    weights: Vec<(String, f64)>,
}

impl DimensionWeights {
    pub fn for_kind(kind: EvaluationKind) -> Self {
        Self {
            kind,
            weights: specs(kind)
                .iter()
                .map(|s| (s.key.to_string(), s.default_weight))
                .collect(),
        }
    }

    pub fn innovation() -> Self {
        Self::for_kind(EvaluationKind::Innovation)
    }

    pub fn social_value() -> Self {
        Self::for_kind(EvaluationKind::SocialValue)
    }

    pub fn kind(&self) -> EvaluationKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> f64 {
        self.weights
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, key: &str, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::Config(format!("Invalid weight for {}: {}", key, weight)));
        }
        match self.weights.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => {
                entry.1 = weight;
                Ok(())
            }
            None => Err(Error::Config(format!(
                "Unknown {} dimension: {} (expected one of {})",
                self.kind,
                key,
                specs(self.kind).iter().map(|s| s.key).collect::<Vec<_>>().join(", ")
            ))),
        }
    }

    /// Applies `key=value` overrides, e.g. from repeated CLI flags.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<()> {
        for raw in overrides {
            let raw = raw.as_ref();
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("Expected key=value, got: {}", raw)))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid weight value: {}", raw)))?;
            self.set(key.trim(), value)?;
        }
        Ok(())
    }

    /// Rescaled so the weights sum to 100. All-zero weights fall back to
    /// the defaults.
    pub fn normalized(&self) -> Self {
        let total: f64 = self.weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            tracing::warn!("All {} weights are zero, using defaults", self.kind);
            return Self::for_kind(self.kind);
        }
        Self {
            kind: self.kind,
            weights: self
                .weights
                .iter()
                .map(|(k, w)| (k.clone(), w * 100.0 / total))
                .collect(),
        }
    }
}

pub fn specs(kind: EvaluationKind) -> &'static [DimensionSpec] {
    match kind {
        EvaluationKind::Innovation => INNOVATION_DIMENSIONS,
        EvaluationKind::SocialValue => SOCIAL_VALUE_DIMENSIONS,
    }
}

pub fn spec(kind: EvaluationKind, key: &str) -> Option<&'static DimensionSpec> {
    specs(kind).iter().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sum_to_100() {
        for weights in [DimensionWeights::innovation(), DimensionWeights::social_value()] {
            let total: f64 = weights.weights.iter().map(|(_, w)| w).sum();
            assert_eq!(total, 100.0);
            assert_eq!(weights.normalized(), weights);
        }
    }

    #[test]
    fn test_normalization_rescales() {
        let mut weights = DimensionWeights::innovation();
        weights.set("market_fit", 118.0).unwrap();
        let normalized = weights.normalized();
        assert!((normalized.get("market_fit") - 59.0).abs() < 1e-9);
        assert!((normalized.get("tech_implementation") - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_falls_back_to_defaults() {
        let mut weights = DimensionWeights::social_value();
        for spec in SOCIAL_VALUE_DIMENSIONS {
            weights.set(spec.key, 0.0).unwrap();
        }
        assert_eq!(weights.normalized(), DimensionWeights::social_value());
    }

    #[test]
    fn test_overrides() {
        let mut weights = DimensionWeights::innovation();
        weights.apply_overrides(&["scenario_innovation=30"]).unwrap();
        assert_eq!(weights.get("scenario_innovation"), 30.0);
        assert!(weights.apply_overrides(&["nope=1"]).is_err());
        assert!(weights.apply_overrides(&["market_fit"]).is_err());
        assert!(weights.apply_overrides(&["market_fit=-2"]).is_err());
    }
}
