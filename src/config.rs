//! Trial configuration: traversal, threshold, and kernel constants.
//!
//! All values are fixed at startup. Defaults reproduce the reference
//! configuration; a YAML file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TailGraphError};
use crate::types::DEPTH_SLOTS;

/// Knobs for one build/extend/classify trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// An edge participates in traversal only when its weight is strictly
    /// greater than this.
    #[serde(default = "default_min_weight")]
    pub min_edge_weight: f64,

    /// Maximum traversal depth during construction. Depth 0 is the keyword
    /// itself; the walk records depths 1..=tail_length. Must be >= 2.
    #[serde(default = "default_tail_length")]
    pub tail_length: u32,

    /// Gaussian kernel bandwidth h.
    #[serde(default = "default_bandwidth")]
    pub bandwidth: f64,

    /// The c constant in the extension threshold `round(exp(level / c))`.
    #[serde(default = "default_threshold_constant")]
    pub threshold_constant: f64,

    /// Target depths for adaptive extension.
    #[serde(default = "default_extension_levels")]
    pub extension_levels: Vec<u32>,

    /// Probability charged for a token absent from a category's model.
    #[serde(default = "default_floor_probability")]
    pub floor_probability: f64,
}

fn default_min_weight() -> f64 {
    4.0
}

fn default_tail_length() -> u32 {
    2
}

fn default_bandwidth() -> f64 {
    1.0
}

fn default_threshold_constant() -> f64 {
    2.0
}

fn default_extension_levels() -> Vec<u32> {
    vec![3, 4, 5]
}

fn default_floor_probability() -> f64 {
    1e-20
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            min_edge_weight: default_min_weight(),
            tail_length: default_tail_length(),
            bandwidth: default_bandwidth(),
            threshold_constant: default_threshold_constant(),
            extension_levels: default_extension_levels(),
            floor_probability: default_floor_probability(),
        }
    }
}

impl TrialConfig {
    /// Load from a YAML file, falling back to defaults for absent fields.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)
            .map_err(|e| TailGraphError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the traversal and KDE math cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tail_length < 2 {
            return Err(TailGraphError::Config(format!(
                "tail_length must be at least 2, got {}",
                self.tail_length
            )));
        }
        if self.tail_length as usize >= DEPTH_SLOTS {
            return Err(TailGraphError::Config(format!(
                "tail_length {} exceeds the {} depth slots",
                self.tail_length, DEPTH_SLOTS
            )));
        }
        if self.bandwidth <= 0.0 {
            return Err(TailGraphError::Config("bandwidth must be positive".into()));
        }
        if self.threshold_constant <= 0.0 {
            return Err(TailGraphError::Config(
                "threshold_constant must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.floor_probability) || self.floor_probability == 0.0 {
            return Err(TailGraphError::Config(
                "floor_probability must be in (0, 1)".into(),
            ));
        }
        for &level in &self.extension_levels {
            if level as usize >= DEPTH_SLOTS || level < 3 {
                return Err(TailGraphError::Config(format!(
                    "extension level {level} out of range 3..{DEPTH_SLOTS}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        TrialConfig::default().validate().unwrap();
    }

    #[test]
    fn short_tail_rejected() {
        let config = TrialConfig {
            tail_length: 1,
            ..TrialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_bandwidth_rejected() {
        let config = TrialConfig {
            bandwidth: 0.0,
            ..TrialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_extension_level_rejected() {
        let config = TrialConfig {
            extension_levels: vec![3, 11],
            ..TrialConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: TrialConfig = serde_yaml::from_str("threshold_constant: 3.5").unwrap();
        assert_eq!(config.threshold_constant, 3.5);
        assert_eq!(config.tail_length, 2);
        assert_eq!(config.extension_levels, vec![3, 4, 5]);
    }
}
