//! Configuration for scagnostics-core
//!
//! Centralized tuning for the pipeline stages. The defaults are part of the
//! tested contract: changing one changes the measures.

use serde::{Deserialize, Serialize};

use crate::error::{ScagResult, ScagnosticsError};

/// Largest supported grid: `grid_size * grid_size` cells
pub const MAX_GRID_CELLS: usize = 1024;

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScagnosticsConfig {
    /// Outlier peeling settings
    pub outliers: OutlierConfig,
    /// Density grid and point-set reduction settings
    pub binning: BinningConfig,
    /// Runt pruning and alpha shape settings
    pub pruning: PruningConfig,
}

/// Outlier peeling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    /// Remove MST outliers before binning
    pub remove_outliers: bool,
    /// `k` in the threshold `median + k * IQR` of MST edge lengths
    pub iqr_multiplier: f64,
    /// Maximum number of peeling rounds
    pub peel_rounds: usize,
    /// Give up and keep every point when more than this fraction would go
    pub max_outlier_fraction: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            remove_outliers: true,
            iqr_multiplier: 2.0,
            peel_rounds: 3,
            max_outlier_fraction: 0.5,
        }
    }
}

/// Binning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Cells per axis of the density grid
    pub grid_size: usize,
    /// Bin the geometry point set when more unique points than this remain
    pub binning_threshold: usize,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            grid_size: 30,
            binning_threshold: 50,
        }
    }
}

/// Graph pruning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningConfig {
    /// A leaf edge is a runt when it is longer than this multiple of every
    /// sibling edge at its join
    pub runt_sibling_ratio: f64,
    /// Maximum number of runt pruning rounds
    pub max_runt_depth: usize,
    /// Percentile of MST edge lengths used as the alpha radius
    pub alpha_percentile: f64,
    /// Optional upper bound for the alpha radius, in unit-square coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_cap: Option<f64>,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            runt_sibling_ratio: 3.0,
            max_runt_depth: 8,
            alpha_percentile: 0.9,
            alpha_cap: None,
        }
    }
}

impl ScagnosticsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the outlier switch set
    pub fn with_remove_outliers(mut self, remove_outliers: bool) -> Self {
        self.outliers.remove_outliers = remove_outliers;
        self
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ScagResult<()> {
        let outliers = &self.outliers;
        if !outliers.iqr_multiplier.is_finite() || outliers.iqr_multiplier < 0.0 {
            return Err(invalid("outliers.iqr_multiplier must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&outliers.max_outlier_fraction) {
            return Err(invalid(
                "outliers.max_outlier_fraction must be between 0.0 and 1.0",
            ));
        }

        let binning = &self.binning;
        let cells = binning.grid_size.checked_mul(binning.grid_size);
        if binning.grid_size == 0 || cells.map_or(true, |cells| cells > MAX_GRID_CELLS) {
            return Err(invalid(&format!(
                "binning.grid_size must be in 1..={} (at most {} cells)",
                (MAX_GRID_CELLS as f64).sqrt() as usize,
                MAX_GRID_CELLS
            )));
        }
        if binning.binning_threshold < 3 {
            return Err(invalid("binning.binning_threshold must be at least 3"));
        }

        let pruning = &self.pruning;
        if !pruning.runt_sibling_ratio.is_finite() || pruning.runt_sibling_ratio < 1.0 {
            return Err(invalid("pruning.runt_sibling_ratio must be finite and >= 1"));
        }
        if !(0.0..=1.0).contains(&pruning.alpha_percentile) {
            return Err(invalid("pruning.alpha_percentile must be between 0.0 and 1.0"));
        }
        if let Some(cap) = pruning.alpha_cap {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(invalid("pruning.alpha_cap must be positive"));
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ScagnosticsError {
    ScagnosticsError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScagnosticsConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.outliers.remove_outliers);
        assert_eq!(config.binning.grid_size, 30);
        assert_eq!(config.binning.binning_threshold, 50);
    }

    #[test]
    fn test_grid_size_bounds() {
        let mut config = ScagnosticsConfig::default();
        config.binning.grid_size = 32;
        assert!(config.validate().is_ok());

        config.binning.grid_size = 33;
        assert!(matches!(
            config.validate(),
            Err(ScagnosticsError::InvalidConfig(_))
        ));

        config.binning.grid_size = 0;
        assert!(config.validate().is_err());

        // Squaring would overflow usize
        config.binning.grid_size = usize::MAX;
        assert!(config.validate().is_err());
        config.binning.grid_size = 1 << (usize::BITS / 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alpha_cap() {
        let mut config = ScagnosticsConfig::default();
        assert_eq!(config.pruning.alpha_cap, None);
        assert!(!config.to_json().unwrap().contains("alpha_cap"));

        config.pruning.alpha_cap = Some(0.2);
        assert!(config.validate().is_ok());
        config.pruning.alpha_cap = Some(0.0);
        assert!(config.validate().is_err());
        config.pruning.alpha_cap = Some(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fraction() {
        let mut config = ScagnosticsConfig::default();
        config.outliers.max_outlier_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_partial() {
        let config = ScagnosticsConfig::from_json(r#"{"binning": {"grid_size": 16}}"#).unwrap();
        assert_eq!(config.binning.grid_size, 16);
        assert_eq!(config.binning.binning_threshold, 50);
        assert_eq!(config.outliers, OutlierConfig::default());

        let json = config.to_json().unwrap();
        assert_eq!(ScagnosticsConfig::from_json(&json).unwrap(), config);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_partial() {
        let config = ScagnosticsConfig::from_toml(
            "[outliers]\nremove_outliers = false\n\n[pruning]\nalpha_cap = 0.2\n",
        )
        .unwrap();
        assert!(!config.outliers.remove_outliers);
        assert_eq!(config.pruning.alpha_cap, Some(0.2));
        assert_eq!(config.pruning.max_runt_depth, 8);

        let text = config.to_toml().unwrap();
        assert_eq!(ScagnosticsConfig::from_toml(&text).unwrap(), config);
    }
}
