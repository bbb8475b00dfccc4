//! Configuration for feature extraction and model indexing.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parameters shared by offline model indexing and online scene matching.
///
/// Both sides must use the same values, otherwise scene signatures land in
/// different bins than the stored model signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Smallest accepted distance between the two points of a pair, in model units.
    pub min_distance: f32,
    /// Largest accepted distance between the two points of a pair, in model units.
    pub max_distance: f32,
    /// Discretization step for the angular feature components.
    /// 30 bins over [0, pi] by default.
    pub angle_bins_per_radian: f32,
    /// Upper bound on anchor points processed in parallel while indexing a model.
    pub max_anchors_in_flight: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.01,
            max_distance: 0.5,
            angle_bins_per_radian: 30.0 / std::f32::consts::PI,
            max_anchors_in_flight: 256,
        }
    }
}

impl RecognitionConfig {
    /// Set the accepted pair distance range.
    pub fn with_distance_range(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    /// Set the angular discretization step.
    pub fn with_angle_bins_per_radian(mut self, bins: f32) -> Self {
        self.angle_bins_per_radian = bins;
        self
    }

    /// Set the indexing parallelism cap.
    pub fn with_max_anchors_in_flight(mut self, n: usize) -> Self {
        self.max_anchors_in_flight = n;
        self
    }

    #[inline]
    pub fn min_distance_sq(&self) -> f32 {
        self.min_distance * self.min_distance
    }

    #[inline]
    pub fn max_distance_sq(&self) -> f32 {
        self.max_distance * self.max_distance
    }

    /// Validate configuration parameters.
    pub fn validate(&self) {
        assert!(
            self.min_distance >= 0.0,
            "min_distance must be non-negative, got {}",
            self.min_distance
        );
        assert!(
            self.max_distance > self.min_distance,
            "max_distance must exceed min_distance, got [{}, {}]",
            self.min_distance,
            self.max_distance
        );
        assert!(
            self.angle_bins_per_radian.is_finite() && self.angle_bins_per_radian > 0.0,
            "angle_bins_per_radian must be positive, got {}",
            self.angle_bins_per_radian
        );
        assert!(
            self.max_anchors_in_flight > 0,
            "max_anchors_in_flight must be positive, got {}",
            self.max_anchors_in_flight
        );
    }

    /// Load a YAML or JSON config file. Missing fields take their defaults.
    ///
    /// # Panics
    ///
    /// Panics if the loaded values fail [`RecognitionConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, common::SerdeError> {
        let config: Self = common::load_from_file(path)?;
        config.validate();
        tracing::debug!(?path, ?config, "Loaded recognition config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FileFormat;

    #[test]
    fn test_default_is_valid() {
        let config = RecognitionConfig::default();
        config.validate();
        let bins_over_pi = config.angle_bins_per_radian * std::f32::consts::PI;
        assert!((bins_over_pi - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_squared_bounds() {
        let config = RecognitionConfig::default().with_distance_range(0.5, 3.0);
        assert_eq!(config.min_distance_sq(), 0.25);
        assert_eq!(config.max_distance_sq(), 9.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: RecognitionConfig =
            common::deserialize("max_distance: 2.0\nmax_anchors_in_flight: 8\n", FileFormat::Yaml)
                .unwrap();
        assert_eq!(config.max_distance, 2.0);
        assert_eq!(config.max_anchors_in_flight, 8);
        assert_eq!(config.min_distance, RecognitionConfig::default().min_distance);
        config.validate();
    }

    #[test]
    fn test_json_roundtrip() {
        let config = RecognitionConfig::default()
            .with_distance_range(0.02, 0.3)
            .with_angle_bins_per_radian(12.0);
        let text = serde_json::to_string(&config).unwrap();
        let back: RecognitionConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_file_yaml() {
        let path = std::env::temp_dir()
            .join(format!("recognition_config_{}.yaml", std::process::id()));
        std::fs::write(&path, "min_distance: 0.02\nangle_bins_per_radian: 12.0\n").unwrap();

        let result = RecognitionConfig::from_file(&path);
        let _ = std::fs::remove_file(&path);

        let config = result.unwrap();
        assert_eq!(config.min_distance, 0.02);
        assert_eq!(config.angle_bins_per_radian, 12.0);
        assert_eq!(config.max_distance, RecognitionConfig::default().max_distance);
    }

    #[test]
    fn test_from_file_missing_file() {
        let path = std::env::temp_dir().join("recognition_config_missing.yaml");
        assert!(RecognitionConfig::from_file(&path).is_err());
    }

    #[test]
    #[should_panic(expected = "max_distance must exceed min_distance")]
    fn test_validate_rejects_inverted_range() {
        RecognitionConfig::default()
            .with_distance_range(1.0, 0.5)
            .validate();
    }

    #[test]
    #[should_panic(expected = "angle_bins_per_radian must be positive")]
    fn test_validate_rejects_zero_step() {
        RecognitionConfig::default()
            .with_angle_bins_per_radian(0.0)
            .validate();
    }
}
