//! Configuration for region construction and queries.
//!
//! Every field has a default, so an empty JSON object is a valid configuration.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Which overlap percentage a region must reach to be reported by
/// `compare_overlap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapBasis {
    /// Intersection as a percentage of the query area
    #[default]
    Area,
    /// Intersection as a percentage of the region
    Region,
}

/// Threshold applied to overlap metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlapFilter {
    #[serde(default)]
    pub basis: OverlapBasis,

    /// Minimum percentage (0-100), inclusive.
    #[serde(default = "OverlapFilter::default_threshold")]
    pub threshold: f64,
}

impl OverlapFilter {
    const fn default_threshold() -> f64 {
        10.0
    }

    pub fn new(basis: OverlapBasis, threshold: f64) -> Self {
        Self { basis, threshold }
    }

    /// Whether a `(region %, area %)` pair passes the filter.
    pub fn accepts(&self, region_percentage: f64, area_percentage: f64) -> bool {
        let value = match self.basis {
            OverlapBasis::Area => area_percentage,
            OverlapBasis::Region => region_percentage,
        };
        value >= self.threshold
    }
}

impl Default for OverlapFilter {
    fn default() -> Self {
        Self {
            basis: OverlapBasis::default(),
            threshold: Self::default_threshold(),
        }
    }
}

/// How a region picks its parents on the next coarser level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParentPolicy {
    /// The single coarser region sharing the largest area
    #[default]
    MajorityArea,
    /// Every coarser region sharing a positive area
    AllOverlapping,
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum member count for a region to be instantiated
    #[serde(default = "Config::default_region_node_threshold")]
    pub region_node_threshold: usize,

    /// Absolute z-score above which a node is an outlier of its community
    #[serde(default = "Config::default_z_score_threshold")]
    pub z_score_threshold: f64,

    /// Bounding areas containing fewer points are not tessellated
    #[serde(default = "Config::default_min_tessellation_points")]
    pub min_tessellation_points: usize,

    /// Minimum member count for a country to be listed on a region
    #[serde(default = "Config::default_country_count_threshold")]
    pub country_count_threshold: usize,

    #[serde(default)]
    pub overlap: OverlapFilter,

    #[serde(default)]
    pub parent_policy: ParentPolicy,

    /// Build levels and bounding areas on the rayon pool
    #[serde(default = "Config::default_parallel")]
    pub parallel: bool,
}

impl Config {
    const fn default_region_node_threshold() -> usize {
        10
    }

    const fn default_z_score_threshold() -> f64 {
        4.0
    }

    const fn default_min_tessellation_points() -> usize {
        5
    }

    const fn default_country_count_threshold() -> usize {
        1
    }

    const fn default_parallel() -> bool {
        true
    }

    pub fn with_region_node_threshold(mut self, threshold: usize) -> Self {
        self.region_node_threshold = threshold;
        self
    }

    pub fn with_z_score_threshold(mut self, threshold: f64) -> Self {
        assert!(
            threshold.is_finite() && threshold > 0.0,
            "Z-score threshold must be finite and positive"
        );
        self.z_score_threshold = threshold;
        self
    }

    pub fn with_min_tessellation_points(mut self, points: usize) -> Self {
        assert!(points > 0, "Minimum tessellation points must be greater than zero");
        self.min_tessellation_points = points;
        self
    }

    pub fn with_country_count_threshold(mut self, threshold: usize) -> Self {
        assert!(threshold > 0, "Country count threshold must be greater than zero");
        self.country_count_threshold = threshold;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapFilter) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_parent_policy(mut self, policy: ParentPolicy) -> Self {
        self.parent_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.region_node_threshold == 0 {
            return Err("Region node threshold must be greater than zero".to_string());
        }

        if !self.z_score_threshold.is_finite() || self.z_score_threshold <= 0.0 {
            return Err(format!(
                "Z-score threshold must be finite and positive, got: {}",
                self.z_score_threshold
            ));
        }

        if self.min_tessellation_points == 0 {
            return Err("Minimum tessellation points must be greater than zero".to_string());
        }

        if self.country_count_threshold == 0 {
            return Err("Country count threshold must be greater than zero".to_string());
        }

        if !self.overlap.threshold.is_finite() || !(0.0..=100.0).contains(&self.overlap.threshold)
        {
            return Err(format!(
                "Overlap threshold must be within [0, 100], got: {}",
                self.overlap.threshold
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_node_threshold: Self::default_region_node_threshold(),
            z_score_threshold: Self::default_z_score_threshold(),
            min_tessellation_points: Self::default_min_tessellation_points(),
            country_count_threshold: Self::default_country_count_threshold(),
            overlap: OverlapFilter::default(),
            parent_policy: ParentPolicy::default(),
            parallel: Self::default_parallel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.region_node_threshold, 10);
        assert_eq!(config.z_score_threshold, 4.0);
        assert_eq!(config.min_tessellation_points, 5);
        assert_eq!(config.overlap.basis, OverlapBasis::Area);
        assert_eq!(config.overlap.threshold, 10.0);
        assert_eq!(config.parent_policy, ParentPolicy::MajorityArea);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_region_node_threshold(3)
            .with_z_score_threshold(2.5)
            .with_overlap(OverlapFilter::new(OverlapBasis::Region, 50.0))
            .with_parent_policy(ParentPolicy::AllOverlapping);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized.region_node_threshold, 3);
        assert_eq!(deserialized.z_score_threshold, 2.5);
        assert_eq!(deserialized.overlap.basis, OverlapBasis::Region);
        assert_eq!(deserialized.parent_policy, ParentPolicy::AllOverlapping);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = Config::from_json(r#"{"overlap": {"basis": "region"}}"#).unwrap();
        assert_eq!(config.overlap.basis, OverlapBasis::Region);
        assert_eq!(config.overlap.threshold, 10.0);
        assert_eq!(config.region_node_threshold, 10);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(Config::from_json(r#"{"z_score_threshold": -1.0}"#).is_err());
        assert!(Config::from_json(r#"{"overlap": {"threshold": 120.0}}"#).is_err());
        assert!(Config::from_json(r#"{"unknown_field": 1}"#).is_err());
        assert!(Config::from_json(r#"{"region_node_threshold": 0}"#).is_err());
        assert!(Config::default().with_region_node_threshold(0).validate().is_err());
    }

    #[test]
    fn test_overlap_filter_basis() {
        let by_area = OverlapFilter::new(OverlapBasis::Area, 10.0);
        assert!(by_area.accepts(1.0, 10.0));
        assert!(!by_area.accepts(90.0, 9.9));

        let by_region = OverlapFilter::new(OverlapBasis::Region, 10.0);
        assert!(by_region.accepts(90.0, 9.9));
        assert!(!by_region.accepts(1.0, 10.0));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default().with_parallel(false);
        let toml_str = config.to_toml().unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert!(!parsed.parallel);
    }
}
