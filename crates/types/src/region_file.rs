//! Persisted per-level region representation.

use crate::coords::LatLng;
use crate::geometry::{Ring, RegionGeometry, slots};
use crate::row::LocationRow;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// A region member as stored in a region file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub id: String,
    pub latlng: LatLng,
}

/// All regions of one hierarchical level.
///
/// Top-level arrays are positionally aligned: index `i` of `community_IDs`,
/// `geometries`, `nodes` and `outliers` describes the same region.
///
/// ```json
/// {
///   "level": 2,
///   "community_IDs": [2, 7],
///   "bounding_area": [[[lon, lat], ...]],
///   "geometries": [{"type": "polygon", "geometry": [...]}, {}],
///   "nodes": [[{"id": "45", "latlng": [40.78, -73.97]}], []],
///   "outliers": [[["12", "2", "US", "40.1", "-74.0", "Trenton"]], []]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFile {
    pub level: u8,

    #[serde(rename = "community_IDs")]
    pub community_ids: Vec<i64>,

    /// Exterior rings of the bounding areas the level was tessellated in.
    #[serde(default, deserialize_with = "one_or_many_rings")]
    pub bounding_area: Vec<Ring>,

    #[serde(with = "slots")]
    pub geometries: Vec<Option<RegionGeometry>>,

    pub nodes: Vec<Vec<SerializedNode>>,

    #[serde(default)]
    pub outliers: Vec<Vec<LocationRow>>,
}

impl RegionFile {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            community_ids: Vec::new(),
            bounding_area: Vec::new(),
            geometries: Vec::new(),
            nodes: Vec::new(),
            outliers: Vec::new(),
        }
    }

    /// Number of region slots, including slots with empty geometry.
    pub fn len(&self) -> usize {
        self.community_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.community_ids.is_empty()
    }

    /// Append one region slot, keeping every array aligned.
    pub fn push(
        &mut self,
        community_id: i64,
        geometry: Option<RegionGeometry>,
        nodes: Vec<SerializedNode>,
        outliers: Vec<LocationRow>,
    ) {
        self.community_ids.push(community_id);
        self.geometries.push(geometry);
        self.nodes.push(nodes);
        self.outliers.push(outliers);
    }

    /// Check positional alignment of the top-level arrays.
    ///
    /// `outliers` may be empty (exports of selected regions omit them);
    /// otherwise it must match the other arrays.
    pub fn validate(&self) -> Result<(), String> {
        let regions = self.community_ids.len();
        if self.geometries.len() != regions {
            return Err(format!(
                "level {}: {} geometries for {} community ids",
                self.level,
                self.geometries.len(),
                regions
            ));
        }
        if self.nodes.len() != regions {
            return Err(format!(
                "level {}: {} node lists for {} community ids",
                self.level,
                self.nodes.len(),
                regions
            ));
        }
        if !self.outliers.is_empty() && self.outliers.len() != regions {
            return Err(format!(
                "level {}: {} outlier lists for {} community ids",
                self.level,
                self.outliers.len(),
                regions
            ));
        }
        let mut seen = HashSet::with_capacity(regions);
        if let Some(duplicate) = self.community_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(format!(
                "level {}: community id {} appears more than once",
                self.level, duplicate
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let file: RegionFile = serde_json::from_str(json)?;
        if let Err(e) = file.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Accept either a single ring `[[lon, lat], ...]` or a list of rings.
fn one_or_many_rings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Ring>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Ring>),
        One(Ring),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(rings) => rings,
        OneOrMany::One(ring) => vec![ring],
    })
}
