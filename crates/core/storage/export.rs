use super::region_file::save_region_file;
use crate::error::{Result, TravelRegionsError};
use crate::model::TravelRegions;
use log::warn;
use rustc_hash::FxHashSet;
use std::path::Path;
use travel_regions_types::id::{MAX_LEVEL, RegionId};
use travel_regions_types::region_file::{RegionFile, SerializedNode};

impl TravelRegions {
    /// Region file for `level`, optionally restricted to `region_ids`.
    ///
    /// Without ids this is the level's file as built or loaded, including
    /// empty slots and outliers. With ids, each known region of `level` is
    /// written once, in the given order; unknown ids and ids of other levels
    /// are skipped with a warning, and outlier lists are left empty.
    pub fn level_region_file(&self, level: u8, region_ids: Option<&[&str]>) -> Result<RegionFile> {
        let source = self.region_file(level).ok_or(TravelRegionsError::InvalidLevel {
            level: usize::from(level),
            max: MAX_LEVEL.min(self.levels()),
        })?;

        let Some(region_ids) = region_ids else {
            return Ok(source.clone());
        };

        let mut file = RegionFile::new(level);
        file.bounding_area = source.bounding_area.clone();
        let mut exported = FxHashSet::default();
        for raw_id in region_ids {
            let region = raw_id
                .parse::<RegionId>()
                .ok()
                .filter(|id| id.level() == level)
                .and_then(|id| self.region(id));
            let Some(region) = region else {
                warn!("Region {} is not on level {}, not exported", raw_id, level);
                continue;
            };
            if !exported.insert(region.id()) {
                continue;
            }

            let nodes = self
                .region_nodes(region)
                .map(|node| SerializedNode {
                    id: node.id().to_string(),
                    latlng: node.coordinates(),
                })
                .collect();
            file.push(
                region.community_id(),
                Some(region.geometry().clone()),
                nodes,
                Vec::new(),
            );
        }
        Ok(file)
    }

    /// Write the region file of `level` to `path`.
    pub fn export_regions<P: AsRef<Path>>(
        &self,
        level: u8,
        path: P,
        region_ids: Option<&[&str]>,
    ) -> Result<()> {
        let file = self.level_region_file(level, region_ids)?;
        save_region_file(&file, path)
    }
}
