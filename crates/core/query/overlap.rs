use crate::compute::geometry::Shape;
use crate::config::OverlapFilter;
use crate::model::TravelRegions;
use geo::MultiPolygon;
use log::warn;
use std::collections::BTreeMap;
use travel_regions_types::id::RegionId;

/// Shared area as `(percentage of region, percentage of area)`.
pub type Overlap = (f64, f64);

impl TravelRegions {
    /// Regions of `level` overlapping `area`, using the configured overlap
    /// basis with a per-call `threshold` percentage.
    pub fn compare_overlap(
        &self,
        level: u8,
        area: &MultiPolygon<f64>,
        threshold: f64,
    ) -> BTreeMap<RegionId, Overlap> {
        let filter = OverlapFilter::new(self.config.overlap.basis, threshold);
        self.compare_overlap_with(level, area, filter)
    }

    /// Regions of `level` whose overlap with `area` passes `filter`.
    ///
    /// `area` is in `(longitude, latitude)` order. A zero-area query matches
    /// nothing.
    pub fn compare_overlap_with(
        &self,
        level: u8,
        area: &MultiPolygon<f64>,
        filter: OverlapFilter,
    ) -> BTreeMap<RegionId, Overlap> {
        let query = Shape::new(area.clone());
        let area_size = query.area();
        if area_size <= 0.0 || !area_size.is_finite() {
            warn!("Overlap query area has no extent");
            return BTreeMap::new();
        }

        self.regions(level)
            .iter()
            .filter_map(|region| {
                let region_size = region.area();
                if region_size <= 0.0 {
                    return None;
                }
                let shared = region.shape().intersection_area(&query);
                let as_region = shared / region_size * 100.0;
                let as_area = shared / area_size * 100.0;
                filter
                    .accepts(as_region, as_area)
                    .then_some((region.id(), (as_region, as_area)))
            })
            .collect()
    }
}
