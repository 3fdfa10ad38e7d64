use crate::model::{Region, TravelRegions};
use std::collections::BTreeMap;
use travel_regions_types::coords::LatLng;
use travel_regions_types::id::RegionId;

impl TravelRegions {
    /// Map each region of every level to the query points it contains.
    ///
    /// A point lands in at most one region per level, so it can appear once
    /// per level. Regions containing no point are left out. Boundary points
    /// are outside.
    pub fn points_to_regions(&self, points: &[LatLng]) -> BTreeMap<RegionId, Vec<LatLng>> {
        let regions: Vec<&Region> = self.all_regions().collect();
        classify_points(points, &regions)
    }

    /// Like [`TravelRegions::points_to_regions`] restricted to one level.
    pub fn points_to_level_regions(
        &self,
        points: &[LatLng],
        level: u8,
    ) -> BTreeMap<RegionId, Vec<LatLng>> {
        let regions: Vec<&Region> = self.regions(level).iter().collect();
        classify_points(points, &regions)
    }
}

/// Containment of every point in every candidate region.
pub fn classify_points(points: &[LatLng], regions: &[&Region]) -> BTreeMap<RegionId, Vec<LatLng>> {
    let mut classified: BTreeMap<RegionId, Vec<LatLng>> = BTreeMap::new();
    for point in points {
        for region in regions {
            if region.contains(point) {
                classified.entry(region.id()).or_default().push(*point);
            }
        }
    }
    classified
}
