use crate::model::{Region, TravelRegions};
use crate::source::countries::{Continent, resolve_continent_by_name};
use log::{info, warn};
use rustc_hash::FxHashSet;
use travel_regions_types::id::RegionId;

impl TravelRegions {
    /// Regions with at least one member country on `continent`.
    ///
    /// Countries the catalog cannot place are reported and ignored.
    pub fn get_continent_regions(&self, continent: Continent) -> Vec<&Region> {
        self.all_regions()
            .filter(|region| {
                region.countries().iter().any(|country| {
                    match resolve_continent_by_name(self.catalog(), country) {
                        Ok(found) => found == continent,
                        Err(e) => {
                            warn!("Region {}: {}", region.id(), e);
                            false
                        }
                    }
                })
            })
            .collect()
    }

    /// Ids of the `level` regions holding a node from `country_code`, in
    /// node order without repeats.
    ///
    /// With `include_multipolygons` unset, multipolygon regions are left out.
    pub fn get_country_regions(
        &self,
        country_code: &str,
        level: u8,
        include_multipolygons: bool,
    ) -> Vec<RegionId> {
        let code = country_code.trim().to_ascii_uppercase();
        let mut seen = FxHashSet::default();
        let regions: Vec<RegionId> = self
            .nodes
            .iter()
            .filter(|node| node.origin_country() == code)
            .filter_map(|node| self.node_region(node.id(), level))
            .filter(|region| include_multipolygons || !region.is_multipolygon())
            .map(Region::id)
            .filter(|id| seen.insert(*id))
            .collect();

        if regions.is_empty() {
            info!("No level {} regions found for country {}", level, code);
        }
        regions
    }
}
