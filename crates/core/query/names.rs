use crate::compute::search::{fuzzy_contains, levenshtein_distance};
use crate::model::{Node, Region, TravelRegions};

/// Edits allowed between a query and a matching name.
pub const MAX_EDIT_DISTANCE: usize = 1;

impl TravelRegions {
    /// Nodes whose name contains `name` within one edit.
    ///
    /// Closest whole names come first; equally close names keep input order.
    pub fn find_node(&self, name: &str) -> Vec<&Node> {
        let mut found: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|node| fuzzy_contains(name, node.name(), MAX_EDIT_DISTANCE))
            .collect();
        found.sort_by_cached_key(|node| levenshtein_distance(name, node.name()));
        found
    }

    /// Regions, on any level, in which every query country approximately
    /// matches one of the region's countries.
    pub fn find_region(&self, countries: &[&str]) -> Vec<&Region> {
        self.all_regions()
            .filter(|region| {
                countries.iter().all(|query| {
                    region
                        .countries()
                        .iter()
                        .any(|country| fuzzy_contains(query, country, MAX_EDIT_DISTANCE))
                })
            })
            .collect()
    }
}
