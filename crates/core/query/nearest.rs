use crate::model::{Node, TravelRegions};
use travel_regions_types::coords::LatLng;

impl TravelRegions {
    /// Node with the smallest great-circle distance to `point`, ignoring
    /// nodes located exactly at `point`.
    ///
    /// Ties go to the node seen first in input order. `None` only when no
    /// other node exists.
    pub fn get_nearest_node(&self, point: &LatLng) -> Option<&Node> {
        let mut nearest: Option<(&Node, f64)> = None;
        for node in &self.nodes {
            if node.coordinates().is_identical(point) {
                continue;
            }
            let distance = node.coordinates().haversine_distance(point);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((node, distance)),
            }
        }
        nearest.map(|(node, _)| node)
    }
}
