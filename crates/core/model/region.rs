use crate::compute::geometry::Shape;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use travel_regions_types::coords::LatLng;
use travel_regions_types::geometry::RegionGeometry;
use travel_regions_types::id::RegionId;

/// A merged, geometrically realized community on one hierarchical level.
///
/// Regions are immutable. The stored geometry is the vertex-list form; the
/// kernel shape used by predicates is built on first use and cached.
#[derive(Debug)]
pub struct Region {
    id: RegionId,
    geometry: RegionGeometry,
    shape: OnceCell<Shape>,
    node_ids: Vec<String>,
    /// Country name of every member whose code resolved, in member order
    member_countries: Vec<String>,
    countries: Vec<String>,
}

impl Region {
    pub(crate) fn new(
        id: RegionId,
        geometry: RegionGeometry,
        node_ids: Vec<String>,
        member_countries: Vec<String>,
        country_threshold: usize,
    ) -> Self {
        let mut region = Self {
            id,
            geometry,
            shape: OnceCell::new(),
            node_ids,
            member_countries,
            countries: Vec::new(),
        };
        region.countries = region.countries_in_order(country_threshold);
        region
    }

    #[inline]
    pub fn id(&self) -> RegionId {
        self.id
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.id.level()
    }

    #[inline]
    pub fn community_id(&self) -> i64 {
        self.id.community_id()
    }

    #[inline]
    pub fn geometry(&self) -> &RegionGeometry {
        &self.geometry
    }

    #[inline]
    pub fn is_multipolygon(&self) -> bool {
        self.geometry.is_multipolygon()
    }

    /// Ids of member nodes, in region-file order.
    #[inline]
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Kernel geometry, reconstructed once on demand.
    pub fn shape(&self) -> &Shape {
        self.shape.get_or_init(|| Shape::from_geometry(&self.geometry))
    }

    pub fn area(&self) -> f64 {
        self.shape().area()
    }

    /// Strict containment; boundary points are outside.
    pub fn contains(&self, location: &LatLng) -> bool {
        self.shape().contains_point(&location.to_point())
    }

    /// Country names with at least `threshold` member nodes.
    ///
    /// Members whose country code is unknown are not counted.
    pub fn country_counts(&self, threshold: usize) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for country in &self.member_countries {
            *counts.entry(country.clone()).or_default() += 1;
        }
        counts.retain(|_, count| *count >= threshold);
        counts
    }

    /// Countries at the configured threshold, in order of first appearance.
    #[inline]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    fn countries_in_order(&self, threshold: usize) -> Vec<String> {
        let counts = self.country_counts(threshold);
        let mut ordered: Vec<String> = Vec::with_capacity(counts.len());
        for country in &self.member_countries {
            if counts.contains_key(country) && !ordered.contains(country) {
                ordered.push(country.clone());
            }
        }
        ordered
    }

    /// Candidates sharing boundary with this region without overlapping it.
    ///
    /// The region itself is excluded when present among `candidates`. Any
    /// constituent polygon touching any constituent of a candidate counts,
    /// within the kernel's boundary and overlap tolerances.
    pub fn neighbors<'a>(&self, candidates: &'a [Region]) -> Vec<&'a Region> {
        candidates
            .iter()
            .filter(|candidate| candidate.id != self.id)
            .filter(|candidate| self.shape().touches(candidate.shape()))
            .collect()
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Region {}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64) -> RegionGeometry {
        RegionGeometry::Polygon(vec![
            [x, y],
            [x + 1.0, y],
            [x + 1.0, y + 1.0],
            [x, y + 1.0],
            [x, y],
        ])
    }

    fn region(community_id: i64, geometry: RegionGeometry, countries: &[&str]) -> Region {
        Region::new(
            RegionId::new(1, community_id).unwrap(),
            geometry,
            (0..countries.len()).map(|i| format!("{community_id}-{i}")).collect(),
            countries.iter().map(|c| c.to_string()).collect(),
            1,
        )
    }

    #[test]
    fn test_country_counts_threshold() {
        let region = region(1, square(0.0, 0.0), &["Germany", "Austria", "Germany"]);
        let counts = region.country_counts(1);
        assert_eq!(counts.get("Germany"), Some(&2));
        assert_eq!(counts.get("Austria"), Some(&1));

        let counts = region.country_counts(2);
        assert_eq!(counts.len(), 1);
        assert_eq!(region.countries(), &["Germany".to_string(), "Austria".to_string()]);
    }

    #[test]
    fn test_neighbors_exclude_self_and_overlaps() {
        let regions = vec![
            region(1, square(0.0, 0.0), &[]),
            region(2, square(1.0, 0.0), &[]),
            region(3, square(5.0, 5.0), &[]),
            region(
                4,
                RegionGeometry::MultiPolygon(vec![
                    match square(20.0, 20.0) {
                        RegionGeometry::Polygon(ring) => ring,
                        _ => unreachable!(),
                    },
                    match square(0.0, 1.0) {
                        RegionGeometry::Polygon(ring) => ring,
                        _ => unreachable!(),
                    },
                ]),
                &[],
            ),
        ];

        let ids: Vec<i64> = regions[0]
            .neighbors(&regions)
            .iter()
            .map(|r| r.community_id())
            .collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(regions[2].neighbors(&regions).is_empty());
    }

    #[test]
    fn test_contains_excludes_boundary() {
        let region = region(1, square(0.0, 0.0), &[]);
        assert!(region.contains(&LatLng::new(0.5, 0.5)));
        assert!(!region.contains(&LatLng::new(0.0, 0.5)));
        assert!((region.area() - 1.0).abs() < 1e-12);
    }
}
