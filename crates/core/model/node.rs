use travel_regions_types::coords::LatLng;
use travel_regions_types::row::LocationRow;

/// A located entity from the input rows.
///
/// Region membership is not stored on the node; it lives in the model's
/// per-level membership table (see [`TravelRegions::node_region`]).
///
/// [`TravelRegions::node_region`]: crate::TravelRegions::node_region
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    name: String,
    coordinates: LatLng,
    origin_country: String,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinates: LatLng,
        origin_country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            origin_country: origin_country.into(),
        }
    }

    pub fn from_row(row: &LocationRow) -> Self {
        Self::new(
            row.node_id.clone(),
            row.place_name.clone(),
            row.coordinates(),
            row.country_code.clone(),
        )
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn coordinates(&self) -> LatLng {
        self.coordinates
    }

    /// ISO alpha-2 code as given in the input row.
    #[inline]
    pub fn origin_country(&self) -> &str {
        &self.origin_country
    }
}
