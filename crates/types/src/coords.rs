//! Latitude/longitude coordinates.

use serde::{Deserialize, Serialize};

/// A geographic location given as latitude followed by longitude.
///
/// Serialized as a two-element `[lat, lng]` array, which is the `latlng`
/// field of persisted region nodes. Geometry is always built in
/// `(x = longitude, y = latitude)` order; use [`LatLng::to_point`] to cross over.
///
/// # Examples
///
/// ```
/// use travel_regions_types::coords::LatLng;
///
/// let central_park = LatLng::new(40.781459, -73.966551);
/// let point = central_park.to_point();
/// assert_eq!(point.x(), -73.966551);
/// assert_eq!(point.y(), 40.781459);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Convert to a `geo::Point` with longitude as x and latitude as y.
    #[inline]
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }

    #[inline]
    pub fn to_coord(&self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Great-circle distance to another location in meters.
    ///
    /// ```
    /// use travel_regions_types::coords::LatLng;
    ///
    /// let nyc = LatLng::new(40.7128, -74.0060);
    /// let la = LatLng::new(34.0522, -118.2437);
    /// let distance = nyc.haversine_distance(&la);
    /// assert!(distance > 3_900_000.0 && distance < 4_000_000.0);
    /// ```
    #[inline]
    pub fn haversine_distance(&self, other: &LatLng) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.to_point(), other.to_point())
    }

    /// True when both components are bit-for-bit equal.
    ///
    /// Unlike `==`, this distinguishes `0.0` from `-0.0` and treats identical
    /// NaN payloads as equal.
    #[inline]
    pub fn is_identical(&self, other: &LatLng) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lng.to_bits() == other.lng.to_bits()
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.lat, value.lng]
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<geo::Point<f64>> for LatLng {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<LatLng> for geo::Point<f64> {
    fn from(value: LatLng) -> Self {
        value.to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order() {
        let location = LatLng::new(48.137, 11.575);
        let coord = location.to_coord();
        assert_eq!(coord.x, 11.575);
        assert_eq!(coord.y, 48.137);
        assert_eq!(LatLng::from(location.to_point()), location);
    }

    #[test]
    fn test_serializes_as_lat_lng_array() {
        let location = LatLng::new(-14.269798, -40.821783);
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "[-14.269798,-40.821783]");
        let parsed: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, location);
    }

    #[test]
    fn test_is_identical_distinguishes_signed_zero() {
        let a = LatLng::new(0.0, 10.0);
        let b = LatLng::new(-0.0, 10.0);
        assert_eq!(a, b);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&LatLng::new(0.0, 10.0)));
    }

    #[test]
    fn test_haversine_zero_for_same_location() {
        let location = LatLng::new(51.5, -0.12);
        assert_eq!(location.haversine_distance(&location), 0.0);
    }
}
