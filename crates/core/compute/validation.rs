//! Validation for locations and area geometries.

use crate::error::{Result, TravelRegionsError};
use geo::{Area, CoordsIter, MultiPolygon};
use travel_regions_types::coords::LatLng;

/// Validates that a location has a finite latitude in [-90, 90] and
/// longitude in [-180, 180].
///
/// # Examples
///
/// ```
/// use travel_regions::compute::validation::validate_location;
/// use travel_regions::LatLng;
///
/// assert!(validate_location(&LatLng::new(40.7128, -74.0060)).is_ok());
/// assert!(validate_location(&LatLng::new(95.0, 10.0)).is_err());
/// assert!(validate_location(&LatLng::new(10.0, 200.0)).is_err());
/// ```
pub fn validate_location(location: &LatLng) -> Result<()> {
    let (lat, lng) = (location.lat(), location.lng());

    if !lat.is_finite() || !lng.is_finite() {
        return Err(TravelRegionsError::InvalidInput(format!(
            "Coordinates must be finite, got: ({}, {})",
            lat, lng
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(TravelRegionsError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Err(TravelRegionsError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lng
        )));
    }

    Ok(())
}

/// Validates an area used for clipping or overlap queries: at least one
/// polygon, finite vertices and positive area.
pub fn validate_area(area: &MultiPolygon<f64>) -> Result<()> {
    if area.0.is_empty() {
        return Err(TravelRegionsError::InvalidGeometry(
            "Area has no polygons".to_string(),
        ));
    }

    if area
        .coords_iter()
        .any(|coord| !coord.x.is_finite() || !coord.y.is_finite())
    {
        return Err(TravelRegionsError::InvalidGeometry(
            "Area has non-finite vertices".to_string(),
        ));
    }

    let area_size = area.unsigned_area();
    if area_size <= 0.0 {
        return Err(TravelRegionsError::InvalidGeometry(format!(
            "Area must be positive, got: {}",
            area_size
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_validate_location() {
        assert!(validate_location(&LatLng::new(0.0, 0.0)).is_ok());
        assert!(validate_location(&LatLng::new(90.0, 180.0)).is_ok());
        assert!(validate_location(&LatLng::new(-90.1, 0.0)).is_err());
        assert!(validate_location(&LatLng::new(f64::NAN, 0.0)).is_err());
        assert!(validate_location(&LatLng::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_validate_area() {
        let square = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]]);
        assert!(validate_area(&square).is_ok());

        let degenerate = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ]]);
        assert!(matches!(
            validate_area(&degenerate),
            Err(TravelRegionsError::InvalidGeometry(_))
        ));
        assert!(validate_area(&MultiPolygon::new(vec![])).is_err());
    }
}
