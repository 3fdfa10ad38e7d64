//! Bounding areas that clip tessellation.
//!
//! Read from GeoJSON: a FeatureCollection (its first feature is used), a
//! single Feature, or a bare geometry. Polygon and MultiPolygon geometries
//! are accepted, coordinates are `(longitude, latitude)`.

use crate::compute::validation::validate_area;
use crate::error::{Result, TravelRegionsError};
use geo::{LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};
use std::path::Path;
use travel_regions_types::geometry::{Ring, ring_to_polygon};

/// A named clipping area.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingArea {
    pub name: String,
    pub area: MultiPolygon<f64>,
}

impl BoundingArea {
    /// Build from a validated multipolygon.
    pub fn new(name: impl Into<String>, area: MultiPolygon<f64>) -> Result<Self> {
        validate_area(&area)?;
        Ok(Self {
            name: name.into(),
            area,
        })
    }

    pub fn from_polygon(name: impl Into<String>, polygon: Polygon<f64>) -> Result<Self> {
        Self::new(name, MultiPolygon::new(vec![polygon]))
    }

    /// Build from one `[lon, lat]` exterior ring.
    pub fn from_ring(name: impl Into<String>, ring: &[[f64; 2]]) -> Result<Self> {
        Self::from_polygon(name, ring_to_polygon(ring))
    }

    /// Parse a GeoJSON document.
    pub fn from_geojson(name: impl Into<String>, geojson: &str) -> Result<Self> {
        let parsed: GeoJson = geojson.parse().map_err(|e| {
            TravelRegionsError::InvalidInput(format!("Failed to parse GeoJSON: {}", e))
        })?;

        let mut name = name.into();
        let geometry = match parsed {
            GeoJson::Geometry(geometry) => geometry,
            GeoJson::Feature(feature) => feature_geometry(feature, &mut name)?,
            GeoJson::FeatureCollection(collection) => {
                let feature = collection.features.into_iter().next().ok_or_else(|| {
                    let message = "FeatureCollection has no features".to_string();
                    TravelRegionsError::InvalidInput(message)
                })?;
                feature_geometry(feature, &mut name)?
            }
        };

        let area = match geometry.value {
            Value::Polygon(rings) => MultiPolygon::new(vec![polygon_from_rings(&rings)?]),
            Value::MultiPolygon(polygons) => MultiPolygon::new(
                polygons
                    .iter()
                    .map(|rings| polygon_from_rings(rings))
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => {
                return Err(TravelRegionsError::InvalidInput(
                    "GeoJSON geometry is not a Polygon or MultiPolygon".to_string(),
                ));
            }
        };

        Self::new(name, area)
    }

    /// Read a GeoJSON file; the file stem names the area unless the feature
    /// carries a `name` property.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_geojson(name, &contents)
    }

    /// Exterior rings as stored in a region file's `bounding_area`.
    pub fn exterior_rings(&self) -> Vec<Ring> {
        self.area
            .iter()
            .map(|polygon| {
                polygon
                    .exterior()
                    .coords()
                    .map(|coord| [coord.x, coord.y])
                    .collect()
            })
            .collect()
    }
}

fn feature_geometry(feature: Feature, name: &mut String) -> Result<geojson::Geometry> {
    if let Some(value) = feature.property("name").and_then(|value| value.as_str()) {
        *name = value.to_string();
    }
    feature
        .geometry
        .ok_or_else(|| TravelRegionsError::InvalidInput("Feature has no geometry".to_string()))
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next().ok_or_else(|| {
        TravelRegionsError::InvalidInput("Polygon must have at least one ring".to_string())
    })??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn line_string(ring: &[Vec<f64>]) -> Result<LineString<f64>> {
    let coords = ring
        .iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(TravelRegionsError::InvalidInput(
                    "Coordinate must have at least 2 values".to_string(),
                ));
            }
            Ok(geo::Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::from(coords))
}
