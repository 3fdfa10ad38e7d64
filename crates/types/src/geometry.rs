//! Region geometry as explicit vertex lists.
//!
//! A region is either a single polygon or a multipolygon. The variant is
//! resolved once, at construction or deserialization, and carries its own
//! vertex-list shape. Vertices are `[longitude, latitude]` pairs describing
//! exterior rings only.

use crate::coords::LatLng;
use serde::{Deserialize, Serialize};

/// A closed ring of `[longitude, latitude]` vertices.
pub type Ring = Vec<[f64; 2]>;

/// Which variant a [`RegionGeometry`] is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

/// Geometry of a region.
///
/// Serializes to the tagged form used by region files:
///
/// ```json
/// { "type": "polygon", "geometry": [[lon, lat], ...] }
/// { "type": "multipolygon", "geometry": [[[lon, lat], ...], ...] }
/// ```
///
/// Query code that needs geometric predicates reconstructs a kernel
/// `geo::MultiPolygon` on demand through [`RegionGeometry::to_multi_polygon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "geometry", rename_all = "lowercase")]
pub enum RegionGeometry {
    Polygon(Ring),
    MultiPolygon(Vec<Ring>),
}

impl RegionGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    #[inline]
    pub fn is_multipolygon(&self) -> bool {
        matches!(self, Self::MultiPolygon(_))
    }

    /// Exterior rings of every constituent polygon.
    pub fn rings(&self) -> std::slice::Iter<'_, Ring> {
        match self {
            Self::Polygon(ring) => std::slice::from_ref(ring).iter(),
            Self::MultiPolygon(rings) => rings.iter(),
        }
    }

    /// Number of constituent polygons.
    pub fn part_count(&self) -> usize {
        self.rings().len()
    }

    /// Rebuild each constituent as a `geo::Polygon`.
    pub fn polygons(&self) -> Vec<geo::Polygon<f64>> {
        self.rings().map(|ring| ring_to_polygon(ring)).collect()
    }

    pub fn to_multi_polygon(&self) -> geo::MultiPolygon<f64> {
        geo::MultiPolygon::new(self.polygons())
    }

    /// Extract exterior rings from a kernel multipolygon.
    ///
    /// Returns `None` when no constituent has a non-empty exterior. A single
    /// constituent yields [`RegionGeometry::Polygon`], several yield
    /// [`RegionGeometry::MultiPolygon`].
    pub fn from_multi_polygon(multi_polygon: &geo::MultiPolygon<f64>) -> Option<Self> {
        let mut rings: Vec<Ring> = multi_polygon
            .iter()
            .map(|polygon| {
                polygon
                    .exterior()
                    .coords()
                    .map(|coord| [coord.x, coord.y])
                    .collect::<Ring>()
            })
            .filter(|ring| !ring.is_empty())
            .collect();

        match rings.len() {
            0 => None,
            1 => rings.pop().map(Self::Polygon),
            _ => Some(Self::MultiPolygon(rings)),
        }
    }

    /// Point-in-geometry test for a latitude/longitude location.
    pub fn contains(&self, location: &LatLng) -> bool {
        use geo::Contains;
        self.to_multi_polygon().contains(&location.to_point())
    }
}

/// Build a hole-free polygon from a `[lon, lat]` ring.
pub fn ring_to_polygon(ring: &[[f64; 2]]) -> geo::Polygon<f64> {
    let coords: Vec<geo::Coord<f64>> = ring.iter().map(|&[x, y]| geo::Coord { x, y }).collect();
    geo::Polygon::new(geo::LineString::from(coords), vec![])
}

/// Serde adapter for `Vec<Option<RegionGeometry>>`.
///
/// Region files store a region whose merge produced nothing as an empty
/// object `{}` so the array stays index-aligned with `community_IDs`.
/// Both `{}` and `null` deserialize to `None`.
pub mod slots {
    use super::RegionGeometry;
    use serde::de::Error as _;
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    struct Slot<'a>(Option<&'a RegionGeometry>);

    impl Serialize for Slot<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0 {
                Some(geometry) => geometry.serialize(serializer),
                None => serializer.serialize_map(Some(0))?.end(),
            }
        }
    }

    pub fn serialize<S: Serializer>(
        geometries: &[Option<RegionGeometry>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(geometries.len()))?;
        for geometry in geometries {
            seq.serialize_element(&Slot(geometry.as_ref()))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<RegionGeometry>>, D::Error> {
        let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
        values
            .into_iter()
            .map(|value| match &value {
                serde_json::Value::Null => Ok(None),
                serde_json::Value::Object(map) if map.is_empty() => Ok(None),
                _ => serde_json::from_value(value)
                    .map(Some)
                    .map_err(D::Error::custom),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, polygon};

    fn unit_square(offset: f64) -> Ring {
        vec![
            [offset, 0.0],
            [offset + 1.0, 0.0],
            [offset + 1.0, 1.0],
            [offset, 1.0],
            [offset, 0.0],
        ]
    }

    #[test]
    fn test_polygon_wire_format() {
        let geometry = RegionGeometry::Polygon(unit_square(0.0));
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "polygon");
        assert_eq!(json["geometry"][1], serde_json::json!([1.0, 0.0]));

        let parsed: RegionGeometry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, geometry);
    }

    #[test]
    fn test_multipolygon_wire_format() {
        let geometry = RegionGeometry::MultiPolygon(vec![unit_square(0.0), unit_square(5.0)]);
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "multipolygon");
        assert_eq!(json["geometry"].as_array().unwrap().len(), 2);
        assert_eq!(geometry.kind(), GeometryKind::MultiPolygon);
        assert_eq!(geometry.part_count(), 2);
    }

    #[test]
    fn test_from_multi_polygon_picks_variant() {
        let single = geo::MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ]]);
        let extracted = RegionGeometry::from_multi_polygon(&single).unwrap();
        assert_eq!(extracted.kind(), GeometryKind::Polygon);
        assert!((extracted.to_multi_polygon().unsigned_area() - 2.0).abs() < 1e-12);

        let empty = geo::MultiPolygon::<f64>::new(vec![]);
        assert!(RegionGeometry::from_multi_polygon(&empty).is_none());
    }

    #[test]
    fn test_contains_uses_lat_lng_order() {
        let geometry = RegionGeometry::Polygon(unit_square(10.0));
        assert!(geometry.contains(&LatLng::new(0.5, 10.5)));
        assert!(!geometry.contains(&LatLng::new(10.5, 0.5)));
    }

    #[test]
    fn test_slots_roundtrip_empty_object() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            #[serde(with = "slots")]
            geometries: Vec<Option<RegionGeometry>>,
        }

        let holder = Holder {
            geometries: vec![Some(RegionGeometry::Polygon(unit_square(0.0))), None],
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.ends_with(",{}]}"));

        let parsed: Holder =
            serde_json::from_str(r#"{"geometries":[{},null,{"type":"polygon","geometry":[]}]}"#)
                .unwrap();
        assert_eq!(parsed.geometries.len(), 3);
        assert!(parsed.geometries[0].is_none());
        assert!(parsed.geometries[1].is_none());
        assert!(parsed.geometries[2].is_some());
    }
}
