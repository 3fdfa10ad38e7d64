//! # travel-regions-types
//!
//! Core serializable types shared by the travel region pipeline and its
//! persisted region files.
//!
//! - **Coordinates**: [`coords::LatLng`], a latitude/longitude pair
//! - **Geometry**: [`geometry::RegionGeometry`], a tagged polygon/multipolygon
//!   stored as explicit `(longitude, latitude)` vertex lists
//! - **Identifiers**: [`id::RegionId`], the `level` + `community_id` identity of a region
//! - **Input rows**: [`row::LocationRow`], one clustered location from the tabular source
//! - **Region files**: [`region_file::RegionFile`], the per-level persisted representation
//!
//! All types are serializable with Serde and convert into the `geo` crate's
//! primitives on demand.
//!
//! ## Examples
//!
//! ```rust
//! use travel_regions_types::coords::LatLng;
//! use travel_regions_types::geometry::RegionGeometry;
//!
//! let square = RegionGeometry::Polygon(vec![
//!     [0.0, 0.0],
//!     [1.0, 0.0],
//!     [1.0, 1.0],
//!     [0.0, 1.0],
//!     [0.0, 0.0],
//! ]);
//! assert!(square.contains(&LatLng::new(0.5, 0.5)));
//! ```

pub mod coords;
pub mod geometry;
pub mod id;
pub mod region_file;
pub mod row;
