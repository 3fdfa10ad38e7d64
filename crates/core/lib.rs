//! Hierarchical travel regions built from clustered, geocoded locations.
//!
//! ## Features
//! - **Construction**: per-community z-score outlier filtering, Voronoi
//!   tessellation clipped to bounding areas, and union of each community's
//!   cells into one polygon or multipolygon per level
//! - **Hierarchy**: immutable regions per level with a node membership index
//! - **Queries**: point classification, overlap metrics, adjacency,
//!   parents and children across levels, nearest node, fuzzy name search,
//!   country and continent filters
//! - **Persistence**: per-level region files in JSON
//!
//! ```rust
//! use travel_regions::{BoundingArea, LatLng, LocationRow, TravelRegions};
//! use travel_regions::config::Config;
//!
//! let rows: Vec<LocationRow> = (0..12)
//!     .map(|i| LocationRow {
//!         node_id: i.to_string(),
//!         communities: vec![if i < 6 { 1 } else { 2 }],
//!         country_code: "DE".to_string(),
//!         latitude: 1.0 + (i % 6) as f64 * 0.5,
//!         longitude: (if i < 6 { 1.0 } else { 4.0 }) + (i % 3) as f64 * 0.2,
//!         place_name: format!("Town {i}"),
//!     })
//!     .collect();
//! let area = BoundingArea::from_ring(
//!     "box",
//!     &[[0.0, 0.0], [6.0, 0.0], [6.0, 5.0], [0.0, 5.0], [0.0, 0.0]],
//! )?;
//!
//! let model = TravelRegions::builder()
//!     .rows(rows)
//!     .levels(1)
//!     .bounding_area(area)
//!     .config(Config::default().with_region_node_threshold(3))
//!     .build()?;
//!
//! assert_eq!(model.regions(1).len(), 2);
//! let hits = model.points_to_regions(&[LatLng::new(2.0, 1.1)]);
//! assert_eq!(hits.len(), 1);
//! # Ok::<(), travel_regions::TravelRegionsError>(())
//! ```

pub mod builder;
pub mod cancel;
pub mod compute;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod source;
pub mod storage;

pub use builder::TravelRegionsBuilder;
pub use cancel::CancelToken;
pub use error::{Result, TravelRegionsError};
pub use model::{Node, Region, TravelRegions};

pub use config::{Config, OverlapBasis, OverlapFilter, ParentPolicy};
pub use source::{BoundingArea, Continent, CountryCatalog, IsoCountries};

pub use travel_regions_types::coords::LatLng;
pub use travel_regions_types::geometry::{GeometryKind, RegionGeometry};
pub use travel_regions_types::id::{MAX_LEVEL, RegionId};
pub use travel_regions_types::region_file::{RegionFile, SerializedNode};
pub use travel_regions_types::row::LocationRow;

pub use geo::{MultiPolygon, Polygon};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    //! Common imports.
    //!
    //! ```rust
    //! use travel_regions::prelude::*;
    //! ```

    pub use crate::{
        BoundingArea, CancelToken, Config, Continent, LatLng, LocationRow, Node, Region,
        RegionGeometry, RegionId, Result, TravelRegions, TravelRegionsBuilder,
        TravelRegionsError,
    };
}
