//! Input adapters: location rows, bounding areas and country metadata.

pub mod bounding;
pub mod countries;
pub mod rows;

pub use bounding::BoundingArea;
pub use countries::{CONTINENT_OVERRIDES, Continent, CountryCatalog, IsoCountries};
pub use rows::{DelimitedRows, read_rows};
