//! Persistence of per-level region files and model export.

mod export;
pub mod region_file;

pub use region_file::{load_region_file, save_region_file};
