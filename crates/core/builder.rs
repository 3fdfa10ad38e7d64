//! Builder for travel region models.
//!
//! Two modes are supported:
//! - **Pipeline**: rows, a level count and at least one bounding area. Every
//!   level is tessellated and merged from scratch.
//! - **Precomputed**: rows and one region file per level. Regions are
//!   instantiated from the stored geometries.
//!
//! Parameter combinations are checked before any work starts.

use crate::cancel::CancelToken;
use crate::compute::validation::validate_location;
use crate::config::Config;
use crate::error::{Result, TravelRegionsError};
use crate::model::{Node, TravelRegions};
use crate::pipeline::Pipeline;
use crate::source::bounding::BoundingArea;
use crate::source::countries::{CountryCatalog, IsoCountries};
use crate::source::rows::read_rows;
use crate::storage::load_region_file;
use log::{info, warn};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::Arc;
use travel_regions_types::id::{MAX_LEVEL, is_valid_level};
use travel_regions_types::region_file::RegionFile;
use travel_regions_types::row::LocationRow;

/// Builder for [`TravelRegions`].
pub struct TravelRegionsBuilder {
    rows: Vec<LocationRow>,
    levels: Option<usize>,
    areas: Vec<BoundingArea>,
    region_files: Vec<RegionFile>,
    config: Config,
    cancel: CancelToken,
    catalog: Arc<dyn CountryCatalog>,
}

impl TravelRegionsBuilder {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            levels: None,
            areas: Vec::new(),
            region_files: Vec::new(),
            config: Config::default(),
            cancel: CancelToken::new(),
            catalog: Arc::new(IsoCountries),
        }
    }

    /// Append location rows.
    pub fn rows<I: IntoIterator<Item = LocationRow>>(mut self, rows: I) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Append the rows of a comma-separated file with a header line.
    pub fn rows_from_path<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let rows = read_rows(path)?;
        Ok(self.rows(rows))
    }

    /// Number of hierarchical levels to build, `1..=9`.
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn bounding_area(mut self, area: BoundingArea) -> Self {
        self.areas.push(area);
        self
    }

    pub fn bounding_areas<I: IntoIterator<Item = BoundingArea>>(mut self, areas: I) -> Self {
        self.areas.extend(areas);
        self
    }

    /// Append bounding areas read from GeoJSON files.
    pub fn bounding_areas_from_geojson<I, P>(self, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let areas = paths
            .into_iter()
            .map(BoundingArea::from_path)
            .collect::<Result<Vec<_>>>()?;
        Ok(self.bounding_areas(areas))
    }

    pub fn region_file(mut self, file: RegionFile) -> Self {
        self.region_files.push(file);
        self
    }

    pub fn region_files_from_paths<I, P>(mut self, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.region_files.push(load_region_file(path)?);
        }
        Ok(self)
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Token the build polls; cancelling it makes `build` return `Cancelled`.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Country metadata used for region country names and continent filters.
    pub fn catalog(mut self, catalog: Arc<dyn CountryCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validate parameters, then build.
    pub fn build(self) -> Result<TravelRegions> {
        if self.rows.is_empty() {
            return Err(TravelRegionsError::InvalidConfig(
                "No location rows provided".to_string(),
            ));
        }
        self.config
            .validate()
            .map_err(TravelRegionsError::InvalidConfig)?;

        let files = if self.region_files.is_empty() {
            self.check_pipeline_mode()?
        } else {
            self.check_precomputed_mode()?
        };
        let rows = clean_rows(self.rows);

        let files = match files {
            Some(files) => files,
            None => {
                let levels = self.levels.unwrap_or_default() as u8;
                info!(
                    "Building {} levels from {} rows in {} bounding areas",
                    levels,
                    rows.len(),
                    self.areas.len()
                );
                Pipeline::new(&rows, &self.areas, &self.config, &self.cancel).run(levels)?
            }
        };
        self.cancel.check()?;

        let nodes = rows.iter().map(Node::from_row).collect();
        TravelRegions::from_region_files(nodes, files, self.config, self.catalog)
    }

    /// Pipeline mode needs a valid level count, bounding areas, and a
    /// community column per level on every row. `Ok(None)` means "run it".
    fn check_pipeline_mode(&self) -> Result<Option<Vec<RegionFile>>> {
        let levels = self.levels.ok_or_else(|| {
            TravelRegionsError::InvalidConfig(
                "The number of hierarchical levels must be provided".to_string(),
            )
        })?;
        check_level(levels)?;

        if self.areas.is_empty() {
            return Err(TravelRegionsError::InvalidConfig(
                "At least one bounding area is required to build regions".to_string(),
            ));
        }

        if let Some(row) = self.rows.iter().find(|row| row.communities.len() < levels) {
            return Err(TravelRegionsError::InvalidConfig(format!(
                "Row {} has {} community columns, {} levels requested",
                row.node_id,
                row.communities.len(),
                levels
            )));
        }
        Ok(None)
    }

    /// Precomputed mode needs one file per level, levels in range and, when
    /// a level count is given, exactly the files `1..=levels`.
    fn check_precomputed_mode(&self) -> Result<Option<Vec<RegionFile>>> {
        if !self.areas.is_empty() {
            return Err(TravelRegionsError::InvalidConfig(
                "Bounding areas cannot be combined with precomputed region files".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        for file in &self.region_files {
            if !is_valid_level(file.level) {
                return Err(TravelRegionsError::InvalidLevel {
                    level: usize::from(file.level),
                    max: MAX_LEVEL,
                });
            }
            if !seen.insert(file.level) {
                return Err(TravelRegionsError::InvalidConfig(format!(
                    "Duplicate region file for level {}",
                    file.level
                )));
            }
        }

        if let Some(levels) = self.levels {
            check_level(levels)?;
            if seen.len() != levels || seen.iter().any(|&level| usize::from(level) > levels) {
                return Err(TravelRegionsError::InvalidConfig(format!(
                    "Expected region files for levels 1..={}, got {} files",
                    levels,
                    seen.len()
                )));
            }
        }
        Ok(Some(self.region_files.clone()))
    }
}

impl Default for TravelRegionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_level(levels: usize) -> Result<()> {
    if levels == 0 || levels > usize::from(MAX_LEVEL) {
        return Err(TravelRegionsError::InvalidLevel {
            level: levels,
            max: MAX_LEVEL,
        });
    }
    Ok(())
}

/// Drop rows with unusable coordinates or a repeated node id.
fn clean_rows(rows: Vec<LocationRow>) -> Vec<LocationRow> {
    let mut seen = FxHashSet::default();
    rows.into_iter()
        .filter(|row| match validate_location(&row.coordinates()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping node {}: {}", row.node_id, e);
                false
            }
        })
        .filter(|row| {
            let fresh = seen.insert(row.node_id.clone());
            if !fresh {
                warn!("Skipping duplicate node id {}", row.node_id);
            }
            fresh
        })
        .collect()
}
