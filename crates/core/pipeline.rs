//! Region construction: outlier filtering, constrained tessellation and
//! per-community merging, one region file per level.
//!
//! Levels never read each other's state, and neither do bounding areas
//! within a level, so both run on the rayon pool when enabled. Every task
//! owns its kernel inputs and returns an immutable result that the calling
//! thread assembles.

use crate::cancel::CancelToken;
use crate::compute::geometry::Shape;
use crate::compute::merge::merge_communities;
use crate::compute::outliers::split_outliers;
use crate::compute::tessellation::{CommunityCells, Tessellator};
use crate::config::Config;
use crate::error::{Result, TravelRegionsError};
use crate::source::bounding::BoundingArea;
use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::Instant;
use travel_regions_types::coords::LatLng;
use travel_regions_types::region_file::{RegionFile, SerializedNode};
use travel_regions_types::row::LocationRow;

/// One community on one level after outlier filtering.
#[derive(Debug, Clone)]
pub struct Community<'a> {
    pub id: i64,
    pub inliers: Vec<&'a LocationRow>,
    pub outliers: Vec<&'a LocationRow>,
}

/// Group rows by their community on `level`, in order of first appearance.
pub fn group_communities(rows: &[LocationRow], level: u8) -> Result<Vec<(i64, Vec<&LocationRow>)>> {
    let mut positions: FxHashMap<i64, usize> = FxHashMap::default();
    let mut communities: Vec<(i64, Vec<&LocationRow>)> = Vec::new();

    for row in rows {
        let community_id = row.community(level).ok_or_else(|| {
            TravelRegionsError::InvalidInput(format!(
                "Row {} has no community column for level {}",
                row.node_id, level
            ))
        })?;
        let position = *positions.entry(community_id).or_insert_with(|| {
            communities.push((community_id, Vec::new()));
            communities.len() - 1
        });
        communities[position].1.push(row);
    }
    Ok(communities)
}

/// Split every community into inliers and outliers, once per community.
pub fn filter_communities(
    grouped: Vec<(i64, Vec<&LocationRow>)>,
    z_score_threshold: f64,
) -> Vec<Community<'_>> {
    grouped
        .into_iter()
        .map(|(id, members)| {
            let split = split_outliers(&members, |row| row.coordinates(), z_score_threshold);
            let outliers: Vec<&LocationRow> =
                split.outlier_indices.iter().map(|&idx| members[idx]).collect();
            if !outliers.is_empty() {
                debug!("Community {}: {} outliers removed", id, outliers.len());
            }
            Community {
                id,
                inliers: split.inliers,
                outliers,
            }
        })
        .collect()
}

/// Builds region files from rows and bounding areas.
pub struct Pipeline<'a> {
    rows: &'a [LocationRow],
    areas: &'a [BoundingArea],
    config: &'a Config,
    cancel: &'a CancelToken,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        rows: &'a [LocationRow],
        areas: &'a [BoundingArea],
        config: &'a Config,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            rows,
            areas,
            config,
            cancel,
        }
    }

    /// Build levels `1..=levels`.
    pub fn run(&self, levels: u8) -> Result<Vec<RegionFile>> {
        let start = Instant::now();
        let files = if self.config.parallel {
            (1..=levels)
                .into_par_iter()
                .map(|level| self.build_level(level))
                .collect::<Result<Vec<_>>>()?
        } else {
            (1..=levels)
                .map(|level| self.build_level(level))
                .collect::<Result<Vec<_>>>()?
        };
        info!(
            "Built {} levels from {} rows in {:.2?}",
            levels,
            self.rows.len(),
            start.elapsed()
        );
        Ok(files)
    }

    /// Build the region file of one level.
    pub fn build_level(&self, level: u8) -> Result<RegionFile> {
        self.cancel.check()?;
        let start = Instant::now();

        let communities = filter_communities(
            group_communities(self.rows, level)?,
            self.config.z_score_threshold,
        );
        let inlier_coords: Vec<Vec<LatLng>> = communities
            .iter()
            .map(|community| community.inliers.iter().map(|row| row.coordinates()).collect())
            .collect();

        let tessellator =
            Tessellator::new(self.config.min_tessellation_points, self.config.parallel);
        let tessellate = |area: &BoundingArea| -> Result<Vec<CommunityCells>> {
            self.cancel.check()?;
            debug!("Level {}: tessellating bounding area {}", level, area.name);
            tessellator.tessellate(&inlier_coords, &area.area, self.cancel)
        };
        let per_area: Vec<Vec<CommunityCells>> = if self.config.parallel {
            self.areas.par_iter().map(tessellate).collect::<Result<_>>()?
        } else {
            self.areas.iter().map(tessellate).collect::<Result<_>>()?
        };

        // Concatenate each community's cells across bounding areas.
        let mut cells: Vec<CommunityCells> = vec![Vec::new(); communities.len()];
        for area_cells in per_area {
            for (community_cells, area_community) in cells.iter_mut().zip(area_cells) {
                community_cells.extend(area_community);
            }
        }

        self.cancel.check()?;
        let geometries = merge_communities(cells);

        let shapes: Vec<Shape> = self
            .areas
            .iter()
            .map(|area| Shape::new(area.area.clone()))
            .collect();

        let mut file = RegionFile::new(level);
        file.bounding_area = self
            .areas
            .iter()
            .flat_map(BoundingArea::exterior_rings)
            .collect();

        for (community, geometry) in communities.iter().zip(geometries) {
            let nodes = community
                .inliers
                .iter()
                .filter(|row| {
                    let point = row.coordinates().to_point();
                    shapes.iter().any(|shape| shape.contains_point(&point))
                })
                .map(|row| SerializedNode {
                    id: row.node_id.clone(),
                    latlng: row.coordinates(),
                })
                .collect();
            let outliers = community.outliers.iter().map(|row| (*row).clone()).collect();
            file.push(community.id, geometry, nodes, outliers);
        }

        info!(
            "Level {}: {} communities, {} with geometry, in {:.2?}",
            level,
            file.len(),
            file.geometries.iter().filter(|g| g.is_some()).count(),
            start.elapsed()
        );
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, polygon};
    use travel_regions_types::geometry::GeometryKind;

    fn row(id: usize, communities: &[i64], lat: f64, lng: f64) -> LocationRow {
        LocationRow {
            node_id: id.to_string(),
            communities: communities.to_vec(),
            country_code: "DE".to_string(),
            latitude: lat,
            longitude: lng,
            place_name: format!("Place {id}"),
        }
    }

    fn two_cluster_rows() -> Vec<LocationRow> {
        let mut rows = Vec::new();
        for i in 0..6 {
            let offset = i as f64 * 0.3;
            rows.push(row(i, &[1, 10], 1.0 + offset, 1.0 + offset * 0.5));
            rows.push(row(100 + i, &[2, 10], 1.0 + offset, 8.0 - offset * 0.5));
        }
        rows
    }

    fn area() -> BoundingArea {
        BoundingArea::from_polygon(
            "test",
            polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 4.0),
                (x: 0.0, y: 4.0),
                (x: 0.0, y: 0.0),
            ],
        )
        .unwrap()
    }

    fn strip(name: &str, west: f64, east: f64) -> BoundingArea {
        BoundingArea::from_polygon(
            name,
            polygon![
                (x: west, y: 0.0),
                (x: east, y: 0.0),
                (x: east, y: 4.0),
                (x: west, y: 4.0),
                (x: west, y: 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_group_communities_first_appearance() {
        let rows = vec![
            row(1, &[7], 0.0, 0.0),
            row(2, &[3], 0.0, 0.0),
            row(3, &[7], 0.0, 0.0),
        ];
        let grouped = group_communities(&rows, 1).unwrap();
        assert_eq!(grouped.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(grouped[0].1.len(), 2);
        assert!(group_communities(&rows, 2).is_err());
    }

    #[test]
    fn test_level_file_is_aligned() {
        let rows = two_cluster_rows();
        let areas = vec![area()];
        let config = Config::default().with_parallel(false);
        let cancel = CancelToken::new();

        let files = Pipeline::new(&rows, &areas, &config, &cancel).run(2).unwrap();
        assert_eq!(files.len(), 2);

        let level_1 = &files[0];
        assert_eq!(level_1.level, 1);
        assert_eq!(level_1.community_ids, vec![1, 2]);
        assert!(level_1.validate().is_ok());
        assert!(level_1.geometries.iter().all(Option::is_some));
        assert_eq!(level_1.nodes[0].len(), 6);

        let level_2 = &files[1];
        assert_eq!(level_2.community_ids, vec![10]);
        assert_eq!(level_2.nodes[0].len(), 12);
        assert!(level_2.geometries[0].is_some());
    }

    #[test]
    fn test_points_outside_areas_are_not_members() {
        let mut rows = two_cluster_rows();
        rows.push(row(999, &[1, 10], 50.0, 50.0));
        let areas = vec![area()];
        let config = Config::default().with_parallel(false).with_z_score_threshold(100.0);
        let cancel = CancelToken::new();

        let file = Pipeline::new(&rows, &areas, &config, &cancel)
            .build_level(1)
            .unwrap();
        assert_eq!(file.nodes[0].len(), 6);
        assert!(file.nodes[0].iter().all(|node| node.id != "999"));
        assert!(file.outliers[0].is_empty());
    }

    #[test]
    fn test_disjoint_areas_give_multipolygon() {
        let rows: Vec<LocationRow> = (0..12)
            .map(|i| {
                let shift = if i < 6 { 0.0 } else { 6.0 };
                let lng = shift + 0.5 + (i % 3) as f64 * 1.5;
                let lat = 1.0 + (i % 6 / 3) as f64 * 2.0;
                row(i, &[1], lat, lng)
            })
            .collect();
        let areas = vec![strip("west", 0.0, 4.0), strip("east", 6.0, 10.0)];
        let config = Config::default().with_parallel(false);
        let cancel = CancelToken::new();

        let file = Pipeline::new(&rows, &areas, &config, &cancel)
            .build_level(1)
            .unwrap();
        assert_eq!(file.community_ids, vec![1]);
        assert_eq!(file.nodes[0].len(), 12);
        assert_eq!(file.bounding_area.len(), 2);

        let geometry = file.geometries[0].as_ref().unwrap();
        assert_eq!(geometry.kind(), GeometryKind::MultiPolygon);
        assert_eq!(geometry.part_count(), 2);
        assert!((geometry.to_multi_polygon().unsigned_area() - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_areas_list_nodes_once() {
        let rows: Vec<LocationRow> = (0..12)
            .map(|i| row(i, &[1], 1.0 + (i % 3) as f64, 1.0 + i as f64 * 8.0 / 11.0))
            .collect();
        let areas = vec![strip("west", 0.0, 6.0), strip("east", 4.0, 10.0)];
        let config = Config::default().with_parallel(false);
        let cancel = CancelToken::new();

        let file = Pipeline::new(&rows, &areas, &config, &cancel)
            .build_level(1)
            .unwrap();
        let ids: FxHashMap<&str, usize> = file.nodes[0]
            .iter()
            .fold(FxHashMap::default(), |mut seen, node| {
                *seen.entry(node.id.as_str()).or_default() += 1;
                seen
            });
        assert_eq!(ids.len(), 12);
        assert!(ids.values().all(|count| *count == 1));

        let geometry = file.geometries[0].as_ref().unwrap();
        assert_eq!(geometry.kind(), GeometryKind::Polygon);
        assert!((geometry.to_multi_polygon().unsigned_area() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_cancelled_pipeline() {
        let rows = two_cluster_rows();
        let areas = vec![area()];
        let config = Config::default();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = Pipeline::new(&rows, &areas, &config, &cancel).run(2);
        assert!(matches!(result, Err(TravelRegionsError::Cancelled)));
    }
}
