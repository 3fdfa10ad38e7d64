//! Area-constrained Voronoi tessellation.
//!
//! Each seed's cell starts as a frame around the bounding area and is cut by
//! the perpendicular bisector with every neighbour that can still reach it.
//! Neighbours come out of an R*-tree nearest first, so the loop stops as soon
//! as the next neighbour is further than twice the current cell radius. The
//! convex cell is finally intersected with the bounding area and snapped to
//! [`SNAP_GRID`](super::geometry::SNAP_GRID).
//!
//! Seeds that fall outside the bounding area produce no cell but keep their
//! slot, so per-community cell lists stay aligned with their members.

use super::geometry::{Shape, snap_to_grid};
use crate::cancel::CancelToken;
use crate::error::{Result, TravelRegionsError};
use geo::{Area, BooleanOps, BoundingRect, Coord, LineString, MultiPolygon, Polygon};
use log::{debug, warn};
use rayon::prelude::*;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use travel_regions_types::coords::LatLng;

/// Cells of one community, in member order, missing members skipped.
pub type CommunityCells = Vec<MultiPolygon<f64>>;

/// Seed point stored in the R*-tree with its position among unique seeds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedSeed {
    x: f64,
    y: f64,
    index: usize,
}

impl RTreeObject for IndexedSeed {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedSeed {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Tessellates communities inside one bounding area at a time.
#[derive(Debug, Clone, Copy)]
pub struct Tessellator {
    min_points: usize,
    parallel: bool,
}

impl Tessellator {
    pub fn new(min_points: usize, parallel: bool) -> Self {
        Self {
            min_points,
            parallel,
        }
    }

    /// Build per-community cell lists for the points inside `area`.
    ///
    /// The result always has one entry per community. When fewer than
    /// `min_points` points lie strictly inside the area every entry is empty.
    pub fn tessellate(
        &self,
        communities: &[Vec<LatLng>],
        area: &MultiPolygon<f64>,
        cancel: &CancelToken,
    ) -> Result<Vec<CommunityCells>> {
        let shape = Shape::new(area.clone());
        let inside: Vec<bool> = communities
            .iter()
            .flatten()
            .map(|location| shape.contains_point(&location.to_point()))
            .collect();

        let seeds: Vec<Coord<f64>> = communities
            .iter()
            .flatten()
            .zip(&inside)
            .filter(|(_, inside)| **inside)
            .map(|(location, _)| location.to_coord())
            .collect();

        if seeds.len() < self.min_points {
            warn!(
                "Bounding area contains {} points, at least {} are needed; skipping it",
                seeds.len(),
                self.min_points
            );
            return Ok(vec![Vec::new(); communities.len()]);
        }

        let mut cells = voronoi_cells(&seeds, area, cancel, self.parallel)?.into_iter();

        // Walk the flat member list once, taking a cell only for contained points.
        let mut inside = inside.into_iter();
        let grouped = communities
            .iter()
            .map(|members| {
                members
                    .iter()
                    .filter_map(|_| match inside.next() {
                        Some(true) => cells.next().flatten(),
                        _ => None,
                    })
                    .collect::<CommunityCells>()
            })
            .collect();

        Ok(grouped)
    }
}

/// One clipped Voronoi cell per seed, in seed order.
///
/// A cell whose intersection with `area` is empty is `None`. Coincident
/// seeds receive the same cell.
pub fn voronoi_cells(
    seeds: &[Coord<f64>],
    area: &MultiPolygon<f64>,
    cancel: &CancelToken,
    parallel: bool,
) -> Result<Vec<Option<MultiPolygon<f64>>>> {
    let bounds = area
        .bounding_rect()
        .ok_or_else(|| TravelRegionsError::InvalidGeometry("empty bounding area".to_string()))?;

    let margin = bounds.width().max(bounds.height()) + 1.0;
    let frame = vec![
        Coord {
            x: bounds.min().x - margin,
            y: bounds.min().y - margin,
        },
        Coord {
            x: bounds.max().x + margin,
            y: bounds.min().y - margin,
        },
        Coord {
            x: bounds.max().x + margin,
            y: bounds.max().y + margin,
        },
        Coord {
            x: bounds.min().x - margin,
            y: bounds.max().y + margin,
        },
    ];

    let mut unique: Vec<Coord<f64>> = Vec::with_capacity(seeds.len());
    let mut positions: FxHashMap<(u64, u64), usize> = FxHashMap::default();
    let seed_slots: Vec<usize> = seeds
        .iter()
        .map(|seed| {
            *positions
                .entry((seed.x.to_bits(), seed.y.to_bits()))
                .or_insert_with(|| {
                    unique.push(*seed);
                    unique.len() - 1
                })
        })
        .collect();

    if unique.len() < seeds.len() {
        debug!(
            "{} coincident seeds share cells",
            seeds.len() - unique.len()
        );
    }

    let tree = RTree::bulk_load(
        unique
            .iter()
            .enumerate()
            .map(|(index, seed)| IndexedSeed {
                x: seed.x,
                y: seed.y,
                index,
            })
            .collect(),
    );

    let build = |index: usize| -> Result<Option<MultiPolygon<f64>>> {
        cancel.check()?;
        let convex = convex_cell(&tree, &unique, index, frame.clone());
        Ok(clip_to_area(convex, area))
    };

    let cells: Vec<Option<MultiPolygon<f64>>> = if parallel {
        (0..unique.len())
            .into_par_iter()
            .map(build)
            .collect::<Result<_>>()?
    } else {
        (0..unique.len()).map(build).collect::<Result<_>>()?
    };

    Ok(seed_slots.into_iter().map(|slot| cells[slot].clone()).collect())
}

fn convex_cell(
    tree: &RTree<IndexedSeed>,
    seeds: &[Coord<f64>],
    index: usize,
    frame: Vec<Coord<f64>>,
) -> Vec<Coord<f64>> {
    let seed = seeds[index];
    let mut cell = frame;

    for neighbour in tree.nearest_neighbor_iter(&[seed.x, seed.y]) {
        if neighbour.index == index {
            continue;
        }
        let other = Coord {
            x: neighbour.x,
            y: neighbour.y,
        };
        let radius_2 = cell
            .iter()
            .map(|vertex| squared_distance(seed, *vertex))
            .fold(0.0, f64::max);
        if squared_distance(seed, other) >= 4.0 * radius_2 {
            break;
        }
        cell = clip_to_bisector(&cell, seed, other);
        if cell.len() < 3 {
            break;
        }
    }
    cell
}

/// Keep the part of a convex polygon that is closer to `seed` than to `other`.
///
/// `polygon` is an open vertex list. Sutherland-Hodgman against one half-plane.
pub fn clip_to_bisector(
    polygon: &[Coord<f64>],
    seed: Coord<f64>,
    other: Coord<f64>,
) -> Vec<Coord<f64>> {
    let midpoint = (seed + other) / 2.0;
    let normal = other - seed;
    let side = |p: Coord<f64>| {
        let offset = p - midpoint;
        offset.x * normal.x + offset.y * normal.y
    };

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (side_current, side_next) = (side(current), side(next));

        if side_current <= 0.0 {
            clipped.push(current);
        }
        if (side_current <= 0.0) != (side_next <= 0.0) {
            let t = side_current / (side_current - side_next);
            clipped.push(current + (next - current) * t);
        }
    }
    clipped
}

fn clip_to_area(cell: Vec<Coord<f64>>, area: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    if cell.len() < 3 {
        return None;
    }
    let convex = MultiPolygon::new(vec![Polygon::new(LineString::from(cell), vec![])]);
    let clipped = snap_to_grid(&convex.intersection(area));
    if clipped.0.is_empty() || clipped.unsigned_area() == 0.0 {
        None
    } else {
        Some(clipped)
    }
}

#[inline]
fn squared_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}
