//! Per-community union of tessellation cells.

use super::geometry::union_all;
use super::tessellation::CommunityCells;
use geo::{Area, MultiPolygon};
use travel_regions_types::geometry::RegionGeometry;

/// Parts smaller than this fraction of the merged area are union residue.
const SLIVER_FRACTION: f64 = 1e-6;

/// Union one community's cells.
///
/// Zero cells yield `None`, the empty sentinel; no region is created from it.
/// Slivers left between cells whose shared borders did not line up exactly
/// are dropped.
pub fn merge_cells(cells: CommunityCells) -> Option<MultiPolygon<f64>> {
    union_all(cells).map(drop_slivers)
}

fn drop_slivers(merged: MultiPolygon<f64>) -> MultiPolygon<f64> {
    let total = merged.unsigned_area();
    let (parts, slivers): (Vec<_>, Vec<_>) = merged
        .into_iter()
        .partition(|part| part.unsigned_area() > SLIVER_FRACTION * total);
    if parts.is_empty() {
        return MultiPolygon::new(slivers);
    }
    MultiPolygon::new(parts)
}

/// Convert a merged kernel geometry into its stored vertex-list form.
///
/// Exterior rings only. A merge whose parts are not all adjacent becomes
/// a multipolygon.
pub fn extract_geometry(merged: Option<&MultiPolygon<f64>>) -> Option<RegionGeometry> {
    merged.and_then(RegionGeometry::from_multi_polygon)
}

/// Merge and extract every community, keeping community order.
pub fn merge_communities(communities: Vec<CommunityCells>) -> Vec<Option<RegionGeometry>> {
    communities
        .into_iter()
        .map(|cells| extract_geometry(merge_cells(cells).as_ref()))
        .collect()
}
