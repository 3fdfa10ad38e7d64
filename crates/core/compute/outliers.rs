//! Z-score outlier detection within a community.
//!
//! The centroid is the planar mean of the coordinates. Distances to it are
//! great-circle distances. A node is an outlier when the absolute z-score of
//! its distance exceeds the threshold. Communities with fewer than two nodes
//! or with zero variance have undefined z-scores and produce no outliers.

use travel_regions_types::coords::LatLng;

/// Result of splitting a community into outliers and inliers.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierSplit<T> {
    /// Positions of outliers in the input, ascending
    pub outlier_indices: Vec<usize>,
    /// Non-outliers in their original order
    pub inliers: Vec<T>,
}

/// Arithmetic mean of latitudes and longitudes.
pub fn centroid(points: &[LatLng]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat(), lng + p.lng()));
    Some(LatLng::new(lat_sum / count, lng_sum / count))
}

/// Population z-scores (`ddof = 0`).
///
/// Returns `None` when fewer than two values are given, or when the
/// standard deviation is zero or not finite.
pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
    if values.len() < 2 {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    let std_dev = variance.sqrt();

    if !std_dev.is_finite() || std_dev == 0.0 {
        return None;
    }
    Some(values.iter().map(|v| (v - mean) / std_dev).collect())
}

/// Outliers as `(index, z_score)` pairs, in input order.
pub fn detect_outliers(points: &[LatLng], threshold: f64) -> Vec<(usize, f64)> {
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    let distances: Vec<f64> = points
        .iter()
        .map(|point| point.haversine_distance(&center))
        .collect();

    match z_scores(&distances) {
        Some(scores) => scores
            .into_iter()
            .enumerate()
            .filter(|(_, z)| z.abs() > threshold)
            .collect(),
        None => Vec::new(),
    }
}

/// Split `items` into outlier positions and inliers.
pub fn split_outliers<T, F>(items: &[T], location: F, threshold: f64) -> OutlierSplit<T>
where
    T: Clone,
    F: Fn(&T) -> LatLng,
{
    let points: Vec<LatLng> = items.iter().map(&location).collect();
    let outlier_indices: Vec<usize> = detect_outliers(&points, threshold)
        .into_iter()
        .map(|(index, _)| index)
        .collect();

    let inliers = items
        .iter()
        .enumerate()
        .filter(|(index, _)| outlier_indices.binary_search(index).is_err())
        .map(|(_, item)| item.clone())
        .collect();

    OutlierSplit {
        outlier_indices,
        inliers,
    }
}
