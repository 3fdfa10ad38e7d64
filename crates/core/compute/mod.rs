//! Region construction kernels: geometry adapter, outlier filter,
//! tessellation, merging, validation and name matching.

pub mod geometry;
pub mod merge;
pub mod outliers;
pub mod search;
pub mod tessellation;
pub mod validation;
