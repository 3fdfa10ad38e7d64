//! Read-only queries over a built [`TravelRegions`](crate::TravelRegions).
//!
//! Unknown ids and unbuilt levels produce empty results rather than errors.

mod classify;
mod countries;
mod hierarchy;
mod names;
mod nearest;
mod overlap;

pub use classify::classify_points;
pub use names::MAX_EDIT_DISTANCE;
pub use overlap::Overlap;
