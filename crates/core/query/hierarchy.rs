//! Adjacency and cross-level containment.
//!
//! Levels are independent partitions, so parents and children are derived
//! geometrically on demand: a region relates to a region one level away
//! when the two share area.

use crate::compute::geometry::OVERLAP_TOLERANCE;
use crate::config::ParentPolicy;
use crate::model::{Region, TravelRegions};
use travel_regions_types::id::RegionId;

impl TravelRegions {
    /// Same-level regions touching `id`. Empty for an unknown id.
    pub fn neighbors(&self, id: RegionId) -> Vec<&Region> {
        match self.region(id) {
            Some(region) => region.neighbors(self.regions(region.level())),
            None => Vec::new(),
        }
    }

    /// Regions one level coarser sharing area with `id`, as chosen by the
    /// configured [`ParentPolicy`].
    pub fn parents(&self, id: RegionId) -> Vec<&Region> {
        match self.region(id) {
            Some(region) => self.parents_of(region, self.config.parent_policy),
            None => Vec::new(),
        }
    }

    /// Regions one level finer whose parents include `id`.
    pub fn children(&self, id: RegionId) -> Vec<&Region> {
        let Some(region) = self.region(id) else {
            return Vec::new();
        };
        let policy = self.config.parent_policy;
        self.regions(region.level() + 1)
            .iter()
            .filter(|child| {
                self.parents_of(child, policy)
                    .iter()
                    .any(|parent| parent.id() == region.id())
            })
            .collect()
    }

    /// Parents of `region` under an explicit policy.
    pub fn parents_of(&self, region: &Region, policy: ParentPolicy) -> Vec<&Region> {
        if region.level() <= 1 {
            return Vec::new();
        }
        let overlapping = self
            .regions(region.level() - 1)
            .iter()
            .filter_map(|candidate| {
                let shared = region.shape().intersection_area(candidate.shape());
                // Slivers below the overlap tolerance are numerical noise.
                let noise = OVERLAP_TOLERANCE * region.area().min(candidate.area());
                (shared > noise).then_some((candidate, shared))
            });

        match policy {
            ParentPolicy::AllOverlapping => overlapping.map(|(candidate, _)| candidate).collect(),
            ParentPolicy::MajorityArea => overlapping
                .fold(None, |best: Option<(&Region, f64)>, (candidate, shared)| match best {
                    Some((_, best_shared)) if best_shared >= shared => best,
                    _ => Some((candidate, shared)),
                })
                .map(|(candidate, _)| candidate)
                .into_iter()
                .collect(),
        }
    }
}
