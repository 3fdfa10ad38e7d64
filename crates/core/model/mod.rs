//! The built region hierarchy.
//!
//! Construction is two-phase. Regions are first instantiated from the
//! per-level region files, each one immutable once created. The node to
//! region membership table is then derived from the finished regions, so no
//! object is ever mutated after partial construction and a skipped region
//! leaves no trace in the index.

use crate::config::Config;
use crate::error::{Result, TravelRegionsError};
use crate::source::countries::CountryCatalog;
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use travel_regions_types::id::{MAX_LEVEL, RegionId, is_valid_level};
use travel_regions_types::region_file::RegionFile;

mod node;
mod region;

pub use node::Node;
pub use region::Region;

/// An immutable hierarchy of travel regions over a fixed set of nodes.
///
/// Levels are independent partitions numbered `1..=levels()`; smaller is
/// coarser. Every query is read-only, so a model can be shared across
/// threads behind an `Arc` without locking.
pub struct TravelRegions {
    pub(crate) config: Config,
    pub(crate) catalog: Arc<dyn CountryCatalog>,
    pub(crate) nodes: Vec<Node>,
    node_index: FxHashMap<String, usize>,
    /// Regions per level, index `level - 1`
    levels: Vec<Vec<Region>>,
    region_index: FxHashMap<RegionId, (usize, usize)>,
    /// `memberships[level - 1][node]` is the node's region position on that level
    memberships: Vec<Vec<Option<usize>>>,
    serialized: Vec<Option<RegionFile>>,
}

impl std::fmt::Debug for TravelRegions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelRegions")
            .field("nodes", &self.nodes.len())
            .field(
                "regions",
                &self.levels.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl TravelRegions {
    pub fn builder() -> crate::builder::TravelRegionsBuilder {
        crate::builder::TravelRegionsBuilder::new()
    }

    /// Instantiate regions from one region file per level.
    ///
    /// Nodes with a duplicate id keep their first occurrence. A region slot
    /// is skipped when its geometry is empty, it has fewer members than
    /// `region_node_threshold`, it names an unknown node, or it claims a node
    /// already placed on the same level.
    pub fn from_region_files(
        nodes: Vec<Node>,
        files: Vec<RegionFile>,
        config: Config,
        catalog: Arc<dyn CountryCatalog>,
    ) -> Result<Self> {
        config.validate().map_err(TravelRegionsError::InvalidConfig)?;

        let mut unique_nodes = Vec::with_capacity(nodes.len());
        let mut node_index: FxHashMap<String, usize> = FxHashMap::default();
        for node in nodes {
            if node_index.contains_key(node.id()) {
                warn!("Duplicate node id {}, keeping the first occurrence", node.id());
                continue;
            }
            node_index.insert(node.id().to_string(), unique_nodes.len());
            unique_nodes.push(node);
        }
        let nodes = unique_nodes;

        let level_count = files.iter().map(|file| file.level).max().unwrap_or(0);
        let mut serialized: Vec<Option<RegionFile>> = (0..level_count).map(|_| None).collect();
        for file in files {
            if !is_valid_level(file.level) {
                return Err(TravelRegionsError::InvalidLevel {
                    level: usize::from(file.level),
                    max: MAX_LEVEL,
                });
            }
            file.validate().map_err(TravelRegionsError::InvalidInput)?;
            let slot = &mut serialized[usize::from(file.level) - 1];
            if slot.is_some() {
                return Err(TravelRegionsError::InvalidConfig(format!(
                    "More than one region file for level {}",
                    file.level
                )));
            }
            *slot = Some(file);
        }

        // Phase 1: immutable regions per level.
        let instantiate = |file: &Option<RegionFile>| match file {
            Some(file) => instantiate_level(file, &nodes, &node_index, &config, catalog.as_ref()),
            None => Vec::new(),
        };
        let levels: Vec<Vec<Region>> = if config.parallel {
            serialized.par_iter().map(instantiate).collect()
        } else {
            serialized.iter().map(instantiate).collect()
        };

        // Phase 2: read-only indexes derived from the finished regions.
        let mut region_index = FxHashMap::default();
        let mut memberships = Vec::with_capacity(levels.len());
        for (level_idx, regions) in levels.iter().enumerate() {
            let mut table = vec![None; nodes.len()];
            for (region_idx, region) in regions.iter().enumerate() {
                region_index.insert(region.id(), (level_idx, region_idx));
                for node_id in region.node_ids() {
                    if let Some(&node_idx) = node_index.get(node_id) {
                        table[node_idx] = Some(region_idx);
                    }
                }
            }
            memberships.push(table);
        }

        info!(
            "Travel regions ready: {} nodes, regions per level {:?}",
            nodes.len(),
            levels.iter().map(Vec::len).collect::<Vec<_>>()
        );

        Ok(Self {
            config,
            catalog,
            nodes,
            node_index,
            levels,
            region_index,
            memberships,
            serialized,
        })
    }

    /// Number of hierarchical levels.
    #[inline]
    pub fn levels(&self) -> u8 {
        self.levels.len() as u8
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn catalog(&self) -> &dyn CountryCatalog {
        self.catalog.as_ref()
    }

    /// All nodes, in input order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Regions of one level; empty for a level that was not built.
    pub fn regions(&self, level: u8) -> &[Region] {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.levels.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Regions of every level, coarsest first.
    pub fn all_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.levels.iter().flatten()
    }

    /// Persisted form of one level, as built or loaded.
    pub fn region_file(&self, level: u8) -> Option<&RegionFile> {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.serialized.get(idx))
            .and_then(Option::as_ref)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.region_index
            .get(&id)
            .map(|&(level_idx, region_idx)| &self.levels[level_idx][region_idx])
    }

    /// Look up a region by its textual id (`level` followed by `community_id`).
    pub fn get_region(&self, id: &str) -> Option<&Region> {
        let region = id.parse::<RegionId>().ok().and_then(|id| self.region(id));
        if region.is_none() {
            warn!("No region with id {}", id);
        }
        region
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        let node = self.node_index.get(id).map(|&idx| &self.nodes[idx]);
        if node.is_none() {
            warn!("No node with id {}", id);
        }
        node
    }

    /// Region containing a node on one level.
    pub fn node_region(&self, node_id: &str, level: u8) -> Option<&Region> {
        let node_idx = *self.node_index.get(node_id)?;
        let level_idx = usize::from(level).checked_sub(1)?;
        let region_idx = (*self.memberships.get(level_idx)?.get(node_idx)?)?;
        Some(&self.levels[level_idx][region_idx])
    }

    /// `(level, region)` for every level on which the node has a region.
    pub fn node_regions(&self, node_id: &str) -> Vec<(u8, &Region)> {
        (1..=self.levels())
            .filter_map(|level| self.node_region(node_id, level).map(|region| (level, region)))
            .collect()
    }

    /// Member nodes of a region.
    pub fn region_nodes<'a>(&'a self, region: &'a Region) -> impl Iterator<Item = &'a Node> + 'a {
        region
            .node_ids()
            .iter()
            .filter_map(|id| self.node_index.get(id).map(|&idx| &self.nodes[idx]))
    }
}

fn instantiate_level(
    file: &RegionFile,
    nodes: &[Node],
    node_index: &FxHashMap<String, usize>,
    config: &Config,
    catalog: &dyn CountryCatalog,
) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut claimed: FxHashSet<usize> = FxHashSet::default();

    for (slot, &community_id) in file.community_ids.iter().enumerate() {
        let Some(geometry) = &file.geometries[slot] else {
            debug!("Level {} community {}: empty geometry", file.level, community_id);
            continue;
        };
        let Some(id) = RegionId::new(file.level, community_id) else {
            continue;
        };
        let members = &file.nodes[slot];
        if members.is_empty() || members.len() < config.region_node_threshold {
            debug!(
                "Level {} community {}: {} members, below threshold {}",
                file.level,
                community_id,
                members.len(),
                config.region_node_threshold
            );
            continue;
        }

        let Some(indices) = members
            .iter()
            .map(|member| node_index.get(&member.id).copied())
            .collect::<Option<Vec<usize>>>()
        else {
            warn!(
                "Level {} community {}: member not among the input nodes, skipping region",
                file.level, community_id
            );
            continue;
        };

        if indices.iter().any(|idx| claimed.contains(idx)) {
            warn!(
                "Level {} community {}: member already belongs to another region, skipping region",
                file.level, community_id
            );
            continue;
        }
        let unique: FxHashSet<usize> = indices.iter().copied().collect();
        if unique.len() != indices.len() {
            warn!(
                "Level {} community {}: member listed twice, skipping region",
                file.level, community_id
            );
            continue;
        }
        claimed.extend(unique);

        let member_countries = indices
            .iter()
            .filter_map(|&idx| catalog.name(nodes[idx].origin_country()))
            .map(str::to_string)
            .collect();
        let node_ids = indices.iter().map(|&idx| nodes[idx].id().to_string()).collect();

        regions.push(Region::new(
            id,
            geometry.clone(),
            node_ids,
            member_countries,
            config.country_count_threshold,
        ));
    }

    debug!("Level {}: {} regions instantiated", file.level, regions.len());
    regions
}
