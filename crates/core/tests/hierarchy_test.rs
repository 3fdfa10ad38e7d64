mod common;

use common::{COLUMNS, ROWS, grid_area, grid_model, grid_rows};
use rustc_hash::FxHashSet;
use travel_regions::config::{Config, ParentPolicy};
use travel_regions::{CancelToken, GeometryKind, RegionId, TravelRegions, TravelRegionsError};

fn id(raw: &str) -> RegionId {
    raw.parse().unwrap()
}

#[test]
fn test_grid_builds_expected_regions() {
    let model = grid_model();

    assert_eq!(model.levels(), 2);
    assert_eq!(model.nodes().len(), COLUMNS * ROWS);

    let level_1: Vec<String> = model.regions(1).iter().map(|r| r.id().to_string()).collect();
    assert_eq!(level_1, vec!["11", "12"]);
    let level_2: Vec<String> = model.regions(2).iter().map(|r| r.id().to_string()).collect();
    assert_eq!(level_2, vec!["211", "221", "212", "222"]);

    for region in model.all_regions() {
        assert_eq!(region.geometry().kind(), GeometryKind::Polygon);
    }
    let west = model.get_region("11").unwrap();
    assert!((west.area() - 48.0).abs() < 1e-6);
    assert_eq!(west.len(), 48);
}

#[test]
fn test_node_region_links_are_bijective() {
    let model = grid_model();

    for level in 1..=model.levels() {
        for region in model.regions(level) {
            assert!(!region.is_empty());
            for node_id in region.node_ids() {
                let linked = model.node_region(node_id, level).unwrap();
                assert_eq!(linked.id(), region.id());
            }
        }
        for node in model.nodes() {
            if let Some(region) = model.node_region(node.id(), level) {
                assert!(region.node_ids().iter().any(|id| id == node.id()));
            }
        }
    }

    let regions = model.node_regions("0");
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].1.id(), id("11"));
    assert_eq!(regions[1].1.id(), id("211"));
}

#[test]
fn test_region_ids_are_unique() {
    let model = grid_model();
    let mut seen = FxHashSet::default();
    for region in model.all_regions() {
        assert!(seen.insert(region.id().to_string()), "{}", region.id());
    }
}

#[test]
fn test_adjacency_is_symmetric() {
    let model = grid_model();

    for level in 1..=model.levels() {
        let regions = model.regions(level);
        for a in regions {
            for b in a.neighbors(regions) {
                assert!(
                    b.neighbors(regions).iter().any(|r| r.id() == a.id()),
                    "{} -> {} is one-sided",
                    a.id(),
                    b.id()
                );
            }
        }
    }

    let west_neighbors = model.neighbors(id("11"));
    assert_eq!(west_neighbors.len(), 1);
    assert_eq!(west_neighbors[0].id(), id("12"));
    assert!(model.neighbors(id("19")).is_empty());
}

#[test]
fn test_parents_and_children() {
    let model = grid_model();

    let parents = model.parents(id("211"));
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].id(), id("11"));
    assert!(model.parents(id("11")).is_empty());

    let mut children: Vec<String> = model
        .children(id("12"))
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    children.sort();
    assert_eq!(children, vec!["221", "222"]);
    assert!(model.children(id("222")).is_empty());
}

#[test]
fn test_all_overlapping_parent_policy() {
    let model = TravelRegions::builder()
        .rows(grid_rows())
        .levels(2)
        .bounding_area(grid_area())
        .config(Config::default().with_parent_policy(ParentPolicy::AllOverlapping))
        .build()
        .unwrap();

    let parents = model.parents(id("222"));
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].id(), id("12"));
}

#[test]
fn test_region_node_threshold_drops_small_communities() {
    let mut rows = grid_rows();
    // Four extra nodes form their own level-1 community.
    for i in 0..4 {
        let mut row = rows[i].clone();
        row.node_id = format!("extra-{i}");
        row.communities = vec![3, 31];
        row.latitude += 0.2;
        rows.push(row);
    }

    let model = TravelRegions::builder()
        .rows(rows)
        .levels(2)
        .bounding_area(grid_area())
        .config(Config::default().with_parallel(false))
        .build()
        .unwrap();

    assert!(model.get_region("13").is_none());
    assert!(model.node_region("extra-0", 1).is_none());
    assert_eq!(model.region_file(1).unwrap().len(), 3);
}

#[test]
fn test_cancelled_build() {
    let token = CancelToken::new();
    token.cancel();

    let result = TravelRegions::builder()
        .rows(grid_rows())
        .levels(2)
        .bounding_area(grid_area())
        .cancel_token(token)
        .build();
    assert!(matches!(result, Err(TravelRegionsError::Cancelled)));
}
