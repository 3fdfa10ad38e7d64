#![allow(dead_code)]

use travel_regions::config::Config;
use travel_regions::{BoundingArea, LocationRow, TravelRegions};

pub const COLUMNS: usize = 12;
pub const ROWS: usize = 8;

/// A 12 x 8 grid of nodes at half-degree offsets.
///
/// Level 1 splits it into west (community 1) and east (community 2) halves.
/// Level 2 splits each half into south and north quarters: 11, 12, 21, 22.
/// West nodes are German, east nodes French, except one in Western Sahara.
pub fn grid_rows() -> Vec<LocationRow> {
    let mut rows = Vec::with_capacity(COLUMNS * ROWS);
    for r in 0..ROWS {
        for c in 0..COLUMNS {
            let index = r * COLUMNS + c;
            let half = if c < COLUMNS / 2 { 1 } else { 2 };
            let quarter = half * 10 + if r < ROWS / 2 { 1 } else { 2 };
            let country = match (r, c) {
                (7, 11) => "EH",
                (_, c) if c < COLUMNS / 2 => "DE",
                _ => "FR",
            };
            let name = match index {
                0 => "Springfield".to_string(),
                13 => "Springfeld".to_string(),
                30 => "West Springfield".to_string(),
                50 => "Springville".to_string(),
                70 => "Sprngfield".to_string(),
                _ => format!("Town {index}"),
            };
            rows.push(LocationRow {
                node_id: index.to_string(),
                communities: vec![half, quarter],
                country_code: country.to_string(),
                latitude: r as f64 + 0.5,
                longitude: c as f64 + 0.5,
                place_name: name,
            });
        }
    }
    rows
}

pub fn grid_area() -> BoundingArea {
    BoundingArea::from_ring(
        "grid",
        &[
            [0.0, 0.0],
            [COLUMNS as f64, 0.0],
            [COLUMNS as f64, ROWS as f64],
            [0.0, ROWS as f64],
            [0.0, 0.0],
        ],
    )
    .unwrap()
}

pub fn grid_model() -> TravelRegions {
    let _ = env_logger::builder().is_test(true).try_init();
    TravelRegions::builder()
        .rows(grid_rows())
        .levels(2)
        .bounding_area(grid_area())
        .config(Config::default())
        .build()
        .unwrap()
}
