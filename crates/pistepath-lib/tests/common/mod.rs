#![allow(dead_code)]

use std::path::PathBuf;

use pistepath_lib::geo::offset_meters;
use pistepath_lib::{load_catalog, Catalog, Coordinate, Difficulty, Segment, SegmentKind};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_path() -> PathBuf {
    fixtures_dir().join("minimal_resort.json")
}

pub fn fixture_catalog() -> Catalog {
    load_catalog(&fixture_path()).expect("fixture catalog loads")
}

fn origin() -> Coordinate {
    Coordinate::new(10.0, 47.0)
}

fn line(points: &[(f64, f64)]) -> Vec<Coordinate> {
    points
        .iter()
        .map(|&(east, north)| offset_meters(&origin(), east, north))
        .collect()
}

/// Lift between two local `(east, north)` positions in metres.
pub fn lift(id: &str, from: (f64, f64), to: (f64, f64), minutes: f64, rise: f64) -> Segment {
    Segment {
        id: id.to_string(),
        name: format!("Lift {id}"),
        kind: SegmentKind::Lift {
            lift_type: Some("chair_lift".to_string()),
            vertical_rise: rise,
            duration_minutes: minutes,
        },
        geometry: line(&[from, to]),
        connects_to: None,
        bidirectional: false,
    }
}

/// Slope between two local `(east, north)` positions in metres.
pub fn slope(
    id: &str,
    from: (f64, f64),
    to: (f64, f64),
    difficulty: Option<Difficulty>,
    length: f64,
    drop: f64,
) -> Segment {
    Segment {
        id: id.to_string(),
        name: format!("Slope {id}"),
        kind: SegmentKind::Slope {
            difficulty,
            vertical_drop: drop,
            length_meters: length,
        },
        geometry: line(&[from, to]),
        connects_to: None,
        bidirectional: false,
    }
}

pub fn catalog(segments: Vec<Segment>) -> Catalog {
    Catalog::from_segments(segments).expect("programmatic catalog builds")
}

/// Lift A whose top is 40 m from the entry of 1000 m blue slope B, plus a
/// slope C starting 200 m away from A's top.
pub fn two_step_resort() -> Catalog {
    catalog(vec![
        lift("A", (0.0, 0.0), (0.0, 1000.0), 5.0, 300.0),
        slope("B", (40.0, 1000.0), (40.0, 10.0), Some(Difficulty::Blue), 1000.0, 300.0),
        slope("C", (200.0, 1000.0), (200.0, 0.0), Some(Difficulty::Red), 1000.0, 300.0),
    ])
}
