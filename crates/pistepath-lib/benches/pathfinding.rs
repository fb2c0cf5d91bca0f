use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use pistepath_lib::geo::offset_meters;
use pistepath_lib::{
    plan_route, Catalog, Coordinate, Difficulty, EngineConfig, RoutePoint, RouteRequest, Segment,
    SegmentKind,
};
use std::hint::black_box;

const GRID: usize = 30;
const SPACING_M: f64 = 400.0;

fn station(x: usize, y: usize) -> Coordinate {
    // Small deterministic offsets keep stations off exact grid lines.
    let jitter = ((x * 7 + y * 13) % 11) as f64;
    offset_meters(
        &Coordinate::new(11.0, 46.5),
        x as f64 * SPACING_M + jitter,
        y as f64 * SPACING_M - jitter,
    )
}

fn segment(id: String, kind: SegmentKind, from: Coordinate, to: Coordinate) -> Segment {
    Segment {
        name: id.clone(),
        id,
        kind,
        geometry: vec![from, to],
        connects_to: None,
        bidirectional: false,
    }
}

/// Lifts climb north between stations, slopes run east along each row.
fn grid_resort() -> Catalog {
    let mut segments = Vec::new();
    for x in 0..GRID {
        for y in 0..GRID {
            if y + 1 < GRID {
                segments.push(segment(
                    format!("lift-{x}-{y}"),
                    SegmentKind::Lift {
                        lift_type: None,
                        vertical_rise: 120.0,
                        duration_minutes: 3.0 + (x % 3) as f64,
                    },
                    station(x, y),
                    station(x, y + 1),
                ));
            }
            if x + 1 < GRID {
                segments.push(segment(
                    format!("slope-{x}-{y}"),
                    SegmentKind::Slope {
                        difficulty: Some(Difficulty::ALL[(x + y) % 4]),
                        vertical_drop: 60.0,
                        length_meters: SPACING_M * 1.2,
                    },
                    station(x, y),
                    station(x + 1, y),
                ));
            }
        }
    }
    Catalog::from_segments(segments).expect("grid resort builds")
}

static CATALOG: Lazy<Catalog> = Lazy::new(grid_resort);
static CORNER_TO_CORNER: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::new(
        RoutePoint::start("lift-0-0"),
        RoutePoint::end(format!("slope-{}-{}", GRID - 2, GRID - 1)),
    )
});
static CORNER_TO_CORNER_BLUE: Lazy<RouteRequest> =
    Lazy::new(|| CORNER_TO_CORNER.clone().with_max_difficulty(Difficulty::Blue));

fn benchmark_pathfinding(c: &mut Criterion) {
    let catalog = &*CATALOG;
    let config = EngineConfig::default();

    c.bench_function("astar_grid_corner_to_corner", |b| {
        let request = &*CORNER_TO_CORNER;
        b.iter(|| {
            let plan = plan_route(catalog, &config, request).expect("route exists");
            black_box(plan.steps.len())
        });
    });

    c.bench_function("astar_grid_blue_ceiling", |b| {
        let request = &*CORNER_TO_CORNER_BLUE;
        b.iter(|| black_box(plan_route(catalog, &config, request).is_ok()));
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
