mod common;

use std::collections::BTreeSet;

use pistepath_lib::{ConnectivityMode, ConnectivityResolver, EngineConfig};

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn precomputed_list_takes_precedence() {
    let catalog = common::fixture_catalog();
    let resolver = ConnectivityResolver::new(&catalog, &EngineConfig::default());
    let gondola = catalog.get("lift-village").unwrap();
    assert_eq!(
        resolver.exit_connections(gondola),
        ids(&["piste-black-wall", "piste-blue-run"])
    );
}

#[test]
fn geometric_fallback_finds_nearby_entries() {
    let catalog = common::fixture_catalog();
    let resolver = ConnectivityResolver::new(&catalog, &EngineConfig::default());

    let black = catalog.get("piste-black-wall").unwrap();
    assert_eq!(
        resolver.exit_connections(black),
        ids(&["piste-green-traverse"])
    );

    // Bidirectional traverse is entered from either end of the red run.
    let red = catalog.get("piste-red-east").unwrap();
    assert_eq!(
        resolver.exit_connections(red),
        ids(&["lift-east", "piste-green-traverse"])
    );
}

#[test]
fn bidirectional_segment_exits_from_both_ends() {
    let catalog = common::fixture_catalog();
    let resolver = ConnectivityResolver::new(&catalog, &EngineConfig::default());
    let traverse = catalog.get("piste-green-traverse").unwrap();
    let connections = resolver.exit_connections(traverse);
    assert!(connections.contains("lift-east"));
    assert!(!connections.contains("piste-green-traverse"));
}

#[test]
fn threshold_controls_geometric_reach() {
    let catalog = common::fixture_catalog();
    let black = catalog.get("piste-black-wall").unwrap();
    let gondola = catalog.get("lift-village").unwrap();

    let strict = EngineConfig::default().with_threshold(10.0);
    let resolver = ConnectivityResolver::new(&catalog, &strict);
    assert!(resolver.exit_connections(black).is_empty());

    let loose = EngineConfig::default().with_threshold(100.0);
    let resolver = ConnectivityResolver::new(&catalog, &loose);
    assert!(resolver.connects(black, gondola));
}

#[test]
fn geometric_mode_recomputes_precomputed_segments() {
    let catalog = common::fixture_catalog();
    let config = EngineConfig::default().with_connectivity_mode(ConnectivityMode::Geometric);
    let resolver = ConnectivityResolver::new(&catalog, &config);
    let gondola = catalog.get("lift-village").unwrap();
    assert_eq!(
        resolver.exit_connections(gondola),
        ids(&["piste-black-wall", "piste-blue-run"])
    );
}

#[test]
fn isolated_area_has_no_link_to_main_resort() {
    let catalog = common::fixture_catalog();
    let resolver = ConnectivityResolver::new(&catalog, &EngineConfig::default());
    let glacier = catalog.get("piste-glacier").unwrap();
    assert_eq!(resolver.exit_connections(glacier), ids(&["lift-glacier"]));
}
