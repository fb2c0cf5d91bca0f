mod common;

use pistepath_lib::{ConnectivityResolver, EngineConfig, Error, RouteBuilder, RouteValidator};

#[test]
fn empty_route_accepts_any_known_segment() {
    let catalog = common::two_step_resort();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    let empty: [&str; 0] = [];
    let verdict = validator.validate_append(&empty, "C");
    assert!(verdict.valid);
    assert!(verdict.reason.is_none());
}

#[test]
fn append_within_threshold_is_valid() {
    let catalog = common::two_step_resort();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    assert!(validator.validate_append(&["A"], "B").valid);
}

#[test]
fn gap_beyond_threshold_names_both_segments() {
    let catalog = common::two_step_resort();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    let verdict = validator.validate_append(&["A"], "C");
    assert!(!verdict.valid);
    let reason = verdict.reason.expect("rejection carries a reason");
    assert!(reason.contains("Lift A"), "{reason}");
    assert!(reason.contains("Slope C"), "{reason}");
    assert!(reason.contains("200 m"), "{reason}");
}

#[test]
fn reversed_slope_gets_uphill_hint() {
    let catalog = common::fixture_catalog();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    // The blue run finishes 94 m from where the black wall does.
    let verdict = validator.validate_append(&["piste-black-wall"], "piste-blue-run");
    assert!(!verdict.valid);
    let reason = verdict.reason.unwrap();
    assert!(!reason.contains("uphill"), "{reason}");

    let config = EngineConfig::default().with_threshold(100.0);
    let validator = RouteValidator::new(&catalog, &config);
    let verdict = validator.validate_append(&["piste-black-wall"], "piste-blue-run");
    assert!(!verdict.valid);
    assert!(verdict.reason.unwrap().contains("would require traveling uphill"));
}

#[test]
fn reversed_lift_gets_backwards_hint() {
    let catalog = common::fixture_catalog();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    // Riding the chair twice in a row means boarding at its top station.
    let verdict = validator.validate_append(&["lift-east"], "lift-east");
    assert!(!verdict.valid);
    assert!(verdict
        .reason
        .unwrap()
        .contains("would require riding the lift backwards"));
}

#[test]
fn unknown_candidate_is_rejected_with_suggestion() {
    let catalog = common::fixture_catalog();
    let validator = RouteValidator::new(&catalog, &EngineConfig::default());
    let empty: [&str; 0] = [];
    let verdict = validator.validate_append(&empty, "lift-eest");
    assert!(!verdict.valid);
    assert!(verdict.reason.unwrap().contains("lift-east"));
}

#[test]
fn validate_route_reports_first_bad_link() {
    let catalog = common::fixture_catalog();
    let validator = RouteValidator::from_resolver(ConnectivityResolver::new(
        &catalog,
        &EngineConfig::default(),
    ));
    validator
        .validate_route(&[
            "lift-village",
            "piste-black-wall",
            "piste-green-traverse",
            "lift-east",
            "piste-red-east",
        ])
        .expect("connected loop");

    let err = validator
        .validate_route(&["lift-village", "piste-blue-run", "lift-east"])
        .expect_err("blue run does not reach the east chair");
    match err {
        Error::InvalidConnection { from, to, .. } => {
            assert_eq!(from, "piste-blue-run");
            assert_eq!(to, "lift-east");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn builder_keeps_route_on_rejection() {
    let catalog = common::fixture_catalog();
    let mut builder = RouteBuilder::new(&catalog, &EngineConfig::default());
    builder.try_push("lift-village").unwrap();
    builder.try_push("piste-blue-run").unwrap();
    assert!(builder.try_push("piste-red-east").is_err());
    assert_eq!(builder.segments(), ["lift-village", "piste-blue-run"]);

    assert!(builder.validate_next("lift-village").valid);
    builder.try_push("lift-village").unwrap();
    assert_eq!(builder.len(), 3);
}

#[test]
fn builder_appends_satisfy_connectivity_pairwise() {
    let catalog = common::fixture_catalog();
    let config = EngineConfig::default();
    let resolver = ConnectivityResolver::new(&catalog, &config);
    let mut builder = RouteBuilder::new(&catalog, &config);

    let attempts = [
        "lift-village",
        "piste-red-east",
        "piste-black-wall",
        "lift-east",
        "piste-green-traverse",
        "lift-village",
        "lift-east",
        "piste-red-east",
        "piste-glacier",
    ];
    for id in attempts {
        let _ = builder.try_push(id);
    }

    let segments = builder.segments();
    assert!(segments.len() >= 4);
    for pair in segments.windows(2) {
        let from = catalog.get(&pair[0]).unwrap();
        let to = catalog.get(&pair[1]).unwrap();
        assert!(resolver.connects(from, to), "{} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn builder_truncate_and_remove() {
    let catalog = common::fixture_catalog();
    let mut builder = RouteBuilder::new(&catalog, &EngineConfig::default());
    for id in ["lift-village", "piste-black-wall", "piste-green-traverse"] {
        builder.try_push(id).unwrap();
    }

    assert_eq!(builder.remove(5), None);
    assert_eq!(builder.remove(1).as_deref(), Some("piste-black-wall"));
    builder.truncate(1);
    assert_eq!(builder.segments(), ["lift-village"]);

    let stats = builder.stats();
    assert_eq!(stats.lift_count, 1);
    assert_eq!(stats.vertical_up, 600.0);

    builder.clear();
    assert!(builder.is_empty());
}
