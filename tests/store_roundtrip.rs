//! Store round-trip fidelity and read-time unit rescaling

use fea_postproc::prelude::*;
use ndarray::IxDyn;

fn recorded_container() -> FamilyContainer {
    let mut engine = MemoryEngine::new(2);
    engine.add_entity(Family::Node, 1, &[0.0, 0.0]);
    engine.add_entity(Family::Node, 5, &[1.0, 0.0]);
    engine.set_field(1, "disp", &[0.1, 0.2]);
    engine.set_field(5, "disp", &[0.3, 0.4, 0.01]);
    engine.set_field(1, "reaction", &[1000.0, -500.0]);

    let mut acc = StepAccumulator::new(NodalCollector, TopologyMode::ModelUpdate);
    acc.initialize(&engine, None);
    engine.advance(0.5);
    acc.record_step(&engine).unwrap();
    // removal introduces sentinel cells that must survive the round trip
    engine.remove_entity(Family::Node, 5);
    engine.advance(0.5);
    acc.record_step(&engine).unwrap();
    acc.finalize().unwrap()
}

#[test]
fn round_trip_is_bit_exact_including_sentinel() {
    let container = recorded_container();
    assert!(container.arrays["disp"].data.iter().any(|v| v.is_nan()));

    let mut store = DataStore::new();
    store.write_family(&container);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("responses.json");
    store.save(&path).unwrap();

    let reopened = DataStore::open(&path).unwrap();
    let back = reopened.read_family(Family::Node, None).unwrap();
    assert!(container.bit_eq(&back));
}

#[test]
fn unit_factors_rescale_only_their_channel_groups() {
    let container = recorded_container();
    let mut store = DataStore::new();
    store.write_family(&container);

    let units = UnitFactors::new()
        .with(Quantity::Disp, 1000.0)
        .with(Quantity::Force, 1e-3);
    let scaled = store.read_family(Family::Node, Some(&units)).unwrap();

    let disp = &scaled.arrays["disp"].data;
    let raw_disp = &container.arrays["disp"].data;
    // translation channels scale by the disp factor
    assert_eq!(disp[IxDyn(&[1, 0, 0])], raw_disp[IxDyn(&[1, 0, 0])] * 1000.0);
    assert_eq!(disp[IxDyn(&[1, 1, 5])], raw_disp[IxDyn(&[1, 1, 5])]); // rotation untouched

    let reaction = &scaled.arrays["reaction"].data;
    let raw_reaction = &container.arrays["reaction"].data;
    assert_eq!(
        reaction[IxDyn(&[1, 0, 0])],
        raw_reaction[IxDyn(&[1, 0, 0])] * 1e-3
    );
    // moment channels have no factor in this map
    assert_eq!(reaction[IxDyn(&[1, 0, 5])], raw_reaction[IxDyn(&[1, 0, 5])]);

    // coordinates are never rescaled
    assert_eq!(scaled.times, container.times);
    assert_eq!(scaled.tags, container.tags);

    // the store itself is unchanged: a second plain read matches the original
    let plain = store.read_family(Family::Node, None).unwrap();
    assert!(container.bit_eq(&plain));
}

#[test]
fn unknown_response_key_is_fatal_with_valid_names() {
    let container = recorded_container();
    let err = container.select(Some("stress"), None).unwrap_err();
    match err {
        PostError::UnknownResponseKey { requested, valid } => {
            assert_eq!(requested, "stress");
            assert_eq!(valid, vec!["accel", "disp", "reaction", "vel"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_family_still_writes_a_marker_group() {
    let engine = MemoryEngine::new(2);
    let mut acc = StepAccumulator::new(ContactCollector, TopologyMode::Fixed);
    acc.initialize(&engine, None);
    let container = acc.finalize().unwrap();
    assert!(container.is_empty());

    let mut store = DataStore::new();
    store.write_family(&container);
    let group = store.group("Responses/Contact").unwrap();
    assert_eq!(group.attrs["empty"], "true");
    assert!(group.datasets.contains_key("forces"));

    let back = store.read_family(Family::Contact, None).unwrap();
    assert!(back.is_empty());
    assert_eq!(back.arrays["forces"].data.shape(), &[1, 0, 3]);
}

#[test]
fn missing_group_reports_the_path() {
    let store = DataStore::new();
    let err = store.read_family(Family::Brick, None).unwrap_err();
    match err {
        PostError::GroupNotFound(path) => assert_eq!(path, "Responses/Brick"),
        other => panic!("unexpected error: {other}"),
    }
}
