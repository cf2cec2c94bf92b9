//! Model-update (variable topology) behavior

use approx::assert_relative_eq;
use fea_postproc::prelude::*;
use ndarray::IxDyn;

fn node(engine: &mut MemoryEngine, tag: i64) {
    engine.add_entity(Family::Node, tag, &[tag as f64, 0.0]);
    engine.set_field(tag, "disp", &[0.1 * tag as f64, 0.0]);
}

#[test]
fn outer_join_covers_the_union_of_all_steps() {
    // step sets {1,2}, {2,3}, {1,3}: the final axis must be exactly {1,2,3}
    let mut engine = MemoryEngine::new(2);
    node(&mut engine, 1);
    node(&mut engine, 2);

    let mut acc = StepAccumulator::new(NodalCollector, TopologyMode::ModelUpdate);
    acc.initialize(&engine, None); // baseline over {1,2}

    engine.advance(1.0);
    acc.record_step(&engine).unwrap(); // {1,2}

    engine.remove_entity(Family::Node, 1);
    node(&mut engine, 3);
    engine.advance(1.0);
    acc.record_step(&engine).unwrap(); // {2,3}

    engine.remove_entity(Family::Node, 2);
    node(&mut engine, 1);
    engine.advance(1.0);
    acc.record_step(&engine).unwrap(); // {1,3}

    let container = acc.finalize().unwrap();
    assert_eq!(container.tags, vec![1, 2, 3]);
    assert_eq!(container.attrs["topologyChanged"], "true");

    let disp = &container.arrays["disp"].data;
    assert_eq!(disp.shape(), &[4, 3, 6]);

    // each step's original values are retrievable unchanged
    assert_eq!(disp[IxDyn(&[1, 0, 0])], 0.1); // step 1, entity 1
    assert_eq!(disp[IxDyn(&[1, 1, 0])], 0.2); // step 1, entity 2
    assert_eq!(disp[IxDyn(&[2, 1, 0])], 0.2); // step 2, entity 2
    assert_relative_eq!(disp[IxDyn(&[2, 2, 0])], 0.3); // step 2, entity 3
    assert_eq!(disp[IxDyn(&[3, 0, 0])], 0.1); // step 3, entity 1
    assert_relative_eq!(disp[IxDyn(&[3, 2, 0])], 0.3); // step 3, entity 3

    // absent (step, entity) cells are sentinel
    assert!(disp[IxDyn(&[1, 2, 0])].is_nan()); // entity 3 before it existed
    assert!(disp[IxDyn(&[2, 0, 0])].is_nan()); // entity 1 while removed
    assert!(disp[IxDyn(&[3, 1, 0])].is_nan()); // entity 2 after removal
}

#[test]
fn sentinel_appears_exactly_where_an_entity_is_absent() {
    // entity 5 active through snapshots 0..=2, removed before snapshot 3
    let mut engine = MemoryEngine::new(2);
    node(&mut engine, 1);
    node(&mut engine, 5);

    let mut acc = StepAccumulator::new(NodalCollector, TopologyMode::ModelUpdate);
    acc.initialize(&engine, None);
    for step in 1..=3 {
        if step == 3 {
            engine.remove_entity(Family::Node, 5);
        }
        engine.advance(1.0);
        acc.record_step(&engine).unwrap();
    }

    let container = acc.finalize().unwrap();
    assert_eq!(container.tags, vec![1, 5]);
    let disp = &container.arrays["disp"].data;
    assert_eq!(disp.shape(), &[4, 2, 6]);

    for t in 0..4 {
        for c in 0..6 {
            // entity 1 is never sentinel
            assert!(!disp[IxDyn(&[t, 0, c])].is_nan());
            // entity 5 is sentinel exactly at the removal step
            assert_eq!(disp[IxDyn(&[t, 1, c])].is_nan(), t == 3);
        }
    }
}

#[test]
fn selection_by_step_and_entity_recovers_original_values() {
    let mut engine = MemoryEngine::new(2);
    node(&mut engine, 1);
    node(&mut engine, 2);

    let mut acc = StepAccumulator::new(NodalCollector, TopologyMode::ModelUpdate);
    acc.initialize(&engine, None);
    engine.advance(1.0);
    acc.record_step(&engine).unwrap();

    let container = acc.finalize().unwrap();
    let only_2 = container.select(Some("disp"), Some(&[2])).unwrap();
    assert_eq!(only_2.tags, vec![2]);
    let data = &only_2.arrays["disp"].data;
    assert_eq!(data.shape(), &[2, 1, 6]);
    assert_eq!(data[IxDyn(&[1, 0, 0])], 0.2);
}

#[test]
fn fiber_counts_can_differ_per_element_and_step_set() {
    let mut context = FiberSectionContext::new();
    context.register(1, vec![[0.1, 0.0, 1.0], [-0.1, 0.0, 1.0]]);
    context.register(2, vec![[0.2, 0.0, 2.0]]);
    let collector = FiberSectionCollector::new(context);

    let mut engine = MemoryEngine::new(2);
    engine.add_entity(Family::FiberSection, 1, &[0.0, 0.0]);
    engine.add_entity(Family::FiberSection, 2, &[1.0, 0.0]);
    engine.set_field(1, "fiberStressStrain", &[10.0, 0.001, -10.0, -0.001]);
    engine.set_field(2, "fiberStressStrain", &[20.0, 0.002]);

    let mut acc = StepAccumulator::new(collector, TopologyMode::ModelUpdate);
    acc.initialize(&engine, None);
    engine.advance(1.0);
    engine.remove_entity(Family::FiberSection, 2);
    acc.record_step(&engine).unwrap();

    let container = acc.finalize().unwrap();
    let fibers = &container.arrays["fibers"].data;
    assert_eq!(fibers.shape(), &[2, 2, 2, 5]);
    // element 2's single fiber at baseline, sentinel after removal
    assert_eq!(fibers[IxDyn(&[0, 1, 0, 3])], 20.0);
    assert!(fibers[IxDyn(&[0, 1, 1, 3])].is_nan()); // ragged fiber slot
    assert!(fibers[IxDyn(&[1, 1, 0, 3])].is_nan()); // removed entity
    // element 1 keeps real values at both snapshots
    assert_eq!(fibers[IxDyn(&[1, 0, 1, 3])], -10.0);
}
