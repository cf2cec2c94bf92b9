//! Post-Processing Replay - scripted two-family run
//!
//! Drives the aggregation pipeline with a scripted engine: a small 2-D frame
//! model stepped three times, with one element removed mid-run, then writes
//! the finalized containers to a store file and queries them back.

use fea_postproc::prelude::*;

fn main() {
    env_logger::init();

    println!("=== FEA Post-Processing Replay ===\n");

    // Scripted 2-D model: two nodes, two frame elements
    let mut engine = MemoryEngine::new(2);
    engine.add_entity(Family::Node, 1, &[0.0, 0.0]);
    engine.add_entity(Family::Node, 2, &[3.0, 0.0]);
    engine.add_entity(Family::Frame, 10, &[1.5, 0.0]);
    engine.add_entity(Family::Frame, 11, &[4.5, 0.0]);

    let mut nodal = StepAccumulator::new(NodalCollector, TopologyMode::Fixed);
    let mut frames = StepAccumulator::new(FrameCollector, TopologyMode::ModelUpdate);
    nodal.initialize(&engine, None);
    frames.initialize(&engine, None);

    for step in 1..=3 {
        engine.advance(0.5);

        // measurements as the engine would report them after convergence
        let scale = step as f64;
        engine.set_field(1, "disp", &[0.01 * scale, -0.02 * scale]);
        engine.set_field(2, "disp", &[0.015 * scale, -0.03 * scale, 0.001 * scale]);
        engine.set_field(10, "basicForces", &[100.0 * scale, 20.0, -20.0]);
        engine.set_field(11, "basicForces", &[80.0 * scale, 10.0, -10.0]);

        // element 11 fails and is removed before the last step
        if step == 3 {
            engine.remove_entity(Family::Frame, 11);
        }

        nodal.record_step(&engine).expect("nodal step");
        frames.record_step(&engine).expect("frame step");
        println!("recorded step {step} at t = {:.1}", engine.current_time());
    }

    let nodal_container = nodal.finalize().expect("finalize nodal");
    let frame_container = frames.finalize().expect("finalize frames");
    println!(
        "\nnodal timeline: {} snapshots x {} nodes x {} channels",
        nodal_container.times.len(),
        nodal_container.tags.len(),
        nodal_container.arrays["disp"].channels.len()
    );
    println!(
        "frame timeline: {} snapshots, tag axis {:?} (topologyChanged = {})",
        frame_container.times.len(),
        frame_container.tags,
        frame_container.attrs["topologyChanged"]
    );

    // Persist, read back with unit factors, query a subset
    let mut store = DataStore::new();
    store.write_family(&nodal_container);
    store.write_family(&frame_container);

    let path = std::env::temp_dir().join("fea-postproc-replay.json");
    store.save(&path).expect("save store");
    let store = DataStore::open(&path).expect("open store");

    let units = UnitFactors::new()
        .with(Quantity::Disp, 1000.0) // m -> mm
        .with(Quantity::Force, 1e-3); // N -> kN
    let back = store
        .read_family(Family::Node, Some(&units))
        .expect("read nodal");
    let node2 = back.select(Some("disp"), Some(&[2])).expect("select");
    println!(
        "\nnode 2 displacement history (mm): {:?}",
        node2.arrays["disp"]
            .data
            .iter()
            .copied()
            .collect::<Vec<f64>>()
    );
    println!("store written to {}", path.display());
}
