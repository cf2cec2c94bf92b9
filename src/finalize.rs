//! Schema finalization
//!
//! Collapses an accumulated timeline into one finalized container. The
//! fixed-schema path stacks the per-step arrays directly (aligning ragged
//! sub-entity axes across steps); the model-update path first computes the
//! outer join of every step's entity axis and re-expresses each step against
//! that union, filling the sentinel for entities absent at a step. Both
//! paths are pure functions of the timeline, which makes repeated
//! finalization bit-identical.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{ArrayD, Axis, IxDyn};

use crate::align::{pad_ragged, SENTINEL};
use crate::collect::ResponseSpec;
use crate::container::{DataArray, FamilyContainer};
use crate::layout::Family;
use crate::timeline::StepSnapshot;

/// Converts accumulated snapshots into a finalized, labeled container
pub struct SchemaFinalizer;

impl SchemaFinalizer {
    /// Finalize a fixed-schema timeline: one declared entity axis, per-step
    /// arrays stacked along a new leading time axis.
    pub fn fixed(
        family: Family,
        specs: &[ResponseSpec],
        tags: &[i64],
        times: &[f64],
        frames: &[BTreeMap<&'static str, ArrayD<f64>>],
    ) -> FamilyContainer {
        let mut arrays = BTreeMap::new();
        for spec in specs {
            let per_step: Vec<ArrayD<f64>> = frames
                .iter()
                .map(|frame| {
                    frame
                        .get(spec.name)
                        .cloned()
                        .unwrap_or_else(|| empty_frame(spec, tags.len()))
                })
                .collect();
            let data = pad_ragged(&per_step, SENTINEL);
            arrays.insert(spec.name.to_string(), labeled(family, spec, data));
        }
        FamilyContainer {
            family,
            times: times.to_vec(),
            tags: tags.to_vec(),
            arrays,
            attrs: family_attrs(family, tags, false),
        }
    }

    /// Finalize a model-update timeline: the entity axis is the union of
    /// every step's active set (not merely the first or last step), and
    /// entities absent at a step hold the sentinel.
    pub fn model_update(
        family: Family,
        specs: &[ResponseSpec],
        times: &[f64],
        frames: &[StepSnapshot],
    ) -> FamilyContainer {
        let union: Vec<i64> = frames
            .iter()
            .flat_map(|frame| frame.tags.iter().copied())
            .collect::<BTreeSet<i64>>()
            .into_iter()
            .collect();
        let position: BTreeMap<i64, usize> =
            union.iter().enumerate().map(|(i, &t)| (t, i)).collect();

        let mut arrays = BTreeMap::new();
        for spec in specs {
            let per_step: Vec<ArrayD<f64>> = frames
                .iter()
                .map(|frame| {
                    let step = match frame.responses.get(spec.name) {
                        Some(step) => step.clone(),
                        None => empty_frame(spec, frame.tags.len()),
                    };
                    scatter_to_union(&step, &frame.tags, &position, union.len())
                })
                .collect();
            let data = pad_ragged(&per_step, SENTINEL);
            arrays.insert(spec.name.to_string(), labeled(family, spec, data));
        }
        FamilyContainer {
            family,
            times: times.to_vec(),
            tags: union.clone(),
            arrays,
            attrs: family_attrs(family, &union, true),
        }
    }
}

/// Re-express one step's `(n_step, ...)` array against the union entity
/// axis, sentinel-filling the rows of entities absent at this step
fn scatter_to_union(
    step: &ArrayD<f64>,
    step_tags: &[i64],
    position: &BTreeMap<i64, usize>,
    union_len: usize,
) -> ArrayD<f64> {
    let mut shape = step.shape().to_vec();
    if shape.is_empty() {
        shape = vec![0];
    }
    shape[0] = union_len;
    let mut out = ArrayD::from_elem(IxDyn(&shape), SENTINEL);
    for (i, tag) in step_tags.iter().enumerate() {
        if let Some(&slot) = position.get(tag) {
            out.index_axis_mut(Axis(0), slot)
                .assign(&step.index_axis(Axis(0), i));
        }
    }
    out
}

/// Zero-entity placeholder with the spec's canonical trailing shape
fn empty_frame(spec: &ResponseSpec, n_tags: usize) -> ArrayD<f64> {
    match spec.sub_axis {
        Some(_) => ArrayD::zeros(IxDyn(&[n_tags, 1, spec.layout.len()])),
        None => ArrayD::zeros(IxDyn(&[n_tags, spec.layout.len()])),
    }
}

fn labeled(family: Family, spec: &ResponseSpec, data: ArrayD<f64>) -> DataArray {
    let mut dims = vec!["time".to_string(), family.tag_axis().to_string()];
    if let Some(sub) = spec.sub_axis {
        dims.push(sub.to_string());
    }
    dims.push("components".to_string());
    DataArray {
        name: spec.name.to_string(),
        data,
        dims,
        channels: spec.layout.channels.iter().map(|c| c.to_string()).collect(),
        quantities: spec.layout.quantities.to_vec(),
    }
}

fn family_attrs(family: Family, tags: &[i64], topology_changed: bool) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    attrs.insert("family".to_string(), family.group_name().to_string());
    attrs.insert(
        "topologyChanged".to_string(),
        topology_changed.to_string(),
    );
    if tags.is_empty() {
        log::warn!(
            "{}: no entities for the whole run, container is an empty marker",
            family.group_name()
        );
        attrs.insert("empty".to_string(), "true".to_string());
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{NodalCollector, ResponseCollector};
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    fn snapshot(engine: &MemoryEngine, tags: &[i64]) -> StepSnapshot {
        StepSnapshot {
            tags: tags.to_vec(),
            responses: NodalCollector.collect(engine, tags),
        }
    }

    #[test]
    fn union_covers_every_step() {
        let mut engine = MemoryEngine::new(2);
        for tag in 1..=3 {
            engine.add_entity(Family::Node, tag, &[tag as f64, 0.0]);
            engine.set_field(tag, "disp", &[tag as f64, 0.0]);
        }

        let frames = vec![
            snapshot(&engine, &[1, 2]),
            snapshot(&engine, &[2, 3]),
            snapshot(&engine, &[1, 3]),
        ];
        let specs = NodalCollector.specs();
        let c =
            SchemaFinalizer::model_update(Family::Node, specs, &[0.0, 1.0, 2.0], &frames);

        assert_eq!(c.tags, vec![1, 2, 3]);
        let disp = &c.arrays["disp"].data;
        assert_eq!(disp.shape(), &[3, 3, 6]);
        // step 0 never saw entity 3
        assert!(disp[IxDyn(&[0, 2, 0])].is_nan());
        // original values retrievable unchanged at their (step, entity) cells
        assert_eq!(disp[IxDyn(&[0, 0, 0])], 1.0);
        assert_eq!(disp[IxDyn(&[1, 2, 0])], 3.0);
        assert_eq!(disp[IxDyn(&[2, 0, 0])], 1.0);
        assert_eq!(c.attrs["topologyChanged"], "true");
    }

    #[test]
    fn empty_run_still_produces_a_marker() {
        let engine = MemoryEngine::new(2);
        let specs = NodalCollector.specs();
        let frames = vec![snapshot(&engine, &[])];
        let c = SchemaFinalizer::model_update(Family::Node, specs, &[0.0], &frames);
        assert!(c.is_empty());
        assert_eq!(c.attrs["empty"], "true");
        assert_eq!(c.arrays["disp"].data.shape(), &[1, 0, 6]);
    }
}
