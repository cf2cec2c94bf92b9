//! Entity response collectors
//!
//! One collector per entity family maps the active entity tags to
//! canonical-layout samples for the current step. Collectors are read-only
//! against the engine and never fail: every recoverable condition (missing
//! field, ragged sub-entity structure) is resolved locally.
//!
//! Measurements are declared as [`ResponseSpec`] configuration data rather
//! than inline branching: each spec carries the ordered candidate field
//! names the engine may expose for the same physical quantity (legacy and
//! alternate spellings), the canonical layout, and an optional sub-entity
//! axis. New engine aliases are additive edits to the candidate lists.

mod brick;
mod contact;
mod fiber;
mod frame;
mod nodal;
mod plane;
mod sensitivity;
mod shell;

pub use brick::BrickCollector;
pub use contact::ContactCollector;
pub use fiber::{FiberSectionCollector, FiberSectionContext};
pub use frame::FrameCollector;
pub use nodal::NodalCollector;
pub use plane::PlaneCollector;
pub use sensitivity::SensitivityCollector;
pub use shell::ShellCollector;

use std::collections::BTreeMap;

use ndarray::{ArrayD, IxDyn};

use crate::align::pad_ragged;
use crate::engine::SimulationEngine;
use crate::layout::{Family, FieldLayout};

/// Hard cap on probed sub-entity indices, in case an engine never reports an
/// empty slot. No practical element has this many integration points.
const MAX_SUB_ENTITIES: usize = 1024;

/// Declarative description of one measurement of a family
#[derive(Debug)]
pub struct ResponseSpec {
    /// Measurement name; becomes the dataset name in the store
    pub name: &'static str,
    /// Candidate engine field names, tried in order, first non-empty wins.
    /// Sub-entity specs use a `{}` placeholder for the 1-based sub index.
    pub candidates: &'static [&'static str],
    /// Canonical layout every native vector is normalized to
    pub layout: &'static FieldLayout,
    /// Axis name of the sub-entity dimension, when the measurement is
    /// resolved per integration point / fiber rather than per entity
    pub sub_axis: Option<&'static str>,
}

/// Maps entity tags to canonical samples for one step
pub trait ResponseCollector {
    /// Family this collector serves
    fn family(&self) -> Family;

    /// Declared measurements, in storage order
    fn specs(&self) -> &'static [ResponseSpec];

    /// Collect every declared measurement for the given tags, in tag order.
    /// Flat measurements yield `(n_tags, channels)`; sub-entity measurements
    /// yield `(n_tags, max_sub, channels)` padded with the sentinel where
    /// entities have fewer sub-entities than the widest one.
    fn collect(
        &self,
        engine: &dyn SimulationEngine,
        tags: &[i64],
    ) -> BTreeMap<&'static str, ArrayD<f64>> {
        let mut out = BTreeMap::new();
        for spec in self.specs() {
            let data = match spec.sub_axis {
                Some(_) => collect_sub(engine, tags, spec),
                None => collect_flat(engine, tags, spec),
            };
            out.insert(spec.name, data);
        }
        out
    }
}

/// Try each candidate field name in order; first non-empty reply wins
pub(crate) fn probe(
    engine: &dyn SimulationEngine,
    tag: i64,
    candidates: &[&str],
) -> Option<Vec<f64>> {
    for name in candidates {
        let native = engine.query(tag, name);
        if !native.is_empty() {
            return Some(native);
        }
    }
    None
}

/// Build a dense `(rows, width)` array from canonical-length rows
pub(crate) fn rows_to_array(rows: &[Vec<f64>], width: usize) -> ArrayD<f64> {
    let mut out = ArrayD::zeros(IxDyn(&[rows.len(), width]));
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            out[IxDyn(&[i, j])] = value;
        }
    }
    out
}

/// Collect a flat (per-entity) measurement: one canonical vector per tag.
/// All candidates empty degrades to a canonical zero vector for that entity.
pub(crate) fn collect_flat(
    engine: &dyn SimulationEngine,
    tags: &[i64],
    spec: &ResponseSpec,
) -> ArrayD<f64> {
    let rows: Vec<Vec<f64>> = tags
        .iter()
        .map(|&tag| match probe(engine, tag, spec.candidates) {
            Some(native) => spec.layout.reshape(&native, engine.spatial_dim(tag)),
            None => spec.layout.zero_sample(),
        })
        .collect();
    rows_to_array(&rows, spec.layout.len())
}

/// Collect a sub-entity measurement: probe patterned candidates with sub
/// indices 1.. until the first index every candidate leaves empty, then pad
/// the per-entity matrices to a common sub-entity count.
pub(crate) fn collect_sub(
    engine: &dyn SimulationEngine,
    tags: &[i64],
    spec: &ResponseSpec,
) -> ArrayD<f64> {
    let width = spec.layout.len();
    if tags.is_empty() {
        return ArrayD::zeros(IxDyn(&[0, 1, width]));
    }

    let mut per_entity: Vec<ArrayD<f64>> = Vec::with_capacity(tags.len());
    for &tag in tags {
        let ndim = engine.spatial_dim(tag);
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for sub in 1..=MAX_SUB_ENTITIES {
            let native = spec.candidates.iter().find_map(|pattern| {
                let field = pattern.replace("{}", &sub.to_string());
                let reply = engine.query(tag, &field);
                if reply.is_empty() {
                    None
                } else {
                    Some(reply)
                }
            });
            match native {
                Some(native) => rows.push(spec.layout.reshape(&native, ndim)),
                None => break,
            }
        }
        if rows.is_empty() {
            // missing measurement, not a missing entity: zero fill one slot
            rows.push(spec.layout.zero_sample());
        }
        per_entity.push(rows_to_array(&rows, width));
    }
    pad_ragged(&per_entity, crate::align::SENTINEL)
}
