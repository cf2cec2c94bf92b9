//! Fiber-discretized cross sections
//!
//! Fiber geometry (position and tributary area) is fixed at model build time
//! while stress/strain evolve per step. The geometry lives in an explicit
//! [`FiberSectionContext`] registered by the caller instead of a
//! process-wide registry, so its lifecycle (create, register, clear) is
//! visible at the call site.
//!
//! Engines expose fiber state either as `[sig, eps]` pairs (geometry comes
//! from the context) or as self-describing `[y, z, area, sig, eps]` records.

use std::collections::BTreeMap;

use ndarray::ArrayD;

use crate::align::{pad_ragged, SENTINEL};
use crate::engine::SimulationEngine;
use crate::layout::{Family, FIBER_CHANNELS};

use super::{probe, rows_to_array, ResponseCollector, ResponseSpec};

static FIBER_SPECS: &[ResponseSpec] = &[ResponseSpec {
    name: "fibers",
    candidates: &["fiberStressStrain", "fiberData2", "fiberData"],
    layout: &FIBER_CHANNELS,
    sub_axis: Some("fiberIdx"),
}];

/// Cached fiber geometry per element tag: `(y, z, area)` rows
#[derive(Debug, Default, Clone)]
pub struct FiberSectionContext {
    geometry: BTreeMap<i64, Vec<[f64; 3]>>,
}

impl FiberSectionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the fiber geometry of one element's section
    pub fn register(&mut self, tag: i64, fibers: Vec<[f64; 3]>) {
        self.geometry.insert(tag, fibers);
    }

    /// Geometry rows for one element, if registered
    pub fn geometry(&self, tag: i64) -> Option<&[[f64; 3]]> {
        self.geometry.get(&tag).map(|v| v.as_slice())
    }

    /// Drop all cached geometry
    pub fn clear(&mut self) {
        self.geometry.clear();
    }
}

/// Collects per-fiber `[y, z, area, sig, eps]` records
#[derive(Debug, Default, Clone)]
pub struct FiberSectionCollector {
    context: FiberSectionContext,
}

impl FiberSectionCollector {
    /// Create a collector owning the given geometry context
    pub fn new(context: FiberSectionContext) -> Self {
        Self { context }
    }

    /// Access the geometry context
    pub fn context(&self) -> &FiberSectionContext {
        &self.context
    }

    fn fiber_rows(&self, tag: i64, native: Option<Vec<f64>>) -> Vec<Vec<f64>> {
        let geometry = self.context.geometry(tag);
        match native {
            // [sig, eps] pairs joined with registered geometry; checked first
            // so a pairs reply can never misparse as flat records
            Some(flat)
                if geometry.map(|g| g.len() * 2 == flat.len()).unwrap_or(false)
                    && !flat.is_empty() =>
            {
                geometry
                    .unwrap_or(&[])
                    .iter()
                    .zip(flat.chunks_exact(2))
                    .map(|(geo, se)| vec![geo[0], geo[1], geo[2], se[0], se[1]])
                    .collect()
            }
            // self-describing [y, z, area, sig, eps] records carry the
            // geometry themselves
            Some(flat) if flat.len() % 5 == 0 && !flat.is_empty() => flat
                .chunks_exact(5)
                .map(|chunk| chunk.to_vec())
                .collect(),
            Some(flat) => {
                log::debug!(
                    "fiber reply of length {} for element {tag} matches no known record shape",
                    flat.len()
                );
                vec![FIBER_CHANNELS.zero_sample()]
            }
            // no state yet: geometry rows with zero stress/strain, or one
            // zero slot when nothing is known about the section
            None => match geometry {
                Some(rows) if !rows.is_empty() => rows
                    .iter()
                    .map(|geo| vec![geo[0], geo[1], geo[2], 0.0, 0.0])
                    .collect(),
                _ => vec![FIBER_CHANNELS.zero_sample()],
            },
        }
    }
}

impl ResponseCollector for FiberSectionCollector {
    fn family(&self) -> Family {
        Family::FiberSection
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        FIBER_SPECS
    }

    fn collect(
        &self,
        engine: &dyn SimulationEngine,
        tags: &[i64],
    ) -> BTreeMap<&'static str, ArrayD<f64>> {
        let spec = &FIBER_SPECS[0];
        let width = spec.layout.len();
        let mut out = BTreeMap::new();
        if tags.is_empty() {
            out.insert(spec.name, ArrayD::zeros(ndarray::IxDyn(&[0, 1, width])));
            return out;
        }
        let per_entity: Vec<ArrayD<f64>> = tags
            .iter()
            .map(|&tag| {
                let native = probe(engine, tag, spec.candidates);
                rows_to_array(&self.fiber_rows(tag, native), width)
            })
            .collect();
        out.insert(spec.name, pad_ragged(&per_entity, SENTINEL));
        out
    }
}
