//! Step accumulation
//!
//! A [`StepAccumulator`] is driven by the surrounding analysis loop: one
//! `record_step` call per converged step, strictly sequential, no I/O. The
//! accumulation strategy is chosen once at construction: a fixed-schema run
//! declares its entity axis at initialization and stores plain per-step
//! arrays; a model-update run re-queries the active entity set every step
//! and keeps per-step tag axes for the outer join at finalize time.
//!
//! State machine: UNINITIALIZED -> INITIALIZED -> ACCUMULATING* ->
//! (RESET -> INITIALIZED | FINALIZED). `finalize` borrows immutably and may
//! be called repeatedly; it re-derives the identical container each time.

use std::collections::BTreeMap;

use ndarray::ArrayD;

use crate::collect::ResponseCollector;
use crate::container::FamilyContainer;
use crate::engine::SimulationEngine;
use crate::error::{PostError, PostResult};
use crate::finalize::SchemaFinalizer;

/// Whether the entity set is constant for the run or may change step to step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyMode {
    /// Entity axis declared once at initialization
    Fixed,
    /// Entities may appear or disappear mid-run (element removal/addition)
    ModelUpdate,
}

/// One step's collected responses together with its own entity-tag axis
#[derive(Debug, Clone)]
pub struct StepSnapshot {
    /// Entity tags active at this step, in collection order
    pub tags: Vec<i64>,
    /// Measurement name to collected array, `(n_tags, [sub,] channels)`
    pub responses: BTreeMap<&'static str, ArrayD<f64>>,
}

enum TimelineBuf {
    Fixed {
        tags: Vec<i64>,
        frames: Vec<BTreeMap<&'static str, ArrayD<f64>>>,
    },
    ModelUpdate {
        frames: Vec<StepSnapshot>,
    },
}

/// Accumulates one step snapshot per call across the analysis timeline
pub struct StepAccumulator<C: ResponseCollector> {
    collector: C,
    buf: TimelineBuf,
    times: Vec<f64>,
    track: usize,
    initialized: bool,
}

impl<C: ResponseCollector> StepAccumulator<C> {
    /// Create an accumulator with the given collection strategy
    pub fn new(collector: C, mode: TopologyMode) -> Self {
        let buf = match mode {
            TopologyMode::Fixed => TimelineBuf::Fixed {
                tags: Vec::new(),
                frames: Vec::new(),
            },
            TopologyMode::ModelUpdate => TimelineBuf::ModelUpdate { frames: Vec::new() },
        };
        Self {
            collector,
            buf,
            times: Vec::new(),
            track: 0,
            initialized: false,
        }
    }

    /// Strategy chosen at construction
    pub fn mode(&self) -> TopologyMode {
        match self.buf {
            TimelineBuf::Fixed { .. } => TopologyMode::Fixed,
            TimelineBuf::ModelUpdate { .. } => TopologyMode::ModelUpdate,
        }
    }

    /// Collector backing this accumulator
    pub fn collector(&self) -> &C {
        &self.collector
    }

    /// Capture the entity set and record the baseline snapshot at time 0.0.
    ///
    /// The baseline exists even before any analysis stepping, so a run that
    /// is finalized immediately still has one well-formed data point. With
    /// `tags` omitted the active set is queried from the engine.
    pub fn initialize(&mut self, engine: &dyn SimulationEngine, tags: Option<&[i64]>) {
        let tags = match tags {
            Some(tags) => tags.to_vec(),
            None => engine.active_entity_tags(self.collector.family()),
        };
        let baseline = self.collector.collect(engine, &tags);
        self.buf = match self.mode() {
            TopologyMode::Fixed => TimelineBuf::Fixed {
                tags,
                frames: vec![baseline],
            },
            TopologyMode::ModelUpdate => TimelineBuf::ModelUpdate {
                frames: vec![StepSnapshot {
                    tags,
                    responses: baseline,
                }],
            },
        };
        self.times = vec![0.0];
        self.track = 0;
        self.initialized = true;
    }

    /// Append one step snapshot at the engine's current time.
    ///
    /// In model-update mode the active entity set is re-queried fresh; in
    /// fixed mode the declared axis is reused. A step is appended atomically
    /// with all of its entities resolved, or not at all.
    pub fn record_step(&mut self, engine: &dyn SimulationEngine) -> PostResult<()> {
        if !self.initialized {
            return Err(PostError::NotInitialized);
        }
        let time = engine.current_time();
        match &mut self.buf {
            TimelineBuf::Fixed { tags, frames } => {
                let snapshot = self.collector.collect(engine, tags);
                frames.push(snapshot);
            }
            TimelineBuf::ModelUpdate { frames } => {
                let tags = engine.active_entity_tags(self.collector.family());
                let responses = self.collector.collect(engine, &tags);
                frames.push(StepSnapshot { tags, responses });
            }
        }
        self.times.push(time);
        self.track += 1;
        log::debug!(
            "{}: recorded step {} at t={time}",
            self.collector.family().group_name(),
            self.track
        );
        Ok(())
    }

    /// Number of `record_step` calls made since initialization (the baseline
    /// snapshot is not counted)
    pub fn get_track(&self) -> usize {
        self.track
    }

    /// Discard the timeline and re-initialize. A fixed-schema run keeps its
    /// declared entity axis; a model-update run re-queries the engine.
    pub fn reset(&mut self, engine: &dyn SimulationEngine) {
        match &self.buf {
            TimelineBuf::Fixed { tags, .. } => {
                let tags = tags.clone();
                self.initialize(engine, Some(&tags));
            }
            TimelineBuf::ModelUpdate { .. } => self.initialize(engine, None),
        }
    }

    /// Collapse the timeline into one finalized container.
    ///
    /// Idempotent: the timeline is not mutated and repeated calls yield a
    /// bit-identical container.
    pub fn finalize(&self) -> PostResult<FamilyContainer> {
        if !self.initialized {
            return Err(PostError::NotInitialized);
        }
        let family = self.collector.family();
        let specs = self.collector.specs();
        Ok(match &self.buf {
            TimelineBuf::Fixed { tags, frames } => {
                SchemaFinalizer::fixed(family, specs, tags, &self.times, frames)
            }
            TimelineBuf::ModelUpdate { frames } => {
                SchemaFinalizer::model_update(family, specs, &self.times, frames)
            }
        })
    }
}
