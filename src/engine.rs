//! Simulation Engine interface
//!
//! The post-processor consumes a converged analysis through this trait and
//! never mutates engine state. A query for a field the entity does not carry
//! returns an empty vector; that is the normal case for configuration-
//! dependent outputs and is handled by the collectors, not by the engine.

use std::collections::BTreeMap;

use crate::layout::Family;

/// Read-only view of the external finite-element engine at the current step
pub trait SimulationEngine {
    /// Native result vector for one entity and one field name.
    /// Empty means the entity does not expose that field.
    fn query(&self, tag: i64, field: &str) -> Vec<f64>;

    /// Simulation time of the current (converged) step
    fn current_time(&self) -> f64;

    /// Tags of the entities currently active in a family, in engine order
    fn active_entity_tags(&self, family: Family) -> Vec<i64>;

    /// Spatial coordinate of an entity; its length is the spatial dimension.
    /// Empty for entities without a location (e.g. parameters).
    fn entity_coordinate(&self, tag: i64) -> Vec<f64>;

    /// Spatial dimension used for reshape-rule selection. Entities without a
    /// coordinate fall back to 3-D, whose rules are the unreduced ones.
    fn spatial_dim(&self, tag: i64) -> usize {
        let coord = self.entity_coordinate(tag);
        if coord.is_empty() {
            3
        } else {
            coord.len()
        }
    }
}

/// Scripted in-memory engine used by the tests and the replay demo.
///
/// Entities, coordinates and per-field vectors are set explicitly; removing
/// an entity drops it from the active set and clears its fields, which is
/// how a real engine behaves after element removal.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine {
    time: f64,
    ndim: usize,
    tags: BTreeMap<Family, Vec<i64>>,
    coords: BTreeMap<i64, Vec<f64>>,
    fields: BTreeMap<(i64, String), Vec<f64>>,
}

impl MemoryEngine {
    /// Create an engine for a model of the given spatial dimension
    pub fn new(ndim: usize) -> Self {
        Self {
            time: 0.0,
            ndim,
            tags: BTreeMap::new(),
            coords: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Advance the simulation clock
    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
    }

    /// Set the simulation clock directly
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Register an entity as active in a family
    pub fn add_entity(&mut self, family: Family, tag: i64, coord: &[f64]) {
        let tags = self.tags.entry(family).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        if !coord.is_empty() {
            self.coords.insert(tag, coord.to_vec());
        }
    }

    /// Remove an entity from a family and clear its field data
    pub fn remove_entity(&mut self, family: Family, tag: i64) {
        if let Some(tags) = self.tags.get_mut(&family) {
            tags.retain(|t| *t != tag);
        }
        self.fields.retain(|(t, _), _| *t != tag);
        log::debug!("entity {tag} removed from {}", family.group_name());
    }

    /// Set the native vector an entity reports for a field
    pub fn set_field(&mut self, tag: i64, field: &str, values: &[f64]) {
        self.fields.insert((tag, field.to_string()), values.to_vec());
    }

    /// Clear one field of one entity (subsequent queries return empty)
    pub fn clear_field(&mut self, tag: i64, field: &str) {
        self.fields.remove(&(tag, field.to_string()));
    }
}

impl SimulationEngine for MemoryEngine {
    fn query(&self, tag: i64, field: &str) -> Vec<f64> {
        self.fields
            .get(&(tag, field.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn active_entity_tags(&self, family: Family) -> Vec<i64> {
        self.tags.get(&family).cloned().unwrap_or_default()
    }

    fn entity_coordinate(&self, tag: i64) -> Vec<f64> {
        match self.coords.get(&tag) {
            Some(coord) => coord.clone(),
            // registered spatial entities default to the model origin;
            // unknown tags (e.g. parameters) have no location
            None if self.tags.values().any(|tags| tags.contains(&tag)) => vec![0.0; self.ndim],
            None => Vec::new(),
        }
    }
}
