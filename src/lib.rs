//! FEA Post-Processing - step-wise response aggregation
//!
//! This library sits behind a finite-element analysis loop: after each
//! converged step it pulls heterogeneous, variably-shaped measurements from
//! the engine (nodes, frames, shells, solids, contacts, fiber sections,
//! sensitivity parameters), normalizes every sample to a fixed canonical
//! channel layout, and accumulates them into one time-indexed, labeled store
//! that visualization and reporting can query uniformly - even when the set
//! of active entities changes mid-run.
//!
//! ## Example
//! ```rust
//! use fea_postproc::prelude::*;
//!
//! let mut engine = MemoryEngine::new(2);
//! engine.add_entity(Family::Node, 1, &[0.0, 0.0]);
//! engine.add_entity(Family::Node, 2, &[1.0, 0.0]);
//!
//! let mut nodal = StepAccumulator::new(NodalCollector, TopologyMode::Fixed);
//! nodal.initialize(&engine, None);
//!
//! // ... analysis converges one step ...
//! engine.advance(0.5);
//! engine.set_field(1, "disp", &[0.1, 0.2]);
//! engine.set_field(2, "disp", &[0.3, 0.4, 0.01]);
//! nodal.record_step(&engine).unwrap();
//!
//! let container = nodal.finalize().unwrap();
//! assert_eq!(container.times, vec![0.0, 0.5]);
//!
//! // persist and query back
//! let mut store = DataStore::new();
//! store.write_family(&container);
//! let back = store.read_family(Family::Node, None).unwrap();
//! let disp = back.select(Some("disp"), Some(&[2])).unwrap();
//! assert_eq!(disp.tags, vec![2]);
//! ```

pub mod align;
pub mod collect;
pub mod container;
pub mod engine;
pub mod error;
pub mod finalize;
pub mod layout;
pub mod store;
pub mod timeline;

// Re-export common types
pub mod prelude {
    pub use crate::align::{pad_ragged, SENTINEL};
    pub use crate::collect::{
        BrickCollector, ContactCollector, FiberSectionCollector, FiberSectionContext,
        FrameCollector, NodalCollector, PlaneCollector, ResponseCollector, SensitivityCollector,
        ShellCollector,
    };
    pub use crate::container::{DataArray, FamilyContainer};
    pub use crate::engine::{MemoryEngine, SimulationEngine};
    pub use crate::error::{PostError, PostResult};
    pub use crate::finalize::SchemaFinalizer;
    pub use crate::layout::{Family, Quantity};
    pub use crate::store::{DataStore, UnitFactors};
    pub use crate::timeline::{StepAccumulator, TopologyMode};
}
