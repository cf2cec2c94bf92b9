//! Area elements without bending: 2-D solids
//!
//! Plane elements report element-averaged stress and strain triples (or
//! quadruples under plane strain); both normalize to the full tensor layout
//! with the out-of-plane terms zeroed.

use crate::layout::{Family, SOLID_STRAIN, SOLID_STRESS};

use super::{ResponseCollector, ResponseSpec};

static PLANE_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "stresses",
        candidates: &["stresses", "stress"],
        layout: &SOLID_STRESS,
        sub_axis: None,
    },
    ResponseSpec {
        name: "strains",
        candidates: &["strains", "strain"],
        layout: &SOLID_STRAIN,
        sub_axis: None,
    },
];

/// Collects averaged stress/strain tensors for 2-D solid elements
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaneCollector;

impl ResponseCollector for PlaneCollector {
    fn family(&self) -> Family {
        Family::Plane
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        PLANE_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn in_plane_triple_keeps_tensor_positions() {
        let mut engine = MemoryEngine::new(2);
        engine.add_entity(Family::Plane, 1, &[0.0, 0.0]);
        engine.set_field(1, "stress", &[10.0, 20.0, 5.0]);

        let out = PlaneCollector.collect(&engine, &[1]);
        let stress = &out["stresses"];
        assert_eq!(stress.shape(), &[1, 6]);
        // XY shear is slot 3, never slot 2 (that is SZZ)
        assert_eq!(stress[IxDyn(&[0, 2])], 0.0);
        assert_eq!(stress[IxDyn(&[0, 3])], 5.0);
    }
}
