//! Nodal kinematics and reactions

use crate::layout::{Family, NODAL_ACCEL, NODAL_DISP, NODAL_REACTION, NODAL_VEL};

use super::{ResponseCollector, ResponseSpec};

static NODAL_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "disp",
        candidates: &["disp", "displacement"],
        layout: &NODAL_DISP,
        sub_axis: None,
    },
    ResponseSpec {
        name: "vel",
        candidates: &["vel", "velocity"],
        layout: &NODAL_VEL,
        sub_axis: None,
    },
    ResponseSpec {
        name: "accel",
        candidates: &["accel", "acceleration"],
        layout: &NODAL_ACCEL,
        sub_axis: None,
    },
    ResponseSpec {
        name: "reaction",
        candidates: &["reaction", "reactionForce"],
        layout: &NODAL_REACTION,
        sub_axis: None,
    },
];

/// Collects displacement, velocity, acceleration and reaction per node
#[derive(Debug, Default, Clone, Copy)]
pub struct NodalCollector;

impl ResponseCollector for NodalCollector {
    fn family(&self) -> Family {
        Family::Node
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        NODAL_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn mixed_dof_counts_normalize_per_node() {
        let mut engine = MemoryEngine::new(2);
        engine.add_entity(Family::Node, 1, &[0.0, 0.0]);
        engine.add_entity(Family::Node, 2, &[1.0, 0.0]);
        engine.set_field(1, "disp", &[0.1, 0.2]);
        engine.set_field(2, "disp", &[0.3, 0.4, 0.01]);

        let out = NodalCollector.collect(&engine, &[1, 2]);
        let disp = &out["disp"];
        assert_eq!(disp.shape(), &[2, 6]);
        assert_eq!(disp[IxDyn(&[0, 0])], 0.1);
        assert_eq!(disp[IxDyn(&[0, 5])], 0.0);
        assert_eq!(disp[IxDyn(&[1, 5])], 0.01);
        // velocity was never set: canonical zero fill, never an error
        assert!(out["vel"].iter().all(|v| *v == 0.0));
    }
}
