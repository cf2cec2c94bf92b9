//! Line elements: beams, columns and links
//!
//! Basic and local end forces are flat per-element measurements; section
//! forces and deformations resolve per integration point and may be ragged
//! across elements (different integration schemes per element).

use crate::layout::{
    Family, FRAME_BASIC_FORCES, FRAME_LOCAL_FORCES, SECTION_DEFORMATIONS, SECTION_FORCES,
};

use super::{ResponseCollector, ResponseSpec};

static FRAME_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "basicForces",
        candidates: &["basicForces", "basicForce"],
        layout: &FRAME_BASIC_FORCES,
        sub_axis: None,
    },
    ResponseSpec {
        // links expose the same end-force layout under "forces"
        name: "localForces",
        candidates: &["localForces", "localForce", "forces"],
        layout: &FRAME_LOCAL_FORCES,
        sub_axis: None,
    },
    ResponseSpec {
        name: "sectionForces",
        candidates: &["section.{}.forces", "section.{}.force"],
        layout: &SECTION_FORCES,
        sub_axis: Some("secPoints"),
    },
    ResponseSpec {
        name: "sectionDeformations",
        candidates: &["section.{}.deformations", "section.{}.deformation"],
        layout: &SECTION_DEFORMATIONS,
        sub_axis: Some("secPoints"),
    },
];

/// Collects end forces and per-section results for line elements
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCollector;

impl ResponseCollector for FrameCollector {
    fn family(&self) -> Family {
        Family::Frame
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        FRAME_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn two_dimensional_element_expands_to_canonical() {
        let mut engine = MemoryEngine::new(2);
        engine.add_entity(Family::Frame, 10, &[0.0, 0.0]);
        engine.set_field(10, "basicForce", &[100.0, 20.0, -20.0]);
        engine.set_field(10, "localForces", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let out = FrameCollector.collect(&engine, &[10]);
        let basic = &out["basicForces"];
        assert_eq!(basic.shape(), &[1, 6]);
        assert_eq!(basic[IxDyn(&[0, 0])], 100.0);
        assert_eq!(basic[IxDyn(&[0, 2])], -20.0);
        assert_eq!(basic[IxDyn(&[0, 5])], 0.0);

        let local = &out["localForces"];
        assert_eq!(local.shape(), &[1, 12]);
        // 2-D [FX1, FY1, MZ1, FX2, FY2, MZ2] lands in the matching 3-D slots
        assert_eq!(local[IxDyn(&[0, 5])], 3.0);
        assert_eq!(local[IxDyn(&[0, 11])], 6.0);
        assert_eq!(local[IxDyn(&[0, 2])], 0.0);
    }
}
