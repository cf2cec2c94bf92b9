//! Volumetric elements: bricks and tets
//!
//! Stress and strain tensors are resolved per integration point.

use crate::layout::{Family, SOLID_STRAIN, SOLID_STRESS};

use super::{ResponseCollector, ResponseSpec};

static BRICK_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "stresses",
        candidates: &["material.{}.stresses", "material.{}.stress"],
        layout: &SOLID_STRESS,
        sub_axis: Some("gaussPoints"),
    },
    ResponseSpec {
        name: "strains",
        candidates: &["material.{}.strains", "material.{}.strain"],
        layout: &SOLID_STRAIN,
        sub_axis: Some("gaussPoints"),
    },
];

/// Collects per-Gauss-point stress/strain tensors for volumetric elements
#[derive(Debug, Default, Clone, Copy)]
pub struct BrickCollector;

impl ResponseCollector for BrickCollector {
    fn family(&self) -> Family {
        Family::Brick
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        BRICK_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn full_tensor_passes_through() {
        let mut engine = MemoryEngine::new(3);
        engine.add_entity(Family::Brick, 1, &[0.0, 0.0, 0.0]);
        engine.set_field(1, "material.1.stresses", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        engine.set_field(1, "material.2.stresses", &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        let out = BrickCollector.collect(&engine, &[1]);
        let stress = &out["stresses"];
        assert_eq!(stress.shape(), &[1, 2, 6]);
        assert_eq!(stress[IxDyn(&[0, 1, 5])], 12.0);
    }
}
