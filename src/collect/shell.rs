//! Area elements with bending: shells and plates
//!
//! Resultants are resolved per Gauss point; quadrature order differs between
//! element formulations (4-point vs 9-point), so the per-element matrices
//! are ragged and get sentinel-padded by the shared collection routine.

use crate::layout::{Family, SHELL_RESULTANTS};

use super::{ResponseCollector, ResponseSpec};

static SHELL_SPECS: &[ResponseSpec] = &[ResponseSpec {
    name: "resultants",
    candidates: &["gauss.{}.resultants", "section.{}.forces", "material.{}.stresses"],
    layout: &SHELL_RESULTANTS,
    sub_axis: Some("gaussPoints"),
}];

/// Collects membrane/bending/shear resultants per shell Gauss point
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellCollector;

impl ResponseCollector for ShellCollector {
    fn family(&self) -> Family {
        Family::Shell
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        SHELL_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn quadrature_mismatch_is_padded_not_truncated() {
        let mut engine = MemoryEngine::new(3);
        engine.add_entity(Family::Shell, 1, &[0.0, 0.0, 0.0]);
        engine.add_entity(Family::Shell, 2, &[1.0, 0.0, 0.0]);
        for g in 1..=4 {
            engine.set_field(1, &format!("gauss.{g}.resultants"), &[1.0, 2.0, 3.0]);
        }
        for g in 1..=9 {
            engine.set_field(2, &format!("gauss.{g}.resultants"), &[4.0, 5.0, 6.0]);
        }

        let out = ShellCollector.collect(&engine, &[1, 2]);
        let res = &out["resultants"];
        assert_eq!(res.shape(), &[2, 9, 8]);
        // membrane triple lands in the leading channels, bending stays zero
        assert_eq!(res[IxDyn(&[0, 0, 2])], 3.0);
        assert_eq!(res[IxDyn(&[0, 0, 3])], 0.0);
        // element 1 ends at 4 Gauss points, the rest is sentinel
        assert!(res[IxDyn(&[0, 4, 0])].is_nan());
        assert_eq!(res[IxDyn(&[1, 8, 0])], 4.0);
    }
}
