//! Design-sensitivity parameters
//!
//! Entity tags here are parameter tags. The load-factor sensitivity is a
//! flat scalar per parameter; nodal displacement sensitivities resolve per
//! monitored node slot and may differ in count between parameters.

use crate::layout::{Family, SENS_DISP, SENS_LAMBDA};

use super::{ResponseCollector, ResponseSpec};

static SENS_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "lambda",
        candidates: &["sensLambda", "lambdaSensitivity"],
        layout: &SENS_LAMBDA,
        sub_axis: None,
    },
    ResponseSpec {
        name: "dispSensitivity",
        candidates: &["sensNodeDisp.{}", "dispSensitivity.{}"],
        layout: &SENS_DISP,
        sub_axis: Some("nodeSlots"),
    },
];

/// Collects parameter sensitivities
#[derive(Debug, Default, Clone, Copy)]
pub struct SensitivityCollector;

impl ResponseCollector for SensitivityCollector {
    fn family(&self) -> Family {
        Family::Sensitivity
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        SENS_SPECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use ndarray::IxDyn;

    #[test]
    fn per_node_sensitivities_collect_under_one_parameter() {
        let mut engine = MemoryEngine::new(2);
        engine.add_entity(Family::Sensitivity, 1, &[]);
        engine.set_field(1, "sensLambda", &[0.5]);
        engine.set_field(1, "sensNodeDisp.1", &[0.01, 0.02]);
        engine.set_field(1, "sensNodeDisp.2", &[0.03, 0.04]);

        let out = SensitivityCollector.collect(&engine, &[1]);
        assert_eq!(out["lambda"].shape(), &[1, 1]);
        assert_eq!(out["lambda"][IxDyn(&[0, 0])], 0.5);

        let disp = &out["dispSensitivity"];
        assert_eq!(disp.shape(), &[1, 2, 6]);
        assert_eq!(disp[IxDyn(&[0, 1, 1])], 0.04);
    }
}
