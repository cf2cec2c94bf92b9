//! Contact interface elements

use crate::layout::{Family, CONTACT_FORCES, CONTACT_SLIP};

use super::{ResponseCollector, ResponseSpec};

static CONTACT_SPECS: &[ResponseSpec] = &[
    ResponseSpec {
        name: "forces",
        candidates: &["forces", "force", "localForces"],
        layout: &CONTACT_FORCES,
        sub_axis: None,
    },
    ResponseSpec {
        name: "slips",
        candidates: &["localDispJump", "slip", "deformations"],
        layout: &CONTACT_SLIP,
        sub_axis: None,
    },
];

/// Collects normal/tangential forces and gap/slip per contact element
#[derive(Debug, Default, Clone, Copy)]
pub struct ContactCollector;

impl ResponseCollector for ContactCollector {
    fn family(&self) -> Family {
        Family::Contact
    }

    fn specs(&self) -> &'static [ResponseSpec] {
        CONTACT_SPECS
    }
}
