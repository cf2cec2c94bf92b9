//! Canonical field layouts and reshape rule tables
//!
//! Every response family normalizes its native engine output to a fixed,
//! named channel list. The engine's native vector length varies with the
//! spatial dimension and element configuration (2-D vs 3-D, reduced DOFs,
//! optional shear terms), so each layout carries an explicit rule table
//! keyed on (spatial dimension, native length) that maps every native value
//! to the canonical slot holding the same physical quantity.

/// Response families tracked by the post-processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    /// Nodes (kinematics and reactions)
    Node,
    /// Line elements: beams, columns, links
    Frame,
    /// Area elements with bending: shells and plates
    Shell,
    /// Area elements without bending: 2-D solids
    Plane,
    /// Volumetric elements: bricks, tets
    Brick,
    /// Contact interface elements
    Contact,
    /// Fiber-discretized cross sections
    FiberSection,
    /// Design-sensitivity parameters
    Sensitivity,
}

impl Family {
    /// Group name under the `Responses` store root. Part of the on-disk
    /// contract; never rename.
    pub fn group_name(&self) -> &'static str {
        match self {
            Family::Node => "Nodal",
            Family::Frame => "Frame",
            Family::Shell => "Shell",
            Family::Plane => "Plane",
            Family::Brick => "Brick",
            Family::Contact => "Contact",
            Family::FiberSection => "FiberSection",
            Family::Sensitivity => "Sensitivity",
        }
    }

    /// Name of the entity-tag coordinate axis. Also on-disk contract.
    pub fn tag_axis(&self) -> &'static str {
        match self {
            Family::Node => "nodeTags",
            Family::Sensitivity => "paramTags",
            _ => "eleTags",
        }
    }

    /// Parse a stored group name back to a family
    pub fn from_group_name(name: &str) -> Option<Family> {
        match name {
            "Nodal" => Some(Family::Node),
            "Frame" => Some(Family::Frame),
            "Shell" => Some(Family::Shell),
            "Plane" => Some(Family::Plane),
            "Brick" => Some(Family::Brick),
            "Contact" => Some(Family::Contact),
            "FiberSection" => Some(Family::FiberSection),
            "Sensitivity" => Some(Family::Sensitivity),
            _ => None,
        }
    }
}

/// Physical quantity of a channel, used to apply unit factors on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    Force,
    Moment,
    Disp,
    Vel,
    Accel,
    AngularVel,
    AngularAccel,
    Stress,
    /// Dimensionless or not covered by the unit-factor map
    Unitless,
}

impl Quantity {
    /// Stable string key used in store attributes and unit-factor maps
    pub fn key(&self) -> &'static str {
        match self {
            Quantity::Force => "force",
            Quantity::Moment => "moment",
            Quantity::Disp => "disp",
            Quantity::Vel => "vel",
            Quantity::Accel => "accel",
            Quantity::AngularVel => "angular_vel",
            Quantity::AngularAccel => "angular_accel",
            Quantity::Stress => "stress",
            Quantity::Unitless => "-",
        }
    }

    /// Parse a stored key; unknown keys read back as Unitless
    pub fn from_key(key: &str) -> Quantity {
        match key {
            "force" => Quantity::Force,
            "moment" => Quantity::Moment,
            "disp" => Quantity::Disp,
            "vel" => Quantity::Vel,
            "accel" => Quantity::Accel,
            "angular_vel" => Quantity::AngularVel,
            "angular_accel" => Quantity::AngularAccel,
            "stress" => Quantity::Stress,
            _ => Quantity::Unitless,
        }
    }
}

/// One entry of a reshape rule table: a native vector of `native_len` values
/// (observed in `ndim`-dimensional models, or any dimension when `None`)
/// scatters into the canonical slots listed in `slots`, in order.
#[derive(Debug, Clone, Copy)]
pub struct ReshapeRule {
    pub ndim: Option<usize>,
    pub native_len: usize,
    pub slots: &'static [usize],
}

/// A canonical field layout: ordered named channels plus the reshape rules
/// that map native engine vectors onto them.
#[derive(Debug)]
pub struct FieldLayout {
    pub channels: &'static [&'static str],
    pub quantities: &'static [Quantity],
    pub rules: &'static [ReshapeRule],
}

impl FieldLayout {
    /// Canonical channel count
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if the layout has no channels (never the case for shipped layouts)
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Canonical-length zero vector, the stand-in for a missing measurement
    pub fn zero_sample(&self) -> Vec<f64> {
        vec![0.0; self.len()]
    }

    /// Index of a channel by name
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| *c == name)
    }

    /// Normalize a native vector to the canonical layout.
    ///
    /// Rule lookup prefers an entry matching both the spatial dimension and
    /// the native length, then a dimension-agnostic entry for that length.
    /// A native vector already at canonical length passes through unchanged.
    /// Unknown lengths copy into the leading slots (never truncating the
    /// canonical storage) so that no value silently changes channel.
    pub fn reshape(&self, native: &[f64], ndim: usize) -> Vec<f64> {
        let mut out = self.zero_sample();
        if native.is_empty() {
            return out;
        }
        let rule = self
            .rules
            .iter()
            .find(|r| r.ndim == Some(ndim) && r.native_len == native.len())
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.ndim.is_none() && r.native_len == native.len())
            });
        match rule {
            Some(rule) => {
                for (value, &slot) in native.iter().zip(rule.slots.iter()) {
                    out[slot] = *value;
                }
            }
            None if native.len() == self.len() => {
                out.copy_from_slice(native);
            }
            None => {
                log::debug!(
                    "no reshape rule for native length {} (ndim {}); keeping leading {} channels",
                    native.len(),
                    ndim,
                    self.len().min(native.len())
                );
                let n = self.len().min(native.len());
                out[..n].copy_from_slice(&native[..n]);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Nodal kinematics [UX, UY, UZ, RX, RY, RZ]
//
// A 3-value vector is ambiguous: in 2-D it is [UX, UY, RZ], in 3-D it is the
// three translations. The spatial dimension disambiguates.
// ---------------------------------------------------------------------------

const NODAL_CHANNELS: &[&str] = &["UX", "UY", "UZ", "RX", "RY", "RZ"];

const NODAL_RULES: &[ReshapeRule] = &[
    ReshapeRule { ndim: None, native_len: 1, slots: &[0] },
    ReshapeRule { ndim: None, native_len: 2, slots: &[0, 1] },
    ReshapeRule { ndim: Some(2), native_len: 3, slots: &[0, 1, 5] },
    ReshapeRule { ndim: Some(3), native_len: 3, slots: &[0, 1, 2] },
    ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
];

/// Nodal displacement
pub static NODAL_DISP: FieldLayout = FieldLayout {
    channels: NODAL_CHANNELS,
    quantities: &[
        Quantity::Disp,
        Quantity::Disp,
        Quantity::Disp,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
    ],
    rules: NODAL_RULES,
};

/// Nodal velocity
pub static NODAL_VEL: FieldLayout = FieldLayout {
    channels: NODAL_CHANNELS,
    quantities: &[
        Quantity::Vel,
        Quantity::Vel,
        Quantity::Vel,
        Quantity::AngularVel,
        Quantity::AngularVel,
        Quantity::AngularVel,
    ],
    rules: NODAL_RULES,
};

/// Nodal acceleration
pub static NODAL_ACCEL: FieldLayout = FieldLayout {
    channels: NODAL_CHANNELS,
    quantities: &[
        Quantity::Accel,
        Quantity::Accel,
        Quantity::Accel,
        Quantity::AngularAccel,
        Quantity::AngularAccel,
        Quantity::AngularAccel,
    ],
    rules: NODAL_RULES,
};

/// Nodal reaction [FX, FY, FZ, MX, MY, MZ]
pub static NODAL_REACTION: FieldLayout = FieldLayout {
    channels: &["FX", "FY", "FZ", "MX", "MY", "MZ"],
    quantities: &[
        Quantity::Force,
        Quantity::Force,
        Quantity::Force,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
    ],
    rules: NODAL_RULES,
};

// ---------------------------------------------------------------------------
// Frame (line element) forces
// ---------------------------------------------------------------------------

/// Basic (natural) beam forces [N, MZ1, MZ2, MY1, MY2, T].
/// A 2-D beam reports only [N, MZ1, MZ2].
pub static FRAME_BASIC_FORCES: FieldLayout = FieldLayout {
    channels: &["N", "MZ1", "MZ2", "MY1", "MY2", "T"],
    quantities: &[
        Quantity::Force,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
    ],
    rules: &[
        ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 2] },
        ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
    ],
};

/// Local end forces [FX, FY, FZ, MX, MY, MZ] at each end (I then J).
/// A 2-D element reports [FX1, FY1, MZ1, FX2, FY2, MZ2].
pub static FRAME_LOCAL_FORCES: FieldLayout = FieldLayout {
    channels: &[
        "FX1", "FY1", "FZ1", "MX1", "MY1", "MZ1", "FX2", "FY2", "FZ2", "MX2", "MY2", "MZ2",
    ],
    quantities: &[
        Quantity::Force,
        Quantity::Force,
        Quantity::Force,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Force,
        Quantity::Force,
        Quantity::Force,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
    ],
    rules: &[
        ReshapeRule { ndim: Some(2), native_len: 6, slots: &[0, 1, 5, 6, 7, 11] },
        ReshapeRule {
            ndim: None,
            native_len: 12,
            slots: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        },
    ],
};

/// Section forces [N, MZ, VY, MY, VZ, T] at an integration point.
/// Native lengths: 2 = [N, MZ]; 3 adds shear VY; 4 = [N, MZ, MY, T]
/// (3-D without shear); 6 = full.
pub static SECTION_FORCES: FieldLayout = FieldLayout {
    channels: &["N", "MZ", "VY", "MY", "VZ", "T"],
    quantities: &[
        Quantity::Force,
        Quantity::Moment,
        Quantity::Force,
        Quantity::Moment,
        Quantity::Force,
        Quantity::Moment,
    ],
    rules: &[
        ReshapeRule { ndim: None, native_len: 2, slots: &[0, 1] },
        ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 2] },
        ReshapeRule { ndim: None, native_len: 4, slots: &[0, 1, 3, 5] },
        ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
    ],
};

/// Section deformations, same channel ordering as the forces work-conjugates
pub static SECTION_DEFORMATIONS: FieldLayout = FieldLayout {
    channels: &["EPS", "KZ", "GY", "KY", "GZ", "THETA"],
    quantities: &[
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
    ],
    rules: &[
        ReshapeRule { ndim: None, native_len: 2, slots: &[0, 1] },
        ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 2] },
        ReshapeRule { ndim: None, native_len: 4, slots: &[0, 1, 3, 5] },
        ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
    ],
};

// ---------------------------------------------------------------------------
// Shell resultants per Gauss point
// ---------------------------------------------------------------------------

/// Membrane forces, bending moments and transverse shears
/// [FXX, FYY, FXY, MXX, MYY, MXY, VXZ, VYZ]. Membrane-only elements report 3
/// values, bending elements without shear report 6.
pub static SHELL_RESULTANTS: FieldLayout = FieldLayout {
    channels: &["FXX", "FYY", "FXY", "MXX", "MYY", "MXY", "VXZ", "VYZ"],
    quantities: &[
        Quantity::Force,
        Quantity::Force,
        Quantity::Force,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Moment,
        Quantity::Force,
        Quantity::Force,
    ],
    rules: &[
        ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 2] },
        ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
        ReshapeRule {
            ndim: None,
            native_len: 8,
            slots: &[0, 1, 2, 3, 4, 5, 6, 7],
        },
    ],
};

// ---------------------------------------------------------------------------
// Solid stress/strain tensors [XX, YY, ZZ, XY, YZ, ZX]
//
// Plane elements report the in-plane triple [XX, YY, XY]; with the
// out-of-plane normal (plane strain) they report four values.
// ---------------------------------------------------------------------------

const TENSOR_RULES: &[ReshapeRule] = &[
    ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 3] },
    ReshapeRule { ndim: None, native_len: 4, slots: &[0, 1, 2, 3] },
    ReshapeRule { ndim: None, native_len: 6, slots: &[0, 1, 2, 3, 4, 5] },
];

/// Cauchy stress tensor
pub static SOLID_STRESS: FieldLayout = FieldLayout {
    channels: &["SXX", "SYY", "SZZ", "SXY", "SYZ", "SZX"],
    quantities: &[
        Quantity::Stress,
        Quantity::Stress,
        Quantity::Stress,
        Quantity::Stress,
        Quantity::Stress,
        Quantity::Stress,
    ],
    rules: TENSOR_RULES,
};

/// Engineering strain tensor
pub static SOLID_STRAIN: FieldLayout = FieldLayout {
    channels: &["EXX", "EYY", "EZZ", "EXY", "EYZ", "EZX"],
    quantities: &[
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
    ],
    rules: TENSOR_RULES,
};

// ---------------------------------------------------------------------------
// Contact interfaces [normal, tangential 1, tangential 2]
// ---------------------------------------------------------------------------

const CONTACT_RULES: &[ReshapeRule] = &[
    ReshapeRule { ndim: None, native_len: 1, slots: &[0] },
    ReshapeRule { ndim: None, native_len: 2, slots: &[0, 1] },
    ReshapeRule { ndim: None, native_len: 3, slots: &[0, 1, 2] },
];

/// Contact forces
pub static CONTACT_FORCES: FieldLayout = FieldLayout {
    channels: &["N", "T1", "T2"],
    quantities: &[Quantity::Force, Quantity::Force, Quantity::Force],
    rules: CONTACT_RULES,
};

/// Contact gap/slip
pub static CONTACT_SLIP: FieldLayout = FieldLayout {
    channels: &["UN", "UT1", "UT2"],
    quantities: &[Quantity::Disp, Quantity::Disp, Quantity::Disp],
    rules: CONTACT_RULES,
};

// ---------------------------------------------------------------------------
// Fiber sections and sensitivity
// ---------------------------------------------------------------------------

/// Per-fiber record: position in the section plane, tributary area, and the
/// uniaxial stress/strain pair for the current step
pub static FIBER_CHANNELS: FieldLayout = FieldLayout {
    channels: &["Y", "Z", "AREA", "SIG", "EPS"],
    quantities: &[
        Quantity::Disp,
        Quantity::Disp,
        Quantity::Unitless,
        Quantity::Stress,
        Quantity::Unitless,
    ],
    rules: &[ReshapeRule {
        ndim: None,
        native_len: 5,
        slots: &[0, 1, 2, 3, 4],
    }],
};

/// Sensitivity of nodal kinematics with respect to one parameter
pub static SENS_DISP: FieldLayout = FieldLayout {
    channels: NODAL_CHANNELS,
    quantities: &[
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
        Quantity::Unitless,
    ],
    rules: NODAL_RULES,
};

/// Sensitivity of the load factor with respect to one parameter
pub static SENS_LAMBDA: FieldLayout = FieldLayout {
    channels: &["LAMBDA"],
    quantities: &[Quantity::Unitless],
    rules: &[ReshapeRule { ndim: None, native_len: 1, slots: &[0] }],
};
