//! Gate-kind metadata and pairwise gate algebra.
//!
//! All algebraic relations the optimizer consumes are declared here, once,
//! in immutable tables keyed by [`GateTag`]: self-inverse flags, the
//! axis/phase keys that decide which gates merge, the pointwise commutation
//! sets, operand symmetry, and the commutation templates. The commuting-set
//! graph is cyclic, which is why relations are expressed as tags into a
//! flat table rather than references between gate values.

use std::f64::consts::PI;

use crate::command::{Command, CommandKind};
use crate::gate::{GateTag, StandardGate};
use crate::relative::{AnglePattern, RelativeCommand, Template};

/// Tolerance for angle comparisons.
pub const EPSILON: f64 = 1e-10;

/// Angle period of the rotation family (half-angle convention).
pub const ROTATION_PERIOD: f64 = 4.0 * PI;

/// Angle period of the phase family.
pub const PHASE_PERIOD: f64 = 2.0 * PI;

/// Key shared by rotation gates that merge by angle addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKey {
    /// Single-qubit X rotations.
    X,
    /// Single-qubit Y rotations.
    Y,
    /// Single-qubit Z rotations.
    Z,
    /// Two-qubit XX rotations.
    Xx,
    /// Two-qubit YY rotations.
    Yy,
    /// Two-qubit ZZ rotations.
    Zz,
}

/// Key shared by phase-style gates that merge by angle addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKey {
    /// Global phase (Ph).
    Global,
    /// Phase shift (R).
    Shift,
}

/// Static metadata record for one gate kind.
#[derive(Debug)]
pub struct GateMeta {
    /// The gate kind this record describes.
    pub tag: GateTag,
    /// Applying the gate twice on the same slot is the identity.
    pub self_inverse: bool,
    /// Rotation-axis key, if the gate merges as a rotation.
    pub axis: Option<AxisKey>,
    /// Phase-family key, if the gate merges as a phase.
    pub phase: Option<PhaseKey>,
    /// Gate kinds this kind commutes with pointwise. Consulted in both
    /// directions, so the table need not be symmetric.
    pub commutes_with: &'static [GateTag],
    /// Groups of operand positions that may be permuted freely.
    pub symmetric_groups: &'static [&'static [usize]],
}

/// Operand symmetry of the symmetric two-qubit gates.
const PAIR: &[&[usize]] = &[&[0, 1]];

/// The registry: one record per gate kind, indexed by tag discriminant.
static GATE_TABLE: [GateMeta; 16] = [
    GateMeta {
        tag: GateTag::H,
        self_inverse: true,
        axis: None,
        phase: None,
        commutes_with: &[],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::X,
        self_inverse: true,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::Rx, GateTag::Rxx, GateTag::Ph, GateTag::SqrtX],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Y,
        self_inverse: true,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::Ry, GateTag::Ryy, GateTag::Ph],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Z,
        self_inverse: true,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::Rz, GateTag::Rzz, GateTag::Ph, GateTag::R],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::S,
        self_inverse: false,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::Rz, GateTag::Rzz, GateTag::Ph, GateTag::R],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::T,
        self_inverse: false,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::Rz, GateTag::Rzz, GateTag::Ph, GateTag::R],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::SqrtX,
        self_inverse: false,
        axis: None,
        phase: None,
        commutes_with: &[GateTag::X, GateTag::Rx, GateTag::Rxx, GateTag::Ph],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Swap,
        self_inverse: true,
        axis: None,
        phase: None,
        commutes_with: &[],
        symmetric_groups: PAIR,
    },
    GateMeta {
        tag: GateTag::Rx,
        self_inverse: false,
        axis: Some(AxisKey::X),
        phase: None,
        commutes_with: &[GateTag::X, GateTag::Rxx, GateTag::Ph, GateTag::SqrtX],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Ry,
        self_inverse: false,
        axis: Some(AxisKey::Y),
        phase: None,
        commutes_with: &[GateTag::Y, GateTag::Ryy, GateTag::Ph],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Rz,
        self_inverse: false,
        axis: Some(AxisKey::Z),
        phase: None,
        commutes_with: &[
            GateTag::Z,
            GateTag::Rzz,
            GateTag::Ph,
            GateTag::T,
            GateTag::S,
            GateTag::R,
        ],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::Rxx,
        self_inverse: false,
        axis: Some(AxisKey::Xx),
        phase: None,
        commutes_with: &[GateTag::X, GateTag::Rx, GateTag::Ph, GateTag::SqrtX],
        symmetric_groups: PAIR,
    },
    GateMeta {
        tag: GateTag::Ryy,
        self_inverse: false,
        axis: Some(AxisKey::Yy),
        phase: None,
        commutes_with: &[GateTag::Y, GateTag::Ry, GateTag::Ph],
        symmetric_groups: PAIR,
    },
    GateMeta {
        tag: GateTag::Rzz,
        self_inverse: false,
        axis: Some(AxisKey::Zz),
        phase: None,
        commutes_with: &[
            GateTag::Z,
            GateTag::Rz,
            GateTag::T,
            GateTag::S,
            GateTag::Ph,
            GateTag::R,
        ],
        symmetric_groups: PAIR,
    },
    GateMeta {
        tag: GateTag::Ph,
        self_inverse: false,
        axis: None,
        phase: Some(PhaseKey::Global),
        commutes_with: &[
            GateTag::X,
            GateTag::Y,
            GateTag::Z,
            GateTag::Rx,
            GateTag::Ry,
            GateTag::Rz,
            GateTag::Rxx,
            GateTag::Ryy,
            GateTag::Rzz,
            GateTag::SqrtX,
            GateTag::S,
            GateTag::T,
            GateTag::R,
        ],
        symmetric_groups: &[],
    },
    GateMeta {
        tag: GateTag::R,
        self_inverse: false,
        axis: None,
        phase: Some(PhaseKey::Shift),
        commutes_with: &[
            GateTag::Z,
            GateTag::Rz,
            GateTag::Rzz,
            GateTag::Ph,
            GateTag::S,
            GateTag::T,
        ],
        symmetric_groups: &[],
    },
];

/// Look up the metadata record for a gate kind.
#[inline]
pub fn meta(tag: GateTag) -> &'static GateMeta {
    let entry = &GATE_TABLE[tag_index(tag)];
    debug_assert_eq!(entry.tag, tag);
    entry
}

#[inline]
fn tag_index(tag: GateTag) -> usize {
    match tag {
        GateTag::H => 0,
        GateTag::X => 1,
        GateTag::Y => 2,
        GateTag::Z => 3,
        GateTag::S => 4,
        GateTag::T => 5,
        GateTag::SqrtX => 6,
        GateTag::Swap => 7,
        GateTag::Rx => 8,
        GateTag::Ry => 9,
        GateTag::Rz => 10,
        GateTag::Rxx => 11,
        GateTag::Ryy => 12,
        GateTag::Rzz => 13,
        GateTag::Ph => 14,
        GateTag::R => 15,
    }
}

/// Conjugation of a CNOT by Hadamards on its target: the block commutes
/// with an outer CNOT whose target is the pivot and whose control is the
/// middle CNOT's target.
static CNOT_CONJUGATION: [Template; 1] = [Template {
    entries: &[
        RelativeCommand {
            tag: GateTag::H,
            angle: AnglePattern::Any,
            qubits: &[0],
            controls: &[],
        },
        RelativeCommand {
            tag: GateTag::X,
            angle: AnglePattern::Any,
            qubits: &[2],
            controls: &[0],
        },
        RelativeCommand {
            tag: GateTag::H,
            angle: AnglePattern::Any,
            qubits: &[0],
            controls: &[],
        },
    ],
}];

/// H·CNOT·H with the CNOT targeting the pivot commutes with the
/// Z/phase-family gates on the pivot.
static PHASE_CONJUGATION: [Template; 1] = [Template {
    entries: &[
        RelativeCommand {
            tag: GateTag::H,
            angle: AnglePattern::Any,
            qubits: &[0],
            controls: &[],
        },
        RelativeCommand {
            tag: GateTag::X,
            angle: AnglePattern::Any,
            qubits: &[0],
            controls: &[1],
        },
        RelativeCommand {
            tag: GateTag::H,
            angle: AnglePattern::Any,
            qubits: &[0],
            controls: &[],
        },
    ],
}];

/// Commutation templates anchored on `tag` with the given control count.
pub fn templates_for(tag: GateTag, num_controls: usize) -> &'static [Template] {
    match (tag, num_controls) {
        (GateTag::X, 1) => &CNOT_CONJUGATION,
        (GateTag::Rz | GateTag::Ph | GateTag::R, 0) => &PHASE_CONJUGATION,
        _ => &[],
    }
}

/// Normalize an angle into `[0, period)`.
#[inline]
pub fn normalize_angle(angle: f64, period: f64) -> f64 {
    let a = angle % period;
    if a < 0.0 { a + period } else { a }
}

/// Check whether an angle is the identity for its family period.
#[inline]
pub fn is_zero_angle(angle: f64, period: f64) -> bool {
    let a = normalize_angle(angle, period);
    a < EPSILON || period - a < EPSILON
}

/// The merge period of a gate, if it belongs to a mergeable family.
fn period_of(gate: &StandardGate) -> Option<f64> {
    let m = meta(gate.tag());
    if m.axis.is_some() {
        Some(ROTATION_PERIOD)
    } else if m.phase.is_some() {
        Some(PHASE_PERIOD)
    } else {
        None
    }
}

/// The common merge period of two gates, if they share an axis or phase key.
fn shared_period(a: &StandardGate, b: &StandardGate) -> Option<f64> {
    let (ma, mb) = (meta(a.tag()), meta(b.tag()));
    if let (Some(x), Some(y)) = (ma.axis, mb.axis) {
        if x == y {
            return Some(ROTATION_PERIOD);
        }
    }
    if let (Some(x), Some(y)) = (ma.phase, mb.phase) {
        if x == y {
            return Some(PHASE_PERIOD);
        }
    }
    None
}

/// Check whether a command is the identity: a rotation- or phase-family
/// gate whose angle is 0 modulo its period.
pub fn is_identity(cmd: &Command) -> bool {
    match cmd.as_gate() {
        Some(gate) => match (period_of(gate), gate.angle()) {
            (Some(period), Some(angle)) => is_zero_angle(angle, period),
            _ => false,
        },
        None => false,
    }
}

/// Check whether applying `a` then `b` is the identity on the affected
/// qubits: either a self-inverse gate applied twice on the same slot, or
/// two same-family rotations/phases whose angles sum to 0 modulo the
/// family period. Control sets must match exactly.
pub fn is_inverse(a: &Command, b: &Command) -> bool {
    let (Some(ga), Some(gb)) = (a.as_gate(), b.as_gate()) else {
        return false;
    };
    if !a.same_slot(b) {
        return false;
    }
    if ga.tag() == gb.tag() && meta(ga.tag()).self_inverse {
        return true;
    }
    match (shared_period(ga, gb), ga.angle(), gb.angle()) {
        (Some(period), Some(x), Some(y)) => is_zero_angle(x + y, period),
        _ => false,
    }
}

/// Outcome of merging two commands into one.
#[derive(Debug, Clone, PartialEq)]
pub enum Merge {
    /// The pair composes to the identity; both commands disappear.
    Identity,
    /// The pair is replaced by a single command. Operand ordering of the
    /// earlier command is retained.
    Replacement(Command),
}

/// Try to merge `a` (earlier) and `b` (later) into a single command of the
/// same family with summed angle, reduced modulo the family period.
pub fn merge(a: &Command, b: &Command) -> Option<Merge> {
    let (ga, gb) = (a.as_gate()?, b.as_gate()?);
    if !a.same_slot(b) {
        return None;
    }
    let period = shared_period(ga, gb)?;
    let angle = normalize_angle(ga.angle()? + gb.angle()?, period);
    if is_zero_angle(angle, period) {
        return Some(Merge::Identity);
    }
    let gate = ga.with_angle(angle)?;
    Some(Merge::Replacement(Command {
        kind: CommandKind::Gate(gate),
        qubits: a.qubits.clone(),
        controls: a.controls.clone(),
    }))
}

/// Check whether two commands commute pointwise: the declared tag relation
/// holds in either direction, and every shared qubit plays the same role
/// (operand or control) in both commands. Classical, fast-forwarding, and
/// barrier commands never commute.
pub fn commutes_point(a: &Command, b: &Command) -> bool {
    let (Some(ga), Some(gb)) = (a.as_gate(), b.as_gate()) else {
        return false;
    };
    let related = meta(ga.tag()).commutes_with.contains(&gb.tag())
        || meta(gb.tag()).commutes_with.contains(&ga.tag());
    if !related {
        return false;
    }
    a.footprint()
        .filter(|&q| b.touches(q))
        .all(|q| a.is_control(q) == b.is_control(q))
}
