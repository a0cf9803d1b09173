//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known algebraic relations.
///
/// This is the gate set the optimizer reasons about. Matrix semantics are
/// never consulted; the algebra (self-inverse, merge, commute) comes from
/// the metadata tables in [`crate::registry`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit self-inverse gates
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit phase-like Cliffords
    /// S gate (sqrt(Z)).
    S,
    /// T gate (fourth root of Z).
    T,
    /// sqrt(X) gate.
    SqrtX,

    // Two-qubit gates
    /// SWAP gate.
    Swap,

    // Rotation family (half-angle convention, period 4π)
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Two-qubit XX rotation.
    Rxx(f64),
    /// Two-qubit YY rotation.
    Ryy(f64),
    /// Two-qubit ZZ rotation.
    Rzz(f64),

    // Phase family (period 2π)
    /// Global phase gate.
    Ph(f64),
    /// Phase-shift gate (Rz up to a global phase).
    R(f64),
}

/// Discriminant of a [`StandardGate`], without parameters.
///
/// Tags are the keys of the metadata registry: commutation sets and
/// templates refer to gate kinds by tag rather than by value, which keeps
/// the (cyclic) relation graph in flat static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateTag {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// S gate.
    S,
    /// T gate.
    T,
    /// sqrt(X).
    SqrtX,
    /// SWAP.
    Swap,
    /// X rotation.
    Rx,
    /// Y rotation.
    Ry,
    /// Z rotation.
    Rz,
    /// XX rotation.
    Rxx,
    /// YY rotation.
    Ryy,
    /// ZZ rotation.
    Rzz,
    /// Global phase.
    Ph,
    /// Phase shift.
    R,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::T => "t",
            StandardGate::SqrtX => "sx",
            StandardGate::Swap => "swap",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::Rxx(_) => "rxx",
            StandardGate::Ryy(_) => "ryy",
            StandardGate::Rzz(_) => "rzz",
            StandardGate::Ph(_) => "ph",
            StandardGate::R(_) => "r",
        }
    }

    /// Get the tag (kind discriminant) of this gate.
    #[inline]
    pub fn tag(&self) -> GateTag {
        match self {
            StandardGate::H => GateTag::H,
            StandardGate::X => GateTag::X,
            StandardGate::Y => GateTag::Y,
            StandardGate::Z => GateTag::Z,
            StandardGate::S => GateTag::S,
            StandardGate::T => GateTag::T,
            StandardGate::SqrtX => GateTag::SqrtX,
            StandardGate::Swap => GateTag::Swap,
            StandardGate::Rx(_) => GateTag::Rx,
            StandardGate::Ry(_) => GateTag::Ry,
            StandardGate::Rz(_) => GateTag::Rz,
            StandardGate::Rxx(_) => GateTag::Rxx,
            StandardGate::Ryy(_) => GateTag::Ryy,
            StandardGate::Rzz(_) => GateTag::Rzz,
            StandardGate::Ph(_) => GateTag::Ph,
            StandardGate::R(_) => GateTag::R,
        }
    }

    /// Get the number of operand qubits this gate acts on (controls excluded).
    #[inline]
    pub fn num_operands(&self) -> u32 {
        match self {
            StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::T
            | StandardGate::SqrtX
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::Ph(_)
            | StandardGate::R(_) => 1,

            StandardGate::Swap
            | StandardGate::Rxx(_)
            | StandardGate::Ryy(_)
            | StandardGate::Rzz(_) => 2,
        }
    }

    /// Get the angle of this gate, if it is parameterized.
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(a)
            | StandardGate::Ry(a)
            | StandardGate::Rz(a)
            | StandardGate::Rxx(a)
            | StandardGate::Ryy(a)
            | StandardGate::Rzz(a)
            | StandardGate::Ph(a)
            | StandardGate::R(a) => Some(*a),

            _ => None,
        }
    }

    /// Rebuild this gate with a different angle.
    ///
    /// Returns `None` for unparameterized gates.
    pub fn with_angle(&self, angle: f64) -> Option<StandardGate> {
        match self {
            StandardGate::Rx(_) => Some(StandardGate::Rx(angle)),
            StandardGate::Ry(_) => Some(StandardGate::Ry(angle)),
            StandardGate::Rz(_) => Some(StandardGate::Rz(angle)),
            StandardGate::Rxx(_) => Some(StandardGate::Rxx(angle)),
            StandardGate::Ryy(_) => Some(StandardGate::Ryy(angle)),
            StandardGate::Rzz(_) => Some(StandardGate::Rzz(angle)),
            StandardGate::Ph(_) => Some(StandardGate::Ph(angle)),
            StandardGate::R(_) => Some(StandardGate::R(angle)),
            _ => None,
        }
    }
}
