//! Stream commands combining gates with operands and controls.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;
use crate::registry;

/// The kind of command in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    /// A quantum gate application.
    Gate(StandardGate),
    /// Qubit allocation (classical instruction).
    Allocate,
    /// Qubit deallocation (fast-forwarding).
    Deallocate,
    /// Measurement (fast-forwarding).
    Measure,
    /// End-of-stream marker (global fast-forwarding). Buffering stages must
    /// drain everything and forward the flush itself.
    Flush,
    /// Barrier (synchronization point). Blocks every rewrite across it.
    Barrier,
}

/// One gate application in the stream: a gate kind together with its
/// ordered operand qubits and its control set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The kind of command.
    pub kind: CommandKind,
    /// Ordered operand qubits.
    pub qubits: Vec<QubitId>,
    /// Control qubits, kept sorted (set semantics).
    pub controls: Vec<QubitId>,
}

impl Command {
    /// Create an uncontrolled gate command.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::controlled(gate, qubits, [])
    }

    /// Create a controlled gate command.
    pub fn controlled(
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        let mut controls: Vec<QubitId> = controls.into_iter().collect();
        controls.sort_unstable();
        Self {
            kind: CommandKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            controls,
        }
    }

    /// Create a CNOT command (controlled Pauli-X).
    pub fn cnot(control: QubitId, target: QubitId) -> Self {
        Self::controlled(StandardGate::X, [target], [control])
    }

    /// Create an allocation command.
    pub fn allocate(qubit: QubitId) -> Self {
        Self {
            kind: CommandKind::Allocate,
            qubits: vec![qubit],
            controls: vec![],
        }
    }

    /// Create a deallocation command.
    pub fn deallocate(qubit: QubitId) -> Self {
        Self {
            kind: CommandKind::Deallocate,
            qubits: vec![qubit],
            controls: vec![],
        }
    }

    /// Create a measurement command.
    pub fn measure(qubit: QubitId) -> Self {
        Self {
            kind: CommandKind::Measure,
            qubits: vec![qubit],
            controls: vec![],
        }
    }

    /// Create a flush command. Flush has an empty footprint: it addresses
    /// the stream, not a qubit.
    pub fn flush() -> Self {
        Self {
            kind: CommandKind::Flush,
            qubits: vec![],
            controls: vec![],
        }
    }

    /// Create a barrier command.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: CommandKind::Barrier,
            qubits: qubits.into_iter().collect(),
            controls: vec![],
        }
    }

    /// Get the name of this command.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            CommandKind::Gate(g) => g.name(),
            CommandKind::Allocate => "allocate",
            CommandKind::Deallocate => "deallocate",
            CommandKind::Measure => "measure",
            CommandKind::Flush => "flush",
            CommandKind::Barrier => "barrier",
        }
    }

    /// Get the gate if this is a gate command.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            CommandKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Check if this is a gate command.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, CommandKind::Gate(_))
    }

    /// Check if this command forces the drain of its qubits' pipelines.
    pub fn is_fast_forwarding(&self) -> bool {
        matches!(
            self.kind,
            CommandKind::Deallocate | CommandKind::Measure | CommandKind::Flush
        )
    }

    /// Check if this is a classical bookkeeping instruction.
    pub fn is_classical(&self) -> bool {
        matches!(self.kind, CommandKind::Allocate)
    }

    /// Iterate over the footprint: operand qubits followed by controls.
    pub fn footprint(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().chain(self.controls.iter()).copied()
    }

    /// Check whether this command touches `qubit` (as operand or control).
    pub fn touches(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit) || self.controls.contains(&qubit)
    }

    /// Check whether `qubit` is a control of this command.
    pub fn is_control(&self, qubit: QubitId) -> bool {
        self.controls.contains(&qubit)
    }

    /// The lead qubit: the first listed operand. Rewrites anchor their
    /// pipeline search here, and template pivots bind to it.
    pub fn lead_qubit(&self) -> Option<QubitId> {
        self.qubits.first().copied()
    }

    /// Validate structural well-formedness: operand arity, non-empty
    /// footprint, no qubit appearing twice.
    pub fn validate(&self) -> IrResult<()> {
        match &self.kind {
            CommandKind::Gate(g) => {
                let got = u32::try_from(self.qubits.len()).unwrap_or(u32::MAX);
                if got != g.num_operands() {
                    return Err(IrError::OperandCountMismatch {
                        gate_name: g.name().to_string(),
                        expected: g.num_operands(),
                        got,
                    });
                }
            }
            CommandKind::Allocate | CommandKind::Deallocate | CommandKind::Measure => {
                if self.qubits.len() != 1 || !self.controls.is_empty() {
                    return Err(IrError::OperandCountMismatch {
                        gate_name: self.name().to_string(),
                        expected: 1,
                        got: u32::try_from(self.qubits.len()).unwrap_or(u32::MAX),
                    });
                }
            }
            CommandKind::Flush | CommandKind::Barrier => {}
        }
        if self.qubits.is_empty() && !matches!(self.kind, CommandKind::Flush) {
            return Err(IrError::EmptyOperands(self.name().to_string()));
        }
        let mut seen: Vec<QubitId> = Vec::with_capacity(self.qubits.len() + self.controls.len());
        for q in self.footprint() {
            if seen.contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: self.name().to_string(),
                });
            }
            seen.push(q);
        }
        Ok(())
    }

    /// Check whether two commands occupy the same slot: identical control
    /// sets and identical operand tuples up to the gate's interchangeable
    /// operand positions. Only in this configuration may a pair cancel or
    /// merge.
    pub fn same_slot(&self, other: &Command) -> bool {
        if self.controls != other.controls {
            return false;
        }
        self.operands_equivalent(other)
    }

    /// Operand-tuple equality up to symmetric positions.
    fn operands_equivalent(&self, other: &Command) -> bool {
        if self.qubits.len() != other.qubits.len() {
            return false;
        }
        let groups = match (&self.kind, &other.kind) {
            (CommandKind::Gate(a), CommandKind::Gate(b)) if a.tag() == b.tag() => {
                registry::meta(a.tag()).symmetric_groups
            }
            _ => &[][..],
        };
        let mut lhs = self.qubits.clone();
        let mut rhs = other.qubits.clone();
        for group in groups {
            canonicalize_group(&mut lhs, group);
            canonicalize_group(&mut rhs, group);
        }
        lhs == rhs
    }
}

/// Sort the qubits sitting at interchangeable positions so positional
/// comparison ignores their order.
fn canonicalize_group(qubits: &mut [QubitId], group: &[usize]) {
    let mut values: Vec<QubitId> = group.iter().map(|&i| qubits[i]).collect();
    values.sort_unstable();
    for (&i, &value) in group.iter().zip(values.iter()) {
        qubits[i] = value;
    }
}
