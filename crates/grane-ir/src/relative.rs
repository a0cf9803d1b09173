//! Relative commands and the commutation-template matcher.
//!
//! A template is an ordered pattern of commands whose qubits are
//! placeholders rather than concrete ids. Placeholder 0 is the pivot (the
//! qubit the anchoring outer gate acts on); the rest are solved during the
//! match. A matched window is treated as a block that commutes with the
//! anchor, without the stored pipeline ever being reordered.

use rustc_hash::FxHashMap;

use crate::command::Command;
use crate::gate::GateTag;
use crate::qubit::QubitId;
use crate::registry::EPSILON;

/// Angle constraint carried by a template entry.
///
/// `Any` is the wildcard: the entry matches a gate of its kind regardless of
/// parameter. `Exact` pins the angle. Which one a template uses is declared
/// explicitly per entry, never inferred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnglePattern {
    /// Match any angle (and unparameterized gates).
    Any,
    /// Match only this angle, within tolerance.
    Exact(f64),
}

impl AnglePattern {
    fn matches(&self, angle: Option<f64>) -> bool {
        match self {
            AnglePattern::Any => true,
            AnglePattern::Exact(want) => match angle {
                Some(got) => (got - want).abs() < EPSILON,
                None => false,
            },
        }
    }
}

/// One entry of a commutation template, with placeholder qubit indices.
#[derive(Debug, Clone, Copy)]
pub struct RelativeCommand {
    /// The gate kind this entry matches.
    pub tag: GateTag,
    /// Angle constraint.
    pub angle: AnglePattern,
    /// Operand placeholders, positional.
    pub qubits: &'static [usize],
    /// Control placeholders.
    pub controls: &'static [usize],
}

/// An ordered commutation template.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// The pattern entries, oldest first.
    pub entries: &'static [RelativeCommand],
}

impl Template {
    /// Number of commands this template spans.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the template is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match this template against a contiguous window of commands, with
    /// placeholder 0 bound to `pivot`.
    ///
    /// Matching proceeds left to right, extending the assignment on first
    /// use of each placeholder and enforcing consistency afterwards. The
    /// window must have exactly the template's length.
    pub fn matches(&self, window: &[&Command], pivot: QubitId) -> bool {
        if window.len() != self.entries.len() {
            return false;
        }
        let mut assignment: FxHashMap<usize, QubitId> = FxHashMap::default();
        assignment.insert(0, pivot);

        for (entry, cmd) in self.entries.iter().zip(window.iter()) {
            let Some(gate) = cmd.as_gate() else {
                return false;
            };
            if gate.tag() != entry.tag || !entry.angle.matches(gate.angle()) {
                return false;
            }
            if cmd.qubits.len() != entry.qubits.len() || cmd.controls.len() != entry.controls.len()
            {
                return false;
            }
            for (&placeholder, &qubit) in entry.qubits.iter().zip(cmd.qubits.iter()) {
                if !bind(&mut assignment, placeholder, qubit) {
                    return false;
                }
            }
            for (&placeholder, &qubit) in entry.controls.iter().zip(cmd.controls.iter()) {
                if !bind(&mut assignment, placeholder, qubit) {
                    return false;
                }
            }
        }
        true
    }
}

/// Resolve a placeholder: bind on first use, check consistency afterwards.
fn bind(assignment: &mut FxHashMap<usize, QubitId>, placeholder: usize, qubit: QubitId) -> bool {
    match assignment.get(&placeholder) {
        Some(&bound) => bound == qubit,
        None => {
            assignment.insert(placeholder, qubit);
            true
        }
    }
}
