//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur when constructing or validating commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of operand qubits.
    #[error("Gate '{gate_name}' requires {expected} operand qubits, got {got}")]
    OperandCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of operands.
        expected: u32,
        /// Actual number of operands provided.
        got: u32,
    },

    /// The same qubit appears twice in a command's footprint.
    #[error("Duplicate qubit {qubit} in command '{gate_name}'")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Name of the offending command.
        gate_name: String,
    },

    /// A command that must name at least one operand qubit names none.
    #[error("Command '{0}' has an empty operand set")]
    EmptyOperands(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
