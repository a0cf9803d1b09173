//! Error types for the optimizer crate.

use grane_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur in the optimizer.
///
/// The `CrossReference` and `FootprintChanged` variants are internal
/// invariant violations: they indicate a bug in the rewriter, not a
/// malformed input, and a caller should treat them as fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptimizeError {
    /// The per-qubit buffer bound must be at least 1.
    #[error("Pipeline buffer bound must be at least 1, got {0}")]
    BufferBound(usize),

    /// Structurally malformed command.
    #[error(transparent)]
    Malformed(#[from] IrError),

    /// A command names a qubit with no live allocation on this optimizer.
    #[error("Qubit {qubit} has no live allocation (command '{command}')")]
    UnknownQubit {
        /// The unknown qubit.
        qubit: QubitId,
        /// Name of the offending command.
        command: String,
    },

    /// Allocation of a qubit id that is already live.
    #[error("Qubit {0} is already allocated")]
    QubitAlreadyAllocated(QubitId),

    /// Cross-reference indices disagree with pipeline contents.
    #[error("Cross-reference corruption: {0}")]
    CrossReference(String),

    /// A rewrite attempted to change a command's footprint.
    #[error("Rewrite of '{0}' would change its qubit footprint")]
    FootprintChanged(String),
}

/// Result type for optimizer operations.
pub type OptimizeResult<T> = Result<T, OptimizeError>;
