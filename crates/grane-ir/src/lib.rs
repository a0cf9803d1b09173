//! Grane gate-stream data model
//!
//! This crate provides the data structures shared by the Grane pipeline
//! stages: qubit identities, the command model for gate applications, and
//! the static gate-kind registry carrying the algebraic relations
//! (self-inverse, merge, commute) that the optimizer consumes.
//!
//! # Overview
//!
//! Grane stages process an ordered stream of [`Command`] values, each one a
//! gate application with its operand qubits and control set. Gate matrices
//! are deliberately absent from this model: every stage reasons about gates
//! through the relations declared in [`registry`], never through their
//! linear-algebra semantics.
//!
//! # Core components
//!
//! - **Qubits**: [`QubitId`] opaque identities, created and retired by the
//!   allocate/deallocate commands in the stream
//! - **Gates**: [`StandardGate`] gate values and [`GateTag`] kind
//!   discriminants
//! - **Commands**: [`Command`] combining a gate (or a meta instruction such
//!   as allocate, measure, or flush) with its operands and controls
//! - **Registry**: per-kind metadata records and the pairwise predicates
//!   [`registry::is_inverse`], [`registry::merge`], and
//!   [`registry::commutes_point`]
//! - **Templates**: [`Template`] commutation patterns over [`RelativeCommand`]
//!   placeholder entries, matched against concrete command windows
//!
//! # Example
//!
//! ```rust
//! use grane_ir::{Command, QubitId, StandardGate, registry};
//!
//! let a = Command::gate(StandardGate::Rz(0.1), [QubitId(0)]);
//! let b = Command::gate(StandardGate::Rz(0.4), [QubitId(0)]);
//!
//! // Same axis, same slot: the pair merges by angle addition.
//! assert!(registry::merge(&a, &b).is_some());
//! ```

pub mod command;
pub mod error;
pub mod gate;
pub mod qubit;
pub mod registry;
pub mod relative;

pub use command::{Command, CommandKind};
pub use error::{IrError, IrResult};
pub use gate::{GateTag, StandardGate};
pub use qubit::QubitId;
pub use registry::{AxisKey, GateMeta, Merge, PhaseKey};
pub use relative::{AnglePattern, RelativeCommand, Template};
