//! Grane local peephole optimizer
//!
//! This crate provides the stream-rewriting stage of the Grane pipeline:
//! a [`LocalOptimizer`] that sits between an upstream command producer and
//! a downstream backend stage, buffering a bounded window per qubit and
//! eliminating redundant work before emission.
//!
//! # Overview
//!
//! The optimizer exploits three algebraic facts about quantum gates, all
//! declared statically in [`grane_ir::registry`]:
//!
//! 1. Many gates are self-inverse and cancel when adjacent
//! 2. Rotations and phases on the same axis merge by adding angles
//! 3. Some gates commute — pointwise, or as a multi-gate template block —
//!    which lets a pair separated by such a block cancel or merge anyway
//!
//! ```text
//! upstream ──▶ ┌────────────────┐ ──▶ downstream sink
//!              │ LocalOptimizer │
//!              │  q0: ▷▷▷       │   per-qubit pipelines,
//!              │  q1: ▷▷        │   bounded by m
//!              └────────────────┘
//! ```
//!
//! Buffered prefixes are released on four triggers: a pipeline reaching
//! the buffer bound `m`, a fast-forwarding gate (measurement,
//! deallocation), a flush, and the end of a qubit's lifetime.
//!
//! # Example
//!
//! ```rust
//! use grane_ir::{Command, QubitId, StandardGate};
//! use grane_opt::{LocalOptimizer, RecordingSink};
//!
//! let mut opt = LocalOptimizer::new(8, RecordingSink::new()).unwrap();
//!
//! opt.receive(Command::allocate(QubitId(0))).unwrap();
//! opt.receive(Command::gate(StandardGate::H, [QubitId(0)])).unwrap();
//! opt.receive(Command::gate(StandardGate::H, [QubitId(0)])).unwrap();
//! opt.receive(Command::flush()).unwrap();
//!
//! // The H pair cancelled; only bookkeeping reached the sink.
//! assert!(opt.sink().gates().is_empty());
//! ```

pub mod error;
pub mod optimizer;
pub mod pipeline;
pub mod sink;

pub use error::{OptimizeError, OptimizeResult};
pub use optimizer::LocalOptimizer;
pub use pipeline::Serial;
pub use sink::{CommandSink, RecordingSink};
