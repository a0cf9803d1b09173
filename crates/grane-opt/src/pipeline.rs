//! Per-qubit pipeline store with serial-based cross references.
//!
//! Every buffered command is stored exactly once, keyed by a monotonically
//! increasing serial. Each live qubit holds an ordered queue of the serials
//! touching it. Pipelines grow only at the tail and serials never repeat,
//! so every queue is strictly increasing — locating a command inside any
//! pipeline it appears in is a binary search, and removal costs
//! O(footprint · log m) instead of a scan over the whole buffer.

use std::collections::VecDeque;
use std::fmt;

use grane_ir::{Command, QubitId};
use rustc_hash::FxHashMap;

use crate::error::{OptimizeError, OptimizeResult};

/// Program-order serial of a buffered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Serial(u64);

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The pipeline store: shared command table plus per-qubit serial queues.
#[derive(Debug, Default)]
pub(crate) struct PipelineStore {
    commands: FxHashMap<Serial, Command>,
    pipelines: FxHashMap<QubitId, VecDeque<Serial>>,
    allocation_order: Vec<QubitId>,
    next_serial: u64,
}

impl PipelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new live qubit with an empty pipeline.
    ///
    /// Returns `false` if the qubit is already live.
    pub fn register(&mut self, qubit: QubitId) -> bool {
        if self.pipelines.contains_key(&qubit) {
            return false;
        }
        self.pipelines.insert(qubit, VecDeque::new());
        self.allocation_order.push(qubit);
        true
    }

    /// Retire a qubit. Its pipeline must already be drained.
    pub fn retire(&mut self, qubit: QubitId) -> OptimizeResult<()> {
        match self.pipelines.remove(&qubit) {
            Some(pipe) if pipe.is_empty() => {
                self.allocation_order.retain(|&q| q != qubit);
                Ok(())
            }
            Some(_) => Err(OptimizeError::CrossReference(format!(
                "retiring {qubit} with a non-empty pipeline"
            ))),
            None => Err(OptimizeError::CrossReference(format!(
                "retiring unregistered qubit {qubit}"
            ))),
        }
    }

    /// Check whether a qubit is live.
    pub fn is_live(&self, qubit: QubitId) -> bool {
        self.pipelines.contains_key(&qubit)
    }

    /// Append a command to the tail of every pipeline it touches.
    pub fn append(&mut self, cmd: Command) -> OptimizeResult<Serial> {
        let serial = Serial(self.next_serial);
        self.next_serial += 1;
        for qubit in cmd.footprint() {
            let pipe = self.pipelines.get_mut(&qubit).ok_or_else(|| {
                OptimizeError::CrossReference(format!("appending to missing pipeline of {qubit}"))
            })?;
            pipe.push_back(serial);
        }
        self.commands.insert(serial, cmd);
        Ok(serial)
    }

    /// Look up a buffered command.
    pub fn command(&self, serial: Serial) -> OptimizeResult<&Command> {
        self.commands.get(&serial).ok_or_else(|| {
            OptimizeError::CrossReference(format!("command {serial} missing from table"))
        })
    }

    /// Get the pipeline queue of a live qubit.
    pub fn pipeline(&self, qubit: QubitId) -> OptimizeResult<&VecDeque<Serial>> {
        self.pipelines.get(&qubit).ok_or_else(|| {
            OptimizeError::CrossReference(format!("no pipeline for qubit {qubit}"))
        })
    }

    /// The serial at `index` on a qubit's pipeline.
    pub fn serial_at(&self, qubit: QubitId, index: usize) -> OptimizeResult<Serial> {
        self.pipeline(qubit)?.get(index).copied().ok_or_else(|| {
            OptimizeError::CrossReference(format!("index {index} out of range on {qubit}"))
        })
    }

    /// The oldest buffered serial on a qubit's pipeline, if any.
    pub fn head(&self, qubit: QubitId) -> Option<Serial> {
        self.pipelines.get(&qubit).and_then(|p| p.front().copied())
    }

    /// Locate a serial inside a qubit's pipeline.
    ///
    /// Pipelines are strictly increasing in serial, so this is a binary
    /// search; a miss means the cross references are corrupt.
    pub fn position(&self, qubit: QubitId, serial: Serial) -> OptimizeResult<usize> {
        let pipe = self.pipeline(qubit)?;
        let idx = pipe.partition_point(|&s| s < serial);
        if pipe.get(idx) == Some(&serial) {
            Ok(idx)
        } else {
            Err(OptimizeError::CrossReference(format!(
                "command {serial} not found on pipeline of {qubit}"
            )))
        }
    }

    /// Remove a command from the table and from every pipeline it touches,
    /// preserving the relative order of the survivors.
    pub fn remove(&mut self, serial: Serial) -> OptimizeResult<Command> {
        let footprint: Vec<QubitId> = self.command(serial)?.footprint().collect();
        for qubit in footprint {
            let idx = self.position(qubit, serial)?;
            let pipe = self.pipelines.get_mut(&qubit).ok_or_else(|| {
                OptimizeError::CrossReference(format!("no pipeline for qubit {qubit}"))
            })?;
            pipe.remove(idx);
        }
        self.commands.remove(&serial).ok_or_else(|| {
            OptimizeError::CrossReference(format!("command {serial} missing from table"))
        })
    }

    /// Replace a buffered command in place, keeping its serial and thereby
    /// its position on every pipeline.
    ///
    /// Merges and cancels must preserve the footprint; a replacement
    /// touching different qubits is an invariant violation.
    pub fn replace(&mut self, serial: Serial, new: Command) -> OptimizeResult<()> {
        let old = self.command(serial)?;
        let mut old_footprint: Vec<QubitId> = old.footprint().collect();
        let mut new_footprint: Vec<QubitId> = new.footprint().collect();
        old_footprint.sort_unstable();
        new_footprint.sort_unstable();
        if old_footprint != new_footprint {
            return Err(OptimizeError::FootprintChanged(new.name().to_string()));
        }
        self.commands.insert(serial, new);
        Ok(())
    }

    /// Pop the head of a qubit's pipeline, checking it is the expected
    /// serial. The caller is responsible for the table entry.
    pub fn pop_expected(&mut self, qubit: QubitId, serial: Serial) -> OptimizeResult<()> {
        let pipe = self.pipelines.get_mut(&qubit).ok_or_else(|| {
            OptimizeError::CrossReference(format!("no pipeline for qubit {qubit}"))
        })?;
        match pipe.front() {
            Some(&head) if head == serial => {
                pipe.pop_front();
                Ok(())
            }
            other => Err(OptimizeError::CrossReference(format!(
                "expected {serial} at head of {qubit}, found {other:?}"
            ))),
        }
    }

    /// Drop a command from the table once it has left every pipeline.
    pub fn discard(&mut self, serial: Serial) -> OptimizeResult<Command> {
        self.commands.remove(&serial).ok_or_else(|| {
            OptimizeError::CrossReference(format!("command {serial} missing from table"))
        })
    }

    /// The globally smallest buffered head, with the qubit holding it.
    pub fn min_head(&self) -> Option<(Serial, QubitId)> {
        self.pipelines
            .iter()
            .filter_map(|(&q, pipe)| pipe.front().map(|&s| (s, q)))
            .min()
    }

    /// The smallest head among pipelines holding at least `bound` commands.
    pub fn min_full_head(&self, bound: usize) -> Option<(Serial, QubitId)> {
        self.pipelines
            .iter()
            .filter(|(_, pipe)| pipe.len() >= bound)
            .filter_map(|(&q, pipe)| pipe.front().map(|&s| (s, q)))
            .min()
    }

    /// Total number of buffered commands.
    pub fn buffered(&self) -> usize {
        self.commands.len()
    }

    /// Live qubits in allocation order.
    pub fn live_qubits(&self) -> Vec<QubitId> {
        self.allocation_order.clone()
    }
}
