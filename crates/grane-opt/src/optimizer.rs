//! The local peephole optimizer.
//!
//! `LocalOptimizer` buffers up to `m − 1` commands per qubit and rewrites
//! the buffered window as commands arrive: adjacent inverse pairs cancel,
//! same-family rotations and phases merge by angle addition, and a pair
//! separated by a commuting block — pointwise-commuting gates or a matched
//! commutation template — is rewritten as if adjacent. Buffered prefixes
//! are released downstream on four triggers: the buffer bound, a
//! fast-forwarding gate, a flush, and deallocation.
//!
//! Commutation reach never reorders the stored pipelines; only cancels and
//! merges mutate them, so emission order on every qubit equals program
//! order.

use grane_ir::{registry, Command, CommandKind, Merge, QubitId, Template};
use tracing::{debug, trace};

use crate::error::{OptimizeError, OptimizeResult};
use crate::pipeline::{PipelineStore, Serial};
use crate::sink::CommandSink;

/// A local peephole optimizer stage.
///
/// Single-threaded and cooperative: commands arrive in program order via
/// [`receive`](LocalOptimizer::receive), and completed prefixes are pushed
/// into the downstream sink. Holding buffered pipelines across calls is
/// normal; a flush releases everything.
pub struct LocalOptimizer<S> {
    store: PipelineStore,
    buffer_bound: usize,
    apply_commutation: bool,
    sink: S,
}

impl<S: CommandSink> LocalOptimizer<S> {
    /// Create an optimizer buffering up to `buffer_bound` commands per
    /// qubit, emitting into `sink`.
    ///
    /// A bound of 1 disables buffering entirely: every command is emitted
    /// on receive and no rewrite ever fires.
    pub fn new(buffer_bound: usize, sink: S) -> OptimizeResult<Self> {
        if buffer_bound == 0 {
            return Err(OptimizeError::BufferBound(buffer_bound));
        }
        Ok(Self {
            store: PipelineStore::new(),
            buffer_bound,
            apply_commutation: true,
            sink,
        })
    }

    /// Enable or disable commutation-based reach. When disabled, only the
    /// immediately adjacent predecessor is considered for rewrites and no
    /// template is consulted.
    #[must_use]
    pub fn with_commutation(mut self, enabled: bool) -> Self {
        self.apply_commutation = enabled;
        self
    }

    /// The configured per-qubit buffer bound.
    pub fn buffer_bound(&self) -> usize {
        self.buffer_bound
    }

    /// Number of commands currently buffered across all pipelines.
    pub fn buffered(&self) -> usize {
        self.store.buffered()
    }

    /// Borrow the downstream sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the optimizer and return the downstream sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Receive one command from the upstream stage.
    pub fn receive(&mut self, cmd: Command) -> OptimizeResult<()> {
        cmd.validate()?;
        match cmd.kind {
            CommandKind::Flush => self.flush(cmd),
            CommandKind::Allocate => self.allocate(cmd),
            _ => {
                self.check_live(&cmd)?;
                if cmd.is_fast_forwarding() {
                    self.fast_forward(cmd)
                } else {
                    self.buffer(cmd)
                }
            }
        }
    }

    /// Register a fresh qubit and buffer its allocation command.
    fn allocate(&mut self, cmd: Command) -> OptimizeResult<()> {
        let qubit = cmd.qubits[0];
        if !self.store.register(qubit) {
            return Err(OptimizeError::QubitAlreadyAllocated(qubit));
        }
        trace!(%qubit, "allocated");
        self.store.append(cmd)?;
        self.emit_ready()
    }

    /// Verify every footprint qubit has a live allocation.
    fn check_live(&self, cmd: &Command) -> OptimizeResult<()> {
        for qubit in cmd.footprint() {
            if !self.store.is_live(qubit) {
                return Err(OptimizeError::UnknownQubit {
                    qubit,
                    command: cmd.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Buffer an ordinary command and try to rewrite it against the
    /// pipeline of its lead qubit.
    fn buffer(&mut self, cmd: Command) -> OptimizeResult<()> {
        if registry::is_identity(&cmd) {
            debug!(gate = cmd.name(), "dropping identity gate");
            return Ok(());
        }
        let serial = self.store.append(cmd)?;
        self.reduce(serial)?;
        self.emit_ready()
    }

    /// Append a fast-forwarding command and drain the pipelines it forces.
    fn fast_forward(&mut self, cmd: Command) -> OptimizeResult<()> {
        let qubits = cmd.qubits.clone();
        let deallocates = matches!(cmd.kind, CommandKind::Deallocate);
        debug!(gate = cmd.name(), "fast-forwarding");
        self.store.append(cmd)?;
        for &qubit in &qubits {
            self.drain_qubit(qubit)?;
            if deallocates {
                self.store.retire(qubit)?;
                trace!(%qubit, "deallocated");
            }
        }
        self.emit_ready()
    }

    /// Drain every pipeline in serial order, then forward the flush.
    fn flush(&mut self, cmd: Command) -> OptimizeResult<()> {
        debug!(buffered = self.store.buffered(), "flush");
        while let Some((serial, qubit)) = self.store.min_head() {
            self.emit(serial, qubit)?;
        }
        self.sink.receive(cmd)
    }

    /// Emit a qubit's whole pipeline in program order.
    fn drain_qubit(&mut self, qubit: QubitId) -> OptimizeResult<()> {
        while let Some(serial) = self.store.head(qubit) {
            self.emit(serial, qubit)?;
        }
        Ok(())
    }

    /// While any pipeline has reached the bound, emit the eligible head
    /// with the smallest serial. Emissions cascade: releasing one command
    /// can shorten several pipelines at once.
    fn emit_ready(&mut self) -> OptimizeResult<()> {
        while let Some((serial, qubit)) = self.store.min_full_head(self.buffer_bound) {
            self.emit(serial, qubit)?;
        }
        Ok(())
    }

    /// Emit the head command of `lead`'s pipeline downstream.
    ///
    /// A multi-qubit command is buffered on every pipeline it touches; the
    /// commands queued ahead of it there are forced out first so that
    /// emission order on each qubit equals program order. The command
    /// leaves all pipelines and is sent exactly once.
    fn emit(&mut self, serial: Serial, lead: QubitId) -> OptimizeResult<()> {
        let cmd = self.store.command(serial)?.clone();
        for qubit in cmd.footprint() {
            if qubit == lead {
                continue;
            }
            loop {
                if self.store.position(qubit, serial)? == 0 {
                    break;
                }
                let head = self.store.head(qubit).ok_or_else(|| {
                    OptimizeError::CrossReference(format!("empty pipeline for {qubit}"))
                })?;
                self.emit(head, qubit)?;
            }
            self.store.pop_expected(qubit, serial)?;
        }
        self.store.pop_expected(lead, serial)?;
        self.store.discard(serial)?;
        trace!(%serial, gate = cmd.name(), "emit");
        self.sink.receive(cmd)
    }

    /// Try to rewrite the just-appended command against its lead qubit's
    /// pipeline, then restore the closure invariant if anything fired.
    fn reduce(&mut self, x_serial: Serial) -> OptimizeResult<()> {
        let Some(lead) = self.store.command(x_serial)?.lead_qubit() else {
            return Ok(());
        };
        let idx = self.store.position(lead, x_serial)?;
        if self.try_rewrite_at(lead, idx)? {
            self.restore_closure()?;
        }
        Ok(())
    }

    /// Re-scan every pipeline until no rewrite fires.
    ///
    /// Removing a cancelled pair from the middle of a pipeline can pull
    /// two commands next to each other that were inserted with the pair
    /// between them; the closure invariant requires such pairs to cancel
    /// or merge as well. Each firing shrinks the buffer, so this
    /// terminates.
    fn restore_closure(&mut self) -> OptimizeResult<()> {
        'rescan: loop {
            for qubit in self.store.live_qubits() {
                let len = self.store.pipeline(qubit)?.len();
                for idx in 1..len {
                    if self.try_rewrite_at(qubit, idx)? {
                        continue 'rescan;
                    }
                }
            }
            return Ok(());
        }
    }

    /// Try to cancel or merge the command at `x_idx` on `lead`'s pipeline
    /// against an earlier command there.
    ///
    /// Candidates are scanned nearest-first. A candidate is reachable when
    /// the separating window commutes with `x` on the lead qubit and on
    /// every other qubit of `x`'s footprint. A non-commuting window does
    /// not end the scan: a longer window can still commute as a whole
    /// through a template instance.
    fn try_rewrite_at(&mut self, lead: QubitId, x_idx: usize) -> OptimizeResult<bool> {
        let x_serial = self.store.serial_at(lead, x_idx)?;
        let x = self.store.command(x_serial)?.clone();
        if !x.is_gate() {
            return Ok(false);
        }

        for p in (0..x_idx).rev() {
            if !self.window_commutes(lead, p + 1, x_idx, &x)? {
                if self.apply_commutation {
                    continue;
                }
                break;
            }
            let y_serial = self.store.serial_at(lead, p)?;
            let y = self.store.command(y_serial)?.clone();

            if registry::is_inverse(&y, &x) && self.reachable(&x, lead, y_serial, x_serial)? {
                self.store.remove(y_serial)?;
                self.store.remove(x_serial)?;
                debug!(gate = x.name(), "cancelled inverse pair");
                return Ok(true);
            }

            if let Some(outcome) = registry::merge(&y, &x) {
                if self.reachable(&x, lead, y_serial, x_serial)? {
                    match outcome {
                        Merge::Identity => {
                            self.store.remove(y_serial)?;
                            self.store.remove(x_serial)?;
                            debug!(gate = x.name(), "merged pair to identity");
                        }
                        Merge::Replacement(merged) => {
                            debug!(gate = merged.name(), "merged pair");
                            self.store.replace(y_serial, merged)?;
                            self.store.remove(x_serial)?;
                        }
                    }
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Check the separating windows between `y` and `x` on every footprint
    /// qubit other than the lead.
    fn reachable(
        &self,
        x: &Command,
        lead: QubitId,
        y_serial: Serial,
        x_serial: Serial,
    ) -> OptimizeResult<bool> {
        for qubit in x.footprint() {
            if qubit == lead {
                continue;
            }
            let y_pos = self.store.position(qubit, y_serial)?;
            let x_pos = self.store.position(qubit, x_serial)?;
            if !self.window_commutes(qubit, y_pos + 1, x_pos, x)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Decide whether the commands at `[start, end)` on `qubit`'s pipeline
    /// commute, as a block, with `x`.
    ///
    /// Greedy left-to-right: each element either pointwise commutes with
    /// `x`, or starts a contiguous sub-window matched by one of the
    /// templates anchored on `x`'s kind (pivot bound to `qubit`). With
    /// commutation disabled only the empty window commutes.
    fn window_commutes(
        &self,
        qubit: QubitId,
        start: usize,
        end: usize,
        x: &Command,
    ) -> OptimizeResult<bool> {
        if start >= end {
            return Ok(true);
        }
        if !self.apply_commutation {
            return Ok(false);
        }

        let pipe = self.store.pipeline(qubit)?;
        let mut window: Vec<&Command> = Vec::with_capacity(end - start);
        for idx in start..end {
            window.push(self.store.command(pipe[idx])?);
        }

        let templates: &[Template] = match x.as_gate() {
            Some(gate) => registry::templates_for(gate.tag(), x.controls.len()),
            None => &[],
        };

        let mut i = 0;
        'scan: while i < window.len() {
            if registry::commutes_point(window[i], x) {
                i += 1;
                continue;
            }
            for template in templates {
                let t_len = template.len();
                if i + t_len <= window.len() && template.matches(&window[i..i + t_len], qubit) {
                    trace!(%qubit, "template block commutes");
                    i += t_len;
                    continue 'scan;
                }
            }
            return Ok(false);
        }
        Ok(true)
    }
}

impl<S: CommandSink> CommandSink for LocalOptimizer<S> {
    fn receive(&mut self, cmd: Command) -> OptimizeResult<()> {
        LocalOptimizer::receive(self, cmd)
    }
}
