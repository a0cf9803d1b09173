//! The downstream-stage seam.

use grane_ir::Command;

use crate::error::OptimizeResult;

/// A pipeline stage that consumes a stream of commands.
///
/// Stages are chained by construction: each stage owns the next one and
/// forwards to it by calling [`CommandSink::receive`] once per emitted
/// command. A backend adapter is simply the last sink in the chain.
pub trait CommandSink {
    /// Receive one command from the upstream stage.
    fn receive(&mut self, cmd: Command) -> OptimizeResult<()>;
}

/// A sink that records everything it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// The received commands, oldest first.
    pub commands: Vec<Command>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The received commands with allocation and fast-forwarding
    /// bookkeeping filtered out, leaving only proper gates.
    pub fn gates(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|cmd| !cmd.is_fast_forwarding() && !cmd.is_classical())
            .collect()
    }
}

impl CommandSink for RecordingSink {
    fn receive(&mut self, cmd: Command) -> OptimizeResult<()> {
        self.commands.push(cmd);
        Ok(())
    }
}
