use crate::command::{CommandOutput, CommandRunner, Invocation};
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Command runner that replays queued outputs and records every invocation
///
/// When the queue is exhausted, further runs return a successful empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<CommandOutput>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next run
    pub fn respond(self, output: CommandOutput) -> Self {
        if let Ok(mut outputs) = self.outputs.lock() {
            outputs.push_back(output);
        }
        self
    }

    /// Invocations seen so far, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    /// Argument lists of invocations seen so far
    pub fn recorded_args(&self) -> Vec<Vec<String>> {
        self.invocations()
            .into_iter()
            .map(|invocation| invocation.args)
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        if let Ok(mut seen) = self.invocations.lock() {
            seen.push(invocation.clone());
        }

        let next = self
            .outputs
            .lock()
            .ok()
            .and_then(|mut outputs| outputs.pop_front());

        Ok(next.unwrap_or_else(|| CommandOutput::ok("")))
    }
}
