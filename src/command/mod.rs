//! Synchronous execution of external programs
//!
//! Registry operations shell out to npm through the [CommandRunner] trait:
//!
//! - [system::SystemRunner]: spawns real processes
//! - [mock::ScriptedRunner]: records invocations and replays canned output

pub mod mock;
pub mod system;

pub use mock::ScriptedRunner;
pub use system::SystemRunner;

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Options controlling how a command is run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory; the current directory when `None`
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for the child process
    pub env: BTreeMap<String, String>,
    /// Suppress echoing of captured output
    pub silent: bool,
}

impl ExecOptions {
    /// Silent execution in the current directory
    pub fn silent() -> Self {
        ExecOptions {
            silent: true,
            ..Self::default()
        }
    }

    /// Same options with a different working directory
    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// A fully described command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub options: ExecOptions,
}

impl Invocation {
    pub fn new(program: impl Into<String>, options: ExecOptions) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            options,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion
///
/// Implementations block until the program exits. A non-zero exit is not an
/// error at this layer; only failing to start the program is.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}
