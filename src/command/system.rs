use crate::command::{CommandOutput, CommandRunner, Invocation};
use crate::error::Result;
use std::process::Command;

/// Runs commands as child processes of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        log::debug!("running `{}`", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        if let Some(ref cwd) = invocation.options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &invocation.options.env {
            cmd.env(key, value);
        }

        let output = cmd.output()?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        log::debug!("`{}` exited with {:?}", invocation, result.code);

        if !invocation.options.silent {
            print!("{}", result.stdout);
            eprint!("{}", result.stderr);
        }

        Ok(result)
    }
}
