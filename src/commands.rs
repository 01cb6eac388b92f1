//! Post-install command execution.
//!
//! Commands run one after another, each to completion, with stdout and stderr
//! captured through a single pipe so the output keeps its interleaving. A
//! failing command is logged and the next one still runs.

use std::io::Read;
use std::process::{Command, ExitStatus};

use log::{error, info};

use crate::platform::CommandShell;

/// Result of one command
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: String,
    /// Exit code, `None` when the process could not be started or was killed
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
    /// Spawn or wait failure
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }
}

/// Runs command lines through a platform shell
pub struct CommandRunner<'a, S: CommandShell + ?Sized> {
    shell: &'a S,
}

impl<'a, S: CommandShell + ?Sized> CommandRunner<'a, S> {
    pub fn new(shell: &'a S) -> Self {
        Self { shell }
    }

    /// Run every command in order. Never stops early.
    pub fn run_all(&self, commands: &[String]) -> Vec<CommandOutcome> {
        commands.iter().map(|command| self.run(command)).collect()
    }

    fn run(&self, command_line: &str) -> CommandOutcome {
        info!("Running: {command_line}");
        let mut outcome = CommandOutcome {
            command: command_line.to_string(),
            exit_code: None,
            output: String::new(),
            error: None,
        };

        match combined_output(self.shell.shell_command(command_line)) {
            Ok((status, output)) => {
                outcome.exit_code = status.code();
                outcome.output = output;
                if !status.success() {
                    error!("Command error: `{command_line}` {status}");
                }
            }
            Err(e) => {
                error!("Command error: `{command_line}`: {e}");
                outcome.error = Some(e.to_string());
            }
        }

        println!("Output: {}", outcome.output);
        outcome
    }
}

/// Spawn `command` with stdout and stderr sharing one pipe, read it to the
/// end, then reap the child
fn combined_output(mut command: Command) -> std::io::Result<(ExitStatus, String)> {
    let (mut reader, writer) = std::io::pipe()?;
    command.stdout(writer.try_clone()?).stderr(writer);
    let mut child = command.spawn()?;
    // The command still owns write ends; EOF needs them closed.
    drop(command);

    let mut bytes = Vec::new();
    let read = reader.read_to_end(&mut bytes);
    let status = child.wait()?;
    read?;

    Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
}

/// Escape a command line for `cmd.exe /C`: `^` becomes `^^` and `"` becomes
/// `^"`, so the interpreter's second parse yields the original text
pub fn escape_cmd_metachars(command_line: &str) -> String {
    let mut escaped = String::with_capacity(command_line.len() + 8);
    for c in command_line.chars() {
        match c {
            '^' => escaped.push_str("^^"),
            '"' => escaped.push_str("^\""),
            other => escaped.push(other),
        }
    }
    escaped
}
