use std::fmt;
use std::process::{Command, Stdio};

use crate::common::errors::CleanupError;

/// An OS command as program plus discrete arguments; never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Single seam for every OS mutation the cleanup performs
pub trait CommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CleanupError>;
}

/// Runs commands on the local host, blocking until each child exits
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    sudo_binary: Option<String>,
}

impl SystemCommandRunner {
    pub fn new(sudo_binary: Option<String>) -> Self {
        Self {
            sudo_binary: sudo_binary.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Apply the optional privilege wrapper
    fn wrap(&self, command: &CommandSpec) -> CommandSpec {
        match &self.sudo_binary {
            Some(sudo) => {
                let mut args = Vec::with_capacity(command.args.len() + 1);
                args.push(command.program.clone());
                args.extend(command.args.iter().cloned());
                CommandSpec {
                    program: sudo.clone(),
                    args,
                }
            }
            None => command.clone(),
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CleanupError> {
        let command = self.wrap(command);
        tracing::info!("Executing command: {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CleanupError::Command {
                program: command.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            // Killed by a signal: no exit code, report as failure
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_args() {
        let cmd = CommandSpec::new("userdel", ["-rf", "hdfs"]);
        assert_eq!(cmd.to_string(), "userdel -rf hdfs");
    }

    #[test]
    fn test_sudo_wrapper_prepends_program() {
        let runner = SystemCommandRunner::new(Some("ambari-sudo.sh".to_string()));
        let wrapped = runner.wrap(&CommandSpec::new("kill", ["-9", "42"]));
        assert_eq!(wrapped.program, "ambari-sudo.sh");
        assert_eq!(wrapped.args, vec!["kill", "-9", "42"]);
    }

    #[test]
    fn test_blank_sudo_wrapper_ignored() {
        let runner = SystemCommandRunner::new(Some("  ".to_string()));
        let cmd = CommandSpec::new("groupdel", ["hadoop"]);
        assert_eq!(runner.wrap(&cmd), cmd);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let runner = SystemCommandRunner::default();
        let out = runner
            .run(&CommandSpec::new("sh", ["-c", "echo out; echo err >&2; exit 3"]))
            .unwrap();
        assert_eq!(out.status, 3);
        assert!(!out.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn test_missing_program_is_command_error() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run(&CommandSpec::new("definitely-not-a-real-binary-xyz", Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, CleanupError::Command { .. }));
    }
}
