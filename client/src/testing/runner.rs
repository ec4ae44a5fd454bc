//! Remote command execution
//!
//! The prober only depends on [`TaskRunner`]; [`SshRunner`] is the
//! implementation used by the binary. Timeouts and transport failures are
//! owned here and surface as a failed [`CommandOutput`].

use crate::config::{HostEntry, RunnerConfig};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

/// Result of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub failed: bool,
    /// Captured stdout
    pub output: String,
    /// Why the command failed, when known
    pub exception: Option<String>,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            failed: false,
            output: output.into(),
            exception: None,
        }
    }

    pub fn failure(output: impl Into<String>, exception: impl Into<String>) -> Self {
        Self {
            failed: true,
            output: output.into(),
            exception: Some(exception.into()),
        }
    }
}

#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Run `command` on `host` and report its output
    async fn send_command(&self, host: &HostEntry, command: &str) -> CommandOutput;
}

/// Runs commands through the OpenSSH client in batch mode
pub struct SshRunner {
    ssh_binary: String,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl SshRunner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            ssh_binary: config.ssh_binary.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_sec),
            command_timeout: Duration::from_secs(config.command_timeout_sec),
        }
    }

    /// Arguments passed to the ssh binary, remote command last
    pub fn ssh_args(&self, host: &HostEntry, command: &str) -> Vec<String> {
        let destination = match &host.username {
            Some(user) => format!("{}@{}", user, host.hostname),
            None => host.hostname.clone(),
        };

        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs()),
            "-p".to_string(),
            host.port.to_string(),
            destination,
            "--".to_string(),
            command.to_string(),
        ]
    }
}

#[async_trait]
impl TaskRunner for SshRunner {
    async fn send_command(&self, host: &HostEntry, command: &str) -> CommandOutput {
        let args = self.ssh_args(host, command);
        debug!("{}: {} {}", host.name, self.ssh_binary, args.join(" "));

        let mut cmd = Command::new(&self.ssh_binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.command_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return CommandOutput::failure(
                    "",
                    format!("Failed to spawn {}: {}", self.ssh_binary, e),
                );
            }
            Err(_) => {
                return CommandOutput::failure(
                    "",
                    format!("Command timed out after {:?}", self.command_timeout),
                );
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        trace!("{}: exit {}, stdout {:?}, stderr {:?}", host.name, output.status, stdout, stderr);

        if output.status.success() {
            CommandOutput::success(stdout)
        } else {
            let reason = if stderr.trim().is_empty() {
                format!("Command exited with {}", output.status)
            } else {
                format!("Command exited with {}: {}", output.status, stderr.trim())
            };
            CommandOutput::failure(stdout, reason)
        }
    }
}
