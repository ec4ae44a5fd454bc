//! In-memory task runner for tests

use super::runner::{CommandOutput, TaskRunner};
use crate::config::HostEntry;
use async_trait::async_trait;
use protocol::{ProbeOptions, build_ping_command};
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers commands from a script keyed by (host, command).
///
/// Unscripted commands fail with "no route to host".
#[derive(Default)]
pub struct FakeRunner {
    options: ProbeOptions,
    replies: HashMap<(String, String), CommandOutput>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeRunner {
    pub fn with_options(options: ProbeOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    fn script(mut self, host: &str, destination: &str, output: CommandOutput) -> Self {
        let command = build_ping_command(destination, &self.options);
        self.replies.insert((host.to_string(), command), output);
        self
    }

    pub fn reply(self, host: &str, destination: &str, output: impl Into<String>) -> Self {
        self.script(host, destination, CommandOutput::success(output))
    }

    pub fn fail(self, host: &str, destination: &str, exception: &str) -> Self {
        self.script(host, destination, CommandOutput::failure("", exception))
    }

    pub fn fail_silently(self, host: &str, destination: &str, output: &str) -> Self {
        let output = CommandOutput {
            failed: true,
            output: output.to_string(),
            exception: None,
        };
        self.script(host, destination, output)
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskRunner for FakeRunner {
    async fn send_command(&self, host: &HostEntry, command: &str) -> CommandOutput {
        self.calls
            .lock()
            .unwrap()
            .push((host.name.clone(), command.to_string()));

        self.replies
            .get(&(host.name.clone(), command.to_string()))
            .cloned()
            .unwrap_or_else(|| CommandOutput::failure("", "no route to host"))
    }
}

pub fn host(name: &str) -> HostEntry {
    HostEntry {
        name: name.to_string(),
        hostname: name.to_string(),
        port: 22,
        username: None,
    }
}

/// Minimal `jc --ping` document
pub fn jc_json(transmitted: u32, received: u32) -> String {
    format!(
        r#"{{"packets_transmitted": {}, "packets_received": {}, "responses": []}}"#,
        transmitted, received
    )
}
