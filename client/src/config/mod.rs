//! Test bundle configuration

use anyhow::{Context, Result};
use protocol::{ProbeOptions, Verdict};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub test_execution: ProbeOptions,
    pub test_data: Vec<ProbeTarget>,
    pub hosts: BTreeMap<String, HostConfig>,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One declared (host, destination) pair and the verdict it must produce
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeTarget {
    pub host: String,
    pub destination: String,
    pub expected: Verdict,
    #[serde(default)]
    pub max_drop: u32,
}

/// Inventory entry of a host the probes are executed on
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
    /// Address or DNS name to connect to, the inventory name when unset
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_ssh_binary")]
    pub ssh_binary: String,
    #[serde(default = "default_connect_timeout_sec")]
    pub connect_timeout_sec: u64,
    #[serde(default = "default_command_timeout_sec")]
    pub command_timeout_sec: u64,
    #[serde(default = "default_max_parallel_hosts")]
    pub max_parallel_hosts: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Host as seen by the task runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub username: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ssh_binary: default_ssh_binary(),
            connect_timeout_sec: default_connect_timeout_sec(),
            command_timeout_sec: default_command_timeout_sec(),
            max_parallel_hosts: default_max_parallel_hosts(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_ssh_port() -> u16 {
    22
}

fn default_ssh_binary() -> String {
    "ssh".to_string()
}

fn default_connect_timeout_sec() -> u64 {
    10
}

fn default_command_timeout_sec() -> u64 {
    60
}

fn default_max_parallel_hosts() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read test bundle: {:?}", path.as_ref()))?;

        Self::parse(&contents)
            .with_context(|| format!("Invalid test bundle: {:?}", path.as_ref()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .context("Failed to parse test bundle")?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.test_data.is_empty() {
            anyhow::bail!("test_data must contain at least one entry");
        }

        if self.runner.max_parallel_hosts == 0 {
            anyhow::bail!("runner.max_parallel_hosts must be at least 1");
        }

        for target in &self.test_data {
            if !self.hosts.contains_key(&target.host) {
                anyhow::bail!(
                    "test_data references host {:?} which is not in the inventory",
                    target.host
                );
            }
            if target.destination.is_empty() || target.destination.starts_with('-') {
                anyhow::bail!(
                    "test_data destination {:?} for host {:?} is not a valid ping target",
                    target.destination,
                    target.host
                );
            }
        }

        if let Some(source) = &self.test_execution.source {
            if source.is_empty() || source.starts_with('-') {
                anyhow::bail!("test_execution.source {:?} is not a valid interface or address", source);
            }
        }

        Ok(())
    }

    /// (host, destination) pairs declared more than once, in bundle order
    pub fn duplicate_pairs(&self) -> Vec<(&str, &str)> {
        let mut seen = HashSet::new();
        self.test_data
            .iter()
            .map(|t| (t.host.as_str(), t.destination.as_str()))
            .filter(|pair| !seen.insert(*pair))
            .collect()
    }

    /// Inventory entry for `name`, if the host is known
    pub fn host_entry(&self, name: &str) -> Option<HostEntry> {
        self.hosts.get(name).map(|host| HostEntry {
            name: name.to_string(),
            hostname: host.hostname.clone().unwrap_or_else(|| name.to_string()),
            port: host.port,
            username: host.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"
[test_execution]
count = 3
ttl = 32

[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "SUCCESS"
max_drop = 1

[[test_data]]
host = "r1"
destination = "192.0.2.2"
expected = "FAIL"

[hosts.r1]
hostname = "10.0.0.1"
username = "netops"

[hosts.r2]
"#;

    #[test]
    fn test_parse_bundle() {
        let config = Config::parse(BUNDLE).unwrap();
        assert_eq!(config.test_execution.count, Some(3));
        assert_eq!(config.test_execution.ttl, Some(32));
        assert_eq!(config.test_execution.timeout, None);
        assert_eq!(config.test_data.len(), 2);
        assert_eq!(config.test_data[0].expected, Verdict::Success);
        assert_eq!(config.test_data[0].max_drop, 1);
        assert_eq!(config.test_data[1].max_drop, 0);
        assert_eq!(config.runner.max_parallel_hosts, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_host_entry_defaults() {
        let config = Config::parse(BUNDLE).unwrap();

        let r1 = config.host_entry("r1").unwrap();
        assert_eq!(r1.hostname, "10.0.0.1");
        assert_eq!(r1.port, 22);
        assert_eq!(r1.username.as_deref(), Some("netops"));

        let r2 = config.host_entry("r2").unwrap();
        assert_eq!(r2.hostname, "r2");
        assert_eq!(r2.username, None);

        assert!(config.host_entry("r3").is_none());
    }

    #[test]
    fn test_duplicate_pairs() {
        let bundle = r#"
[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "SUCCESS"
max_drop = 1

[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "FLAPPING"

[[test_data]]
host = "r1"
destination = "192.0.2.2"
expected = "SUCCESS"

[hosts.r1]
"#;
        let config = Config::parse(bundle).unwrap();
        assert_eq!(config.duplicate_pairs(), vec![("r1", "192.0.2.1")]);
        assert!(Config::parse(BUNDLE).unwrap().duplicate_pairs().is_empty());
    }

    #[test]
    fn test_unknown_host_rejected() {
        let bundle = r#"
[[test_data]]
host = "ghost"
destination = "192.0.2.1"
expected = "SUCCESS"

[hosts.r1]
"#;
        assert!(Config::parse(bundle).is_err());
    }

    #[test]
    fn test_lowercase_expected_rejected() {
        let bundle = r#"
[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "success"

[hosts.r1]
"#;
        assert!(Config::parse(bundle).is_err());
    }

    #[test]
    fn test_option_like_destination_rejected() {
        for destination in ["-f", "--help", ""] {
            let bundle = format!(
                r#"
[[test_data]]
host = "r1"
destination = "{}"
expected = "SUCCESS"

[hosts.r1]
"#,
                destination
            );
            assert!(Config::parse(&bundle).is_err(), "accepted {:?}", destination);
        }
    }

    #[test]
    fn test_option_like_source_rejected() {
        let bundle = r#"
[test_execution]
source = "-c 1000"

[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "SUCCESS"

[hosts.r1]
"#;
        assert!(Config::parse(bundle).is_err());
    }

    #[test]
    fn test_empty_test_data_rejected() {
        let bundle = r#"
test_data = []

[hosts.r1]
"#;
        assert!(Config::parse(bundle).is_err());
    }

    #[test]
    fn test_zero_parallel_hosts_rejected() {
        let bundle = r#"
[[test_data]]
host = "r1"
destination = "192.0.2.1"
expected = "SUCCESS"

[hosts.r1]

[runner]
max_parallel_hosts = 0
"#;
        assert!(Config::parse(bundle).is_err());
    }
}
