//! Remote ping command construction
//!
//! The command is built from explicit optional fields: an option that is not
//! supplied is left out of the command entirely instead of being passed with
//! a default value.

use crate::constants::{DEFAULT_COUNT, FORMATTER_CMD, PING_BIN};
use serde::{Deserialize, Serialize};

/// Execution parameters shared by every probe of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Echo requests per probe (`-c`), 5 when unset
    #[serde(default)]
    pub count: Option<u32>,

    /// IP time to live (`-t`)
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Seconds to wait for a response (`-W`)
    #[serde(default)]
    pub timeout: Option<u32>,

    /// Payload size in bytes (`-s`)
    #[serde(default)]
    pub size: Option<u32>,

    /// Source interface or address (`-I`)
    #[serde(default)]
    pub source: Option<String>,
}

impl ProbeOptions {
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_COUNT)
    }
}

/// Build the shell command pinging `destination` and piping the output
/// through the structured formatter.
///
/// Options follow the fixed order ttl, size, timeout, source.
pub fn build_ping_command(destination: &str, options: &ProbeOptions) -> String {
    let mut parts = vec![
        PING_BIN.to_string(),
        "-n".to_string(),
        format!("-c {}", options.count()),
        shell_quote(destination),
    ];

    if let Some(ttl) = options.ttl {
        parts.push(format!("-t {}", ttl));
    }
    if let Some(size) = options.size {
        parts.push(format!("-s {}", size));
    }
    if let Some(timeout) = options.timeout {
        parts.push(format!("-W {}", timeout));
    }
    if let Some(source) = &options.source {
        parts.push(format!("-I {}", shell_quote(source)));
    }

    format!("{} | {}", parts.join(" "), FORMATTER_CMD)
}

/// Quote a value for a POSIX shell.
///
/// Addresses, hostnames and interface names pass through unchanged; anything
/// containing other characters is wrapped in single quotes.
pub fn shell_quote(value: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '_' | '%' | '/' | '@');

    if !value.is_empty() && value.chars().all(is_safe) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
