//! Protocol error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed ping output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("Received more packets than transmitted: {received} > {transmitted}")]
    ReceivedExceedsTransmitted { transmitted: u32, received: u32 },

    #[error("Unknown verdict: {0:?} (expected FAIL, SUCCESS or FLAPPING)")]
    UnknownVerdict(String),
}
