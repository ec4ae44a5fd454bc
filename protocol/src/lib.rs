//! Pingverdict Protocol Library
//!
//! Shared data-shape contract between the remote ping invocation and the
//! verdict logic. This includes the structured ping sample, the verdict
//! classifier and the pure command builder.

pub mod command;
pub mod constants;
pub mod error;
pub mod sample;
pub mod verdict;

pub use command::{ProbeOptions, build_ping_command, shell_quote};
pub use constants::*;
pub use error::ProtocolError;
pub use sample::ProbeSample;
pub use verdict::{Verdict, classify};
