//! Per-host probing of all configured destinations

use super::runner::TaskRunner;
use crate::config::HostEntry;
use protocol::{ProbeOptions, ProbeSample, ProtocolError, build_ping_command};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A host's probe batch could not be completed
#[derive(Error, Debug)]
pub enum ProbeExecutionError {
    #[error("Ping from {host} to {destination} failed: {cause}")]
    CommandFailed {
        host: String,
        destination: String,
        cause: String,
    },

    #[error("Probe task for {host} aborted: {cause}")]
    TaskAborted { host: String, cause: String },

    #[error("Ping from {host} to {destination} returned unusable output: {source} (output: {output:?})")]
    UnparsableOutput {
        host: String,
        destination: String,
        #[source]
        source: ProtocolError,
        output: String,
    },
}

/// A sample keyed by the destination it was taken for
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSample {
    pub destination: String,
    pub sample: ProbeSample,
}

pub struct Prober<R: TaskRunner> {
    runner: Arc<R>,
    options: Arc<ProbeOptions>,
}

impl<R: TaskRunner> Clone for Prober<R> {
    fn clone(&self) -> Self {
        Self {
            runner: self.runner.clone(),
            options: self.options.clone(),
        }
    }
}

impl<R: TaskRunner> Prober<R> {
    pub fn new(runner: Arc<R>, options: Arc<ProbeOptions>) -> Self {
        Self { runner, options }
    }

    /// Ping every destination from `host`, one after another.
    ///
    /// The batch is all-or-nothing: the first failed or unparsable probe
    /// aborts the remaining destinations and drops the samples collected so
    /// far.
    pub async fn probe_host(
        &self,
        host: &HostEntry,
        destinations: &[String],
    ) -> Result<Vec<TaggedSample>, ProbeExecutionError> {
        let mut samples = Vec::with_capacity(destinations.len());

        for destination in destinations {
            let command = build_ping_command(destination, &self.options);
            let result = self.runner.send_command(host, &command).await;

            if result.failed {
                warn!("{} -> {}: command failed", host.name, destination);
                let cause = result.exception.unwrap_or(result.output);
                return Err(ProbeExecutionError::CommandFailed {
                    host: host.name.clone(),
                    destination: destination.clone(),
                    cause,
                });
            }

            let sample = ProbeSample::from_json(&result.output).map_err(|source| {
                warn!("{} -> {}: unparsable output", host.name, destination);
                ProbeExecutionError::UnparsableOutput {
                    host: host.name.clone(),
                    destination: destination.clone(),
                    source,
                    output: result.output.clone(),
                }
            })?;

            debug!(
                "{} -> {}: {}/{} received",
                host.name, destination, sample.packets_received, sample.packets_transmitted
            );

            samples.push(TaggedSample {
                destination: destination.clone(),
                sample,
            });
        }

        Ok(samples)
    }
}
