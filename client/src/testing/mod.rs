//! Probe orchestration across hosts

mod prober;
pub mod runner;
#[cfg(test)]
pub mod test_utils;

pub use prober::{ProbeExecutionError, Prober, TaggedSample};
pub use runner::{SshRunner, TaskRunner};

use crate::config::{Config, ProbeTarget};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Outcome of probing all destinations of one host
#[derive(Debug)]
pub struct HostBatch {
    pub host: String,
    pub result: Result<Vec<TaggedSample>, ProbeExecutionError>,
}

/// Destinations declared for `host`, in bundle order, without repeats
pub fn destinations_for(host: &str, targets: &[ProbeTarget]) -> Vec<String> {
    let mut destinations: Vec<String> = Vec::new();
    for target in targets.iter().filter(|t| t.host == host) {
        if !destinations.contains(&target.destination) {
            destinations.push(target.destination.clone());
        }
    }
    destinations
}

/// Hosts declared in the bundle, in order of first appearance
pub fn hosts_in_order(targets: &[ProbeTarget]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for target in targets {
        if !hosts.contains(&target.host) {
            hosts.push(target.host.clone());
        }
    }
    hosts
}

/// Runs one probe batch per host, hosts in parallel
pub struct TestRunner<R: TaskRunner> {
    config: Arc<Config>,
    prober: Prober<R>,
}

impl<R: TaskRunner + 'static> TestRunner<R> {
    pub fn new(config: Arc<Config>, runner: Arc<R>) -> Self {
        let options = Arc::new(config.test_execution.clone());
        Self {
            config,
            prober: Prober::new(runner, options),
        }
    }

    /// Probe every host of the bundle, or only those in `only` when given.
    ///
    /// Batches are returned in the order hosts first appear in test_data.
    pub async fn run_all(&self, only: &[String]) -> Result<Vec<HostBatch>> {
        let declared = hosts_in_order(&self.config.test_data);
        if let Some(unknown) = only.iter().find(|h| !declared.contains(*h)) {
            anyhow::bail!("Host {:?} has no test_data entries", unknown);
        }

        let hosts: Vec<String> = declared
            .into_iter()
            .filter(|h| only.is_empty() || only.contains(h))
            .collect();

        info!(
            "Probing {} host(s), at most {} in parallel",
            hosts.len(),
            self.config.runner.max_parallel_hosts
        );

        let semaphore = Arc::new(Semaphore::new(self.config.runner.max_parallel_hosts));
        let mut tasks = JoinSet::new();

        for (index, name) in hosts.iter().enumerate() {
            let entry = self
                .config
                .host_entry(name)
                .with_context(|| format!("Host {:?} missing from inventory", name))?;
            let destinations = destinations_for(name, &self.config.test_data);
            let prober = self.prober.clone();
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                debug!("{}: probing {} destination(s)", entry.name, destinations.len());
                (index, prober.probe_host(&entry, &destinations).await)
            });
        }

        let mut results: Vec<Option<Result<Vec<TaggedSample>, ProbeExecutionError>>> =
            hosts.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!("Probe task did not complete: {}", e),
            }
        }

        let batches = hosts
            .into_iter()
            .zip(results)
            .map(|(host, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(ProbeExecutionError::TaskAborted {
                        host: host.clone(),
                        cause: "probe task panicked or was cancelled".to_string(),
                    })
                });
                if let Err(e) = &result {
                    warn!("{}: batch failed: {}", host, e);
                }
                HostBatch { host, result }
            })
            .collect();

        Ok(batches)
    }
}
