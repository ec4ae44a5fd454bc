//! Verdict classification and comparison against expected verdicts

use crate::config::ProbeTarget;
use crate::testing::{HostBatch, TaggedSample};
use protocol::{DEFAULT_MAX_DROP, Verdict, classify};
use std::collections::HashMap;
use tracing::debug;

/// Read-only lookup of tolerated loss per (host, destination)
pub struct ThresholdTable {
    entries: HashMap<(String, String), u32>,
}

impl ThresholdTable {
    pub fn new(targets: &[ProbeTarget]) -> Self {
        let mut entries = HashMap::new();
        for target in targets {
            // First declaration of a pair wins
            entries
                .entry((target.host.clone(), target.destination.clone()))
                .or_insert(target.max_drop);
        }
        Self { entries }
    }

    /// Tolerated loss for the exact pair, [`DEFAULT_MAX_DROP`] when the pair
    /// is not declared.
    pub fn max_drop(&self, host: &str, destination: &str) -> u32 {
        self.lookup(host, destination).unwrap_or(DEFAULT_MAX_DROP)
    }

    /// Declared tolerated loss, `None` on a miss
    pub fn lookup(&self, host: &str, destination: &str) -> Option<u32> {
        self.entries
            .get(&(host.to_string(), destination.to_string()))
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub host: String,
    pub destination: String,
    pub verdict: Verdict,
}

/// Classify every sample of one host's successful batch
pub fn classify_batch(
    host: &str,
    samples: &[TaggedSample],
    thresholds: &ThresholdTable,
) -> Vec<ClassifiedResult> {
    samples
        .iter()
        .map(|tagged| {
            let max_drop = thresholds.max_drop(host, &tagged.destination);
            let verdict = classify(&tagged.sample, max_drop);
            debug!(
                "{} -> {}: lost {} (max_drop {}) => {}",
                host,
                tagged.destination,
                tagged.sample.lost(),
                max_drop,
                verdict
            );
            ClassifiedResult {
                host: host.to_string(),
                destination: tagged.destination.clone(),
                verdict,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Passed,
    Failed { actual: Verdict },
    /// No verdict available, the host's batch failed
    Errored { reason: String },
}

/// Result of checking one declared pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub id: String,
    pub host: String,
    pub destination: String,
    pub expected: Verdict,
    pub status: OutcomeStatus,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }

    pub fn message(&self) -> String {
        match &self.status {
            OutcomeStatus::Passed => format!("Ping was {} as expected", self.expected),
            OutcomeStatus::Failed { actual } => {
                format!("Ping was expected to {} but was {}", self.expected, actual)
            }
            OutcomeStatus::Errored { reason } => reason.clone(),
        }
    }
}

/// Test identifier of a pair
pub fn test_id(host: &str, destination: &str) -> String {
    format!("{}_{}", host, destination)
}

/// Produce one outcome per declared pair whose host was probed.
///
/// Pairs of a failed batch are reported as errored, never as FAIL.
pub fn evaluate(targets: &[ProbeTarget], batches: &[HostBatch]) -> Vec<TestOutcome> {
    let thresholds = ThresholdTable::new(targets);

    let mut verdicts: HashMap<(String, String), Verdict> = HashMap::new();
    let mut errors: HashMap<&str, String> = HashMap::new();

    for batch in batches {
        match &batch.result {
            Ok(samples) => {
                for result in classify_batch(&batch.host, samples, &thresholds) {
                    verdicts.insert((result.host, result.destination), result.verdict);
                }
            }
            Err(e) => {
                errors.insert(batch.host.as_str(), e.to_string());
            }
        }
    }

    targets
        .iter()
        .filter_map(|target| {
            let status = if let Some(reason) = errors.get(target.host.as_str()) {
                OutcomeStatus::Errored {
                    reason: reason.clone(),
                }
            } else {
                let key = (target.host.clone(), target.destination.clone());
                let actual = *verdicts.get(&key)?;
                if actual == target.expected {
                    OutcomeStatus::Passed
                } else {
                    OutcomeStatus::Failed { actual }
                }
            };

            Some(TestOutcome {
                id: test_id(&target.host, &target.destination),
                host: target.host.clone(),
                destination: target.destination.clone(),
                expected: target.expected,
                status,
            })
        })
        .collect()
}
