//! Report output

use crate::analysis::{OutcomeStatus, TestOutcome};
use anyhow::Result;
use std::path::Path;

/// Totals over all outcomes of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let mut summary = Summary::default();
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Passed => summary.passed += 1,
                OutcomeStatus::Failed { .. } => summary.failed += 1,
                OutcomeStatus::Errored { .. } => summary.errored += 1,
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Print one line per outcome followed by the totals
pub fn print_report(outcomes: &[TestOutcome]) -> Summary {
    for outcome in outcomes {
        let label = match outcome.status {
            OutcomeStatus::Passed => "PASSED",
            OutcomeStatus::Failed { .. } => "FAILED",
            OutcomeStatus::Errored { .. } => "ERROR",
        };
        println!(
            "[{}] {} {} -> {}",
            chrono::Local::now().format("%H:%M:%S"),
            label,
            outcome.id,
            outcome.message()
        );
    }

    let summary = Summary::from_outcomes(outcomes);
    println!(
        "{} passed, {} failed, {} errors",
        summary.passed, summary.failed, summary.errored
    );
    summary
}

/// Export outcomes as CSV
pub fn export_csv(outcomes: &[TestOutcome], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;
    write_csv(outcomes, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_csv<W: std::io::Write>(outcomes: &[TestOutcome], writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record([
        "id",
        "host",
        "destination",
        "expected",
        "actual",
        "status",
        "detail",
    ])?;

    for o in outcomes {
        let (actual, status, detail) = match &o.status {
            OutcomeStatus::Passed => (o.expected.to_string(), "passed", String::new()),
            OutcomeStatus::Failed { actual } => (actual.to_string(), "failed", o.message()),
            OutcomeStatus::Errored { reason } => (String::new(), "error", reason.clone()),
        };
        writer.write_record([
            o.id.as_str(),
            o.host.as_str(),
            o.destination.as_str(),
            o.expected.as_str(),
            actual.as_str(),
            status,
            detail.as_str(),
        ])?;
    }

    Ok(())
}
