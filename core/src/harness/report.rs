//! harness/report.rs
//! Per-fixture verdicts and batch summaries.

use std::fmt;
use serde::Serialize;

use crate::digest::Digest;
use crate::telemetry::TelemetrySnapshot;
use crate::types::HarnessError;

/// Recorded vs. computed digest for one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestMismatch {
    pub fixture: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for DigestMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digest mismatch for {}: expected {}, actual {}",
            self.fixture, self.expected, self.actual
        )
    }
}

#[derive(Debug)]
pub enum FixtureStatus {
    Passed(Digest),
    /// Non-fatal: the run completed but the output drifted.
    Mismatch(DigestMismatch),
    /// Fatal error that aborted this fixture.
    Failed(HarnessError),
}

#[derive(Debug)]
pub struct FixtureOutcome {
    pub name: String,
    pub source: String,
    pub status: FixtureStatus,
    pub telemetry: Option<TelemetrySnapshot>,
}

impl FixtureOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self.status, FixtureStatus::Passed(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self.status, FixtureStatus::Mismatch(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FixtureStatus::Failed(_))
    }

    /// Computed digest as lowercase hex, when the run got that far.
    pub fn actual_hex(&self) -> Option<String> {
        match &self.status {
            FixtureStatus::Passed(d) => Some(d.to_hex()),
            FixtureStatus::Mismatch(m) => Some(m.actual.clone()),
            FixtureStatus::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Digest, HarnessError> {
        match self.status {
            FixtureStatus::Passed(d) => Ok(d),
            FixtureStatus::Mismatch(m) => Err(HarnessError::DigestMismatch(m)),
            FixtureStatus::Failed(e) => Err(e),
        }
    }

    pub fn summary(&self) -> OutcomeSummary {
        let (status, expected, error) = match &self.status {
            FixtureStatus::Passed(_) => ("passed", None, None),
            FixtureStatus::Mismatch(m) => ("mismatch", Some(m.expected.clone()), None),
            FixtureStatus::Failed(e) => ("failed", None, Some(format!("{} ({})", e, e.kind()))),
        };
        OutcomeSummary {
            name: self.name.clone(),
            source: self.source.clone(),
            status,
            expected,
            actual: self.actual_hex(),
            error,
            telemetry: self.telemetry.clone(),
        }
    }
}

impl fmt::Display for FixtureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            FixtureStatus::Passed(d) => write!(f, "[PASS] {} ({})", self.name, d),
            FixtureStatus::Mismatch(m) => write!(f, "[DIFF] {}", m),
            FixtureStatus::Failed(e) => write!(f, "[FAIL] {}: {}", self.name, e),
        }
    }
}

/// Serializable view of one outcome.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub name: String,
    pub source: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<TelemetrySnapshot>,
}

/// Outcomes of one batch, in fixture-table order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FixtureOutcome>,
}

impl BatchReport {
    pub fn push(&mut self, outcome: FixtureOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FixtureOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    pub fn mismatches(&self) -> Vec<&DigestMismatch> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                FixtureStatus::Mismatch(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&FixtureOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed()).collect()
    }

    /// Every fixture passed.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_passed())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} fixtures: {} passed, {} mismatched, {} failed",
            self.len(),
            self.passed(),
            self.mismatches().len(),
            self.failures().len()
        )
    }

    pub fn to_json_pretty(&self) -> Result<String, HarnessError> {
        let summaries: Vec<OutcomeSummary> = self.outcomes.iter().map(|o| o.summary()).collect();
        Ok(serde_json::to_string_pretty(&summaries)?)
    }
}
