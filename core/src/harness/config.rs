use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_QUEUE_LIMIT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Byte ceiling for the pull queue.
    /// - `None` → `DEFAULT_QUEUE_LIMIT`.
    pub queue_limit: Option<usize>,

    /// Whether to attach a telemetry snapshot to each outcome.
    /// - `None` or `Some(true)` → attach (default).
    /// - `Some(false)` → outcomes carry no telemetry.
    pub collect_telemetry: Option<bool>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            queue_limit: Some(DEFAULT_QUEUE_LIMIT),
            collect_telemetry: Some(true),
        }
    }
}

impl HarnessConfig {
    pub fn new(queue_limit: Option<usize>, collect_telemetry: Option<bool>) -> Self {
        Self {
            queue_limit: queue_limit.or(Some(DEFAULT_QUEUE_LIMIT)),
            collect_telemetry: collect_telemetry.or(Some(true)),
        }
    }

    pub fn with_queue_limit(limit: usize) -> Self {
        Self { queue_limit: Some(limit), ..Self::default() }
    }

    pub fn queue_limit(&self) -> usize {
        self.queue_limit.unwrap_or(DEFAULT_QUEUE_LIMIT)
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.collect_telemetry.unwrap_or(true)
    }
}
