// ## src/telemetry/snapshot.rs

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Immutable view of one fixture run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// Encoded bytes per raw byte pulled by the encoder.
    pub encode_ratio: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let encode_ratio = if counters.bytes_served > 0 {
            counters.bytes_hashed as f64 / counters.bytes_served as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_served as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            encode_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn stage(&self, stage: Stage) -> Duration {
        self.stage_times.get(stage)
    }

    /// Internal invariants that hold for every completed run:
    /// - the encoder never received more than was decoded
    /// - every served byte was requested
    pub fn sanity_check(&self) -> bool {
        let c = &self.counters;
        c.bytes_served <= c.bytes_serialized && c.bytes_served <= c.bytes_requested
    }
}
