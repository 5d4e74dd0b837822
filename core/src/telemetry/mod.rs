//! telemetry/mod.rs
//! Per-fixture counters, stage timers and immutable snapshots.
//!
//! Counters are plain fields mutated by exactly one owner (adapter, hasher or
//! verifier) and merged at the end of a fixture; no locks, no atomics.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
