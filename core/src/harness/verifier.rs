//! harness/verifier.rs
//! Drives fixtures end to end: open -> decode/encode/hash -> compare.

use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};

use crate::digest::{Digest, DigestAlg, HashAccumulator};
use crate::fixtures::{FixtureRecord, FixtureTable};
use crate::harness::backend::CodecBackend;
use crate::harness::config::HarnessConfig;
use crate::harness::report::{BatchReport, DigestMismatch, FixtureOutcome, FixtureStatus};
use crate::media::{EncodeParams, EncodedLayerSet, FrameDecoder, FrameEncoder};
use crate::stream::{ByteQueue, PullAdapter};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::HarnessError;

/// Digest of one decode -> encode run plus what it cost.
#[derive(Debug, Clone)]
pub struct DigestRun {
    pub digest: Digest,
    pub telemetry: TelemetrySnapshot,
}

/// Bind `decoder` behind a pull adapter, run `encoder` over it, and fold every
/// encoded unit into a digest.
pub fn compute_digest<D: FrameDecoder, E: FrameEncoder + ?Sized>(
    decoder: D,
    encoder: &mut E,
    params: &EncodeParams,
    alg: DigestAlg,
    config: &HarnessConfig,
) -> Result<DigestRun, HarnessError> {
    let mut timer = TelemetryTimer::new();
    let (digest, counters) = run_pipeline(decoder, encoder, params, alg, config, &mut timer)?;
    timer.finish();
    Ok(DigestRun {
        digest,
        telemetry: TelemetrySnapshot::from(&counters, &timer),
    })
}

fn run_pipeline<D: FrameDecoder, E: FrameEncoder + ?Sized>(
    decoder: D,
    encoder: &mut E,
    params: &EncodeParams,
    alg: DigestAlg,
    config: &HarnessConfig,
    timer: &mut TelemetryTimer,
) -> Result<(Digest, TelemetryCounters), HarnessError> {
    params.validate()?;

    let mut adapter = PullAdapter::with_queue(decoder, ByteQueue::with_limit(config.queue_limit()));
    let mut hasher = HashAccumulator::new(alg);
    let mut counters = TelemetryCounters::default();
    let mut hash_time = Duration::ZERO;

    let t = Instant::now();
    encoder.run(&mut adapter, params, &mut |set: &EncodedLayerSet| {
        let h = Instant::now();
        hasher.submit_layer_set(set);
        counters.add_layer_set(set);
        hash_time += h.elapsed();
        Ok(())
    })?;
    timer.add_stage_time(Stage::Encode, t.elapsed());
    timer.add_stage_time(Stage::Hash, hash_time);
    timer.stage_times.merge(adapter.stage_times());
    counters.merge(adapter.counters());

    Ok((hasher.finalize(), counters))
}

/// Runs a fixture table against one backend.
pub struct Verifier<B: CodecBackend> {
    backend: B,
    fixtures: FixtureTable,
    config: HarnessConfig,
}

impl<B: CodecBackend> Verifier<B> {
    pub fn new(backend: B, fixtures: FixtureTable) -> Self {
        Self {
            backend,
            fixtures,
            config: HarnessConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fixtures(&self) -> &FixtureTable {
        &self.fixtures
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Verify one fixture. Backend setup/teardown is the caller's business.
    pub fn verify(&mut self, fixture: &FixtureRecord) -> FixtureOutcome {
        verify_with(&mut self.backend, fixture, &self.config)
    }

    /// Verify the fixture called `name`, if the table has one.
    pub fn verify_named(&mut self, name: &str) -> Option<FixtureOutcome> {
        let Self { backend, fixtures, config } = self;
        let fixture = fixtures.get(name)?;
        Some(verify_with(backend, fixture, config))
    }

    /// Run every fixture in table order. A failing fixture never stops the
    /// rest; only a failed backend setup aborts the batch.
    pub fn run_all(&mut self) -> Result<BatchReport, HarnessError> {
        let Self { backend, fixtures, config } = self;

        backend.setup()?;
        let mut report = BatchReport::default();
        for fixture in fixtures.iter() {
            report.push(verify_with(backend, fixture, config));
        }
        backend.teardown();

        info!(summary = %report.summary(), "batch finished");
        Ok(report)
    }
}

fn verify_with<B: CodecBackend>(
    backend: &mut B,
    fixture: &FixtureRecord,
    config: &HarnessConfig,
) -> FixtureOutcome {
    let span = info_span!("fixture", fixture = fixture.name());
    let _guard = span.enter();

    let mut timer = TelemetryTimer::new();
    let result = run_fixture(backend, fixture, config, &mut timer);
    timer.finish();

    let (status, counters) = match result {
        Ok((status, counters)) => (status, Some(counters)),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "fixture aborted");
            (FixtureStatus::Failed(e), None)
        }
    };

    match &status {
        FixtureStatus::Passed(d) => info!(digest = %d, "fixture passed"),
        FixtureStatus::Mismatch(m) => warn!(expected = %m.expected, actual = %m.actual, "digest mismatch"),
        FixtureStatus::Failed(_) => {}
    }

    let telemetry = match counters {
        Some(c) if config.telemetry_enabled() => Some(TelemetrySnapshot::from(&c, &timer)),
        _ => None,
    };

    FixtureOutcome {
        name: fixture.name().to_string(),
        source: fixture.source.clone(),
        status,
        telemetry,
    }
}

fn run_fixture<B: CodecBackend>(
    backend: &mut B,
    fixture: &FixtureRecord,
    config: &HarnessConfig,
    timer: &mut TelemetryTimer,
) -> Result<(FixtureStatus, TelemetryCounters), HarnessError> {
    fixture.validate()?;
    let expected = fixture.expected()?;

    let t = Instant::now();
    let decoder = backend.open_decoder(fixture)?;
    let mut encoder = backend.open_encoder(fixture)?;
    timer.add_stage_time(Stage::Open, t.elapsed());

    let params = fixture.encode_params();
    let (digest, counters) = run_pipeline(decoder, &mut encoder, &params, fixture.digest_alg, config, timer)?;

    let matched = timer.time(Stage::Verify, || expected.verify(&digest))?;

    let status = if matched {
        FixtureStatus::Passed(digest)
    } else {
        FixtureStatus::Mismatch(DigestMismatch {
            fixture: fixture.name().to_string(),
            expected: expected.to_hex(),
            actual: digest.to_hex(),
        })
    };
    Ok((status, counters))
}
