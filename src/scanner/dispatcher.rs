//! Bounded-concurrency scan dispatcher
//!
//! Targets are pre-loaded into a queue and pulled by a fixed pool of workers.
//! Each worker runs every origin strategy for its target sequentially, so one
//! target's probes never race each other, while different targets proceed in
//! parallel. The scan is done once every worker has drained the queue.

use crate::error::{CorscanError, Result};
use crate::http::{ProbeClient, Prober};
use crate::models::{CorsHeaderSet, ScanConfig, ScanOutcome, ScanResult};
use crate::random::{RandomSource, ThreadRandom};
use crate::scanner::origin::{mutate, OriginStrategy};
use crate::scanner::progress::ScanProgress;
use crate::scanner::sink::ResultSink;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Lifecycle of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Running,
    Done,
}

impl ScanState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ScanState::Idle,
            1 => ScanState::Running,
            _ => ScanState::Done,
        }
    }
}

#[derive(Default)]
struct Counters {
    targets_completed: AtomicU64,
    probes_sent: AtomicU64,
    probes_failed: AtomicU64,
    probes_skipped: AtomicU64,
    results_recorded: AtomicU64,
}

impl Counters {
    fn snapshot(&self, cancelled: bool) -> ScanOutcome {
        ScanOutcome {
            targets_completed: self.targets_completed.load(Ordering::Relaxed),
            probes_sent: self.probes_sent.load(Ordering::Relaxed),
            probes_failed: self.probes_failed.load(Ordering::Relaxed),
            probes_skipped: self.probes_skipped.load(Ordering::Relaxed),
            results_recorded: self.results_recorded.load(Ordering::Relaxed),
            cancelled,
        }
    }
}

/// State shared by every worker of one scan
struct WorkerContext {
    prober: Arc<dyn Prober>,
    random: Arc<dyn RandomSource>,
    sink: Arc<dyn ResultSink>,
    progress: Option<Arc<dyn ScanProgress>>,
    cancel: CancellationToken,
    counters: Counters,
}

/// Fans targets out to a fixed pool of probe workers
pub struct ScanEngine {
    prober: Arc<dyn Prober>,
    random: Arc<dyn RandomSource>,
    threads: usize,
    progress: Option<Arc<dyn ScanProgress>>,
    cancel: CancellationToken,
    state: AtomicU8,
}

impl ScanEngine {
    /// Creates an engine over any prober. `threads` is clamped to at least one.
    pub fn new(prober: Arc<dyn Prober>, random: Arc<dyn RandomSource>, threads: usize) -> Self {
        Self {
            prober,
            random,
            threads: threads.max(1),
            progress: None,
            cancel: CancellationToken::new(),
            state: AtomicU8::new(0),
        }
    }

    /// Creates an engine probing over HTTP with thread-local randomness
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);
        let client = ProbeClient::from_config(config, Arc::clone(&random))?;
        Ok(Self::new(Arc::new(client), random, config.threads))
    }

    /// Reports one tick per processed target
    pub fn with_progress(mut self, progress: Arc<dyn ScanProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Uses a caller-owned cancellation token instead of a fresh one
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the scan early when cancelled.
    ///
    /// Workers stop pulling targets and skip remaining strategies; a request
    /// already in flight finishes or times out.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> ScanState {
        ScanState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Probes every target and appends positive results to `sink`.
    ///
    /// An engine runs at most once.
    pub async fn run(&self, targets: Vec<String>, sink: Arc<dyn ResultSink>) -> Result<ScanOutcome> {
        if targets.is_empty() {
            return Err(CorscanError::NoTargets);
        }
        if self
            .state
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CorscanError::ScanError(
                "scan engine has already been started".to_string(),
            ));
        }

        let workers = self.threads.min(targets.len());
        info!("Scanning {} targets with {workers} workers", targets.len());

        let (tx, rx) = mpsc::channel::<String>(targets.len());
        for target in targets {
            // Capacity equals the target count, so this never waits.
            if tx.try_send(target).is_err() {
                error!("Work queue rejected a target");
            }
        }
        drop(tx);
        let queue = Arc::new(Mutex::new(rx));

        let ctx = Arc::new(WorkerContext {
            prober: Arc::clone(&self.prober),
            random: Arc::clone(&self.random),
            sink,
            progress: self.progress.clone(),
            cancel: self.cancel.clone(),
            counters: Counters::default(),
        });

        let mut set = JoinSet::new();
        for id in 0..workers {
            let ctx = Arc::clone(&ctx);
            let queue = Arc::clone(&queue);
            set.spawn(async move { worker(id, ctx, queue).await });
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                error!("Scan worker panicked: {e}");
            }
        }

        self.state.store(2, Ordering::Release);
        let outcome = ctx.counters.snapshot(self.cancel.is_cancelled());
        info!(
            "Scan complete: {} targets, {} probes, {} results",
            outcome.targets_completed, outcome.probes_sent, outcome.results_recorded
        );
        Ok(outcome)
    }
}

async fn worker(id: usize, ctx: Arc<WorkerContext>, queue: Arc<Mutex<mpsc::Receiver<String>>>) {
    loop {
        if ctx.cancel.is_cancelled() {
            debug!("Worker {id} stopping: scan cancelled");
            break;
        }
        let next = { queue.lock().await.recv().await };
        let Some(target) = next else {
            break;
        };

        if !probe_target(&ctx, &target).await {
            debug!("Worker {id} left {target} unfinished: scan cancelled");
            break;
        }
        ctx.counters.targets_completed.fetch_add(1, Ordering::Relaxed);
        if let Some(ref progress) = ctx.progress {
            progress.target_completed(&target);
        }
    }
}

/// Runs every strategy against one target, in order.
///
/// Returns `false` when cancellation cut the target short.
async fn probe_target(ctx: &WorkerContext, target: &str) -> bool {
    let candidates = mutate(target, ctx.random.as_ref());
    let skipped = OriginStrategy::ALL.len() - candidates.len();
    ctx.counters
        .probes_skipped
        .fetch_add(skipped as u64, Ordering::Relaxed);

    for candidate in candidates {
        if ctx.cancel.is_cancelled() {
            return false;
        }

        ctx.counters.probes_sent.fetch_add(1, Ordering::Relaxed);
        match ctx.prober.probe(target, &candidate.origin).await {
            Ok(response) => {
                let headers = CorsHeaderSet::from_headers(&response.headers);
                if headers.has_any() {
                    debug!(
                        "CORS headers from {target} for {} origin '{}'",
                        candidate.strategy, candidate.origin
                    );
                    ctx.sink.append(ScanResult::new(
                        target,
                        candidate.origin,
                        candidate.strategy,
                        headers,
                    ));
                    ctx.counters.results_recorded.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                ctx.counters.probes_failed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "{} probe against {target} failed: {e}",
                    candidate.strategy
                );
            }
        }
    }
    true
}
