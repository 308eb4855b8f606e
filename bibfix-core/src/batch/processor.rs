use std::collections::VecDeque;
use std::time::Duration;

use rayon::prelude::*;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::backup::store::BatchSink;
use crate::batch::id::generate_batch_id;
use crate::batch::window::TimeWindow;
use crate::error::{FixError, Result};
use crate::fix::{FixOutcome, FixSession};
use crate::record::RecordId;

pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// How long the walk sleeps when the operating window is closed.
pub const GATE_PAUSE: Duration = Duration::from_secs(20 * 60);

/// Wall-clock boundary, injected so the gate is testable.
pub trait Clock: Send + Sync {
    fn local_hour(&self) -> u8;
    fn pause(&self, d: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u8 {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .hour()
    }

    fn pause(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub chunk_size: usize,
    pub window: Option<TimeWindow>,
    pub gate_pause: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            window: None,
            gate_pause: GATE_PAUSE,
        }
    }
}

#[derive(Debug)]
pub struct RecordFailure {
    pub record_id: RecordId,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub batch_id: String,
    pub total: usize,
    pub fixed: Vec<RecordId>,
    pub failed: Vec<RecordFailure>,
    /// Records fixed upstream whose backup write failed.
    pub unsaved: Vec<RecordId>,
}

/// Walks a worklist of id chunks: gate on the operating window, fan each
/// chunk's fixes out with per-record failure isolation, persist the chunk's
/// outcomes, report progress, repeat until drained. No cross-chunk
/// concurrency: chunk N+1 starts only after chunk N's backup write resolved.
pub struct BatchProcessor<'a> {
    session: FixSession<'a>,
    store: &'a mut dyn BatchSink,
    clock: &'a dyn Clock,
    opts: BatchOptions,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        session: FixSession<'a>,
        store: &'a mut dyn BatchSink,
        clock: &'a dyn Clock,
        opts: BatchOptions,
    ) -> Result<Self> {
        if opts.chunk_size == 0 {
            return Err(FixError::Config("chunk size must be at least 1".into()));
        }
        Ok(Self {
            session,
            store,
            clock,
            opts,
        })
    }

    pub fn run(&mut self, ids: &[RecordId]) -> Result<BatchSummary> {
        let batch_id = generate_batch_id();
        let total = ids.len();
        let mut worklist: VecDeque<Vec<RecordId>> = chunk_ids(ids, self.opts.chunk_size).into();
        let mut summary = BatchSummary {
            batch_id: batch_id.clone(),
            total,
            ..BatchSummary::default()
        };
        let mut processed = 0usize;

        loop {
            // Drain before gating: an exhausted (or empty) worklist is done
            // immediately, never waiting out a closed window first.
            if worklist.is_empty() {
                break;
            }

            // Gate: re-checked on every resumption, so a window closing
            // mid-run pauses later chunks without touching the current one.
            if let Some(window) = &self.opts.window {
                let hour = self.clock.local_hour();
                if !window.permits(hour) {
                    info!(
                        hour,
                        pause_secs = self.opts.gate_pause.as_secs(),
                        "outside operating window, pausing"
                    );
                    self.clock.pause(self.opts.gate_pause);
                    continue;
                }
            }

            let Some(chunk) = worklist.pop_front() else {
                break;
            };

            // Process-chunk: concurrent fixes, joined into an index-aligned
            // sparse vector so persistence follows the input id order.
            let session = self.session;
            let joined: Vec<std::result::Result<FixOutcome, RecordFailure>> = chunk
                .par_iter()
                .map(|id| {
                    session.fix_id(*id).map_err(|e| RecordFailure {
                        record_id: *id,
                        message: e.to_string(),
                    })
                })
                .collect();

            let mut outcomes: Vec<Option<FixOutcome>> = Vec::with_capacity(joined.len());
            for result in joined {
                match result {
                    Ok(outcome) => {
                        info!(id = %outcome.record_id(), batch = %batch_id, "record fixed");
                        summary.fixed.push(outcome.record_id());
                        outcomes.push(Some(outcome));
                    }
                    Err(failure) => {
                        warn!(
                            id = %failure.record_id,
                            error = %failure.message,
                            "fix failed, continuing with remaining records"
                        );
                        outcomes.push(None);
                        summary.failed.push(failure);
                    }
                }
            }

            match self.store.save_batch(&outcomes, &batch_id) {
                Ok(receipt) => {
                    info!(batch = %batch_id, inserted = receipt.inserted_count, "backup saved");
                }
                Err(e) => {
                    // Accepted gap: these fixes stand upstream without a
                    // backup entry.
                    error!(batch = %batch_id, error = %e, "backup write failed, continuing");
                    summary
                        .unsaved
                        .extend(outcomes.iter().flatten().map(FixOutcome::record_id));
                }
            }

            processed += chunk.len();
            let percent = if total == 0 {
                100
            } else {
                processed * 100 / total
            };
            info!(processed, total, percent, "batch progress");
        }

        info!(
            batch = %summary.batch_id,
            fixed = summary.fixed.len(),
            failed = summary.failed.len(),
            "batch complete"
        );
        Ok(summary)
    }
}

/// Split ids into ordered chunks of at most `size` elements.
pub fn chunk_ids(ids: &[RecordId], size: usize) -> Vec<Vec<RecordId>> {
    ids.chunks(size.max(1)).map(<[RecordId]>::to_vec).collect()
}
