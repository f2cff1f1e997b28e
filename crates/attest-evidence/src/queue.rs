use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::{mpsc, Mutex};

use attest_core::EvidenceId;

use crate::error::EvidenceError;
use crate::pipeline::PinPipeline;

/// Worker-pool front end for the pin pipeline.
///
/// Upload requests return immediately after record creation; pinning happens
/// out-of-band on these workers. The queue deduplicates submissions for an
/// evidence id already in flight — the pipeline itself assumes at-most-one
/// job per id.
pub struct PinQueue {
    tx: mpsc::Sender<EvidenceId>,
    in_flight: Arc<DashSet<EvidenceId>>,
}

impl PinQueue {
    /// Start `workers` tasks draining a bounded queue of `capacity` jobs.
    pub fn start(pipeline: Arc<PinPipeline>, workers: usize, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<EvidenceId>(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let in_flight: Arc<DashSet<EvidenceId>> = Arc::new(DashSet::new());

        for worker in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let in_flight = Arc::clone(&in_flight);
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                loop {
                    let job = {
                        let mut rx = rx.lock().await;
                        rx.recv().await
                    };
                    let Some(id) = job else { break };

                    if let Err(err) = pipeline.run(id).await {
                        // Retry/dead-letter policy lives with the scheduler's
                        // operator; the queue only surfaces the outcome.
                        tracing::warn!(worker, evidence_id = %id, error = %err, "pin job failed");
                    }
                    in_flight.remove(&id);
                }
                tracing::debug!(worker, "pin worker stopped");
            });
        }

        Self { tx, in_flight }
    }

    /// Enqueue a pin job.
    ///
    /// Returns `Ok(true)` when enqueued, `Ok(false)` when dropped as a
    /// duplicate of an in-flight job.
    pub async fn submit(&self, id: EvidenceId) -> Result<bool, EvidenceError> {
        if !self.in_flight.insert(id) {
            tracing::debug!(evidence_id = %id, "duplicate pin submission dropped");
            return Ok(false);
        }
        if self.tx.send(id).await.is_err() {
            self.in_flight.remove(&id);
            return Err(EvidenceError::QueueClosed);
        }
        Ok(true)
    }

    /// Number of jobs currently queued or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
