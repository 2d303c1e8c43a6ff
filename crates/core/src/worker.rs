//! Background decoding through a strict FIFO queue.
//!
//! A [`DecodeQueue`] owns one worker and an actor task. Jobs are enqueued
//! at the moment [`DecodeQueue::submit`] is called, and the actor hands the
//! oldest job to the worker only once the previous job's result has been
//! delivered. Results therefore resolve in submission order and never
//! overlap, without any request/response correlation.

use crate::decode::{DecodeRequest, DecodeResponse, decode_request};
use crate::error::{EditorError, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Something that turns a decode request into an RGBA response.
///
/// Runs on a blocking thread, one call at a time.
pub trait DecodeWorker: Send + Sync + 'static {
    fn decode(&self, request: DecodeRequest) -> Result<DecodeResponse>;
}

/// The standard worker: header parsing, sample reading and RGBA conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineWorker;

impl DecodeWorker for PipelineWorker {
    fn decode(&self, request: DecodeRequest) -> Result<DecodeResponse> {
        decode_request(&request).map(DecodeResponse::from)
    }
}

struct Job {
    id: u64,
    request: DecodeRequest,
    reply: oneshot::Sender<Result<DecodeResponse>>,
}

/// Single-concurrency decode queue with ordered completion.
///
/// Dropping the queue lets already-submitted jobs finish, then stops the actor.
pub struct DecodeQueue {
    jobs: mpsc::UnboundedSender<Job>,
    next_id: AtomicU64,
}

impl DecodeQueue {
    /// Starts the actor on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Runtime`] when called outside a runtime.
    pub fn spawn(worker: impl DecodeWorker) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            EditorError::Runtime(format!("decode queue needs a tokio runtime: {}", e))
        })?;
        let (jobs, inbox) = mpsc::unbounded_channel();
        runtime.spawn(run_jobs(Arc::new(worker), inbox));
        Ok(Self {
            jobs,
            next_id: AtomicU64::new(0),
        })
    }

    /// Enqueues `request` and returns a future for its result.
    ///
    /// The queue position is fixed by this call, not by when the returned
    /// future is first polled.
    pub fn submit(&self, request: DecodeRequest) -> BoxFuture<'static, Result<DecodeResponse>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, response) = oneshot::channel();
        debug!(id, kind = request.kind(), "Queueing decode job");
        let queued = self.jobs.send(Job { id, request, reply });

        async move {
            queued.map_err(|_| EditorError::WorkerClosed)?;
            response.await.map_err(|_| EditorError::WorkerClosed)?
        }
        .boxed()
    }
}

async fn run_jobs(worker: Arc<dyn DecodeWorker>, mut inbox: mpsc::UnboundedReceiver<Job>) {
    while let Some(Job { id, request, reply }) = inbox.recv().await {
        debug!(id, "Posting decode job to worker");
        let worker = Arc::clone(&worker);
        let result = match tokio::task::spawn_blocking(move || worker.decode(request)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(id, "Decode worker task failed: {}", e);
                Err(EditorError::Runtime(e.to_string()))
            }
        };

        if reply.send(result).is_err() {
            debug!(id, "Decode result dropped, caller went away");
        }
    }
    debug!("Decode queue closed");
}
