use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tracing::{info, warn};

use super::{ChatBackend, ChatReply, ChatRequest};
use crate::error::LlmError;

/// Priority level for LLM requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    /// High priority: delegated coworker work that a waiting manager depends on
    High,
    /// Normal priority: top-level task turns
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Normal => "NORMAL",
        }
    }
}

/// A request to be queued for LLM processing
struct QueuedRequest {
    request: ChatRequest,
    response_tx: oneshot::Sender<Result<ChatReply, LlmError>>,
}

/// LLM Queue that limits concurrent requests and prioritizes delegated work
#[derive(Clone)]
pub struct LLMQueue {
    high_tx: mpsc::Sender<QueuedRequest>,
    normal_tx: mpsc::Sender<QueuedRequest>,
}

impl LLMQueue {
    /// Create a new LLM Queue over the given backend. Must be called inside a tokio runtime.
    pub fn new(backend: Arc<dyn ChatBackend>, max_concurrent: usize, queue_size: usize) -> Self {
        let (high_tx, high_rx) = mpsc::channel::<QueuedRequest>(queue_size.max(1));
        let (normal_tx, normal_rx) = mpsc::channel::<QueuedRequest>(queue_size.max(1));

        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

        tokio::spawn(Self::process_queue(backend, semaphore, high_rx, normal_rx));

        Self { high_tx, normal_tx }
    }

    /// Process queued requests, prioritizing high-priority over normal-priority
    async fn process_queue(
        backend: Arc<dyn ChatBackend>,
        semaphore: Arc<Semaphore>,
        mut high_rx: mpsc::Receiver<QueuedRequest>,
        mut normal_rx: mpsc::Receiver<QueuedRequest>,
    ) {
        info!(
            "📬 [QUEUE] LLM Queue processor started (max concurrent: {})",
            semaphore.available_permits()
        );

        loop {
            let queued = tokio::select! {
                biased;

                Some(req) = high_rx.recv() => {
                    info!("📬 [QUEUE] Processing HIGH priority request");
                    req
                }
                Some(req) = normal_rx.recv() => {
                    info!("📬 [QUEUE] Processing NORMAL priority request");
                    req
                }
                else => {
                    info!("📬 [QUEUE] All channels closed, shutting down");
                    break;
                }
            };

            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("📬 [QUEUE] Semaphore closed, dropping request");
                    let _ = queued.response_tx.send(Err(LlmError::QueueClosed));
                    continue;
                }
            };

            info!(
                "📬 [QUEUE] Acquired permit. {} slots remaining",
                semaphore.available_permits()
            );

            let backend = backend.clone();
            tokio::spawn(async move {
                let result = backend.complete(queued.request).await;
                let _ = queued.response_tx.send(result);
                drop(permit);
            });
        }
    }

    /// Send a chat request with the specified priority and wait for the reply
    pub async fn complete(
        &self,
        request: ChatRequest,
        priority: Priority,
    ) -> Result<ChatReply, LlmError> {
        let (response_tx, response_rx) = oneshot::channel();
        let queued = QueuedRequest {
            request,
            response_tx,
        };

        let send_result = match priority {
            Priority::High => self.high_tx.send(queued).await,
            Priority::Normal => self.normal_tx.send(queued).await,
        };
        if send_result.is_err() {
            return Err(LlmError::QueueClosed);
        }

        response_rx.await.map_err(|_| LlmError::Cancelled)?
    }
}
