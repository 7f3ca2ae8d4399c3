use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, OwnedPermit};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::PoolError;
use crate::handlers::judge::JudgeCoordinator;

const PANIC_MESSAGE: &str = "Judging task panicked";

/// Fixed set of workers judging submissions from a bounded queue.
///
/// Admission never waits: when the queue is full, callers get [`PoolError::QueueFull`].
pub struct JudgePool {
    sender: mpsc::Sender<i32>,
    workers: Vec<JoinHandle<()>>,
    capacity: usize,
}

/// A reserved queue slot. Dropping it releases the slot.
pub struct QueueSlot(OwnedPermit<i32>);

impl QueueSlot {
    pub fn send(self, submission_id: i32) {
        self.0.send(submission_id);
    }
}

impl JudgePool {
    pub fn start(
        coordinator: Arc<JudgeCoordinator>,
        pool_size: usize,
        queue_capacity: usize,
    ) -> Self {
        let capacity = queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..pool_size.max(1))
            .map(|worker| {
                let receiver = receiver.clone();
                let coordinator = coordinator.clone();
                tokio::spawn(async move { work(worker, receiver, coordinator).await })
            })
            .collect::<Vec<_>>();

        info!(workers = workers.len(), capacity, "Judge pool started");
        Self {
            sender,
            workers,
            capacity,
        }
    }

    /// Queue a submission for judging.
    pub fn submit(&self, submission_id: i32) -> Result<(), PoolError> {
        self.sender
            .try_send(submission_id)
            .map_err(|e| self.admission_error(e))
    }

    /// Reserve a queue slot without committing a submission to it yet.
    pub fn reserve(&self) -> Result<QueueSlot, PoolError> {
        self.sender
            .clone()
            .try_reserve_owned()
            .map(QueueSlot)
            .map_err(|e| self.admission_error(e))
    }

    /// Stop accepting work, then wait until every queued submission is judged.
    pub async fn shutdown(self) {
        drop(self.sender);
        for handle in self.workers {
            if let Err(e) = handle.await {
                error!(error = %e, "Judge worker terminated abnormally");
            }
        }
        info!("Judge pool stopped");
    }

    fn admission_error<T>(&self, err: TrySendError<T>) -> PoolError {
        match err {
            TrySendError::Full(_) => PoolError::QueueFull {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => PoolError::Closed,
        }
    }
}

async fn work(
    worker: usize,
    receiver: Arc<Mutex<mpsc::Receiver<i32>>>,
    coordinator: Arc<JudgeCoordinator>,
) {
    loop {
        let Some(submission_id) = receiver.lock().await.recv().await else {
            break;
        };
        debug!(worker, submission_id, "Picked up submission");

        // A panic while judging takes down that task only, not the worker.
        let judged = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.judge(submission_id).await }
        })
        .await;
        if let Err(e) = judged {
            error!(worker, submission_id, error = %e, "Judging task panicked");
            coordinator.fail(submission_id, PANIC_MESSAGE).await;
        }
    }
    debug!(worker, "Queue closed, worker exiting");
}
