//! Background segment-update pipeline
//!
//! Replaces a naive fire-and-forget spawn with a bounded queue consumed by a
//! fixed worker pool. The producer side ([`UpdateQueue::enqueue`]) never
//! blocks the ingestion request, and queued jobs run detached from the
//! originating request's lifetime, so client disconnects and timeouts cannot
//! cut an update short.

use std::sync::Arc;
use std::time::Duration;

use finsight_domain::analytics::AnalyticsService;
use finsight_domain::ports::{
    EventStore, RuleStore, SegmentStore, SegmentUpdateJob, SegmentUpdateQueue,
};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default capacity of the segment-update queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default number of background workers
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Retry budget for one job; nobody waits on this path, so a few transient
/// store failures are worth absorbing here rather than dropping the update
const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Producer half of the segment-update queue
///
/// Implements the domain's `SegmentUpdateQueue` port over a bounded
/// `tokio::sync::mpsc` channel. `try_send` keeps the ingestion path
/// non-blocking: a full or closed channel drops the job.
#[derive(Clone)]
pub struct UpdateQueue {
    tx: mpsc::Sender<SegmentUpdateJob>,
}

/// Create the bounded queue, returning the producer port and the consumer end
pub fn update_queue(capacity: usize) -> (UpdateQueue, mpsc::Receiver<SegmentUpdateJob>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (UpdateQueue { tx }, rx)
}

impl SegmentUpdateQueue for UpdateQueue {
    fn enqueue(&self, job: SegmentUpdateJob) -> bool {
        self.tx.try_send(job).is_ok()
    }
}

/// Spawn the fixed worker pool consuming the queue
///
/// Workers share the receiver behind a mutex; a worker holds it only while
/// waiting for the next job, never while processing one. The pool runs until
/// every producer handle is dropped and the queue is drained.
pub fn spawn_workers<E, S, R, Q>(
    service: Arc<AnalyticsService<E, S, R, Q>>,
    rx: mpsc::Receiver<SegmentUpdateJob>,
    workers: usize,
) -> Vec<JoinHandle<()>>
where
    E: EventStore + 'static,
    S: SegmentStore + 'static,
    R: RuleStore + 'static,
    Q: SegmentUpdateQueue + 'static,
{
    let rx = Arc::new(Mutex::new(rx));

    (0..workers.max(1))
        .map(|worker| {
            let rx = rx.clone();
            let service = service.clone();

            tokio::spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    let Some(job) = job else {
                        break; // queue closed and drained
                    };
                    run_job(&service, &job, worker).await;
                }
                debug!(worker, "segment update worker stopped");
            })
        })
        .collect()
}

/// Run one segment update with bounded retry
///
/// Failures here are non-fatal to the ingestion request that produced the
/// job: after the retry budget is spent, the job is logged and dropped.
async fn run_job<E, S, R, Q>(
    service: &AnalyticsService<E, S, R, Q>,
    job: &SegmentUpdateJob,
    worker: usize,
) where
    E: EventStore,
    S: SegmentStore,
    R: RuleStore,
    Q: SegmentUpdateQueue,
{
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=MAX_ATTEMPTS {
        match service.update_segment(&job.user_id, &job.event_name).await {
            Ok(updated) => {
                if updated {
                    debug!(
                        worker,
                        user_id = %job.user_id,
                        event_name = %job.event_name,
                        "segment membership updated"
                    );
                }
                return;
            }
            Err(err) if attempt < MAX_ATTEMPTS => {
                warn!(
                    worker,
                    user_id = %job.user_id,
                    attempt,
                    error = %err,
                    "segment update failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(err) => {
                warn!(
                    worker,
                    user_id = %job.user_id,
                    event_name = %job.event_name,
                    error = %err,
                    "segment update failed, giving up"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use finsight_domain::analytics::{
        AnalyticsError, CrossSellRule, Event, SegmentRecord, UserId,
    };
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct NullEvents;

    impl EventStore for NullEvents {
        fn append(
            &self,
            _event: &Event,
        ) -> impl std::future::Future<Output = Result<(), AnalyticsError>> + Send {
            async { Ok(()) }
        }

        fn list_by_user(
            &self,
            _user_id: &UserId,
            _limit: i64,
        ) -> impl std::future::Future<Output = Result<Vec<Event>, AnalyticsError>> + Send {
            async { Ok(Vec::new()) }
        }
    }

    #[derive(Clone, Default)]
    struct NullRules;

    impl RuleStore for NullRules {
        fn find_by_segment(
            &self,
            _segment: &str,
        ) -> impl std::future::Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send
        {
            async { Ok(Vec::new()) }
        }

        fn find_all_active(
            &self,
        ) -> impl std::future::Future<Output = Result<Vec<CrossSellRule>, AnalyticsError>> + Send
        {
            async { Ok(Vec::new()) }
        }
    }

    /// Segment store that fails a configurable number of times before
    /// succeeding, to exercise the worker's retry path
    #[derive(Clone, Default)]
    struct FlakySegments {
        records: Arc<StdMutex<HashMap<UserId, SegmentRecord>>>,
        failures_remaining: Arc<StdMutex<u32>>,
    }

    impl FlakySegments {
        fn failing_times(failures: u32) -> Self {
            Self {
                failures_remaining: Arc::new(StdMutex::new(failures)),
                ..Default::default()
            }
        }

        fn labels_for(&self, user_id: &UserId) -> Vec<String> {
            self.records
                .lock()
                .unwrap()
                .get(user_id)
                .map(|r| r.labels().to_vec())
                .unwrap_or_default()
        }
    }

    impl SegmentStore for FlakySegments {
        fn find_by_user(
            &self,
            user_id: &UserId,
        ) -> impl std::future::Future<Output = Result<Option<SegmentRecord>, AnalyticsError>> + Send
        {
            let user_id = *user_id;
            let records = self.records.clone();
            async move { Ok(records.lock().unwrap().get(&user_id).cloned()) }
        }

        fn add_label(
            &self,
            user_id: &UserId,
            label: &str,
        ) -> impl std::future::Future<Output = Result<bool, AnalyticsError>> + Send {
            let user_id = *user_id;
            let label = label.to_string();
            let records = self.records.clone();
            let failures = self.failures_remaining.clone();

            async move {
                {
                    let mut failures = failures.lock().unwrap();
                    if *failures > 0 {
                        *failures -= 1;
                        return Err(AnalyticsError::store_failure("transient"));
                    }
                }
                let mut records = records.lock().unwrap();
                let record = records.entry(user_id).or_insert_with(|| {
                    SegmentRecord::from_parts(user_id, Vec::new(), Utc::now())
                });
                Ok(record.add_label(&label))
            }
        }
    }

    /// Queue stub for the service side; the tests drive the real producer
    /// handle themselves so that dropping it closes the channel
    #[derive(Clone, Default)]
    struct NullQueue;

    impl SegmentUpdateQueue for NullQueue {
        fn enqueue(&self, _job: SegmentUpdateJob) -> bool {
            false
        }
    }

    type WorkerService = AnalyticsService<NullEvents, FlakySegments, NullRules, NullQueue>;

    fn worker_service(segments: FlakySegments) -> Arc<WorkerService> {
        Arc::new(AnalyticsService::new(NullEvents, segments, NullRules, NullQueue))
    }

    async fn wait_for_labels(segments: &FlakySegments, user: &UserId) -> Vec<String> {
        for _ in 0..100 {
            let labels = segments.labels_for(user);
            if !labels.is_empty() {
                return labels;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        segments.labels_for(user)
    }

    #[tokio::test]
    async fn test_workers_drain_queued_jobs() {
        let segments = FlakySegments::default();
        let (queue, rx) = update_queue(8);
        let service = worker_service(segments.clone());
        let handles = spawn_workers(service, rx, 2);

        let user = UserId::from_uuid(uuid::Uuid::new_v4());
        assert!(queue.enqueue(SegmentUpdateJob {
            user_id: user,
            event_name: "loan_applied".to_string(),
        }));

        assert_eq!(wait_for_labels(&segments, &user).await, ["loan_seeker"]);

        drop(queue);
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failure() {
        let segments = FlakySegments::failing_times(2);
        let (queue, rx) = update_queue(8);
        let service = worker_service(segments.clone());
        let handles = spawn_workers(service, rx, 1);

        let user = UserId::from_uuid(uuid::Uuid::new_v4());
        queue.enqueue(SegmentUpdateJob {
            user_id: user,
            event_name: "investment_viewed".to_string(),
        });

        // Two transient failures fit inside the three-attempt budget
        assert_eq!(
            wait_for_labels(&segments, &user).await,
            ["investment_interested"]
        );

        drop(queue);
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_full_queue_rejects_without_blocking() {
        // No workers consuming: the second job cannot fit in a capacity-1 queue
        let (queue, _rx) = update_queue(1);
        let user = UserId::from_uuid(uuid::Uuid::new_v4());
        let job = SegmentUpdateJob {
            user_id: user,
            event_name: "fd_created".to_string(),
        };

        assert!(queue.enqueue(job.clone()));
        assert!(!queue.enqueue(job));
    }
}
