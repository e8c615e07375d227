//! # ワーカープール
//!
//! キューからジョブを取り出して [`JobHandler`] で実行し、結果を保存する。
//!
//! ## 再試行
//!
//! ハンドラが再試行可能なエラー（[`NotificationError::is_retryable`]）を返し、
//! 試行回数が `max_attempts` 未満であれば、同じ ID のジョブを試行回数を進めて再投入する。
//! 再投入の前に `Retrying` の結果を保存するため、再試行の結果が古い状態で
//! 上書きされることはない。
//!
//! ## 停止
//!
//! `watch::Receiver<bool>` が `true` になると、各ワーカーは実行中のジョブを
//! 完了させてからループを抜ける。

use std::sync::Arc;

use alxtravel_domain::{
    clock::Clock,
    job::{Job, JobResult, JobStatus},
    notification::NotificationError,
};
use alxtravel_infra::queue::JobQueue;
use alxtravel_shared::{
    event_log::{error, event},
    log_business_event,
};
use tokio::{sync::watch, task::JoinSet};
use tracing::Instrument;

use super::JobHandler;
use crate::config::WorkerPoolConfig;

/// ワーカープール
#[derive(Clone)]
pub struct WorkerPool {
    queue:   Arc<dyn JobQueue>,
    handler: Arc<dyn JobHandler>,
    clock:   Arc<dyn Clock>,
    config:  WorkerPoolConfig,
}

impl WorkerPool {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        handler: Arc<dyn JobHandler>,
        clock: Arc<dyn Clock>,
        config: WorkerPoolConfig,
    ) -> Self {
        Self {
            queue,
            handler,
            clock,
            config,
        }
    }

    /// `concurrency` 個のワーカータスクを起動する
    ///
    /// 返された `JoinSet` をすべて待つと、停止が完了する。
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> JoinSet<()> {
        let mut workers = JoinSet::new();

        for index in 0..self.config.concurrency {
            let pool = self.clone();
            let shutdown = shutdown.clone();
            workers.spawn(
                async move {
                    pool.run(shutdown).await;
                }
                .instrument(tracing::info_span!("worker", worker.index = index)),
            );
        }

        tracing::info!(
            concurrency = self.config.concurrency,
            max_attempts = self.config.max_attempts,
            "ワーカープールを起動"
        );

        workers
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        while !*shutdown.borrow() {
            let job = match self.queue.dequeue(self.config.poll_timeout).await {
                Ok(Some(job)) => job,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(
                        error.category = error::category::INFRASTRUCTURE,
                        error.kind = error::kind::QUEUE,
                        "ジョブの取り出しに失敗: {}",
                        e
                    );
                    // キュー障害中は待機してから再開する
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = tokio::time::sleep(self.config.poll_timeout) => {}
                    }
                    continue;
                }
            };

            let span = tracing::info_span!(
                "job",
                job.id = %job.id(),
                job.kind = %job.kind(),
                job.attempt = job.attempt()
            );
            self.process(job).instrument(span).await;
        }

        tracing::debug!("ワーカーを停止");
    }

    /// ジョブを 1 件実行し、保存した結果を返す
    async fn process(&self, job: Job) -> JobResult {
        match self.handler.handle(&job).await {
            Ok(receipt) => {
                log_business_event!(
                    event.category = event::category::JOB,
                    event.action = event::action::JOB_SUCCEEDED,
                    event.entity_type = event::entity_type::JOB,
                    event.entity_id = %job.id(),
                    event.result = event::result::SUCCESS,
                    "ジョブ成功"
                );
                self.finish(&job, JobStatus::Succeeded, receipt.to_string())
                    .await
            }
            Err(e) if self.should_retry(&job, &e) => {
                let retrying = self.finish(&job, JobStatus::Retrying, e.to_string()).await;

                let next = job.next_attempt(self.clock.now());
                if let Err(queue_error) = self.queue.enqueue(&next).await {
                    tracing::error!(
                        error.category = error::category::INFRASTRUCTURE,
                        error.kind = error::kind::QUEUE,
                        "再試行ジョブの投入に失敗: {}",
                        queue_error
                    );
                    self.log_failed(&job, &e);
                    return self.finish(&job, JobStatus::Failed, e.to_string()).await;
                }

                log_business_event!(
                    event.category = event::category::JOB,
                    event.action = event::action::JOB_RETRIED,
                    event.entity_type = event::entity_type::JOB,
                    event.entity_id = %job.id(),
                    event.result = event::result::FAILURE,
                    job.next_attempt = next.attempt(),
                    error = %e,
                    "ジョブを再投入"
                );
                retrying
            }
            Err(e) => {
                self.log_failed(&job, &e);
                self.finish(&job, JobStatus::Failed, e.to_string()).await
            }
        }
    }

    fn should_retry(&self, job: &Job, error: &NotificationError) -> bool {
        error.is_retryable() && job.attempt() < self.config.max_attempts
    }

    fn log_failed(&self, job: &Job, error: &NotificationError) {
        log_business_event!(
            event.category = event::category::JOB,
            event.action = event::action::JOB_FAILED,
            event.entity_type = event::entity_type::JOB,
            event.entity_id = %job.id(),
            event.result = event::result::FAILURE,
            error = %error,
            "ジョブ失敗"
        );
    }

    /// 結果を保存する。保存に失敗してもジョブの処理自体は完了扱い
    async fn finish(&self, job: &Job, status: JobStatus, message: String) -> JobResult {
        let result = JobResult {
            job_id: job.id().clone(),
            kind: job.kind(),
            attempt: job.attempt(),
            status,
            message,
            finished_at: self.clock.now(),
        };

        if let Err(e) = self.queue.store_result(&result).await {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::RESULT_STORE,
                "ジョブ結果の保存に失敗: {}",
                e
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use alxtravel_domain::{
        clock::FixedClock,
        job::JobKind,
        notification::{NotificationEventType, NotificationReceipt},
    };
    use alxtravel_infra::queue::InMemoryJobQueue;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    /// 事前に積んだ結果を順に返すハンドラ。尽きたら成功を返す
    #[derive(Default)]
    struct ScriptedHandler {
        outcomes: Mutex<VecDeque<Result<NotificationReceipt, NotificationError>>>,
        calls:    AtomicUsize,
    }

    impl ScriptedHandler {
        fn failing_with(error: NotificationError, times: usize) -> Self {
            Self {
                outcomes: Mutex::new(std::iter::repeat_n(Err(error), times).collect()),
                calls:    AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobHandler for ScriptedHandler {
        async fn handle(&self, job: &Job) -> Result<NotificationReceipt, NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(NotificationReceipt {
                        event_type: NotificationEventType::PaymentConfirmation,
                        recipient:  format!("{}@x.com", job.argument()),
                        subject:    "Payment Confirmation".to_string(),
                    })
                })
        }
    }

    struct Fixture {
        queue:   Arc<InMemoryJobQueue>,
        handler: Arc<ScriptedHandler>,
        pool:    WorkerPool,
    }

    fn fixture(handler: ScriptedHandler, max_attempts: u32) -> Fixture {
        let queue = Arc::new(InMemoryJobQueue::new());
        let handler = Arc::new(handler);
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));
        let pool = WorkerPool::new(
            queue.clone(),
            handler.clone(),
            clock,
            WorkerPoolConfig {
                concurrency: 2,
                max_attempts,
                poll_timeout: Duration::from_millis(20),
            },
        );
        Fixture {
            queue,
            handler,
            pool,
        }
    }

    fn send_failed() -> NotificationError {
        NotificationError::SendFailed("connection refused".to_string())
    }

    fn payment_job() -> Job {
        Job::new(JobKind::SendPaymentEmail, "abebe", Utc::now())
    }

    #[tokio::test]
    async fn 成功したジョブはsucceededとして保存される() {
        let fx = fixture(ScriptedHandler::default(), 3);
        let job = payment_job();

        let result = fx.pool.process(job.clone()).await;

        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.message, "Payment confirmation email sent to abebe@x.com");
        assert_eq!(result.attempt, 1);
        assert_eq!(
            fx.queue.fetch_result(job.id()).await.unwrap(),
            Some(result)
        );
        assert!(fx.queue.is_empty());
    }

    #[tokio::test]
    async fn 再試行可能なエラーは試行回数を進めて再投入される() {
        let fx = fixture(ScriptedHandler::failing_with(send_failed(), 1), 3);
        let job = payment_job();

        let result = fx.pool.process(job.clone()).await;

        assert_eq!(result.status, JobStatus::Retrying);
        assert_eq!(
            result.message,
            "Failed to send notification email: connection refused"
        );
        let retried = fx.queue.dequeue(Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(retried.id(), job.id());
        assert_eq!(retried.attempt(), 2);
        assert_eq!(retried.argument(), "abebe");

        let result = fx.pool.process(retried).await;

        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.attempt, 2);
        assert_eq!(fx.handler.calls(), 2);
    }

    #[tokio::test]
    async fn 最大試行回数に達するとfailedになる() {
        let fx = fixture(ScriptedHandler::failing_with(send_failed(), 5), 3);
        let mut job = payment_job();
        let mut statuses = Vec::new();

        loop {
            let result = fx.pool.process(job).await;
            statuses.push(result.status);
            match fx.queue.dequeue(Duration::ZERO).await.unwrap() {
                Some(next) => job = next,
                None => break,
            }
        }

        assert_eq!(
            statuses,
            vec![JobStatus::Retrying, JobStatus::Retrying, JobStatus::Failed]
        );
        assert_eq!(fx.handler.calls(), 3);
    }

    #[tokio::test]
    async fn 再試行不可のエラーは再投入されない() {
        let not_found = NotificationError::NotFound {
            entity_type: "Payment",
            id:          "abebe".to_string(),
        };
        let fx = fixture(ScriptedHandler::failing_with(not_found, 1), 3);
        let job = payment_job();

        let result = fx.pool.process(job.clone()).await;

        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(result.message, "Payment with ID abebe not found");
        assert!(fx.queue.is_empty());
        assert_eq!(fx.handler.calls(), 1);
    }

    #[tokio::test]
    async fn max_attemptsが1なら再試行しない() {
        let fx = fixture(ScriptedHandler::failing_with(send_failed(), 1), 1);

        let result = fx.pool.process(payment_job()).await;

        assert_eq!(result.status, JobStatus::Failed);
        assert!(fx.queue.is_empty());
    }

    #[tokio::test]
    async fn 起動したワーカーがジョブを処理し停止信号で終了する() {
        let fx = fixture(ScriptedHandler::default(), 3);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers = fx.pool.spawn(shutdown_rx);

        let job = payment_job();
        fx.queue.enqueue(&job).await.unwrap();

        let mut stored = None;
        for _ in 0..100 {
            stored = fx.queue.fetch_result(job.id()).await.unwrap();
            if stored.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(stored.map(|r| r.status), Some(JobStatus::Succeeded));

        shutdown_tx.send(true).unwrap();
        let mut stopped = 0;
        while let Some(joined) = workers.join_next().await {
            joined.unwrap();
            stopped += 1;
        }
        assert_eq!(stopped, 2);
    }
}
