//! ジョブ投入
//!
//! 通知タスクをキューに積む。投入が完了した時点で戻り、実行は待たない。

use std::sync::Arc;

use alxtravel_domain::{
    clock::Clock,
    job::{Job, JobHandle, JobId, JobKind, JobResult},
};
use alxtravel_infra::{InfraError, queue::JobQueue};
use alxtravel_shared::{
    event_log::{error, event},
    log_business_event,
};

/// ジョブディスパッチャ
#[derive(Clone)]
pub struct JobDispatcher {
    queue: Arc<dyn JobQueue>,
    clock: Arc<dyn Clock>,
}

impl JobDispatcher {
    pub fn new(queue: Arc<dyn JobQueue>, clock: Arc<dyn Clock>) -> Self {
        Self { queue, clock }
    }

    /// ジョブを投入する
    ///
    /// 引数の妥当性はここでは検証しない。不正な引数のジョブは
    /// ワーカーで失敗として記録される。
    pub async fn submit(
        &self,
        kind: JobKind,
        argument: impl Into<String>,
    ) -> Result<JobHandle, InfraError> {
        let job = Job::new(kind, argument, self.clock.now());

        self.queue.enqueue(&job).await.inspect_err(|e| {
            tracing::error!(
                error.category = error::category::INFRASTRUCTURE,
                error.kind = error::kind::QUEUE,
                "ジョブの投入に失敗: {}",
                e
            );
        })?;

        log_business_event!(
            event.category = event::category::JOB,
            event.action = event::action::JOB_SUBMITTED,
            event.entity_type = event::entity_type::JOB,
            event.entity_id = %job.id(),
            event.result = event::result::SUCCESS,
            job.kind = %kind,
            "ジョブを投入"
        );

        Ok(job.handle())
    }

    /// 予約確認メール送信ジョブを投入する
    pub async fn submit_booking_confirmation(
        &self,
        booking_id: &str,
    ) -> Result<JobHandle, InfraError> {
        self.submit(JobKind::SendBookingConfirmationEmail, booking_id)
            .await
    }

    /// 決済確認メール送信ジョブを投入する
    pub async fn submit_payment_email(&self, transaction_id: &str) -> Result<JobHandle, InfraError> {
        self.submit(JobKind::SendPaymentEmail, transaction_id).await
    }

    /// 投入したジョブの最新の実行結果を取得する
    pub async fn result(&self, job_id: &JobId) -> Result<Option<JobResult>, InfraError> {
        self.queue.fetch_result(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alxtravel_domain::clock::FixedClock;
    use alxtravel_infra::queue::InMemoryJobQueue;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn submitはジョブを投入してハンドルを返す() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let sut = JobDispatcher::new(queue.clone(), Arc::new(FixedClock::new(now)));

        let handle = sut.submit_booking_confirmation("booking-id").await.unwrap();

        assert_eq!(handle.kind, JobKind::SendBookingConfirmationEmail);
        let job = queue.dequeue(Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(job.id(), &handle.id);
        assert_eq!(job.argument(), "booking-id");
        assert_eq!(job.attempt(), 1);
        assert_eq!(job.enqueued_at(), now);
    }

    #[tokio::test]
    async fn submit_payment_emailは決済ジョブを投入する() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let sut = JobDispatcher::new(queue.clone(), Arc::new(FixedClock::new(Utc::now())));

        let handle = sut.submit_payment_email("chapa-tx-001").await.unwrap();

        assert_eq!(handle.kind, JobKind::SendPaymentEmail);
        let job = queue.dequeue(Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(job.kind(), JobKind::SendPaymentEmail);
        assert_eq!(job.argument(), "chapa-tx-001");
    }

    #[tokio::test]
    async fn 未実行のジョブの結果はnone() {
        let queue = Arc::new(InMemoryJobQueue::new());
        let sut = JobDispatcher::new(queue, Arc::new(FixedClock::new(Utc::now())));

        let handle = sut.submit_payment_email("chapa-tx-001").await.unwrap();

        assert_eq!(sut.result(&handle.id).await.unwrap(), None);
    }
}
