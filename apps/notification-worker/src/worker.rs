//! # ジョブ実行基盤
//!
//! 通知タスクをジョブキュー経由で非同期に実行する。
//!
//! ## 構成
//!
//! ```text
//! JobDispatcher ──enqueue──▶ JobQueue ◀──dequeue── WorkerPool ──handle──▶ JobHandler
//!                                │                      │
//!                                └◀──store_result───────┘
//! ```
//!
//! - [`JobDispatcher`]: ジョブを投入し、[`JobHandle`](alxtravel_domain::job::JobHandle) を返す
//! - [`WorkerPool`]: 複数のワーカータスクでジョブを取り出して実行し、結果を保存する
//! - [`JobHandler`]: ジョブ 1 件の実処理。[`NotificationService`] が実装する

mod dispatcher;
mod pool;

use alxtravel_domain::{
    job::{Job, JobKind},
    notification::{NotificationError, NotificationReceipt},
};
use async_trait::async_trait;
pub use dispatcher::JobDispatcher;
pub use pool::WorkerPool;

use crate::usecase::NotificationService;

/// ジョブ 1 件を実行するトレイト
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<NotificationReceipt, NotificationError>;
}

#[async_trait]
impl JobHandler for NotificationService {
    async fn handle(&self, job: &Job) -> Result<NotificationReceipt, NotificationError> {
        match job.kind() {
            JobKind::SendBookingConfirmationEmail => {
                self.send_booking_confirmation_email(job.argument()).await
            }
            JobKind::SendPaymentEmail => self.send_payment_email(job.argument()).await,
        }
    }
}
