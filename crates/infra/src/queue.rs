//! # ジョブキュー
//!
//! 通知ジョブの受け渡しと実行結果の保存を担当する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `JobQueue` trait でキューの実装を隠蔽する
//! - **2 つの実装**: Redis（本番・複数プロセス間）、インメモリ（単一プロセス・テスト用）
//! - **環境変数切替**: `QUEUE_BACKEND` でランタイム選択
//! - **順序保証なし**: 再投入されたジョブは末尾に並ぶ。重複排除も行わない
//!
//! ## 結果の保存
//!
//! ワーカーは試行ごとに [`JobResult`] を保存する。同じジョブ ID の結果は上書きされ、
//! 最後に保存されたものが最新の状態になる。

mod memory;
mod redis_queue;

use std::time::Duration;

use alxtravel_domain::job::{Job, JobId, JobResult};
use async_trait::async_trait;
pub use memory::InMemoryJobQueue;
pub use redis_queue::{DEAD_LETTER_KEY, RedisJobQueue};

use crate::InfraError;

/// ジョブキュートレイト
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// ジョブを投入する
    async fn enqueue(&self, job: &Job) -> Result<(), InfraError>;

    /// ジョブを 1 件取り出す
    ///
    /// キューが空の場合は最大 `wait` だけ待機し、それでも空なら `Ok(None)` を返す。
    async fn dequeue(&self, wait: Duration) -> Result<Option<Job>, InfraError>;

    /// ジョブの実行結果を保存する
    async fn store_result(&self, result: &JobResult) -> Result<(), InfraError>;

    /// ジョブの実行結果を取得する
    ///
    /// まだ実行されていない、または保存期限を過ぎた場合は `Ok(None)`。
    async fn fetch_result(&self, job_id: &JobId) -> Result<Option<JobResult>, InfraError>;
}
