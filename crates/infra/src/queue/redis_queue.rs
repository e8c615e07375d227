//! Redis ジョブキュー実装
//!
//! ## Redis キー設計
//!
//! | キー | 型 | 値 | TTL |
//! |-----|----|----|-----|
//! | `jobs:notifications` | List | Job (JSON) | なし |
//! | `jobs:notifications:dead` | List | 解析できなかったペイロード（生の文字列） | なし |
//! | `job_result:{job_id}` | String | JobResult (JSON) | 86400秒（24時間） |
//!
//! 投入は `LPUSH`、取り出しは `RPOP`（先に入れたものから取り出す）。
//! `BRPOP` は ConnectionManager の応答タイムアウトと干渉するため使わず、
//! 空の場合は短い間隔でポーリングする。
//!
//! `RPOP` で取り出した時点でリストからは消えるため、JSON として解析できない
//! ペイロードは `jobs:notifications:dead` に退避し、生の値をログに残す。

use std::time::Duration;

use alxtravel_domain::job::{Job, JobId, JobResult};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tokio::time::Instant;

use super::JobQueue;
use crate::InfraError;

/// ジョブを格納するリストのキー
const QUEUE_KEY: &str = "jobs:notifications";

/// 解析できなかったペイロードの退避先
pub const DEAD_LETTER_KEY: &str = "jobs:notifications:dead";

/// 実行結果の保存期間（秒）
/// 24時間 = 86400秒
const RESULT_TTL_SECONDS: u64 = 86400;

/// 空のキューをポーリングする間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Redis を使用したジョブキュー
#[derive(Clone)]
pub struct RedisJobQueue {
    conn: ConnectionManager,
}

impl RedisJobQueue {
    /// 既存の接続から作成する
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Redis に接続して作成する
    ///
    /// # 引数
    ///
    /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
    pub async fn connect(redis_url: &str) -> Result<Self, InfraError> {
        let conn = crate::redis::create_connection_manager(redis_url).await?;
        Ok(Self::new(conn))
    }

    /// 実行結果のキーを生成する
    fn result_key(job_id: &JobId) -> String {
        format!("job_result:{}", job_id.as_uuid())
    }

    async fn pop(&self) -> Result<Option<Job>, InfraError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = redis::cmd("RPOP")
            .arg(QUEUE_KEY)
            .query_async(&mut conn)
            .await?;

        let Some(json) = json else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(job) => Ok(Some(job)),
            Err(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "queue",
                    payload = %json,
                    dead_letter_key = DEAD_LETTER_KEY,
                    "ジョブを解析できないため退避: {}",
                    e
                );
                let _: () = conn.lpush(DEAD_LETTER_KEY, json).await?;
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: &Job) -> Result<(), InfraError> {
        let json = serde_json::to_string(job)?;

        let mut conn = self.conn.clone();
        let _: () = conn.lpush(QUEUE_KEY, json).await?;

        Ok(())
    }

    async fn dequeue(&self, wait: Duration) -> Result<Option<Job>, InfraError> {
        let deadline = Instant::now() + wait;

        loop {
            if let Some(job) = self.pop().await? {
                return Ok(Some(job));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn store_result(&self, result: &JobResult) -> Result<(), InfraError> {
        let key = Self::result_key(&result.job_id);
        let json = serde_json::to_string(result)?;

        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(&key, json, RESULT_TTL_SECONDS).await?;

        Ok(())
    }

    async fn fetch_result(&self, job_id: &JobId) -> Result<Option<JobResult>, InfraError> {
        let key = Self::result_key(job_id);
        let mut conn = self.conn.clone();

        let json: Option<String> = conn.get(&key).await?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
