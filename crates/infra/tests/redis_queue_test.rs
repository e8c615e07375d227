//! RedisJobQueue 統合テスト
//!
//! 実行方法:
//! ```bash
//! export REDIS_URL=redis://localhost:6379
//! cargo test -p alxtravel-infra --test redis_queue_test -- --ignored
//! ```
//!
//! キュー本体（`jobs:notifications`）は全テストで共有されるため、
//! 取り出したジョブは ID で照合する。

use std::time::Duration;

use alxtravel_domain::job::{Job, JobId, JobKind, JobResult, JobStatus};
use alxtravel_infra::queue::{DEAD_LETTER_KEY, JobQueue, RedisJobQueue};
use chrono::Utc;
use pretty_assertions::assert_eq;
use redis::AsyncCommands;

fn redis_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

#[tokio::test]
#[ignore = "Redis が必要"]
async fn test_投入したジョブを取り出せる() {
    let sut = RedisJobQueue::connect(&redis_url()).await.unwrap();
    let job = Job::new(JobKind::SendPaymentEmail, "chapa-tx-001", Utc::now());

    sut.enqueue(&job).await.unwrap();

    let mut found = None;
    while let Some(dequeued) = sut.dequeue(Duration::from_millis(500)).await.unwrap() {
        if dequeued.id() == job.id() {
            found = Some(dequeued);
            break;
        }
    }
    assert_eq!(found, Some(job));
}

#[tokio::test]
#[ignore = "Redis が必要"]
async fn test_結果を保存して取得できる() {
    let sut = RedisJobQueue::connect(&redis_url()).await.unwrap();
    let result = JobResult {
        job_id:      JobId::new(),
        kind:        JobKind::SendBookingConfirmationEmail,
        attempt:     1,
        status:      JobStatus::Succeeded,
        message:     "Booking confirmation email sent to a@x.com".to_string(),
        finished_at: Utc::now(),
    };

    sut.store_result(&result).await.unwrap();
    let stored = sut.fetch_result(&result.job_id).await.unwrap();

    assert_eq!(stored, Some(result));
}

#[tokio::test]
#[ignore = "Redis が必要"]
async fn test_未保存の結果はnoneを返す() {
    let sut = RedisJobQueue::connect(&redis_url()).await.unwrap();

    let stored = sut.fetch_result(&JobId::new()).await.unwrap();

    assert_eq!(stored, None);
}

#[tokio::test]
#[ignore = "Redis が必要"]
async fn test_解析できないペイロードは退避キーに移される() {
    let url = redis_url();
    let sut = RedisJobQueue::connect(&url).await.unwrap();
    let mut conn = alxtravel_infra::redis::create_connection_manager(&url)
        .await
        .unwrap();
    let payload = format!("not-a-job-{}", JobId::new());

    let _: () = conn.lpush("jobs:notifications", &payload).await.unwrap();
    while sut.dequeue(Duration::from_millis(200)).await.unwrap().is_some() {}

    let dead: Vec<String> = conn.lrange(DEAD_LETTER_KEY, 0, -1).await.unwrap();
    assert!(dead.contains(&payload));
    let _: () = conn.lrem(DEAD_LETTER_KEY, 0, &payload).await.unwrap();
}
