//! インメモリジョブキュー実装
//!
//! 単一プロセス内でジョブを受け渡す。ジョブ投入 CLI とワーカーが別プロセスになる
//! 構成では使えないため、ローカル開発と統合テスト向け。

use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, PoisonError},
    time::Duration,
};

use alxtravel_domain::job::{Job, JobId, JobResult};
use async_trait::async_trait;
use tokio::{sync::Notify, time::Instant};

use super::JobQueue;
use crate::InfraError;

/// インメモリジョブキュー
///
/// `Mutex<VecDeque>` に FIFO でジョブを保持し、投入時に [`Notify`] で
/// 待機中のワーカーを 1 つ起こす。
#[derive(Debug, Default)]
pub struct InMemoryJobQueue {
    jobs:    Mutex<VecDeque<Job>>,
    results: Mutex<HashMap<JobId, JobResult>>,
    notify:  Notify,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 待機中のジョブ数
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 待機中のジョブがないか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop(&self) -> Option<Job> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: &Job) -> Result<(), InfraError> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(job.clone());
        // 待機者がいなければ permit として保持され、次の待機が即座に起きる
        self.notify.notify_one();
        Ok(())
    }

    async fn dequeue(&self, wait: Duration) -> Result<Option<Job>, InfraError> {
        let deadline = Instant::now() + wait;

        loop {
            if let Some(job) = self.pop() {
                return Ok(Some(job));
            }
            if tokio::time::timeout_at(deadline, self.notify.notified())
                .await
                .is_err()
            {
                return Ok(self.pop());
            }
        }
    }

    async fn store_result(&self, result: &JobResult) -> Result<(), InfraError> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(result.job_id.clone(), result.clone());
        Ok(())
    }

    async fn fetch_result(&self, job_id: &JobId) -> Result<Option<JobResult>, InfraError> {
        Ok(self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_id)
            .cloned())
    }
}
