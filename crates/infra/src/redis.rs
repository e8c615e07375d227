//! # Redis 接続管理
//!
//! ジョブキューと結果ストアで共有する Redis 接続を作成する。
//!
//! `ConnectionManager` は切断時に自動で再接続し、`clone()` で安価に複製できる。
//! 各ワーカーはクローンした接続でコマンドを発行する。

use redis::aio::ConnectionManager;

use crate::InfraError;

/// Redis ConnectionManager を作成する
///
/// # 引数
///
/// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, InfraError> {
    let client = redis::Client::open(redis_url)?;
    let conn = ConnectionManager::new(client).await?;
    Ok(conn)
}
