//! # ALX Travel インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ユースケース層が依存するインターフェース（リポジトリ・メール送信・ジョブキューの
//! トレイト）と、その具体的な実装を提供する。外部システムの詳細をカプセル化し、
//! 通知ロジックを特定のストレージ技術から切り離す。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **リポジトリ実装**: 予約・物件・ユーザー・決済の読み取り
//! - **メール送信**: SMTP / SES / Noop
//! - **ジョブキュー**: Redis / インメモリ
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`redis`] - Redis 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ
//! - [`notification`] - メール送信
//! - [`queue`] - ジョブキュー
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use alxtravel_infra::{db, queue::RedisJobQueue};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/alxtravel").await?;
//!     let queue = RedisJobQueue::connect("redis://localhost").await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod notification;
pub mod queue;
pub mod redis;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
