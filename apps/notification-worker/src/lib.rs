//! # ALX Travel 通知ワーカー
//!
//! 予約確認・決済確認メールの送信タスクを、ジョブキュー経由で非同期に実行する。
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`context`] - 依存コンポーネントの組み立て
//! - [`usecase`] - 通知タスク本体
//! - [`worker`] - ジョブの投入・実行

pub mod config;
pub mod context;
pub mod usecase;
pub mod worker;
