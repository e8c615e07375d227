//! # 通知ユースケース
//!
//! 予約確認・決済確認メールの生成と送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`service`] - エンティティ読み込み + テンプレートレンダリング + 送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::{NotificationRepositories, NotificationService};
pub use template_renderer::TemplateRenderer;
