//! # メール送信
//!
//! 予約確認・決済確認メールの配送を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール配送を抽象化
//! - **3 つの実装**: SMTP（Mailpit 等のローカルリレー）、SES（本番用）、Noop（ログのみ）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **失敗は隠さない**: 配送エラーは必ず `NotificationError::SendFailed` として返す

mod noop;
mod ses;
mod smtp;

use alxtravel_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use ses::SesNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 送信元アドレスは [`EmailMessage::from`] で渡される。
/// 実装は送信元を保持しない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
