//! # 通知
//!
//! 予約・決済に伴うメール通知のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`TravelNotification`] | 通知イベント | 予約確認・決済確認の 2 種類 |
//! | [`NotificationEventType`] | 通知イベント種別 | ログ・ジョブ結果に記録される識別子 |
//! | [`NotificationReceipt`] | 送信結果 | 送信成功時の戻り値 |
//! | [`NotificationError`] | 通知エラー | 送信に至らなかった理由 |
//!
//! ## 設計方針
//!
//! - **型付きの結果**: 予約確認・決済確認の両方が
//!   `Result<NotificationReceipt, NotificationError>` を返す。失敗を文字列に
//!   埋め込まず、呼び出し側（ワーカー）が再試行の要否を判断できるようにする
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は
//!   notification-worker 側）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知送信エラー
///
/// メッセージは英語で、ジョブ結果としてそのまま保存・表示される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// 識別子として解釈できない入力
    #[error("Invalid {entity_type} ID: {value}")]
    InvalidIdentifier {
        entity_type: &'static str,
        value:       String,
    },

    /// 参照先のエンティティが存在しない
    #[error("{entity_type} with ID {id} not found")]
    NotFound {
        entity_type: &'static str,
        id:          String,
    },

    /// リポジトリ（DB）からの読み込みに失敗
    #[error("Failed to load notification data: {0}")]
    Lookup(String),

    /// 保存済みデータがドメインの制約を満たさない
    #[error("Stored notification data is invalid: {0}")]
    InvalidData(String),

    /// テンプレートレンダリングに失敗
    #[error("Failed to render notification template: {0}")]
    TemplateFailed(String),

    /// メール送信に失敗
    #[error("Failed to send notification email: {0}")]
    SendFailed(String),

    /// 宛先・送信元アドレスなど、送信前のメッセージ組み立てに失敗
    #[error("Failed to build notification email: {0}")]
    InvalidMessage(String),
}

impl NotificationError {
    /// 再試行で回復し得るエラーかどうか
    ///
    /// DB やメールサーバーの一時的な障害は再試行対象。
    /// 入力不正・参照先なし・保存データ不正・テンプレート不備・メッセージ不正は
    /// 何度実行しても同じ結果になる。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Lookup(_) | Self::SendFailed(_))
    }
}

/// 通知イベント種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    /// 予約確認: 予約作成時 → 予約者に送信
    BookingConfirmation,
    /// 決済確認: 決済記録作成時 → 予約者に送信
    PaymentConfirmation,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:       String,
    /// 送信先メールアドレス
    pub recipients: Vec<String>,
    /// 件名
    pub subject:    String,
    /// HTML 本文
    pub html_body:  String,
    /// プレーンテキスト本文
    pub text_body:  String,
}

/// 通知イベント
///
/// リポジトリから読み込んだ値をテンプレートに渡す形に展開したもの。
/// 値は保存されている表記のまま（金額は小数点以下 2 桁、日付は ISO 8601）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TravelNotification {
    /// 予約確認
    BookingConfirmation {
        recipient_email: String,
        recipient_name:  String,
        property_name:   String,
        location:        String,
        check_in:        String,
        check_out:       String,
        total_price:     String,
        booking_id:      String,
    },
    /// 決済確認
    PaymentConfirmation {
        recipient_email: String,
        recipient_name:  String,
        amount:          String,
        transaction_id:  String,
        booking_id:      String,
    },
}

impl TravelNotification {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::BookingConfirmation { .. } => NotificationEventType::BookingConfirmation,
            Self::PaymentConfirmation { .. } => NotificationEventType::PaymentConfirmation,
        }
    }

    /// 受信者のメールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::BookingConfirmation {
                recipient_email, ..
            }
            | Self::PaymentConfirmation {
                recipient_email, ..
            } => recipient_email,
        }
    }

    /// 関連する予約 ID を返す
    pub fn booking_id(&self) -> &str {
        match self {
            Self::BookingConfirmation { booking_id, .. }
            | Self::PaymentConfirmation { booking_id, .. } => booking_id,
        }
    }
}

/// 送信結果
///
/// `Display` は人が読むための確認メッセージ
/// （例: `Booking confirmation email sent to a@x.com`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub event_type: NotificationEventType,
    pub recipient:  String,
    pub subject:    String,
}

impl std::fmt::Display for NotificationReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.event_type {
            NotificationEventType::BookingConfirmation => "Booking confirmation",
            NotificationEventType::PaymentConfirmation => "Payment confirmation",
        };
        write!(f, "{label} email sent to {}", self.recipient)
    }
}
