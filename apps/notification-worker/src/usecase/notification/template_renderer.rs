//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名は固定**: 予約確認は `Booking Confirmation - ALX Travel App`、
//!   決済確認は `Payment Confirmation`
//! - **値はそのまま埋め込む**: 金額・日付は [`TravelNotification`] に格納された
//!   表記のまま出力し、テンプレート側で再フォーマットしない

use alxtravel_domain::notification::{EmailMessage, NotificationError, TravelNotification};
use tera::{Context, Tera};

/// メール本文に表示する通貨コード
pub const CURRENCY: &str = "ETB";

/// 予約確認メールの件名
pub const BOOKING_CONFIRMATION_SUBJECT: &str = "Booking Confirmation - ALX Travel App";

/// 決済確認メールの件名
pub const PAYMENT_CONFIRMATION_SUBJECT: &str = "Payment Confirmation";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`TravelNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "booking_confirmation.html",
                    include_str!("../../../templates/notifications/booking_confirmation.html"),
                ),
                (
                    "booking_confirmation.txt",
                    include_str!("../../../templates/notifications/booking_confirmation.txt"),
                ),
                (
                    "payment_confirmation.html",
                    include_str!("../../../templates/notifications/payment_confirmation.html"),
                ),
                (
                    "payment_confirmation.txt",
                    include_str!("../../../templates/notifications/payment_confirmation.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `notification`: 通知イベント
    /// - `from_address`: 送信元メールアドレス
    pub fn render(
        &self,
        notification: &TravelNotification,
        from_address: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) = build_template_params(notification);

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            from: from_address.to_string(),
            recipients: vec![notification.recipient_email().to_string()],
            subject: subject.to_string(),
            html_body,
            text_body,
        })
    }
}

/// テンプレート名、件名、コンテキストを構築する
fn build_template_params(
    notification: &TravelNotification,
) -> (&'static str, &'static str, Context) {
    let mut context = Context::new();
    context.insert("currency", CURRENCY);
    context.insert("booking_id", notification.booking_id());

    match notification {
        TravelNotification::BookingConfirmation {
            recipient_name,
            property_name,
            location,
            check_in,
            check_out,
            total_price,
            ..
        } => {
            context.insert("recipient_name", recipient_name);
            context.insert("property_name", property_name);
            context.insert("location", location);
            context.insert("check_in", check_in);
            context.insert("check_out", check_out);
            context.insert("total_price", total_price);
            ("booking_confirmation", BOOKING_CONFIRMATION_SUBJECT, context)
        }
        TravelNotification::PaymentConfirmation {
            recipient_name,
            amount,
            transaction_id,
            ..
        } => {
            context.insert("recipient_name", recipient_name);
            context.insert("amount", amount);
            context.insert("transaction_id", transaction_id);
            ("payment_confirmation", PAYMENT_CONFIRMATION_SUBJECT, context)
        }
    }
}
