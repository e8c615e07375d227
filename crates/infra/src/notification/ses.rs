//! SES 通知送信実装
//!
//! AWS SES v2 API を使用してメールを送信する。
//! 本番環境で使用する。

use alxtravel_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    types::{Body, Content, Destination, EmailContent, Message},
};

use super::NotificationSender;

/// SES 通知送信
///
/// `aws_sdk_sesv2::Client` をラップする。
/// 送信元アドレスは SES で検証済みである必要がある。
pub struct SesNotificationSender {
    client: Client,
}

impl SesNotificationSender {
    /// 新しい SES 送信インスタンスを作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn content(data: &str, part: &str) -> Result<Content, NotificationError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| NotificationError::InvalidMessage(format!("{part}構築失敗: {e}")))
}

#[async_trait]
impl NotificationSender for SesNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if email.recipients.is_empty() {
            return Err(NotificationError::InvalidMessage(
                "宛先が指定されていません".to_string(),
            ));
        }

        let destination = Destination::builder()
            .set_to_addresses(Some(email.recipients.clone()))
            .build();

        let body = Body::builder()
            .html(content(&email.html_body, "HTML 本文")?)
            .text(content(&email.text_body, "テキスト本文")?)
            .build();

        let message = Message::builder()
            .subject(content(&email.subject, "件名")?)
            .body(body)
            .build();

        self.client
            .send_email()
            .from_email_address(&email.from)
            .destination(destination)
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SES 送信失敗: {e}")))?;

        Ok(())
    }
}
