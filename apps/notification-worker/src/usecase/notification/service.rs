//! # 通知サービス
//!
//! エンティティ読み込み → テンプレートレンダリング → メール送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **型付きの結果**: 予約確認・決済確認とも `Result<NotificationReceipt, NotificationError>`
//!   を返す。再試行するかどうかは呼び出し側（ワーカー）が
//!   [`NotificationError::is_retryable`] で判断する
//! - **送信前の失敗では何も送らない**: 読み込みやレンダリングで失敗した場合、
//!   `NotificationSender` は呼ばれない
//! - **実行形態に依存しない**: インライン呼び出しでもキュー経由でも同じ処理になる
//! - **依存性注入**: リポジトリと `NotificationSender` は trait で抽象化

use std::sync::Arc;

use alxtravel_domain::{
    booking::{Booking, BookingId},
    listing::Listing,
    notification::{NotificationError, NotificationEventType, NotificationReceipt, TravelNotification},
    payment::TransactionId,
    user::User,
};
use alxtravel_infra::{
    InfraError,
    InfraErrorKind,
    notification::NotificationSender,
    repository::{BookingRepository, ListingRepository, PaymentRepository, UserRepository},
};
use alxtravel_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::TemplateRenderer;

/// 通知に必要なリポジトリ一式
#[derive(Clone)]
pub struct NotificationRepositories {
    pub bookings: Arc<dyn BookingRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub users:    Arc<dyn UserRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

/// 通知サービス
pub struct NotificationService {
    repositories:      NotificationRepositories,
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    from_address:      String,
}

impl NotificationService {
    pub fn new(
        repositories: NotificationRepositories,
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        from_address: String,
    ) -> Self {
        Self {
            repositories,
            sender,
            template_renderer,
            from_address,
        }
    }

    /// 予約確認メールを送信する
    ///
    /// # エラー
    ///
    /// - `InvalidIdentifier`: `booking_id` が UUID として解釈できない
    /// - `NotFound`: 予約、または予約が参照するユーザー・物件が存在しない
    /// - `Lookup`: リポジトリからの読み込みに失敗
    /// - `InvalidData`: 保存済みの値がドメインの制約を満たさない
    /// - `TemplateFailed` / `SendFailed`: レンダリング・送信に失敗
    #[tracing::instrument(skip_all, fields(%booking_id))]
    pub async fn send_booking_confirmation_email(
        &self,
        booking_id: &str,
    ) -> Result<NotificationReceipt, NotificationError> {
        let result = match self.booking_confirmation(booking_id).await {
            Ok(notification) => self.deliver(&notification).await,
            Err(e) => Err(e),
        };

        log_outcome(
            NotificationEventType::BookingConfirmation,
            event::entity_type::BOOKING,
            booking_id,
            &result,
        );
        result
    }

    /// 決済確認メールを送信する
    ///
    /// 取引 ID から決済 → 予約 → ユーザーの順に辿り、予約者に送信する。
    #[tracing::instrument(skip_all, fields(%transaction_id))]
    pub async fn send_payment_email(
        &self,
        transaction_id: &str,
    ) -> Result<NotificationReceipt, NotificationError> {
        let result = match self.payment_confirmation(transaction_id).await {
            Ok(notification) => self.deliver(&notification).await,
            Err(e) => Err(e),
        };

        log_outcome(
            NotificationEventType::PaymentConfirmation,
            event::entity_type::PAYMENT,
            transaction_id,
            &result,
        );
        result
    }

    /// 予約確認メールの内容を組み立てる
    async fn booking_confirmation(
        &self,
        booking_id: &str,
    ) -> Result<TravelNotification, NotificationError> {
        let id = BookingId::parse_str(booking_id).map_err(|_| {
            NotificationError::InvalidIdentifier {
                entity_type: "Booking",
                value:       booking_id.to_string(),
            }
        })?;

        let booking = self
            .repositories
            .bookings
            .find_by_id(&id)
            .await
            .map_err(lookup_failed("Booking"))?
            .ok_or_else(|| NotificationError::NotFound {
                entity_type: "Booking",
                id:          booking_id.to_string(),
            })?;

        let user = self.load_user(&booking).await?;
        let listing = self.load_listing(&booking).await?;

        Ok(TravelNotification::BookingConfirmation {
            recipient_email: user.email().as_str().to_string(),
            recipient_name:  user.display_name().to_string(),
            property_name:   listing.name().to_string(),
            location:        listing.location().to_string(),
            check_in:        booking.period().start_date().to_string(),
            check_out:       booking.period().end_date().to_string(),
            total_price:     booking.total_price().to_string(),
            booking_id:      booking.id().to_string(),
        })
    }

    /// 決済確認メールの内容を組み立てる
    async fn payment_confirmation(
        &self,
        transaction_id: &str,
    ) -> Result<TravelNotification, NotificationError> {
        let tx_id = TransactionId::new(transaction_id).map_err(|_| {
            NotificationError::InvalidIdentifier {
                entity_type: "Payment",
                value:       transaction_id.to_string(),
            }
        })?;

        let payment = self
            .repositories
            .payments
            .find_by_transaction_id(&tx_id)
            .await
            .map_err(lookup_failed("Payment"))?
            .ok_or_else(|| NotificationError::NotFound {
                entity_type: "Payment",
                id:          transaction_id.to_string(),
            })?;

        let booking = self
            .repositories
            .bookings
            .find_by_id(payment.booking_id())
            .await
            .map_err(lookup_failed("Booking"))?
            .ok_or_else(|| NotificationError::NotFound {
                entity_type: "Booking",
                id:          payment.booking_id().to_string(),
            })?;

        let user = self.load_user(&booking).await?;

        Ok(TravelNotification::PaymentConfirmation {
            recipient_email: user.email().as_str().to_string(),
            recipient_name:  user.display_name().to_string(),
            amount:          payment.amount().to_string(),
            transaction_id:  payment.transaction_id().to_string(),
            booking_id:      booking.id().to_string(),
        })
    }

    async fn load_user(&self, booking: &Booking) -> Result<User, NotificationError> {
        self.repositories
            .users
            .find_by_id(booking.user_id())
            .await
            .map_err(lookup_failed("User"))?
            .ok_or_else(|| NotificationError::NotFound {
                entity_type: "User",
                id:          booking.user_id().to_string(),
            })
    }

    async fn load_listing(&self, booking: &Booking) -> Result<Listing, NotificationError> {
        self.repositories
            .listings
            .find_by_id(booking.listing_id())
            .await
            .map_err(lookup_failed("Listing"))?
            .ok_or_else(|| NotificationError::NotFound {
                entity_type: "Listing",
                id:          booking.listing_id().to_string(),
            })
    }

    /// レンダリングして送信する
    async fn deliver(
        &self,
        notification: &TravelNotification,
    ) -> Result<NotificationReceipt, NotificationError> {
        let email = self
            .template_renderer
            .render(notification, &self.from_address)
            .inspect_err(|e| {
                tracing::error!(
                    error.category = error::category::INTERNAL,
                    error.kind = error::kind::TEMPLATE,
                    "通知テンプレートのレンダリングに失敗: {}",
                    e
                );
            })?;

        self.sender.send_email(&email).await.inspect_err(|e| {
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::MAIL_TRANSPORT,
                "メール送信に失敗: {}",
                e
            );
        })?;

        Ok(NotificationReceipt {
            event_type: notification.event_type(),
            recipient:  notification.recipient_email().to_string(),
            subject:    email.subject,
        })
    }
}

/// リポジトリエラーを `NotificationError` に変換する
///
/// 接続障害は再試行可能な `Lookup`、保存値の不整合は再試行しても直らないため `InvalidData`。
fn lookup_failed(entity_type: &'static str) -> impl FnOnce(InfraError) -> NotificationError {
    move |e| {
        let corrupted = matches!(
            e.kind(),
            InfraErrorKind::Unexpected(_) | InfraErrorKind::Serialization(_)
        );
        tracing::error!(
            error.category = if corrupted {
                error::category::INTERNAL
            } else {
                error::category::INFRASTRUCTURE
            },
            error.kind = error::kind::ENTITY_LOOKUP,
            span_trace = %e.span_trace(),
            "{} の取得に失敗: {}",
            entity_type,
            e
        );
        if corrupted {
            NotificationError::InvalidData(format!("{entity_type}: {e}"))
        } else {
            NotificationError::Lookup(format!("{entity_type}: {e}"))
        }
    }
}

fn log_outcome(
    event_type: NotificationEventType,
    entity_type: &'static str,
    entity_id: &str,
    result: &Result<NotificationReceipt, NotificationError>,
) {
    let event_type_str: &str = event_type.into();
    match result {
        Ok(receipt) => log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_SENT,
            event.entity_type = entity_type,
            event.entity_id = %entity_id,
            event.result = event::result::SUCCESS,
            notification.event_type = event_type_str,
            notification.recipient = %receipt.recipient,
            "通知メール送信成功"
        ),
        Err(e) => log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_FAILED,
            event.entity_type = entity_type,
            event.entity_id = %entity_id,
            event.result = event::result::FAILURE,
            notification.event_type = event_type_str,
            retryable = e.is_retryable(),
            error = %e,
            "通知メール送信失敗"
        ),
    }
}

#[cfg(test)]
mod tests {
    use alxtravel_domain::{
        booking::StayPeriod,
        listing::ListingId,
        payment::Payment,
        user::{Email, UserId},
        value_objects::Money,
    };
    use alxtravel_infra::mock::{
        MockBookingRepository,
        MockListingRepository,
        MockNotificationSender,
        MockPaymentRepository,
        MockUserRepository,
    };
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixture {
        users:    MockUserRepository,
        listings: MockListingRepository,
        bookings: MockBookingRepository,
        payments: MockPaymentRepository,
        sender:   MockNotificationSender,
        service:  NotificationService,
    }

    impl Fixture {
        fn new() -> Self {
            let users = MockUserRepository::new();
            let listings = MockListingRepository::new();
            let bookings = MockBookingRepository::new();
            let payments = MockPaymentRepository::new();
            let sender = MockNotificationSender::new();
            let service = NotificationService::new(
                NotificationRepositories {
                    bookings: Arc::new(bookings.clone()),
                    listings: Arc::new(listings.clone()),
                    users:    Arc::new(users.clone()),
                    payments: Arc::new(payments.clone()),
                },
                Arc::new(sender.clone()),
                TemplateRenderer::new().unwrap(),
                "noreply@alxtravel.example.com".to_string(),
            );
            Self {
                users,
                listings,
                bookings,
                payments,
                sender,
                service,
            }
        }

        fn add_user(&self, email: &str, first_name: &str) -> User {
            let user = User::new(
                UserId::new(),
                "guest",
                Email::new(email).unwrap(),
                first_name,
                "",
            );
            self.users.add_user(user.clone());
            user
        }

        fn add_listing(&self, host: &User, name: &str) -> Listing {
            let listing = Listing::new(
                ListingId::new(),
                name,
                host.id().clone(),
                "A quiet place",
                "Addis Ababa, Ethiopia",
                Money::from_minor_units(15000).unwrap(),
            );
            self.listings.add_listing(listing.clone());
            listing
        }

        fn add_booking(&self, user: &User, listing_id: ListingId) -> Booking {
            let booking = Booking::new(
                BookingId::new(),
                listing_id,
                user.id().clone(),
                StayPeriod::new(date(2024, 6, 1), date(2024, 6, 4)).unwrap(),
                Money::from_minor_units(45000).unwrap(),
                Utc::now(),
            );
            self.bookings.add_booking(booking.clone());
            booking
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn 予約確認メールを予約者だけに1通送る() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "Abebe");
        let listing = fx.add_listing(&user, "P");
        let booking = fx.add_booking(&user, listing.id().clone());

        let receipt = fx
            .service
            .send_booking_confirmation_email(&booking.id().to_string())
            .await
            .unwrap();

        assert_eq!(receipt.to_string(), "Booking confirmation email sent to a@x.com");
        let sent = fx.sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["a@x.com".to_string()]);
        assert_eq!(sent[0].from, "noreply@alxtravel.example.com");
        assert_eq!(sent[0].subject, "Booking Confirmation - ALX Travel App");
    }

    #[tokio::test]
    async fn 予約確認メールに予約内容が保存値のまま含まれる() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "Abebe");
        let listing = fx.add_listing(&user, "P");
        let booking = fx.add_booking(&user, listing.id().clone());

        fx.service
            .send_booking_confirmation_email(&booking.id().to_string())
            .await
            .unwrap();

        let sent = fx.sender.sent_emails();
        let body = &sent[0].text_body;
        assert!(body.contains("Dear Abebe"));
        assert!(body.contains("- Property: P"));
        assert!(body.contains("- Location: Addis Ababa, Ethiopia"));
        assert!(body.contains("- Check-in: 2024-06-01"));
        assert!(body.contains("- Check-out: 2024-06-04"));
        assert!(body.contains("- Total Price: 450.00 ETB"));
        assert!(body.contains(&format!("- Booking ID: {}", booking.id())));
    }

    #[tokio::test]
    async fn 名が空ならユーザー名で呼びかける() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "");
        let listing = fx.add_listing(&user, "P");
        let booking = fx.add_booking(&user, listing.id().clone());

        fx.service
            .send_booking_confirmation_email(&booking.id().to_string())
            .await
            .unwrap();

        assert!(fx.sender.sent_emails()[0].text_body.contains("Dear guest,"));
    }

    #[tokio::test]
    async fn 存在しない予約はnot_foundで送信しない() {
        let fx = Fixture::new();
        let missing = BookingId::new().to_string();

        let err = fx
            .service
            .send_booking_confirmation_email(&missing)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            NotificationError::NotFound {
                entity_type: "Booking",
                id:          missing.clone(),
            }
        );
        assert_eq!(err.to_string(), format!("Booking with ID {missing} not found"));
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn uuidでない予約idはinvalid_identifierになる() {
        let fx = Fixture::new();

        let err = fx
            .service
            .send_booking_confirmation_email("not-a-uuid")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            NotificationError::InvalidIdentifier {
                entity_type: "Booking",
                value:       "not-a-uuid".to_string(),
            }
        );
        assert!(!err.is_retryable());
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 物件の参照切れはエラーを返し送信しない() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "Abebe");
        let dangling = ListingId::new();
        let booking = fx.add_booking(&user, dangling.clone());

        let err = fx
            .service
            .send_booking_confirmation_email(&booking.id().to_string())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            NotificationError::NotFound {
                entity_type: "Listing",
                id:          dangling.to_string(),
            }
        );
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn リポジトリ障害は再試行可能なlookupになる() {
        let fx = Fixture::new();
        fx.bookings.set_unavailable(true);

        let err = fx
            .service
            .send_booking_confirmation_email(&BookingId::new().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::Lookup(_)));
        assert!(err.is_retryable());
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 保存データの不整合は再試行しないinvalid_dataになる() {
        let fx = Fixture::new();
        fx.bookings.set_corrupted(true);

        let err = fx
            .service
            .send_booking_confirmation_email(&BookingId::new().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::InvalidData(_)));
        assert!(!err.is_retryable());
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 送信失敗はsend_failedとして返す() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "Abebe");
        let listing = fx.add_listing(&user, "P");
        let booking = fx.add_booking(&user, listing.id().clone());
        fx.sender.fail_next(1);

        let err = fx
            .service
            .send_booking_confirmation_email(&booking.id().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::SendFailed(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn 決済確認メールを予約者に送る() {
        let fx = Fixture::new();
        let user = fx.add_user("a@x.com", "Abebe");
        let listing = fx.add_listing(&user, "P");
        let booking = fx.add_booking(&user, listing.id().clone());
        fx.payments.add_payment(Payment::new(
            TransactionId::new("chapa-tx-001").unwrap(),
            booking.id().clone(),
            Money::from_minor_units(45000).unwrap(),
        ));

        let receipt = fx.service.send_payment_email("chapa-tx-001").await.unwrap();

        assert_eq!(receipt.to_string(), "Payment confirmation email sent to a@x.com");
        let sent = fx.sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["a@x.com".to_string()]);
        assert_eq!(sent[0].subject, "Payment Confirmation");
        assert!(
            sent[0]
                .text_body
                .contains("Your payment of 450.00 ETB has been received.")
        );
        assert!(sent[0].text_body.contains(&booking.id().to_string()));
    }

    #[tokio::test]
    async fn 存在しない決済はnot_foundで送信しない() {
        let fx = Fixture::new();

        let err = fx.service.send_payment_email("missing-tx").await.unwrap_err();

        assert_eq!(err.to_string(), "Payment with ID missing-tx not found");
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 決済の予約参照切れはnot_foundで送信しない() {
        let fx = Fixture::new();
        let dangling = BookingId::new();
        fx.payments.add_payment(Payment::new(
            TransactionId::new("chapa-tx-404").unwrap(),
            dangling.clone(),
            Money::from_minor_units(45000).unwrap(),
        ));

        let err = fx.service.send_payment_email("chapa-tx-404").await.unwrap_err();

        assert_eq!(
            err,
            NotificationError::NotFound {
                entity_type: "Booking",
                id:          dangling.to_string(),
            }
        );
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 決済の予約者参照切れはnot_foundで送信しない() {
        let fx = Fixture::new();
        let host = fx.add_user("host@x.com", "Host");
        let listing = fx.add_listing(&host, "P");
        let missing_guest = User::new(
            UserId::new(),
            "ghost",
            Email::new("ghost@x.com").unwrap(),
            "Ghost",
            "",
        );
        let booking = fx.add_booking(&missing_guest, listing.id().clone());
        fx.payments.add_payment(Payment::new(
            TransactionId::new("chapa-tx-405").unwrap(),
            booking.id().clone(),
            Money::from_minor_units(45000).unwrap(),
        ));

        let err = fx.service.send_payment_email("chapa-tx-405").await.unwrap_err();

        assert_eq!(
            err,
            NotificationError::NotFound {
                entity_type: "User",
                id:          missing_guest.id().to_string(),
            }
        );
        assert_eq!(fx.sender.sent_count(), 0);
    }

    #[tokio::test]
    async fn 空の取引idはinvalid_identifierになる() {
        let fx = Fixture::new();

        let err = fx.service.send_payment_email("  ").await.unwrap_err();

        assert!(matches!(
            err,
            NotificationError::InvalidIdentifier {
                entity_type: "Payment",
                ..
            }
        ));
        assert_eq!(fx.sender.sent_count(), 0);
    }
}
