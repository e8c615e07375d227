//! # テスト用モック
//!
//! ユースケーステスト・ワーカーテストで使用するインメモリのリポジトリとメール送信。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! alxtravel-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use alxtravel_domain::{
    booking::{Booking, BookingId},
    listing::{Listing, ListingId},
    notification::{EmailMessage, NotificationError},
    payment::{Payment, TransactionId},
    user::{User, UserId},
};
use async_trait::async_trait;

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::{BookingRepository, ListingRepository, PaymentRepository, UserRepository},
};

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned())
    }
}

// ===== MockListingRepository =====

#[derive(Clone, Default)]
pub struct MockListingRepository {
    listings: Arc<Mutex<Vec<Listing>>>,
}

impl MockListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listing(&self, listing: Listing) {
        self.listings.lock().unwrap().push(listing);
    }
}

#[async_trait]
impl ListingRepository for MockListingRepository {
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, InfraError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id() == id)
            .cloned())
    }
}

// ===== MockBookingRepository =====

/// 予約のモックリポジトリ
///
/// [`set_unavailable`](Self::set_unavailable) で DB 障害を、
/// [`set_corrupted`](Self::set_corrupted) で保存値の不整合を再現できる。
#[derive(Clone, Default)]
pub struct MockBookingRepository {
    bookings:    Arc<Mutex<Vec<Booking>>>,
    unavailable: Arc<AtomicBool>,
    corrupted:   Arc<AtomicBool>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_booking(&self, booking: Booking) {
        self.bookings.lock().unwrap().push(booking);
    }

    /// `true` の間、検索は接続タイムアウトの `InfraError` を返す
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// `true` の間、検索は保存値の変換失敗（`InfraErrorKind::Unexpected`）を返す
    pub fn set_corrupted(&self, corrupted: bool) {
        self.corrupted.store(corrupted, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, InfraError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(InfraError::from(sqlx::Error::PoolTimedOut));
        }
        if self.corrupted.load(Ordering::SeqCst) {
            return Err(InfraError::unexpected("宿泊期間が不正です"));
        }
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id() == id)
            .cloned())
    }
}

// ===== MockPaymentRepository =====

#[derive(Clone, Default)]
pub struct MockPaymentRepository {
    payments: Arc<Mutex<Vec<Payment>>>,
}

impl MockPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_payment(&self, payment: Payment) {
        self.payments.lock().unwrap().push(payment);
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, InfraError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.transaction_id() == transaction_id)
            .cloned())
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
///
/// [`fail_next`](Self::fail_next) で指定した回数だけ `SendFailed` を返す。
/// 失敗した送信は記録しない。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:          Arc<Mutex<Vec<EmailMessage>>>,
    failures_left: Arc<AtomicUsize>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次の `times` 回の送信を失敗させる
    pub fn fail_next(&self, times: usize) {
        self.failures_left.store(times, Ordering::SeqCst);
    }

    /// 送信に成功したメールの一覧
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 送信に成功した回数
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(NotificationError::SendFailed(
                "SMTP 送信失敗: connection refused".to_string(),
            ));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
