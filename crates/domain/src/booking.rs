//! # 予約
//!
//! ユーザーが物件を一定期間・合計金額で予約したことを表すエンティティ。
//!
//! ## 設計方針
//!
//! - **宿泊期間の不変条件**: チェックイン日 < チェックアウト日 を [`StayPeriod`] の
//!   生成時に検証する
//! - **DB からの復元**: [`Booking::from_db`] は永続化済みの値を信頼し、検証しない
//! - **読み取り専用**: 通知タスクは予約を変更しない
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use alxtravel_domain::{
//!     booking::{Booking, BookingId, StayPeriod},
//!     listing::ListingId,
//!     user::UserId,
//!     value_objects::Money,
//! };
//! use chrono::{NaiveDate, Utc};
//!
//! let period = StayPeriod::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
//! )?;
//! let booking = Booking::new(
//!     BookingId::new(),
//!     ListingId::new(),
//!     UserId::new(),
//!     period,
//!     Money::from_minor_units(45000)?,
//!     Utc::now(),
//! );
//!
//! assert_eq!(booking.period().nights(), 3);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, listing::ListingId, user::UserId, value_objects::Money};

define_uuid_id! {
    /// 予約 ID（一意識別子）
    ///
    /// 予約確認メールの本文にもそのまま記載される。
    pub struct BookingId;
}

/// 宿泊期間（値オブジェクト）
///
/// # 不変条件
///
/// - `start_date < end_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPeriod {
    start_date: NaiveDate,
    end_date:   NaiveDate,
}

impl StayPeriod {
    /// 宿泊期間を作成する
    ///
    /// # エラー
    ///
    /// チェックアウト日がチェックイン日以前の場合は `DomainError::Validation` を返す。
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, DomainError> {
        if start_date >= end_date {
            return Err(DomainError::Validation(format!(
                "チェックアウト日はチェックイン日より後である必要があります: {start_date} - {end_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// DB の値から復元する（検証しない）
    pub fn from_db(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// チェックイン日
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// チェックアウト日
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// 宿泊数
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// 予約エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    id:          BookingId,
    listing_id:  ListingId,
    user_id:     UserId,
    period:      StayPeriod,
    total_price: Money,
    created_at:  DateTime<Utc>,
}

impl Booking {
    /// 新しい予約を作成する
    pub fn new(
        id: BookingId,
        listing_id: ListingId,
        user_id: UserId,
        period: StayPeriod,
        total_price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            listing_id,
            user_id,
            period,
            total_price,
            created_at,
        }
    }

    /// DB の値から復元する
    pub fn from_db(
        id: BookingId,
        listing_id: ListingId,
        user_id: UserId,
        period: StayPeriod,
        total_price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, listing_id, user_id, period, total_price, created_at)
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn period(&self) -> &StayPeriod {
        &self.period
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_宿泊期間の泊数を計算できる() {
        let period = StayPeriod::new(date(2024, 6, 1), date(2024, 6, 4)).unwrap();
        assert_eq!(period.nights(), 3);
    }

    #[rstest]
    #[case(date(2024, 6, 4), date(2024, 6, 1), "逆順")]
    #[case(date(2024, 6, 1), date(2024, 6, 1), "同日")]
    fn test_チェックアウト日がチェックイン日以前なら拒否される(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] _reason: &str,
    ) {
        assert!(StayPeriod::new(start, end).is_err());
    }

    #[test]
    fn test_from_dbは検証せずに復元する() {
        let period = StayPeriod::from_db(date(2024, 6, 4), date(2024, 6, 1));
        assert_eq!(period.start_date(), date(2024, 6, 4));
    }
}
