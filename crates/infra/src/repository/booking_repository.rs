//! # BookingRepository
//!
//! 予約情報の読み取りを担当するリポジトリ。
//!
//! 金額は `total_price_cents`（BIGINT, 最小通貨単位）で保存されている。
//! 宿泊期間は DB の CHECK 制約で `start_date < end_date` が保証されるため、
//! 復元時には検証しない。

use alxtravel_domain::{
    booking::{Booking, BookingId, StayPeriod},
    listing::ListingId,
    user::UserId,
    value_objects::Money,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 予約リポジトリトレイト
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// ID で予約を検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(booking))`: 予約が見つかった場合
    /// - `Ok(None)`: 予約が見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, InfraError>;
}

/// PostgreSQL 実装の BookingRepository
#[derive(Debug, Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id:                Uuid,
    listing_id:        Uuid,
    user_id:           Uuid,
    start_date:        NaiveDate,
    end_date:          NaiveDate,
    total_price_cents: i64,
    created_at:        DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = InfraError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let total_price = Money::from_minor_units(row.total_price_cents)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;
        Ok(Booking::from_db(
            BookingId::from_uuid(row.id),
            ListingId::from_uuid(row.listing_id),
            UserId::from_uuid(row.user_id),
            StayPeriod::from_db(row.start_date, row.end_date),
            total_price,
            row.created_at,
        ))
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, InfraError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT
                id,
                listing_id,
                user_id,
                start_date,
                end_date,
                total_price_cents,
                created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }
}
