//! # ListingRepository
//!
//! 予約対象の物件（名称・所在地）を取得するためのリポジトリ。

use alxtravel_domain::{
    listing::{Listing, ListingId},
    user::UserId,
    value_objects::Money,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 物件リポジトリトレイト
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// ID で物件を検索
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, InfraError>;
}

/// PostgreSQL 実装の ListingRepository
#[derive(Debug, Clone)]
pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id:                    Uuid,
    name:                  String,
    host_id:               Uuid,
    description:           String,
    location:              String,
    price_per_night_cents: i64,
}

impl TryFrom<ListingRow> for Listing {
    type Error = InfraError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let price = Money::from_minor_units(row.price_per_night_cents)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;
        Ok(Listing::new(
            ListingId::from_uuid(row.id),
            row.name,
            UserId::from_uuid(row.host_id),
            row.description,
            row.location,
            price,
        ))
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, InfraError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT id, name, host_id, description, location, price_per_night_cents
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Listing::try_from).transpose()
    }
}
