//! # PaymentRepository
//!
//! 決済記録を取引 ID で取得するリポジトリ。
//! 取引 ID は決済ゲートウェイ側の参照なので、主キーではなく UNIQUE 列で検索する。

use alxtravel_domain::{
    booking::BookingId,
    payment::{Payment, TransactionId},
    value_objects::Money,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// 決済リポジトリトレイト
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// 取引 ID で決済を検索
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, InfraError>;
}

/// PostgreSQL 実装の PaymentRepository
#[derive(Debug, Clone)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    transaction_id: String,
    booking_id:     Uuid,
    amount_cents:   i64,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = InfraError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let transaction_id = TransactionId::new(row.transaction_id)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;
        let amount = Money::from_minor_units(row.amount_cents)
            .map_err(|e| InfraError::unexpected(e.to_string()))?;
        Ok(Payment::new(
            transaction_id,
            BookingId::from_uuid(row.booking_id),
            amount,
        ))
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(transaction_id = %transaction_id))]
    async fn find_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<Payment>, InfraError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT transaction_id, booking_id, amount_cents
            FROM payments
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from).transpose()
    }
}
