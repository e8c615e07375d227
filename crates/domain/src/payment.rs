//! # 決済
//!
//! 予約に対する支払い記録。決済確認メールの起点になる。
//! 取引 ID は決済ゲートウェイが発行する文字列で、UUID とは限らない。

use crate::{booking::BookingId, value_objects::Money};

define_validated_string! {
    /// 取引 ID（決済ゲートウェイが発行する参照文字列）
    pub struct TransactionId {
        label: "取引 ID",
        max_length: 100,
    }
}

/// 決済エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    transaction_id: TransactionId,
    booking_id:     BookingId,
    amount:         Money,
}

impl Payment {
    pub fn new(transaction_id: TransactionId, booking_id: BookingId, amount: Money) -> Self {
        Self {
            transaction_id,
            booking_id,
            amount,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn booking_id(&self) -> &BookingId {
        &self.booking_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}
