//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するシードデータ投入ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// 投入したシードデータの ID
pub struct Seed {
    pub user_id:        Uuid,
    pub listing_id:     Uuid,
    pub booking_id:     Uuid,
    pub transaction_id: String,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// ユーザー・物件・予約・決済を 1 件ずつ投入する
///
/// 予約は 2024-06-01 〜 2024-06-04、合計 450.00、決済額も 450.00。
pub async fn insert_seed(pool: &PgPool) -> Seed {
    let user_id = Uuid::now_v7();
    let listing_id = Uuid::now_v7();
    let booking_id = Uuid::now_v7();
    let transaction_id = format!("chapa-{}", Uuid::now_v7().simple());

    sqlx::query(
        "INSERT INTO users (id, username, email, first_name, last_name) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(format!("guest-{}", user_id.simple()))
    .bind("a@x.com")
    .bind("Abebe")
    .bind("Bikila")
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO listings (id, name, host_id, description, location, price_per_night_cents)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(listing_id)
    .bind("P")
    .bind(user_id)
    .bind("Lakeside cottage")
    .bind("Bahir Dar, Ethiopia")
    .bind(15000_i64)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO bookings (id, listing_id, user_id, start_date, end_date, total_price_cents)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(booking_id)
    .bind(listing_id)
    .bind(user_id)
    .bind(date(2024, 6, 1))
    .bind(date(2024, 6, 4))
    .bind(45000_i64)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO payments (id, transaction_id, booking_id, amount_cents) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::now_v7())
    .bind(&transaction_id)
    .bind(booking_id)
    .bind(45000_i64)
    .execute(pool)
    .await
    .unwrap();

    Seed {
        user_id,
        listing_id,
        booking_id,
        transaction_id,
    }
}
