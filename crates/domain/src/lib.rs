//! # ALX Travel ドメイン層
//!
//! 予約通知機能の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: Booking, Listing）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Money, StayPeriod）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! notification-worker → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis、メール送信）には一切依存しない。
//! 通知サブシステムはエンティティを読み取るだけで、変更はしない。
//!
//! ## モジュール構成
//!
//! - [`user`] / [`listing`] / [`booking`] / [`payment`] - 通知が参照するエンティティ
//! - [`notification`] - 通知イベントとメールメッセージ
//! - [`job`] - 非同期ジョブ（キューに積まれる作業単位）
//! - [`value_objects`] - 金額などの値オブジェクト
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー
//!
//! ## 使用例
//!
//! ```rust
//! use alxtravel_domain::{DomainError, booking::StayPeriod};
//! use chrono::NaiveDate;
//!
//! let june = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
//!
//! let error: DomainError = StayPeriod::new(june(4), june(1)).unwrap_err();
//! assert!(error.to_string().contains("バリデーションエラー"));
//! ```

#[macro_use]
mod macros;

pub mod booking;
pub mod clock;
pub mod error;
pub mod job;
pub mod listing;
pub mod notification;
pub mod payment;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
