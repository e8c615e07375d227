//! # リポジトリ実装
//!
//! 通知タスクが参照するエンティティの読み取りを担当する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: 通知は予約・決済を変更しないため、書き込み操作は持たない
//! - **型付き取得**: `find_by_*` は `Result<Option<T>, InfraError>` を返し、
//!   「存在しない」と「取得に失敗した」を区別する
//! - **テスタビリティ**: トレイト経由でモック可能な設計（[`crate::mock`]）

pub mod booking_repository;
pub mod listing_repository;
pub mod payment_repository;
pub mod user_repository;

pub use booking_repository::{BookingRepository, PostgresBookingRepository};
pub use listing_repository::{ListingRepository, PostgresListingRepository};
pub use payment_repository::{PaymentRepository, PostgresPaymentRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
