//! # ALX Travel 共有ユーティリティ
//!
//! ワーカーと CLI の両方で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain 以外）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置

pub mod event_log;
pub mod observability;
