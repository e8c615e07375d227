//! # 値オブジェクト
//!
//! 複数のエンティティで共有される値オブジェクトを定義する。
//!
//! - [`Money`] - 金額（最小通貨単位の整数で保持）

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 金額（値オブジェクト）
///
/// 浮動小数点誤差を避けるため、最小通貨単位（1/100）の整数で保持する。
/// 表示時は常に小数点以下 2 桁で出力する（例: `45000` → `"450.00"`）。
///
/// # 不変条件
///
/// - 負の値を取らない
///
/// # 使用例
///
/// ```rust
/// use alxtravel_domain::value_objects::Money;
///
/// let price = Money::from_minor_units(45000).unwrap();
/// assert_eq!(price.to_string(), "450.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// 最小通貨単位の整数から金額を作成する
    ///
    /// # エラー
    ///
    /// 負の値の場合は `DomainError::Validation` を返す。
    pub fn from_minor_units(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::Validation(format!(
                "金額は 0 以上である必要があります: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// 最小通貨単位の整数を取得する
    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
