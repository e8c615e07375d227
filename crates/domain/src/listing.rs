//! # 掲載物件
//!
//! 予約対象となる物件（Listing）を定義する。
//! 通知サブシステムからは不変のエンティティとして扱う。

use crate::{user::UserId, value_objects::Money};

define_uuid_id! {
    /// 物件 ID（一意識別子）
    pub struct ListingId;
}

/// 物件エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    id:              ListingId,
    name:            String,
    host_id:         UserId,
    description:     String,
    location:        String,
    price_per_night: Money,
}

impl Listing {
    pub fn new(
        id: ListingId,
        name: impl Into<String>,
        host_id: UserId,
        description: impl Into<String>,
        location: impl Into<String>,
        price_per_night: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            host_id,
            description: description.into(),
            location: location.into(),
            price_per_night,
        }
    }

    pub fn id(&self) -> &ListingId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host_id(&self) -> &UserId {
        &self.host_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn price_per_night(&self) -> Money {
        self.price_per_night
    }
}
