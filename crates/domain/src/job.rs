//! # ジョブ
//!
//! 非同期に実行される作業単位（ジョブ）と、その実行結果を定義する。
//!
//! ## 設計方針
//!
//! - **引数は単一の文字列**: 予約 ID または取引 ID のみをキューに載せ、
//!   エンティティ本体はワーカーが実行時に読み込む
//! - **JSON シリアライズ**: Redis などの外部キューにそのまま格納できる
//! - **試行回数の保持**: 再試行は同じ ID のまま `attempt` を進めたジョブを再投入する
//!
//! ## ライフサイクル
//!
//! ```text
//! submit → (queue) → dequeue → handle ─┬─ succeeded
//!                                      ├─ retrying → (queue) → ...
//!                                      └─ failed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

define_uuid_id! {
    /// ジョブ ID
    ///
    /// 投入時に発行され、ジョブハンドルとして呼び出し元に返る。
    pub struct JobId;
}

/// ジョブ種別
///
/// 文字列表現はタスク名そのもの。CLI からの指定にも使う。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobKind {
    /// 予約確認メール送信（引数: 予約 ID）
    SendBookingConfirmationEmail,
    /// 決済確認メール送信（引数: 取引 ID）
    SendPaymentEmail,
}

/// キューに格納されるジョブ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id:          JobId,
    kind:        JobKind,
    argument:    String,
    attempt:     u32,
    enqueued_at: DateTime<Utc>,
}

impl Job {
    /// 新しいジョブを作成する（試行回数 1）
    pub fn new(kind: JobKind, argument: impl Into<String>, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            kind,
            argument: argument.into(),
            attempt: 1,
            enqueued_at,
        }
    }

    /// 再試行用のジョブを作成する
    ///
    /// ID と引数は引き継ぎ、試行回数を 1 進める。
    pub fn next_attempt(&self, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            argument: self.argument.clone(),
            attempt: self.attempt + 1,
            enqueued_at,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    /// 投入元に返すハンドルを作成する
    pub fn handle(&self) -> JobHandle {
        JobHandle {
            id:   self.id.clone(),
            kind: self.kind,
        }
    }
}

/// ジョブハンドル
///
/// 投入直後に呼び出し元へ返る。`id` で実行結果を照会できる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id:   JobId,
    pub kind: JobKind,
}

/// ジョブ実行ステータス
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    /// 成功
    Succeeded,
    /// 失敗（再試行しない）
    Failed,
    /// 失敗したが再投入済み
    Retrying,
}

/// ジョブ実行結果
///
/// 試行ごとに上書き保存される。最後に保存された結果が最新の状態を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id:      JobId,
    pub kind:        JobKind,
    pub attempt:     u32,
    pub status:      JobStatus,
    /// 成功時は送信結果、失敗時はエラー内容
    pub message:     String,
    pub finished_at: DateTime<Utc>,
}
