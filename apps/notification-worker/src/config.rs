//! # 通知ワーカー設定
//!
//! 環境変数からワーカーとジョブ投入 CLI の設定を読み込む。
//!
//! 読み込みは [`WorkerConfig::from_lookup`] のように値の取得関数を受け取る形にしており、
//! テストではプロセスの環境変数を書き換えずに任意の値を渡せる。

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です（{value:?}）: {reason}")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// ジョブキューのバックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum QueueBackend {
    /// Redis（複数プロセス間でジョブを共有）
    Redis,
    /// インメモリ（単一プロセス内のみ）
    Memory,
}

/// メール送信のバックエンド
///
/// - `smtp`: Mailpit（開発）/ SMTP リレー経由で送信
/// - `ses`: Amazon SES v2 経由で送信（本番）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MailBackend {
    Smtp,
    Ses,
    Noop,
}

/// ワーカープロセス全体の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// データベース接続 URL
    pub database_url:   String,
    /// 起動時にマイグレーションを適用するか
    pub run_migrations: bool,
    /// ジョブキュー設定
    pub queue:          QueueConfig,
    /// ワーカープール設定
    pub pool:           WorkerPoolConfig,
    /// 通知設定
    pub notification:   NotificationConfig,
}

/// ジョブキューの設定
///
/// ジョブ投入 CLI はこの設定のみを読み込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    pub backend:   QueueBackend,
    /// Redis 接続 URL（backend=redis の場合に使用）
    pub redis_url: String,
}

/// ワーカープールの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    /// 並行して動くワーカー数
    pub concurrency:  usize,
    /// 再試行可能なエラーに対する最大試行回数（初回を含む）
    pub max_attempts: u32,
    /// キューが空のときに 1 回の取り出しで待機する時間
    pub poll_timeout: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            concurrency:  4,
            max_attempts: 3,
            poll_timeout: Duration::from_millis(1000),
        }
    }
}

/// 通知機能の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend:      MailBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:    String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:    u16,
    /// 送信元メールアドレス
    pub from_address: String,
}

impl WorkerConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 値の取得関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", false)?,
            queue: QueueConfig::from_lookup(&lookup)?,
            pool: WorkerPoolConfig::from_lookup(&lookup)?,
            notification: NotificationConfig::from_lookup(&lookup)?,
        })
    }
}

impl QueueConfig {
    /// 環境変数からキュー設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            backend:   parse_or(&lookup, "QUEUE_BACKEND", QueueBackend::Redis)?,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
        })
    }
}

impl QueueConfig {
    /// 別プロセスとジョブを受け渡せるバックエンドであることを確認する
    ///
    /// ワーカーと投入 CLI は別プロセスで動くため、インメモリキューでは
    /// ジョブが届かない。
    pub fn ensure_shared(&self) -> Result<(), ConfigError> {
        match self.backend {
            QueueBackend::Redis => Ok(()),
            QueueBackend::Memory => Err(invalid(
                "QUEUE_BACKEND",
                "memory",
                "プロセス間で共有できないため redis を指定してください",
            )),
        }
    }
}

impl WorkerPoolConfig {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let concurrency: usize = parse_or(&lookup, "WORKER_CONCURRENCY", defaults.concurrency)?;
        if concurrency == 0 {
            return Err(invalid("WORKER_CONCURRENCY", "0", "1 以上を指定してください"));
        }

        let max_attempts: u32 = parse_or(&lookup, "JOB_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(invalid("JOB_MAX_ATTEMPTS", "0", "1 以上を指定してください"));
        }

        let poll_timeout_ms: u64 = parse_or(&lookup, "JOB_POLL_TIMEOUT_MS", 1000)?;

        Ok(Self {
            concurrency,
            max_attempts,
            poll_timeout: Duration::from_millis(poll_timeout_ms),
        })
    }
}

impl NotificationConfig {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            backend:      parse_or(&lookup, "NOTIFICATION_BACKEND", MailBackend::Noop)?,
            smtp_host:    lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port:    parse_or(&lookup, "SMTP_PORT", 1025)?,
            from_address: lookup("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|| "noreply@alxtravel.example.com".to_string()),
        })
    }
}

/// 値を型に変換する。未設定ならデフォルト値を使う
fn parse_or<T>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, &value, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
