//! # Observability 基盤
//!
//! ワーカーとジョブ投入 CLI のトレーシング初期化。
//!
//! 設定は [`TracingConfig::from_lookup`] で値の取得関数から組み立てるため、
//! プロセスの環境変数を書き換えずにテストできる。
//!
//! | 変数 | デフォルト | 内容 |
//! |------|-----------|------|
//! | `LOG_FORMAT` | `pretty` | `json` / `pretty`（大文字小文字を区別しない） |
//! | `RUST_LOG` | `info,alxtravel=debug` | `EnvFilter` のディレクティブ |

use std::env;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,alxtravel=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（本番・ログ収集向け）
    Json,
    #[default]
    Pretty,
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `app` span の `service` フィールドに出力するプロセス名
    pub service_name: String,
    pub log_format:   LogFormat,
    /// `EnvFilter` のディレクティブ
    pub filter:       String,
    /// 解釈できずに読み捨てた `LOG_FORMAT` の値。初期化後に警告として出力する
    pub rejected_log_format: Option<String>,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            filter: DEFAULT_FILTER.to_string(),
            rejected_log_format: None,
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |name| env::var(name).ok())
    }

    /// 値の取得関数から設定を読み取る
    ///
    /// `LOG_FORMAT` が不正でも起動は止めず、`Pretty` で続行する。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::new(service_name, LogFormat::default());

        if let Some(raw) = lookup("LOG_FORMAT") {
            match raw.trim().parse() {
                Ok(format) => config.log_format = format,
                Err(_) => config.rejected_log_format = Some(raw),
            }
        }
        if let Some(filter) = lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            config.filter = filter;
        }

        config
    }
}

/// トレーシング初期化エラー
#[cfg(feature = "observability")]
#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    #[error("RUST_LOG の値が不正です: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("グローバルサブスクライバーの登録に失敗しました: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// トレーシングを初期化し、プロセス全体を囲む `app` span を返す
///
/// `tracing-error` の `ErrorLayer` を登録するため、`InfraError` は生成時に
/// `SpanTrace` を捕捉できる。返された span に入ると、以降のログ
/// （JSON では `span.service`）にサービス名が付く。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) -> Result<tracing::Span, TracingInitError> {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.filter)?)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    if let Some(rejected) = &config.rejected_log_format {
        tracing::warn!(log_format = %rejected, "LOG_FORMAT を解釈できないため pretty で出力します");
    }

    Ok(tracing::info_span!("app", service = %config.service_name))
}
