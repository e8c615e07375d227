//! # 通知ワーカー
//!
//! ジョブキューから通知ジョブを取り出し、予約確認・決済確認メールを送信する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `RUN_MIGRATIONS` | No | 起動時にマイグレーションを適用するか（デフォルト: `false`） |
//! | `QUEUE_BACKEND` | No | `redis` のみ（デフォルト: `redis`）。`memory` は起動時に拒否する |
//! | `REDIS_URL` | No | Redis 接続 URL（デフォルト: `redis://localhost:6379`） |
//! | `WORKER_CONCURRENCY` | No | ワーカー数（デフォルト: `4`） |
//! | `JOB_MAX_ATTEMPTS` | No | 最大試行回数（デフォルト: `3`） |
//! | `JOB_POLL_TIMEOUT_MS` | No | 取り出し待機時間（デフォルト: `1000`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP 接続先（デフォルト: `localhost:1025`） |
//! | `DEFAULT_FROM_EMAIL` | No | 送信元アドレス |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p alxtravel-notification-worker --bin notification-worker
//! ```
//!
//! SIGINT / SIGTERM を受け取ると、実行中のジョブを完了させてから終了する。

use alxtravel_notification_worker::{config::WorkerConfig, context::AppContext};
use alxtravel_shared::observability::{TracingConfig, init_tracing};
use anyhow::Context as _;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("notification-worker");
    let _tracing_guard = init_tracing(&tracing_config)
        .context("トレーシングの初期化に失敗しました")?
        .entered();

    let config = WorkerConfig::from_env().context("設定の読み込みに失敗しました")?;
    config.queue.ensure_shared()?;
    let context = AppContext::from_config(&config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut workers = context.worker_pool().spawn(shutdown_rx);

    shutdown_signal().await;
    tracing::info!("停止信号を受信しました。実行中のジョブの完了を待ちます");
    let _ = shutdown_tx.send(true);

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!("ワーカータスクが異常終了しました: {}", e);
        }
    }

    tracing::info!("通知ワーカーを終了しました");
    Ok(())
}

/// SIGINT（Ctrl+C）または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
