//! # 通知ジョブ投入 CLI
//!
//! 予約・決済の作成後に通知ジョブを投入する。投入後すぐにジョブ ID を出力して終了する。
//!
//! ```bash
//! enqueue-notification send_booking_confirmation_email <booking_id>
//! enqueue-notification send_payment_email <transaction_id>
//! ```
//!
//! キューは `QUEUE_BACKEND` / `REDIS_URL` で指定する。インメモリキューは
//! プロセスをまたいで共有できないため使用できない。

use std::{str::FromStr, sync::Arc};

use alxtravel_domain::{clock::SystemClock, job::JobKind};
use alxtravel_notification_worker::{
    config::QueueConfig,
    context::connect_queue,
    worker::JobDispatcher,
};
use alxtravel_shared::observability::{TracingConfig, init_tracing};
use anyhow::{Context as _, bail};

const USAGE: &str = "usage: enqueue-notification <send_booking_confirmation_email|send_payment_email> <id>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("enqueue-notification");
    let _tracing_guard = init_tracing(&tracing_config)
        .context("トレーシングの初期化に失敗しました")?
        .entered();

    let mut args = std::env::args().skip(1);
    let (Some(kind), Some(argument), None) = (args.next(), args.next(), args.next()) else {
        bail!(USAGE);
    };
    let kind = JobKind::from_str(&kind)
        .with_context(|| format!("不明なジョブ種別です: {kind}\n{USAGE}"))?;

    let config = QueueConfig::from_env().context("設定の読み込みに失敗しました")?;
    config.ensure_shared()?;

    let queue = connect_queue(&config).await?;
    let dispatcher = JobDispatcher::new(queue, Arc::new(SystemClock));
    let handle = dispatcher.submit(kind, argument).await?;

    println!("{}", handle.id);
    Ok(())
}
