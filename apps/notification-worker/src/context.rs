//! # アプリケーションコンテキスト
//!
//! ワーカーが使う依存コンポーネント（キュー・通知サービス・時計）を 1 か所で組み立てる。
//! グローバル状態は持たず、生成したコンテキストを明示的に受け渡す。

use std::sync::Arc;

use alxtravel_domain::{
    clock::{Clock, SystemClock},
    notification::NotificationError,
};
use alxtravel_infra::{
    InfraError,
    db,
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SesNotificationSender,
        SmtpNotificationSender,
    },
    queue::{InMemoryJobQueue, JobQueue, RedisJobQueue},
    repository::{
        PostgresBookingRepository,
        PostgresListingRepository,
        PostgresPaymentRepository,
        PostgresUserRepository,
    },
};
use thiserror::Error;

use crate::{
    config::{
        MailBackend,
        NotificationConfig,
        QueueBackend,
        QueueConfig,
        WorkerConfig,
        WorkerPoolConfig,
    },
    usecase::{NotificationRepositories, NotificationService, TemplateRenderer},
    worker::{JobDispatcher, WorkerPool},
};

/// 起動時の組み立てエラー
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("データベース接続に失敗しました: {0}")]
    Database(#[from] sqlx::Error),

    #[error("マイグレーションに失敗しました: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("ジョブキューの接続に失敗しました: {0}")]
    Queue(#[from] InfraError),

    #[error("テンプレートの読み込みに失敗しました: {0}")]
    Template(#[from] NotificationError),
}

/// アプリケーションコンテキスト
#[derive(Clone)]
pub struct AppContext {
    queue:         Arc<dyn JobQueue>,
    notifications: Arc<NotificationService>,
    clock:         Arc<dyn Clock>,
    pool_config:   WorkerPoolConfig,
}

impl AppContext {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
        pool_config: WorkerPoolConfig,
    ) -> Self {
        Self {
            queue,
            notifications,
            clock,
            pool_config,
        }
    }

    /// 設定から本番用のコンテキストを組み立てる
    pub async fn from_config(config: &WorkerConfig) -> Result<Self, BootstrapError> {
        let pool = db::create_pool(&config.database_url).await?;
        tracing::info!("データベースに接続しました");

        if config.run_migrations {
            db::run_migrations(&pool).await?;
            tracing::info!("マイグレーションを適用しました");
        }

        let repositories = NotificationRepositories {
            bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
            listings: Arc::new(PostgresListingRepository::new(pool.clone())),
            users:    Arc::new(PostgresUserRepository::new(pool.clone())),
            payments: Arc::new(PostgresPaymentRepository::new(pool)),
        };

        let notifications = NotificationService::new(
            repositories,
            build_sender(&config.notification).await,
            TemplateRenderer::new()?,
            config.notification.from_address.clone(),
        );

        let queue = connect_queue(&config.queue).await?;

        Ok(Self::new(
            queue,
            Arc::new(notifications),
            Arc::new(SystemClock),
            config.pool,
        ))
    }

    /// キューを経由せずに通知タスクを直接実行する場合に使う
    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn dispatcher(&self) -> JobDispatcher {
        JobDispatcher::new(self.queue.clone(), self.clock.clone())
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::new(
            self.queue.clone(),
            self.notifications.clone(),
            self.clock.clone(),
            self.pool_config,
        )
    }
}

/// 設定に応じたジョブキューに接続する
pub async fn connect_queue(config: &QueueConfig) -> Result<Arc<dyn JobQueue>, InfraError> {
    let queue: Arc<dyn JobQueue> = match config.backend {
        QueueBackend::Redis => Arc::new(RedisJobQueue::connect(&config.redis_url).await?),
        QueueBackend::Memory => Arc::new(InMemoryJobQueue::new()),
    };
    tracing::info!(backend = %config.backend, "ジョブキューを初期化しました");
    Ok(queue)
}

/// 設定に応じたメール送信実装を作成する
pub async fn build_sender(config: &NotificationConfig) -> Arc<dyn NotificationSender> {
    let sender: Arc<dyn NotificationSender> = match config.backend {
        MailBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            &config.smtp_host,
            config.smtp_port,
        )),
        MailBackend::Ses => {
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Arc::new(SesNotificationSender::new(aws_sdk_sesv2::Client::new(
                &aws_config,
            )))
        }
        MailBackend::Noop => Arc::new(NoopNotificationSender),
    };
    tracing::info!(backend = %config.backend, "メール送信を初期化しました");
    sender
}
