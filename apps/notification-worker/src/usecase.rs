//! # ユースケース層
//!
//! ワーカーが実行する処理の本体。ジョブキューやプロセス起動の詳細には依存しない。

pub mod notification;

pub use notification::{NotificationRepositories, NotificationService, TemplateRenderer};
