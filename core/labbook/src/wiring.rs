//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem};
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log};

use crate::usecase::ProjectUseCase;

/// 配線で組み立てたポート群（main の Command ディスパッチで利用）
pub struct App {
    pub env_resolver: Arc<dyn EnvResolver>,
    /// 構造化ログ（ファイルへ JSONL）。エラー時のコンソール表示とは別。
    pub logger: Arc<dyn Log>,
    pub project_use_case: ProjectUseCase,
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_labbook() -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger: Arc<dyn Log> = env_resolver
        .resolve_log_file_path()
        .map(|path| Arc::new(FileJsonLog::new(Arc::clone(&fs), path)) as Arc<dyn Log>)
        .unwrap_or_else(|_| Arc::new(NoopLog));
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let project_use_case = ProjectUseCase::new(Arc::clone(&fs), Arc::clone(&logger), clock);
    App {
        env_resolver,
        logger,
        project_use_case,
    }
}
