//! 環境変数解決 Outbound ポート
//!
//! プロジェクトディレクトリ・状態ディレクトリ・ログファイルを環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{Dirs, ProjectDir};
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// 環境変数 LABBOOK_PROJECT（空文字は未設定扱い）
    fn project_dir_from_env(&self) -> Option<ProjectDir>;

    /// カレントディレクトリを返す（プロジェクト未指定時の既定）
    fn current_dir(&self) -> Result<PathBuf, Error>;

    /// 状態ディレクトリ等を解決する
    ///
    /// 優先順位:
    /// 1. LABBOOK_HOME（state = $LABBOOK_HOME/state）
    /// 2. $XDG_STATE_HOME/labbook
    /// 3. $HOME/.local/state/labbook
    fn resolve_dirs(&self) -> Result<Dirs, Error>;

    /// ログファイルのパス。LABBOOK_LOG_FILE があればそれ、なければ state/logs/labbook.jsonl
    fn resolve_log_file_path(&self) -> Result<PathBuf, Error>;
}
