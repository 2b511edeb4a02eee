//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::{Dirs, ProjectDir};
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

const LOG_FILENAME: &str = "labbook.jsonl";

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn project_dir_from_env(&self) -> Option<ProjectDir> {
        non_empty_var("LABBOOK_PROJECT")
            .map(PathBuf::from)
            .map(ProjectDir::new)
    }

    fn current_dir(&self) -> Result<PathBuf, Error> {
        env::current_dir()
            .map_err(|e| Error::env(format!("Failed to get current directory: {}", e)))
    }

    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        if let Some(home) = non_empty_var("LABBOOK_HOME") {
            return Ok(Dirs {
                state_dir: PathBuf::from(home).join("state"),
            });
        }

        let state_base = non_empty_var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty_var("HOME").map(|h| PathBuf::from(h).join(".local").join("state")))
            .ok_or_else(|| Error::env("HOME is not set"))?;

        Ok(Dirs {
            state_dir: state_base.join("labbook"),
        })
    }

    fn resolve_log_file_path(&self) -> Result<PathBuf, Error> {
        if let Some(path) = non_empty_var("LABBOOK_LOG_FILE") {
            return Ok(PathBuf::from(path));
        }
        Ok(self.resolve_dirs()?.logs_dir().join(LOG_FILENAME))
    }
}
