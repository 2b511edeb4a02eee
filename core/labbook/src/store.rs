//! ProjectLedger をプロジェクトディレクトリ直下の labbook.json に結びつけるストア
//!
//! 保存は同一ディレクトリの一時ファイルへ書いてから rename で置き換える。
//! 途中で落ちても既存の labbook.json は壊れない。
//! 同じディレクトリを同時に開くストアは 1 つだけ（ロックは取らない）。

use crate::domain::{ProjectLedger, Summary};
use common::domain::ProjectDir;
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::path::PathBuf;
use std::sync::Arc;

pub const DESCRIPTOR_FILENAME: &str = "labbook.json";
const TEMP_FILENAME: &str = ".labbook.json.tmp";

/// 読み込み済みの台帳とその保存先
///
/// `open` / `create` でしか作れないため、存在する値は常にディレクトリに結び付いている。
pub struct ProjectStore {
    fs: Arc<dyn FileSystem>,
    log: Arc<dyn Log>,
    dir: ProjectDir,
    ledger: ProjectLedger,
}

impl ProjectStore {
    /// 既存プロジェクトを開く
    ///
    /// ディレクトリや labbook.json が無ければ `NotFound`、JSON が壊れていれば `Format`、
    /// 内容が不正なら `Validation`。
    pub fn open(fs: Arc<dyn FileSystem>, log: Arc<dyn Log>, dir: ProjectDir) -> Result<Self, Error> {
        if !fs.is_dir(&dir) {
            return Err(Error::not_found(format!(
                "No such project directory: '{}'",
                dir
            )));
        }
        let path = descriptor_path(&dir);
        if !fs.exists(&path) {
            return Err(Error::not_found(format!(
                "No {} in '{}'",
                DESCRIPTOR_FILENAME, dir
            )));
        }
        let bytes = fs.read(&path)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            Error::format(format!("Malformed JSON in '{}': {}", path.display(), e))
        })?;
        let ledger = ProjectLedger::from_value(&value)?;

        let dups = ledger.duplicate_model_names();
        if !dups.is_empty() {
            let _ = log.log(
                &LogRecord::new(LogLevel::Warn, "duplicate model names")
                    .layer("adapter")
                    .kind("store")
                    .field("dir", dir.to_string())
                    .field("names", dups),
            );
        }

        let store = Self { fs, log, dir, ledger };
        store.log_event("project opened");
        Ok(store)
    }

    /// 新規プロジェクトを作成して書き込む。labbook.json が既にあれば `AlreadyExists`
    pub fn create(
        fs: Arc<dyn FileSystem>,
        log: Arc<dyn Log>,
        dir: ProjectDir,
        name: &str,
    ) -> Result<Self, Error> {
        let ledger = ProjectLedger::new(name)?;
        let path = descriptor_path(&dir);
        if fs.exists(&path) {
            return Err(Error::already_exists(format!(
                "'{}' already contains {}",
                dir, DESCRIPTOR_FILENAME
            )));
        }
        fs.create_dir_all(&dir)?;
        let store = Self { fs, log, dir, ledger };
        store.write_descriptor()?;
        store.log_event("project created");
        Ok(store)
    }

    /// 台帳を labbook.json に書き戻す（一時ファイル + rename）
    pub fn save(&self) -> Result<(), Error> {
        self.write_descriptor()?;
        self.log_event("project saved");
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary()
    }

    pub fn ledger(&self) -> &ProjectLedger {
        &self.ledger
    }

    /// 変更は save するまでメモリ上のみ
    pub fn ledger_mut(&mut self) -> &mut ProjectLedger {
        &mut self.ledger
    }

    pub fn descriptor_path(&self) -> PathBuf {
        descriptor_path(&self.dir)
    }

    fn write_descriptor(&self) -> Result<(), Error> {
        let mut json = serde_json::to_string_pretty(&self.ledger.to_value())
            .map_err(|e| Error::json(e.to_string()))?;
        json.push('\n');

        let tmp = self.dir.join(TEMP_FILENAME);
        self.fs.write(&tmp, &json)?;
        if let Err(e) = self.fs.rename(&tmp, &self.descriptor_path()) {
            let _ = self.fs.remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn log_event(&self, message: &str) {
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, message)
                .layer("adapter")
                .kind("store")
                .field("dir", self.dir.to_string())
                .field("models", self.ledger.models().len()),
        );
    }
}

fn descriptor_path(dir: &ProjectDir) -> PathBuf {
    dir.join(DESCRIPTOR_FILENAME)
}
