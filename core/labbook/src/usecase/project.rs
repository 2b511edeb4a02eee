//! プロジェクト操作のユースケース（create / show / models / add-model / flag / comment）
//!
//! 各操作はストアを開き、変更があれば保存して閉じる。表示は呼び出し側の責務。

use crate::domain::date::{self, MinuteStamp};
use crate::domain::model_record::keys;
use crate::domain::validate::FieldPath;
use crate::domain::{ModelRecord, Summary};
use crate::store::ProjectStore;
use common::domain::ProjectDir;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log};
use std::path::Path;
use std::sync::Arc;

/// プロジェクト操作のユースケース
pub struct ProjectUseCase {
    fs: Arc<dyn FileSystem>,
    log: Arc<dyn Log>,
    clock: Arc<dyn Clock>,
}

impl ProjectUseCase {
    pub fn new(fs: Arc<dyn FileSystem>, log: Arc<dyn Log>, clock: Arc<dyn Clock>) -> Self {
        Self { fs, log, clock }
    }

    pub fn open(&self, dir: &ProjectDir) -> Result<ProjectStore, Error> {
        ProjectStore::open(Arc::clone(&self.fs), Arc::clone(&self.log), dir.clone())
    }

    pub fn create(&self, dir: &ProjectDir, name: &str) -> Result<Summary, Error> {
        let store = ProjectStore::create(
            Arc::clone(&self.fs),
            Arc::clone(&self.log),
            dir.clone(),
            name,
        )?;
        Ok(store.summary())
    }

    pub fn summary(&self, dir: &ProjectDir) -> Result<Summary, Error> {
        Ok(self.open(dir)?.summary())
    }

    pub fn models(&self, dir: &ProjectDir) -> Result<Vec<ModelRecord>, Error> {
        Ok(self.open(dir)?.ledger().models().to_vec())
    }

    /// 名前が一致する先頭のモデル。無ければ `NotFound`
    pub fn model(&self, dir: &ProjectDir, name: &str) -> Result<ModelRecord, Error> {
        let store = self.open(dir)?;
        store
            .ledger()
            .model(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("No model named '{}'", name)))
    }

    /// JSON ファイル（Models の 1 要素と同じ形）からモデルを追加して保存する。
    /// `Time` が無ければ現在時刻を入れる。追加したモデル名を返す。
    pub fn add_model(&self, dir: &ProjectDir, file: &Path) -> Result<String, Error> {
        let bytes = self.fs.read(file)?;
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            Error::format(format!("Malformed JSON in '{}': {}", file.display(), e))
        })?;
        if let Some(obj) = value.as_object_mut() {
            if !obj.contains_key(keys::TIME) {
                let now = self.now()?;
                obj.insert(keys::TIME.to_string(), date::format(&now).into());
            }
        }
        let record = ModelRecord::from_value(&value, &FieldPath::root())?;
        let name = record.name().to_string();

        let mut store = self.open(dir)?;
        store.ledger_mut().add_model(record)?;
        store.save()?;
        Ok(name)
    }

    pub fn set_flag(&self, dir: &ProjectDir, name: &str, value: bool) -> Result<(), Error> {
        let mut store = self.open(dir)?;
        store.ledger_mut().set_flag(name, value)?;
        store.save()
    }

    /// コメントを追加して保存する。`at` は `DD-MM-YYYY HH:MM`、省略時は現在時刻。使ったキーを返す。
    pub fn add_comment(
        &self,
        dir: &ProjectDir,
        at: Option<&str>,
        text: &str,
    ) -> Result<String, Error> {
        if text.trim().is_empty() {
            return Err(Error::invalid_argument("comment text is empty"));
        }
        let stamp = match at {
            Some(s) => date::parse(s)?,
            None => self.now()?,
        };
        let key = date::format(&stamp);

        let mut store = self.open(dir)?;
        store.ledger_mut().add_comment(key.clone(), text);
        store.save()?;
        Ok(key)
    }

    pub fn comments(&self, dir: &ProjectDir) -> Result<Vec<(String, String)>, Error> {
        let store = self.open(dir)?;
        Ok(store
            .ledger()
            .comments()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    fn now(&self) -> Result<MinuteStamp, Error> {
        MinuteStamp::from_unix_ms_local(self.clock.now_ms())
    }
}
