//! プロジェクト 1 件分の台帳（メタデータ・日付付きコメント・モデル一覧）
//!
//! 変更はメモリ上のみ。永続化は `ProjectStore::save` で明示的に行う。

use super::date::{self, MinuteStamp};
use super::model_record::ModelRecord;
use super::summary::Summary;
use super::validate::{self, FieldPath};
use common::error::Error;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

mod keys {
    pub const NAME: &str = "Name";
    pub const COMMENTS: &str = "Comments";
    pub const MODELS: &str = "Models";

    pub const ALL: &[&str] = &[NAME, COMMENTS, MODELS];
}

/// プロジェクト台帳
///
/// モデル名は `add_model` で重複を拒否する。読み込んだファイルに既に重複がある場合は
/// そのまま保持し、名前による操作は先頭の一致に作用する。
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLedger {
    name: String,
    comments: BTreeMap<String, String>,
    models: Vec<ModelRecord>,
    extra: Map<String, Value>,
}

impl ProjectLedger {
    /// 空の台帳（コメント・モデルなし）
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::validation(keys::NAME, "must not be empty"));
        }
        Ok(Self {
            name,
            comments: BTreeMap::new(),
            models: Vec::new(),
            extra: Map::new(),
        })
    }

    /// descriptor のマッピングから検証付きで構築する。
    /// モデルは先頭から検証し、最初のエラー（`Models[i].<field>`）で失敗する。
    pub fn from_value(v: &Value) -> Result<Self, Error> {
        let root = FieldPath::root();
        let obj = validate::object(v, &root)?;

        let (name, p) = validate::required(obj, keys::NAME, &root)?;
        let name = validate::non_empty_text(name, &p)?;

        let (comments, p) = validate::required(obj, keys::COMMENTS, &root)?;
        let comments = validate::text_map(comments, &p)?;

        let (models, p) = validate::required(obj, keys::MODELS, &root)?;
        let models = models
            .as_array()
            .ok_or_else(|| Error::validation(p.to_string(), "expected array of models"))?
            .iter()
            .enumerate()
            .map(|(i, m)| ModelRecord::from_value(m, &p.index(i)))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            name,
            comments,
            models,
            extra: validate::unknown_keys(obj, keys::ALL),
        })
    }

    /// `{Name, Comments, Models: [...]}` に変換する（モデル順は保持）
    pub fn to_value(&self) -> Value {
        let mut m = Map::new();
        m.insert(keys::NAME.into(), Value::from(self.name.clone()));
        m.insert(
            keys::COMMENTS.into(),
            Value::Object(
                self.comments
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                    .collect(),
            ),
        );
        m.insert(
            keys::MODELS.into(),
            Value::Array(self.models.iter().map(ModelRecord::to_value).collect()),
        );
        for (k, v) in &self.extra {
            m.insert(k.clone(), v.clone());
        }
        Value::Object(m)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn models(&self) -> &[ModelRecord] {
        &self.models
    }

    /// 名前が一致する先頭のモデル
    pub fn model(&self, name: &str) -> Option<&ModelRecord> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// コメントを古い順に返す。日時として読めないキーは最後にキーの辞書順で並ぶ。
    pub fn comments(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut all: Vec<(&str, &str)> = self
            .comments
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_by_cached_key(|&(k, _)| {
            let at = date::parse(k).ok();
            (at.is_none(), at, k)
        });
        all.into_iter()
    }

    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    /// モデルを末尾に追加する。同名モデルがあれば `AlreadyExists`
    pub fn add_model(&mut self, record: ModelRecord) -> Result<(), Error> {
        if self.model(record.name()).is_some() {
            return Err(Error::already_exists(format!(
                "Model '{}' already exists in project '{}'",
                record.name(),
                self.name
            )));
        }
        self.models.push(record);
        Ok(())
    }

    /// 名前が一致する先頭のモデルの flagged を設定する。無ければ `NotFound`（台帳は変更しない）
    pub fn set_flag(&mut self, model_name: &str, value: bool) -> Result<(), Error> {
        let model = self
            .models
            .iter_mut()
            .find(|m| m.name() == model_name)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "No model named '{}' in project '{}'",
                    model_name, self.name
                ))
            })?;
        model.set_flagged(value);
        Ok(())
    }

    /// 同じキーのコメントは上書き
    pub fn add_comment(&mut self, timestamp: impl Into<String>, text: impl Into<String>) {
        self.comments.insert(timestamp.into(), text.into());
    }

    /// 2 回以上現れるモデル名（出現順、重複なし）
    pub fn duplicate_model_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dups: Vec<String> = Vec::new();
        for m in &self.models {
            if !seen.insert(m.name()) && !dups.iter().any(|d| d == m.name()) {
                dups.push(m.name().to_string());
            }
        }
        dups
    }

    pub fn latest_trained_at(&self) -> Option<MinuteStamp> {
        self.models.iter().map(ModelRecord::trained_at).max()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            name: self.name.clone(),
            model_count: self.models.len(),
            latest_trained_at: self.latest_trained_at(),
        }
    }
}
