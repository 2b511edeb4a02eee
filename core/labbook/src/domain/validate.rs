//! JSON 値のフィールド単位の検証
//!
//! 各関数は成功値か、フィールドパス付きの `Error::Validation` を返す。
//! レコード単位の検証はこれらを順に `?` で合成し、最初の不正で止まる。

use common::error::Error;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// `Models[1].XVars[0]` 形式のフィールドパス
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    pub fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let path = if self.0.is_empty() { "<root>" } else { &self.0 };
        Error::validation(path, message)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON の型名（エラーメッセージ用）
fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(path: &FieldPath, what: &str, got: &Value) -> Error {
    path.error(format!("expected {}, got {}", what, kind_of(got)))
}

pub fn object<'a>(v: &'a Value, path: &FieldPath) -> Result<&'a Map<String, Value>, Error> {
    v.as_object().ok_or_else(|| expected(path, "object", v))
}

/// 必須キーを取り出す。無ければ `missing required field`
pub fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<(&'a Value, FieldPath), Error> {
    let p = path.key(key);
    match obj.get(key) {
        Some(v) => Ok((v, p)),
        None => Err(p.error("missing required field")),
    }
}

pub fn text(v: &Value, path: &FieldPath) -> Result<String, Error> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| expected(path, "string", v))
}

pub fn non_empty_text(v: &Value, path: &FieldPath) -> Result<String, Error> {
    let s = text(v, path)?;
    if s.is_empty() {
        return Err(path.error("must not be empty"));
    }
    Ok(s)
}

pub fn text_list(v: &Value, path: &FieldPath) -> Result<Vec<String>, Error> {
    let items = v.as_array().ok_or_else(|| expected(path, "array of strings", v))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| text(item, &path.index(i)))
        .collect()
}

pub fn text_map(v: &Value, path: &FieldPath) -> Result<BTreeMap<String, String>, Error> {
    object(v, path)?
        .iter()
        .map(|(k, item)| text(item, &path.key(k)).map(|t| (k.clone(), t)))
        .collect()
}

pub fn boolean(v: &Value, path: &FieldPath) -> Result<bool, Error> {
    v.as_bool().ok_or_else(|| expected(path, "boolean", v))
}

/// 既知キー以外をそのまま残す（新しいツールが書いたフィールドを失わないため）
pub fn unknown_keys(obj: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
