//! 学習済みモデル 1 件分のレコード
//!
//! labbook.json の `Models[i]` に対応する。`Pickled` はフレームワーク側が読み書きする不透明なマップ。

use super::date::{self, MinuteStamp};
use super::validate::{self, FieldPath};
use common::error::Error;
use serde_json::{Map, Value};

pub(crate) mod keys {
    pub const NAME: &str = "Name";
    pub const TIME: &str = "Time";
    pub const COMMENTS: &str = "Comments";
    pub const TRAINED_ON: &str = "TrainedOn";
    pub const X_VARS: &str = "XVars";
    pub const Y_VARS: &str = "YVars";
    pub const TRANSFORMS: &str = "Transforms";
    pub const PICKLED: &str = "Pickled";
    pub const FLAGGED: &str = "Flagged";

    pub const ALL: &[&str] = &[
        NAME, TIME, COMMENTS, TRAINED_ON, X_VARS, Y_VARS, TRANSFORMS, PICKLED, FLAGGED,
    ];
}

/// 学習済みモデルのメタデータと成果物ペイロード
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRecord {
    name: String,
    trained_at: MinuteStamp,
    comments: String,
    trained_on: Vec<String>,
    input_variables: Vec<String>,
    output_variables: Vec<String>,
    transforms: Vec<String>,
    payload: Map<String, Value>,
    flagged: bool,
    extra: Map<String, Value>,
}

impl ModelRecord {
    /// 名前と学習時刻だけを持つ空のレコード。名前が空なら `Name` の Validation エラー
    pub fn new(name: impl Into<String>, trained_at: MinuteStamp) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::validation(keys::NAME, "must not be empty"));
        }
        Ok(Self {
            name,
            trained_at,
            comments: String::new(),
            trained_on: Vec::new(),
            input_variables: Vec::new(),
            output_variables: Vec::new(),
            transforms: Vec::new(),
            payload: Map::new(),
            flagged: false,
            extra: Map::new(),
        })
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn with_trained_on(mut self, datasets: Vec<String>) -> Self {
        self.trained_on = datasets;
        self
    }

    pub fn with_variables(mut self, inputs: Vec<String>, outputs: Vec<String>) -> Self {
        self.input_variables = inputs;
        self.output_variables = outputs;
        self
    }

    pub fn with_transforms(mut self, transforms: Vec<String>) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// マッピングから検証付きで構築する。`path` はエラー時のフィールドパスの接頭辞
    pub fn from_value(v: &Value, path: &FieldPath) -> Result<Self, Error> {
        let obj = validate::object(v, path)?;

        let (name, p) = validate::required(obj, keys::NAME, path)?;
        let name = validate::non_empty_text(name, &p)?;

        let (time, p) = validate::required(obj, keys::TIME, path)?;
        let time = validate::text(time, &p)?;
        let trained_at = date::parse(&time).map_err(|e| Error::validation(p.to_string(), e.to_string()))?;

        let (comments, p) = validate::required(obj, keys::COMMENTS, path)?;
        let comments = validate::text(comments, &p)?;

        let (trained_on, p) = validate::required(obj, keys::TRAINED_ON, path)?;
        let trained_on = validate::text_list(trained_on, &p)?;

        let (x_vars, p) = validate::required(obj, keys::X_VARS, path)?;
        let input_variables = validate::text_list(x_vars, &p)?;

        let (y_vars, p) = validate::required(obj, keys::Y_VARS, path)?;
        let output_variables = validate::text_list(y_vars, &p)?;

        let (transforms, p) = validate::required(obj, keys::TRANSFORMS, path)?;
        let transforms = validate::text_list(transforms, &p)?;

        let (pickled, p) = validate::required(obj, keys::PICKLED, path)?;
        let payload = validate::object(pickled, &p)?.clone();

        let flagged = match obj.get(keys::FLAGGED) {
            Some(v) => validate::boolean(v, &path.key(keys::FLAGGED))?,
            None => false,
        };

        Ok(Self {
            name,
            trained_at,
            comments,
            trained_on,
            input_variables,
            output_variables,
            transforms,
            payload,
            flagged,
            extra: validate::unknown_keys(obj, keys::ALL),
        })
    }

    /// descriptor 形式のマッピングに変換する（`Time` は固定書式）
    pub fn to_value(&self) -> Value {
        let mut m = Map::new();
        m.insert(keys::NAME.into(), Value::from(self.name.clone()));
        m.insert(keys::TIME.into(), Value::from(date::format(&self.trained_at)));
        m.insert(keys::COMMENTS.into(), Value::from(self.comments.clone()));
        m.insert(keys::TRAINED_ON.into(), Value::from(self.trained_on.clone()));
        m.insert(keys::X_VARS.into(), Value::from(self.input_variables.clone()));
        m.insert(keys::Y_VARS.into(), Value::from(self.output_variables.clone()));
        m.insert(keys::TRANSFORMS.into(), Value::from(self.transforms.clone()));
        m.insert(keys::PICKLED.into(), Value::Object(self.payload.clone()));
        m.insert(keys::FLAGGED.into(), Value::Bool(self.flagged));
        for (k, v) in &self.extra {
            m.insert(k.clone(), v.clone());
        }
        Value::Object(m)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trained_at(&self) -> MinuteStamp {
        self.trained_at
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn trained_on(&self) -> &[String] {
        &self.trained_on
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn output_variables(&self) -> &[String] {
        &self.output_variables
    }

    pub fn transforms(&self) -> &[String] {
        &self.transforms
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn flagged(&self) -> bool {
        self.flagged
    }

    pub fn set_flagged(&mut self, value: bool) {
        self.flagged = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Name": "rf-baseline",
            "Time": "12-03-2024 14:30",
            "Comments": "first try",
            "TrainedOn": ["runs/2023", "runs/2024"],
            "XVars": ["energy", "angle"],
            "YVars": ["label"],
            "Transforms": ["standard_scaler"],
            "Pickled": {"framework": "sklearn", "blob": "AAEC"}
        })
    }

    #[test]
    fn test_from_value_valid() {
        let r = ModelRecord::from_value(&sample(), &FieldPath::root()).unwrap();
        assert_eq!(r.name(), "rf-baseline");
        assert_eq!(r.trained_at(), date::parse("12-03-2024 14:30").unwrap());
        assert_eq!(r.trained_on(), &["runs/2023".to_string(), "runs/2024".to_string()]);
        assert_eq!(r.input_variables().len(), 2);
        assert_eq!(r.output_variables(), &["label".to_string()]);
        assert_eq!(r.payload()["framework"], "sklearn");
        assert!(!r.flagged());
    }

    #[test]
    fn test_from_value_reads_flagged() {
        let mut v = sample();
        v["Flagged"] = json!(true);
        let r = ModelRecord::from_value(&v, &FieldPath::root()).unwrap();
        assert!(r.flagged());
    }

    #[test]
    fn test_missing_field_names_it() {
        let mut v = sample();
        v.as_object_mut().unwrap().remove("XVars");
        let path = FieldPath::root().key("Models").index(3);
        let err = ModelRecord::from_value(&v, &path).unwrap_err();
        assert_eq!(err.field_path(), Some("Models[3].XVars"));
    }

    #[test]
    fn test_wrong_shapes() {
        let cases = [
            ("TrainedOn", json!("runs/2024"), "TrainedOn"),
            ("TrainedOn", json!(["a", 3]), "TrainedOn[1]"),
            ("Pickled", json!([1, 2]), "Pickled"),
            ("Flagged", json!("yes"), "Flagged"),
            ("Name", json!(""), "Name"),
            ("Comments", json!(null), "Comments"),
        ];
        for (key, bad, expected_path) in cases {
            let mut v = sample();
            v[key] = bad;
            let err = ModelRecord::from_value(&v, &FieldPath::root()).unwrap_err();
            assert_eq!(err.field_path(), Some(expected_path), "case {}", key);
        }
    }

    #[test]
    fn test_bad_time_is_validation_error_on_time() {
        let mut v = sample();
        v["Time"] = json!("2024-03-12 14:30");
        let err = ModelRecord::from_value(&v, &FieldPath::root()).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(err.field_path(), Some("Time"));
    }

    #[test]
    fn test_first_defect_wins() {
        let mut v = sample();
        v.as_object_mut().unwrap().remove("Name");
        v["YVars"] = json!(1);
        let err = ModelRecord::from_value(&v, &FieldPath::root()).unwrap_err();
        assert_eq!(err.field_path(), Some("Name"));
    }

    #[test]
    fn test_to_value_round_trip_keeps_unknown_keys() {
        let mut v = sample();
        v["Metrics"] = json!({"auc": 0.91});
        let r = ModelRecord::from_value(&v, &FieldPath::root()).unwrap();
        let out = r.to_value();
        assert_eq!(out["Time"], "12-03-2024 14:30");
        assert_eq!(out["Flagged"], false);
        assert_eq!(out["Metrics"]["auc"], 0.91);
        assert_eq!(ModelRecord::from_value(&out, &FieldPath::root()).unwrap(), r);
    }

    #[test]
    fn test_new_rejects_empty_name() {
        let t = date::parse("01-01-2024 00:00").unwrap();
        assert!(ModelRecord::new("", t).is_err());
        let r = ModelRecord::new("m", t)
            .unwrap()
            .with_variables(vec!["x".into()], vec!["y".into()]);
        assert_eq!(r.input_variables(), &["x".to_string()]);
    }
}
