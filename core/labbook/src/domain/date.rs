//! 学習時刻・コメントキーに使う日時の固定書式 `DD-MM-YYYY HH:MM`
//!
//! 分精度・タイムゾーンなし。`parse` は書式に厳密で、`format` はその逆変換。

use chrono::{Local, NaiveDateTime, TimeZone, Timelike};
use common::error::Error;
use std::sync::LazyLock;

/// chrono の書式指定
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

// chrono は桁数や符号に寛容なため、形だけ先に固定する
static DATE_SHAPE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4} [0-9]{2}:[0-9]{2}$").unwrap()
});

/// 分精度の日時（秒以下は常に 0、年は 0000〜9999）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteStamp(NaiveDateTime);

impl MinuteStamp {
    /// 固定書式で表現できる日時だけを受け付ける
    pub fn new(dt: NaiveDateTime) -> Result<Self, Error> {
        if dt.second() != 0 || dt.nanosecond() != 0 {
            return Err(Error::format(format!(
                "'{}' is not minute-precision",
                dt
            )));
        }
        if !(0..=9999).contains(&chrono::Datelike::year(&dt)) {
            return Err(Error::format(format!(
                "year of '{}' cannot be written as four digits",
                dt
            )));
        }
        Ok(Self(dt))
    }

    /// Unix epoch ミリ秒をローカル時刻に変換し、分に切り捨てる
    pub fn from_unix_ms_local(ms: u64) -> Result<Self, Error> {
        let local = Local
            .timestamp_millis_opt(ms as i64)
            .single()
            .ok_or_else(|| Error::system(format!("timestamp {} is out of range", ms)))?;
        let naive = local.naive_local();
        let truncated = naive
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .ok_or_else(|| Error::system(format!("timestamp {} is out of range", ms)))?;
        Self::new(truncated)
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl std::fmt::Display for MinuteStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format(self))
    }
}

/// `DD-MM-YYYY HH:MM` を厳密に解釈する。形が違う・暦上ありえない日時は `Error::Format`。
pub fn parse(text: &str) -> Result<MinuteStamp, Error> {
    if !DATE_SHAPE.is_match(text) {
        return Err(Error::format(format!(
            "'{}' does not match DD-MM-YYYY HH:MM",
            text
        )));
    }
    let dt = NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| Error::format(format!("'{}' is not a valid date/time: {}", text, e)))?;
    MinuteStamp::new(dt)
}

pub fn format(stamp: &MinuteStamp) -> String {
    stamp.0.format(DATE_FORMAT).to_string()
}
