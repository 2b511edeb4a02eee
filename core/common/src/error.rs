//! エラーハンドリング
//!
//! 全レイヤーで共通の `Error` を使い、`main` で終了コード（sysexits 準拠）に変換する。

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// パスや名前付きモデルが存在しない
    #[error("{0}")]
    NotFound(String),

    /// JSON の構文エラー、日付文字列の書式違反
    #[error("{0}")]
    Format(String),

    /// フィールド単位の不正（型違い・必須キー欠落）。`path` は `Models[1].XVars` の形式
    #[error("invalid field '{path}': {message}")]
    Validation { path: String, message: String },

    /// 既に存在する（descriptor の二重作成、同名モデルの追加）
    #[error("{0}")]
    AlreadyExists(String),

    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Json(String),

    /// 環境変数からパスを解決できない
    #[error("{0}")]
    Env(String),

    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Error::Json(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Error::AlreadyExists(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    /// Validation のフィールドパス（それ以外は None）
    pub fn field_path(&self) -> Option<&str> {
        match self {
            Error::Validation { path, .. } => Some(path),
            _ => None,
        }
    }

    /// 終了コード（sysexits.h）
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Format(_) | Error::Validation { .. } => 65,
            Error::NotFound(_) => 66,
            Error::Json(_) | Error::System(_) => 70,
            Error::AlreadyExists(_) => 73,
            Error::Io(_) => 74,
            Error::Env(_) => 78,
        }
    }

    /// usage を併せて表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(err.is_usage());

        let err = Error::system("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 70);
        assert!(!err.is_usage());
    }

    #[test]
    fn test_validation_display_and_path() {
        let err = Error::validation("Models[0].XVars", "missing required field");
        assert_eq!(
            err.to_string(),
            "invalid field 'Models[0].XVars': missing required field"
        );
        assert_eq!(err.field_path(), Some("Models[0].XVars"));
        assert_eq!(err.exit_code(), 65);
        assert_eq!(Error::not_found("x").field_path(), None);
    }

    #[test]
    fn test_exit_codes_by_kind() {
        assert_eq!(Error::not_found("x").exit_code(), 66);
        assert_eq!(Error::format("x").exit_code(), 65);
        assert_eq!(Error::already_exists("x").exit_code(), 73);
        assert_eq!(Error::io_msg("x").exit_code(), 74);
        assert_eq!(Error::env("x").exit_code(), 78);
    }
}
