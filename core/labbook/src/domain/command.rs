//! labbook コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、match でディスパッチする。

/// labbook のサブコマンド
///
/// コマンドなし = サマリー表示。それ以外は文字列から解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,

    /// サマリー表示（コマンド未指定時）
    Show,

    /// 新規プロジェクト作成（create <name>）
    Create { name: String },

    /// モデル一覧
    Models,
    /// モデル詳細（model <name>）
    Model { name: String },
    /// JSON ファイルからモデルを追加（add-model <file>）
    AddModel { file: String },

    /// flagged を立てる（flag <name>）
    Flag { name: String },
    /// flagged を外す（unflag <name>）
    Unflag { name: String },

    /// コメント追加（comment [--at <time>] <text...>）
    Comment { at: Option<String>, text: String },
    /// コメント一覧
    Comments,

    /// 未知のコマンド（エラー用）
    Unknown(String),
}

impl Command {
    /// コマンド名と引数から Command に解析する
    pub fn parse_with_args(name: &str, args: &[String]) -> Self {
        let first = || args.first().cloned().unwrap_or_default();
        match name {
            "create" => Command::Create { name: first() },
            "model" => Command::Model { name: first() },
            "add-model" => Command::AddModel { file: first() },
            "flag" => Command::Flag { name: first() },
            "unflag" => Command::Unflag { name: first() },
            "comment" => Command::Comment {
                at: None,
                text: args.join(" "),
            },
            _ => Self::parse(name),
        }
    }

    /// 文字列を Command に解析する（引数なし）
    pub fn parse(s: &str) -> Self {
        match s {
            "show" => Command::Show,
            "models" => Command::Models,
            "comments" => Command::Comments,
            _ => Command::Unknown(s.to_string()),
        }
    }

    /// 台帳を書き換えるコマンドか
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Create { .. }
                | Command::AddModel { .. }
                | Command::Flag { .. }
                | Command::Unflag { .. }
                | Command::Comment { .. }
        )
    }

    /// ログ用のコマンド名
    pub fn name(&self) -> &str {
        match self {
            Command::Help => "help",
            Command::Show => "show",
            Command::Create { .. } => "create",
            Command::Models => "models",
            Command::Model { .. } => "model",
            Command::AddModel { .. } => "add-model",
            Command::Flag { .. } => "flag",
            Command::Unflag { .. } => "unflag",
            Command::Comment { .. } => "comment",
            Command::Comments => "comments",
            Command::Unknown(name) => name,
        }
    }
}
