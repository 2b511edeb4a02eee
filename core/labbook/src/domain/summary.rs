//! 表示層向けの読み取り専用サマリー

use super::date::MinuteStamp;

/// プロジェクト名・モデル数・最新の学習時刻
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub name: String,
    pub model_count: usize,
    /// モデルが無ければ None
    pub latest_trained_at: Option<MinuteStamp>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Labbook] Loaded '{}' project with {} trained model(s).",
            self.name, self.model_count
        )
    }
}
