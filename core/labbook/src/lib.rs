//! labbook: 学習済みモデルの台帳（labbook.json）を管理するライブラリ
//!
//! 表示層（CLI など）は `ProjectStore` / `ProjectLedger` の操作だけを呼び、結果を描画する。

pub mod cli;
pub mod domain;
pub mod ports;
pub mod store;
pub mod usecase;
pub mod wiring;

pub use domain::{MinuteStamp, ModelRecord, ProjectLedger, Summary};
pub use store::{ProjectStore, DESCRIPTOR_FILENAME};

#[cfg(test)]
mod tests;
