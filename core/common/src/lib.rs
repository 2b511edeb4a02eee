//! labbook 共通ライブラリ
//!
//! エラー型と、ファイル・時刻・環境変数・ログの Outbound ポートおよび標準アダプタを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// ポートの標準実装
pub mod adapter;
