//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: common の FileSystem / Clock / Log / EnvResolver をそのまま使う

pub mod inbound;
