//! ドメイン型（台帳・レコード・日時、コマンド enum）

pub mod command;
pub mod date;
pub mod model_record;
pub mod project_ledger;
pub mod summary;
pub mod validate;

pub use command::Command;
pub use date::MinuteStamp;
pub use model_record::ModelRecord;
pub use project_ledger::ProjectLedger;
pub use summary::Summary;
