//! ユースケース層

mod project;

pub use project::ProjectUseCase;
