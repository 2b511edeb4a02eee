//! CLI 引数解析（clap）

mod args;

pub use args::{
    config_to_command, parse_args, parse_args_from, print_completion, resolve_project_dir,
    Config, ParseOutcome,
};
