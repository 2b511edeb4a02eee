use crate::domain::command::Command;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::ProjectDir;
use common::error::Error;
use common::ports::outbound::EnvResolver;
use std::ffi::OsString;

/// CLI から受け取った生の設定（command は文字列のまま保持）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    pub project_dir: Option<String>,
    /// コマンド名（None の場合は Show）
    pub command_name: Option<String>,
    pub command_args: Vec<String>,
    /// comment --at の値
    pub comment_at: Option<String>,
}

/// 解析結果: 通常の Config または補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn global_args(cmd: clap::Command) -> clap::Command {
    cmd.disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Print help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("project")
                .short('p')
                .long("project")
                .value_name("directory")
                .help("Project directory containing labbook.json (default: $LABBOOK_PROJECT or the current directory)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn name_arg(id: &'static str, value_name: &'static str) -> clap::Arg {
    clap::Arg::new(id).value_name(value_name).required(true).num_args(1)
}

pub(crate) fn build_clap_command() -> clap::Command {
    global_args(
        clap::Command::new("labbook")
            .about("Digital labbook for trained machine learning models")
            .subcommand_required(false)
            .disable_help_subcommand(true)
            .subcommand(clap::Command::new("show").about("Show the project summary (default)"))
            .subcommand(clap::Command::new("help").about("Display this help message"))
            .subcommand(
                clap::Command::new("create")
                    .about("Create a new project in the project directory")
                    .arg(name_arg("name", "name")),
            )
            .subcommand(clap::Command::new("models").about("List trained models"))
            .subcommand(
                clap::Command::new("model")
                    .about("Show one model")
                    .arg(name_arg("name", "name")),
            )
            .subcommand(
                clap::Command::new("add-model")
                    .about("Add a model entry read from a JSON file")
                    .arg(name_arg("file", "file")),
            )
            .subcommand(
                clap::Command::new("flag")
                    .about("Flag a model")
                    .arg(name_arg("name", "name")),
            )
            .subcommand(
                clap::Command::new("unflag")
                    .about("Remove the flag from a model")
                    .arg(name_arg("name", "name")),
            )
            .subcommand(
                clap::Command::new("comment")
                    .about("Add a dated project comment")
                    .arg(
                        clap::Arg::new("at")
                            .long("at")
                            .value_name("DD-MM-YYYY HH:MM")
                            .help("Timestamp for the comment (default: now)")
                            .num_args(1),
                    )
                    .arg(
                        clap::Arg::new("text")
                            .value_name("text")
                            .required(true)
                            .num_args(1..),
                    ),
            )
            .subcommand(clap::Command::new("comments").about("List project comments")),
    )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let help = matches.get_flag("help") || matches.subcommand_matches("help").is_some();
    let project_dir = matches.get_one::<String>("project").cloned();

    let strings = |m: &clap::ArgMatches, id: &str| -> Vec<String> {
        m.get_many::<String>(id)
            .map(|i| i.cloned().collect())
            .unwrap_or_default()
    };

    let mut comment_at = None;
    let (command_name, command_args) = match matches.subcommand() {
        None | Some(("help", _)) | Some(("show", _)) => (None, Vec::new()),
        Some((name @ ("create" | "model" | "flag" | "unflag"), m)) => {
            (Some(name.to_string()), strings(m, "name"))
        }
        Some(("add-model", m)) => (Some("add-model".to_string()), strings(m, "file")),
        Some(("comment", m)) => {
            comment_at = m.get_one::<String>("at").cloned();
            (Some("comment".to_string()), strings(m, "text"))
        }
        Some((name, _)) => (Some(name.to_string()), vec![]),
    };

    Config {
        help,
        project_dir,
        command_name,
        command_args,
        comment_at,
    }
}

/// 引数列を解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// コマンドラインを解析する
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_args_from(std::env::args_os())
}

/// 補完スクリプトを標準出力に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "labbook", &mut std::io::stdout());
}

/// Config から Command を組み立てる
pub fn config_to_command(config: &Config) -> Command {
    if config.help {
        return Command::Help;
    }
    match &config.command_name {
        Some(name) => match Command::parse_with_args(name, &config.command_args) {
            Command::Comment { text, .. } => Command::Comment {
                at: config.comment_at.clone(),
                text,
            },
            cmd => cmd,
        },
        None => Command::Show,
    }
}

/// プロジェクトディレクトリを解決する
///
/// 優先順位:
/// 1. コマンドラインオプション -p/--project
/// 2. 環境変数 LABBOOK_PROJECT
/// 3. カレントディレクトリ
pub fn resolve_project_dir(config: &Config, env: &dyn EnvResolver) -> Result<ProjectDir, Error> {
    if let Some(dir) = config.project_dir.as_deref().filter(|s| !s.is_empty()) {
        return Ok(ProjectDir::new(dir));
    }
    if let Some(dir) = env.project_dir_from_env() {
        return Ok(dir);
    }
    Ok(ProjectDir::new(env.current_dir()?))
}
