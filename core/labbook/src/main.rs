use std::path::Path;
use std::process;

use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use labbook::cli::{
    config_to_command, parse_args, print_completion, resolve_project_dir, Config, ParseOutcome,
};
use labbook::domain::{Command, ModelRecord, Summary};
use labbook::ports::inbound::UseCaseRunner;
use labbook::wiring::{wire_labbook, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl Runner {
    fn dispatch(&self, config: &Config, command: Command) -> Result<i32, Error> {
        let dir = match &command {
            Command::Help => {
                print_help();
                return Ok(0);
            }
            Command::Unknown(name) => {
                return Err(Error::invalid_argument(format!(
                    "Command '{}' is not implemented.",
                    name
                )));
            }
            _ => resolve_project_dir(config, &*self.app.env_resolver)?,
        };
        let uc = &self.app.project_use_case;
        match command {
            Command::Show => {
                print_summary(&uc.summary(&dir)?);
            }
            Command::Create { name } => {
                require_arg("create", &name)?;
                uc.create(&dir, &name)?;
                println!("Created project '{}' in {}", name, dir);
            }
            Command::Models => print_models(&uc.models(&dir)?),
            Command::Model { name } => {
                require_arg("model", &name)?;
                print_model(&uc.model(&dir, &name)?);
            }
            Command::AddModel { file } => {
                require_arg("add-model", &file)?;
                let name = uc.add_model(&dir, Path::new(&file))?;
                println!("Added model '{}'", name);
            }
            Command::Flag { name } => {
                require_arg("flag", &name)?;
                uc.set_flag(&dir, &name, true)?;
            }
            Command::Unflag { name } => {
                require_arg("unflag", &name)?;
                uc.set_flag(&dir, &name, false)?;
            }
            Command::Comment { at, text } => {
                let key = uc.add_comment(&dir, at.as_deref(), &text)?;
                println!("Comment added at {}", key);
            }
            Command::Comments => {
                let comments = uc.comments(&dir)?;
                if comments.is_empty() {
                    println!("(no comments)");
                }
                for (at, text) in comments {
                    println!("{}  {}", at, text);
                }
            }
            Command::Help | Command::Unknown(_) => {}
        }
        Ok(0)
    }

    fn log(&self, record: LogRecord) {
        let _ = self.app.logger.log(&record.layer("cli"));
    }
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let command = config_to_command(&config);
        let command_name = command.name().to_string();
        self.log(
            LogRecord::new(LogLevel::Info, "command started")
                .kind("lifecycle")
                .field("command", command_name.clone())
                .field("mutation", command.is_mutation()),
        );

        let result = self.dispatch(&config, command);
        match &result {
            Ok(code) => self.log(
                LogRecord::new(LogLevel::Info, "command finished")
                    .kind("lifecycle")
                    .field("command", command_name)
                    .field("exit_code", *code),
            ),
            Err(e) => self.log(
                LogRecord::new(LogLevel::Error, "command failed")
                    .kind("error")
                    .field("command", command_name)
                    .field("error", e.to_string())
                    .field("exit_code", e.exit_code()),
            ),
        }
        result
    }
}

fn require_arg(command: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{} requires an argument",
            command
        )));
    }
    Ok(())
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("labbook: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: labbook [-h] [-p|--project directory] [--generate shell] [<command> [args...]]");
}

fn print_help() {
    println!("Usage: labbook [-h] [-p|--project directory] [--generate shell] [<command> [args...]]");
    println!("  -h, --help            Display this help message.");
    println!("  -p, --project         Project directory containing labbook.json.");
    println!("  --generate <shell>    Generate shell completion script (bash, zsh, fish).");
    println!("  <command>             Command to execute. Omit to show the project summary.");
    println!();
    println!("Environment:");
    println!("  LABBOOK_PROJECT   Project directory used when -p is not given (default: current directory).");
    println!("  LABBOOK_HOME      Base directory for state (logs). Default: $XDG_STATE_HOME/labbook or ~/.local/state/labbook.");
    println!("  LABBOOK_LOG_FILE  JSONL log file. Default: <state>/logs/labbook.jsonl.");
    println!();
    println!("Commands:");
    println!("  show                      Show the project summary.");
    println!("  create <name>             Create a new project (fails if labbook.json exists).");
    println!("  models                    List trained models.");
    println!("  model <name>              Show one model.");
    println!("  add-model <file>          Add a model entry from a JSON file (Time defaults to now).");
    println!("  flag <name>               Flag a model.");
    println!("  unflag <name>             Remove the flag from a model.");
    println!("  comment [--at time] <text> Add a project comment (time: DD-MM-YYYY HH:MM, default now).");
    println!("  comments                  List project comments.");
}

fn print_summary(summary: &Summary) {
    println!("{}", summary);
    if let Some(latest) = summary.latest_trained_at {
        println!("Latest model trained at {}", latest);
    }
}

fn print_models(models: &[ModelRecord]) {
    if models.is_empty() {
        println!("(no models)");
        return;
    }
    println!("{:1} {:<24} {:16} {}", "F", "NAME", "TIME", "TRAINED ON");
    for m in models {
        let flag = if m.flagged() { "*" } else { "" };
        let name = if m.name().chars().count() > 24 {
            format!("{}...", m.name().chars().take(21).collect::<String>())
        } else {
            m.name().to_string()
        };
        println!(
            "{:1} {:<24} {:16} {}",
            flag,
            name,
            m.trained_at().to_string(),
            m.trained_on().join(", ")
        );
    }
}

fn print_model(m: &ModelRecord) {
    println!("Name:       {}", m.name());
    println!("Time:       {}", m.trained_at());
    println!("Flagged:    {}", if m.flagged() { "yes" } else { "no" });
    println!("TrainedOn:  {}", m.trained_on().join(", "));
    println!("XVars:      {}", m.input_variables().join(", "));
    println!("YVars:      {}", m.output_variables().join(", "));
    println!("Transforms: {}", m.transforms().join(" -> "));
    let keys: Vec<&str> = m.payload().keys().map(String::as_str).collect();
    println!("Pickled:    {{{}}}", keys.join(", "));
    if !m.comments().is_empty() {
        println!();
        println!("{}", m.comments());
    }
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let runner = Runner { app: wire_labbook() };
    runner.run(config)
}
