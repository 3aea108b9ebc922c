//! rqs - Remember commands and secrets by a short name
//!
//! Commands:
//! - add <ALIAS> <CONTENT...>: Store a command or text entry
//! - list | ls: List all entries
//! - delete | del <ALIAS>: Delete an entry
//! - delete_all: Delete every entry (asks first)
//! - <PATTERN>: Run or print the matching entry

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rqs::{Dispatcher, FsStore, Outcome, RqsError};
use rqs_core::{Config, Paths, ShellRunner, SystemProbe};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rqs")]
#[command(about = "A handy tool to manage your credentials or frequently used commands")]
#[command(version)]
#[command(after_help = "\
COMMANDS:
    add ALIAS CONTENT...     Add an entry (a command if CONTENT starts with a program on PATH)
    list, ls                 List all entries
    delete, del ALIAS        Delete an entry
    delete_all [-y]          Delete all entries

RUN ENTRY:
    rqs ALIAS [ARGS...]      Run a command entry (ARGS are appended) or print a text entry
    rqs 'PATTERN*'           Wildcards list every match instead of running one

EXAMPLES:
    $ rqs add mongo_local mongo localhost -u xxx -p xxx
    🔮 rqs added a command entry.

    $ rqs mongo_local
    > (local) show dbs

    $ rqs add APIKEY xxxxxx
    🔑 rqs added a text entry.

    $ rqs APIKEY
    xxxxxx

STORAGE:
    Entries live in ~/.rqs_storage, one file per alias.
    Override with RQS_STORAGE or \"storage_path\" in ~/.config/rqs/config.json.")]
struct Cli {
    /// Built-in command or an entry alias/pattern
    command: String,

    /// Arguments for the command, passed through verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    // Logs go to stderr; stdout carries entry content
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            match e.downcast_ref::<RqsError>() {
                Some(err) if err.is_usage() => {
                    eprintln!("{} {}", "invalid argument:".red(), err)
                }
                _ => eprintln!("{} {:#}", "error:".red(), e),
            }
            1
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> Result<Outcome> {
    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;
    if !config.color {
        colored::control::set_override(false);
    }

    let mut store = FsStore::open(paths.storage(config.storage_path.as_ref()));
    tracing::debug!(storage = %store.root().display(), "opened store");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let probe = SystemProbe;
    let runner = ShellRunner;
    let mut dispatcher = Dispatcher::new(
        &mut store,
        &probe,
        &runner,
        &mut out,
        &mut input,
    );

    let outcome = dispatcher
        .dispatch(&cli.command, &cli.args)
        .with_context(|| format!("rqs {} failed", cli.command))?;
    Ok(outcome)
}
