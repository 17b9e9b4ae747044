//! # todo-txt-tui
//!
//! A task manager for plain-text [todo.txt](https://github.com/todotxt/todo.txt) files.
//!
//! ## Key Features
//!
//! - **Lossless file handling**: lines you never touch are written back exactly as read;
//!   malformed tags are kept verbatim instead of rejected
//! - **Natural-language dates**: `due:tom`, `due:fri`, `t:nw`, `due:11dec`, `due:3d`
//!   are resolved to calendar dates as you type them
//! - **Recurring tasks**: `rec:1w` repeats a week after completion, `rec:+1w` a week
//!   after the due date
//! - **Threshold and hidden tasks**: `t:` defers a task from the list until its date,
//!   `h:1` hides it
//! - **Live sync**: the file is polled for changes made by other programs (phone sync,
//!   editors) and reloaded without losing an edit in progress
//! - **Archive**: completed tasks move to `done.txt`
//!
//! ## Quick Start
//!
//! ```bash
//! # List open tasks
//! todo-txt-tui ~/todo.txt
//!
//! # Add a task due tomorrow, repeating weekly
//! todo-txt-tui ~/todo.txt add "(A) Water plants +home due:tom rec:1w"
//!
//! # Complete line 3
//! todo-txt-tui ~/todo.txt do 3
//!
//! # Keep a live view open
//! todo-txt-tui ~/todo.txt watch
//! ```
//!
//! Settings are read from `~/.config/todo-txt-tui/settings.toml` (or `--config`).
//! Set `RUST_LOG=debug` for diagnostics.

use std::process;

use clap::Parser;
use log::debug;

pub mod archive;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod db;
pub mod engine;
pub mod error;
pub mod fields;
pub mod recurrence;
pub mod sort;
pub mod sync;
pub mod task;

use cli::Cli;
use cmd::*;
use config::Settings;
use engine::Engine;
use error::TodoError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Commands that don't need a task file.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let Some(todo_path) = cli.file else {
        eprintln!("Please provide the path to the todo.txt file.");
        process::exit(1);
    };
    if !todo_path.exists() {
        eprintln!("{}", TodoError::FileNotFound(todo_path));
        process::exit(1);
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    debug!("settings: {settings:?}");

    let done_path = cli
        .done_file
        .unwrap_or_else(|| archive::default_done_path(&todo_path));

    let mut engine = match Engine::open(&todo_path, &done_path, settings) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::List {
        all: false,
        search: None,
        priority: None,
        show_hidden: false,
        show_future: false,
        json: false,
    }) {
        Commands::List {
            all,
            search,
            priority,
            show_hidden,
            show_future,
            json,
        } => cmd_list(&engine, all, search, priority, show_hidden, show_future, json),

        Commands::Add { text } => cmd_add(&mut engine, text),

        Commands::Edit { line, text } => cmd_edit(&mut engine, line, text),

        Commands::Do { line } => cmd_do(&mut engine, line),

        Commands::Done { line } => cmd_done(&mut engine, line),

        Commands::Rm { line } => cmd_rm(&mut engine, line),

        Commands::Postpone { line } => cmd_postpone(&mut engine, line),

        Commands::Pri { line, priority } => cmd_pri(&mut engine, line, priority),

        Commands::Archive => cmd_archive(&mut engine),

        Commands::Normalize => cmd_normalize(&mut engine),

        Commands::Projects { prefix } => cmd_projects(&engine, &prefix),

        Commands::Contexts { prefix } => cmd_contexts(&engine, &prefix),

        Commands::Watch => cmd_watch(&mut engine),

        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
