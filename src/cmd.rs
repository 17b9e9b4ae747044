//! Command implementations for the CLI interface.
//!
//! Each handler drives one `Engine` operation and reports the result on
//! stdout. Failures print a message and exit non-zero.

use std::io;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use log::info;
use serde::Serialize;

use crate::dates::due_label;
use crate::engine::Engine;
use crate::error::Result;
use crate::fields::Priority;
use crate::sort::ViewFilter;
use crate::sync::Poller;
use crate::task::Task;

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in display order (the default).
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Only tasks whose line contains this text (case-insensitive).
        #[arg(long, short)]
        search: Option<String>,
        /// Only tasks with this priority letter.
        #[arg(long, short, value_parser = parse_priority)]
        priority: Option<Priority>,
        /// Include tasks tagged h:1.
        #[arg(long)]
        show_hidden: bool,
        /// Include tasks whose threshold date is in the future.
        #[arg(long)]
        show_future: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Add a task. Dates like due:tom or t:fri are resolved to calendar dates.
    Add {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Replace the task on LINE.
    Edit {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Toggle completion of the task on LINE.
    Do {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },

    /// Complete the task on LINE and archive completed tasks.
    Done {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },

    /// Delete the task on LINE.
    Rm {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },

    /// Push the due date of the task on LINE back one day.
    Postpone {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },

    /// Set the priority of the task on LINE; without a letter, clear it.
    Pri {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
        #[arg(value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Move completed tasks to the done file.
    Archive,

    /// Rewrite every line in canonical form.
    Normalize,

    /// List project names, optionally only those starting with PREFIX.
    Projects {
        #[arg(default_value = "")]
        prefix: String,
    },

    /// List context names, optionally only those starting with PREFIX.
    Contexts {
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Print the list and reprint it whenever the file changes on disk.
    Watch,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Accepts `A`, `a` or `(A)`.
fn parse_priority(s: &str) -> std::result::Result<Priority, String> {
    let s = s.trim();
    Priority::parse_token(s)
        .or_else(|| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Priority::from_letter(c),
                _ => None,
            }
        })
        .ok_or_else(|| format!("`{s}` is not a priority letter A-Z"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn line_index(line: u64) -> usize {
    (line - 1) as usize
}

fn exit_on_error<T>(result: Result<T>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_retryable() {
                eprintln!("Your changes were not saved.");
            }
            std::process::exit(1);
        }
    }
}

/// One row of `list --json`.
#[derive(Serialize)]
struct ListedTask<'a> {
    line: usize,
    #[serde(flatten)]
    task: &'a Task,
}

/// Print tasks as a table with line numbers.
pub fn print_table(engine: &Engine, order: &[usize], today: NaiveDate) {
    println!("{:<5} {:<4} {:<10} {}", "Line", "Pri", "Due", "Task");
    for &i in order {
        let t = &engine.tasks()[i];
        let pri = t.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
        let mut text = t.description.clone();
        for p in &t.projects {
            text.push_str(&format!(" +{p}"));
        }
        for c in &t.contexts {
            text.push_str(&format!(" @{c}"));
        }
        if let Some(r) = t.recurrence {
            text.push_str(&format!(" (every {r})"));
        }
        let marker = if t.completed { "x " } else { "" };
        println!(
            "{:<5} {:<4} {:<10} {}{}",
            i + 1,
            pri,
            due_label(t.due_date, today),
            marker,
            text.trim_start()
        );
    }
}

pub fn cmd_list(
    engine: &Engine,
    all: bool,
    search: Option<String>,
    priority: Option<Priority>,
    show_hidden: bool,
    show_future: bool,
    json: bool,
) {
    let defaults = engine.default_filter();
    let filter = ViewFilter {
        include_completed: all,
        show_hidden: show_hidden || defaults.show_hidden,
        show_deferred: show_future || defaults.show_deferred,
        priority,
        search,
    };
    let today = today();
    let order = engine.visible(&filter, today);

    if json {
        let rows: Vec<ListedTask<'_>> = order
            .iter()
            .map(|&i| ListedTask { line: i + 1, task: &engine.tasks()[i] })
            .collect();
        match serde_json::to_string_pretty(&rows) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to encode tasks: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if order.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(engine, &order, today);
}

pub fn cmd_add(engine: &mut Engine, text: Vec<String>) {
    match exit_on_error(engine.add(&text.join(" "), today())) {
        Some(i) => println!("Added {}: {}", i + 1, engine.tasks()[i].raw_text),
        None => println!("Nothing added (empty or duplicate task)."),
    }
}

pub fn cmd_edit(engine: &mut Engine, line: u64, text: Vec<String>) {
    let index = exit_on_error(engine.edit(line_index(line), &text.join(" "), today()));
    println!("Updated {}: {}", index + 1, engine.tasks()[index].raw_text);
}

pub fn cmd_do(engine: &mut Engine, line: u64) {
    let outcome = exit_on_error(engine.toggle(line_index(line), today()));
    if !outcome.completed {
        println!("Reopened {line}.");
        return;
    }
    println!("Completed {line}.");
    if outcome.recurrence_fell_back {
        println!("No due date to recur from; the next occurrence counts from today.");
    }
    if let Some(i) = outcome.successor {
        println!("Next occurrence on line {}: {}", i + 1, engine.tasks()[i].raw_text);
    }
}

pub fn cmd_done(engine: &mut Engine, line: u64) {
    let (outcome, moved) = exit_on_error(engine.complete_and_archive(line_index(line), today()));
    println!("Archived {moved} task(s) to {}.", engine.done_path().display());
    if let Some(i) = outcome.successor {
        println!("Next occurrence on line {}: {}", i + 1, engine.tasks()[i].raw_text);
    }
}

pub fn cmd_rm(engine: &mut Engine, line: u64) {
    let removed = exit_on_error(engine.delete(line_index(line)));
    println!("Deleted {line}: {}", removed.raw_text);
}

pub fn cmd_postpone(engine: &mut Engine, line: u64) {
    match exit_on_error(engine.postpone(line_index(line), today())) {
        Some(index) => println!("Postponed {}: {}", index + 1, engine.tasks()[index].raw_text),
        None => println!("Task {line} has no due date."),
    }
}

pub fn cmd_pri(engine: &mut Engine, line: u64, priority: Option<Priority>) {
    let index = exit_on_error(engine.set_priority(line_index(line), priority));
    println!("Updated {}: {}", index + 1, engine.tasks()[index].raw_text);
}

pub fn cmd_archive(engine: &mut Engine) {
    let moved = exit_on_error(engine.archive());
    if moved == 0 {
        println!("No completed tasks to archive.");
    } else {
        println!("Archived {moved} task(s) to {}.", engine.done_path().display());
    }
}

pub fn cmd_normalize(engine: &mut Engine) {
    exit_on_error(engine.normalize());
    println!("Normalized {} task(s).", engine.tasks().len());
}

pub fn cmd_projects(engine: &Engine, prefix: &str) {
    for p in engine.list().projects(prefix) {
        println!("+{p}");
    }
}

pub fn cmd_contexts(engine: &Engine, prefix: &str) {
    for c in engine.list().contexts(prefix) {
        println!("@{c}");
    }
}

/// Reprint the default view on every external change until interrupted.
pub fn cmd_watch(engine: &mut Engine) {
    let filter = engine.default_filter();
    let order = engine.visible(&filter, today());
    print_table(engine, &order, today());

    let interval = engine.settings().sync_interval();
    let (_poller, events) =
        match Poller::spawn(engine.todo_path().to_path_buf(), interval, engine.stamp()) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to start watching: {e}");
                std::process::exit(1);
            }
        };
    info!("watching {} every {interval:?}", engine.todo_path().display());

    for event in events.iter() {
        match engine.apply_sync_event(event) {
            Ok(Some(report)) => {
                println!();
                println!("File changed: {} added, {} removed.", report.added, report.removed);
                let order = engine.visible(&filter, today());
                print_table(engine, &order, today());
            }
            Ok(None) => {}
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

/// Generate shell completion scripts for the specified shell.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("a").map(Priority::letter), Ok('A'));
        assert_eq!(parse_priority("(C)").map(Priority::letter), Ok('C'));
        assert!(parse_priority("AB").is_err());
        assert!(parse_priority("1").is_err());
    }

    #[test]
    fn test_line_index() {
        assert_eq!(line_index(1), 0);
        assert_eq!(line_index(12), 11);
    }

    #[test]
    fn test_json_row_shape() {
        let task = Task::parse("(A) Call mom +family due:2024-01-19");
        let row = ListedTask { line: 3, task: &task };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["line"], 3);
        assert_eq!(v["text"], "(A) Call mom +family due:2024-01-19");
        assert_eq!(v["priority"], "A");
        assert_eq!(v["due_date"], "2024-01-19");
        assert_eq!(v["projects"][0], "family");
    }
}
