use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Keyboard-driven todo.txt task manager.
/// Completed tasks are archived to done.txt next to FILE unless --done-file says otherwise.
#[derive(Parser)]
#[command(name = "todo-txt-tui", version, about = "Manage a todo.txt file")]
pub struct Cli {
    /// Path to the todo.txt file.
    pub file: Option<PathBuf>,

    /// Where archived tasks go.
    #[arg(long, global = true)]
    pub done_file: Option<PathBuf>,

    /// Settings file (TOML).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_file_then_command() {
        let args = ["todo-txt-tui", "todo.txt", "add", "Buy", "milk", "+home"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("todo.txt")));
        match cli.command {
            Some(Commands::Add { text }) => assert_eq!(text, vec!["Buy", "milk", "+home"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_line_numbers_start_at_one() {
        assert!(Cli::try_parse_from(["todo-txt-tui", "todo.txt", "do", "0"]).is_err());
        let cli = Cli::try_parse_from(["todo-txt-tui", "todo.txt", "pri", "2", "b"]).unwrap();
        match cli.command {
            Some(Commands::Pri { line, priority }) => {
                assert_eq!(line, 2);
                assert_eq!(priority.map(|p| p.letter()), Some('B'));
            }
            _ => panic!("expected pri"),
        }
    }

    #[test]
    fn test_bare_file_lists() {
        let cli = Cli::try_parse_from(["todo-txt-tui", "todo.txt"]).unwrap();
        assert!(cli.command.is_none());
    }
}
