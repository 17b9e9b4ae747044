//! Moving completed tasks to the done-file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::db::{write_atomic, TodoList};
use crate::error::{Result, TodoError};

/// `done.txt` next to the active file.
pub fn default_done_path(todo_path: &Path) -> PathBuf {
    todo_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("done.txt")
}

/// Append every completed task in `list` to `done_path` and save the rest to
/// `todo_path`. Returns how many tasks moved; with none, nothing is written.
///
/// The done-file is written first. If saving the active file then fails, the
/// in-memory list is left as it was.
pub fn archive(list: &mut TodoList, todo_path: &Path, done_path: &Path) -> Result<usize> {
    let (done, remaining): (Vec<_>, Vec<_>) = list.tasks.iter().cloned().partition(|t| t.completed);
    if done.is_empty() {
        return Ok(0);
    }

    let mut content = match fs::read_to_string(done_path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(TodoError::FileUnreadable {
                path: done_path.to_path_buf(),
                source,
            })
        }
    };
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for t in &done {
        content.push_str(&t.raw_text);
        content.push('\n');
    }
    write_atomic(done_path, &content)?;

    let remaining = TodoList { tasks: remaining };
    if let Err(e) = remaining.save(todo_path) {
        warn!(
            "{} tasks were appended to {} but {} could not be saved",
            done.len(),
            done_path.display(),
            todo_path.display()
        );
        return Err(e);
    }
    *list = remaining;
    info!("archived {} tasks to {}", done.len(), done_path.display());
    Ok(done.len())
}
