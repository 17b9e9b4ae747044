//! Loading and saving todo.txt files.
//!
//! This module provides `TodoList`, the in-memory set of tasks backed by one
//! file, plus the atomic write used for every file the engine touches.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Result, TodoError};
use crate::task::Task;

/// Tasks in file order. A task's position is its identity for the lifetime
/// of one load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    pub tasks: Vec<Task>,
}

impl TodoList {
    /// Load a task file. Missing and unreadable files are errors; malformed
    /// lines only degrade their own fields.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TodoError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| TodoError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_text(&text);
        debug!("loaded {} tasks from {}", list.tasks.len(), path.display());
        Ok(list)
    }

    /// Parse file content, skipping blank lines.
    pub fn from_text(text: &str) -> Self {
        let tasks = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(Task::parse)
            .collect();
        TodoList { tasks }
    }

    /// File content: one line per task, each task written as last read or
    /// last re-rendered.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for t in &self.tasks {
            out.push_str(&t.raw_text);
            out.push('\n');
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_text())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Task> {
        self.tasks.get(index).ok_or(TodoError::NoSuchTask(index + 1))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Task> {
        self.tasks.get_mut(index).ok_or(TodoError::NoSuchTask(index + 1))
    }

    /// Position of a line, comparing with whitespace collapsed.
    pub fn position_of(&self, line: &str) -> Option<usize> {
        let wanted = collapse_whitespace(line);
        self.tasks
            .iter()
            .position(|t| collapse_whitespace(&t.raw_text) == wanted)
    }

    /// Whether a task with the same structured fields already exists.
    pub fn contains(&self, task: &Task) -> bool {
        self.tasks.iter().any(|t| t == task)
    }

    /// Distinct project names starting with `prefix` (case-insensitive),
    /// sorted case-insensitively.
    pub fn projects(&self, prefix: &str) -> Vec<String> {
        suggestions(self.tasks.iter().flat_map(|t| t.projects.iter()), prefix)
    }

    /// Distinct context names, as for `projects`.
    pub fn contexts(&self, prefix: &str) -> Vec<String> {
        suggestions(self.tasks.iter().flat_map(|t| t.contexts.iter()), prefix)
    }
}

fn suggestions<'a>(names: impl Iterator<Item = &'a String>, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    for name in names {
        let lower = name.to_lowercase();
        if lower.starts_with(&prefix) {
            seen.insert((lower, name.clone()));
        }
    }
    seen.into_iter().map(|(_, name)| name).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write via temp file + rename so a concurrent reader never sees a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let fail = |source| TodoError::FileWriteFailure {
        path: path.to_path_buf(),
        source,
    };
    let tmp = temp_path(path);
    let mut f = File::create(&tmp).map_err(fail)?;
    f.write_all(contents.as_bytes()).map_err(fail)?;
    f.sync_all().map_err(fail)?;
    drop(f);
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        fail(source)
    })?;
    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
