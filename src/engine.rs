//! The task engine: one owner for the task collection and its files.
//!
//! Every user intent (add, edit, toggle, postpone, archive, ...) is a method
//! on `Engine` that catches up with the file on disk, mutates the collection,
//! persists it, and reports what happened. File-change events from the sync
//! poller are applied here too, so the collection is only ever touched from
//! the thread that owns the engine.
//!
//! Tasks are addressed by the position the caller last saw. When the file
//! changed underneath, the task is found again by its line content.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::archive;
use crate::config::Settings;
use crate::db::TodoList;
use crate::error::{Result, TodoError};
use crate::fields::Priority;
use crate::recurrence::next_occurrence;
use crate::sort::{sort_visible, ViewFilter};
use crate::sync::{self, FileStamp, PendingEdit, SyncEvent, SyncReport};
use crate::task::Task;

/// Result of toggling a task's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The task is now completed.
    pub completed: bool,
    /// Position of the spawned recurrence successor.
    pub successor: Option<usize>,
    /// A strict recurrence had no due date and was anchored on today.
    pub recurrence_fell_back: bool,
}

pub struct Engine {
    todo_path: PathBuf,
    done_path: PathBuf,
    settings: Settings,
    list: TodoList,
    /// The file content as last read or written by us.
    synced: TodoList,
    /// Stamp of the file as last loaded or written by us.
    stamp: Option<FileStamp>,
    pending: Option<PendingEdit>,
    /// In-memory changes that failed to save.
    dirty: bool,
}

impl Engine {
    /// Load the active file. A missing or unreadable file is an error.
    pub fn open(todo_path: &Path, done_path: &Path, settings: Settings) -> Result<Self> {
        let list = TodoList::load(todo_path)?;
        Ok(Engine {
            todo_path: todo_path.to_path_buf(),
            done_path: done_path.to_path_buf(),
            settings,
            synced: list.clone(),
            list,
            stamp: FileStamp::read(todo_path).ok(),
            pending: None,
            dirty: false,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.list.tasks
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn todo_path(&self) -> &Path {
        &self.todo_path
    }

    pub fn done_path(&self) -> &Path {
        &self.done_path
    }

    pub fn stamp(&self) -> Option<FileStamp> {
        self.stamp
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// The view the settings ask for by default.
    pub fn default_filter(&self) -> ViewFilter {
        ViewFilter::from_settings(&self.settings)
    }

    /// Positions of the visible tasks, in display order.
    pub fn visible(&self, filter: &ViewFilter, today: NaiveDate) -> Vec<usize> {
        sort_visible(&self.list.tasks, filter, today)
    }

    /// Pick up external changes, then write the collection. On failure the
    /// in-memory state stays as it is, so calling `save` again retries.
    pub fn save(&mut self) -> Result<()> {
        self.refresh()?;
        self.write()
    }

    fn write(&mut self) -> Result<()> {
        match self.list.save(&self.todo_path) {
            Ok(()) => {
                self.dirty = false;
                self.synced = self.list.clone();
                self.stamp = FileStamp::read(&self.todo_path).ok();
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!("keeping unsaved changes in memory: {e}");
                Err(e)
            }
        }
    }

    /// Catch up with the file, then find the task the caller saw at `index`.
    fn locate(&mut self, index: usize) -> Result<usize> {
        let line = self.list.get(index)?.raw_text.clone();
        self.refresh()?;
        self.list
            .position_of(&line)
            .ok_or(TodoError::TaskChanged(index + 1))
    }

    fn stamp_dates(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.settings
            .enable_completion_and_creation_dates
            .then_some(today)
    }

    fn prepare_input(&self, input: &str, today: NaiveDate) -> Task {
        let mut task = Task::parse_input(input, today);
        task.normalize();
        task
    }

    /// Add a task typed by the user. Returns its position, or `None` when the
    /// input is blank or the same task already exists.
    pub fn add(&mut self, input: &str, today: NaiveDate) -> Result<Option<usize>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let mut task = self.prepare_input(input, today);
        if !task.completed && task.creation_date.is_none() {
            task.creation_date = self.stamp_dates(today);
            task.refresh_raw();
        }
        self.refresh()?;
        if self.list.contains(&task) {
            debug!("not adding duplicate `{}`", task.raw_text);
            return Ok(None);
        }
        self.list.tasks.push(task);
        self.write()?;
        Ok(Some(self.list.len() - 1))
    }

    /// Replace the task at `index` with new user input. Returns where it is now.
    pub fn edit(&mut self, index: usize, input: &str, today: NaiveDate) -> Result<usize> {
        let task = self.prepare_input(input, today);
        let index = self.locate(index)?;
        self.list.tasks[index] = task;
        self.write()?;
        Ok(index)
    }

    /// Complete or reopen the task at `index`. Completing a recurring task
    /// appends its next occurrence (unless an identical task already exists).
    pub fn toggle(&mut self, index: usize, today: NaiveDate) -> Result<ToggleOutcome> {
        let stamp = self.stamp_dates(today);
        let index = self.locate(index)?;
        let task = &mut self.list.tasks[index];
        if task.completed {
            task.reopen(stamp.is_some());
            self.write()?;
            return Ok(ToggleOutcome {
                completed: false,
                successor: None,
                recurrence_fell_back: false,
            });
        }

        task.complete(stamp);
        let done = task.clone();
        let mut outcome = ToggleOutcome {
            completed: true,
            successor: None,
            recurrence_fell_back: false,
        };
        if let Some(next) = next_occurrence(&done, today, stamp) {
            outcome.recurrence_fell_back = next.fell_back;
            if self.list.contains(&next.task) {
                debug!("successor `{}` already exists", next.task.raw_text);
            } else {
                info!("spawned `{}`", next.task.raw_text);
                self.list.tasks.push(next.task);
                outcome.successor = Some(self.list.len() - 1);
            }
        }
        self.write()?;
        Ok(outcome)
    }

    /// Remove the task at `index`.
    pub fn delete(&mut self, index: usize) -> Result<Task> {
        let index = self.locate(index)?;
        let removed = self.list.tasks.remove(index);
        self.retarget_pending();
        self.write()?;
        Ok(removed)
    }

    /// Move the due date to tomorrow if overdue, otherwise one day later.
    /// Tasks without a due date are left alone (returns `None`); otherwise
    /// returns where the task is now.
    pub fn postpone(&mut self, index: usize, today: NaiveDate) -> Result<Option<usize>> {
        let index = self.locate(index)?;
        let task = &mut self.list.tasks[index];
        let Some(due) = task.due_date else {
            return Ok(None);
        };
        let base = if due >= today { due } else { today };
        task.due_date = base.succ_opt();
        task.refresh_raw();
        self.write()?;
        Ok(Some(index))
    }

    /// Set or clear the priority. Returns where the task is now.
    pub fn set_priority(&mut self, index: usize, priority: Option<Priority>) -> Result<usize> {
        let index = self.locate(index)?;
        let task = &mut self.list.tasks[index];
        task.priority = priority;
        task.refresh_raw();
        self.write()?;
        Ok(index)
    }

    /// Move completed tasks to the done-file. No-op (and no writes) when
    /// nothing is completed.
    pub fn archive(&mut self) -> Result<usize> {
        self.refresh()?;
        let moved = archive::archive(&mut self.list, &self.todo_path, &self.done_path)?;
        if moved > 0 {
            self.dirty = false;
            self.synced = self.list.clone();
            self.stamp = FileStamp::read(&self.todo_path).ok();
            self.retarget_pending();
        }
        Ok(moved)
    }

    /// Complete the task at `index`, then archive.
    pub fn complete_and_archive(
        &mut self,
        index: usize,
        today: NaiveDate,
    ) -> Result<(ToggleOutcome, usize)> {
        let index = self.locate(index)?;
        let mut outcome = if self.list.tasks[index].completed {
            ToggleOutcome {
                completed: true,
                successor: None,
                recurrence_fell_back: false,
            }
        } else {
            self.toggle(index, today)?
        };
        let successor = outcome.successor.map(|i| self.list.tasks[i].raw_text.clone());
        let moved = self.archive()?;
        outcome.successor = successor.and_then(|line| self.list.position_of(&line));
        Ok((outcome, moved))
    }

    /// Rewrite every line in canonical form.
    pub fn normalize(&mut self) -> Result<()> {
        self.refresh()?;
        for t in &mut self.list.tasks {
            t.normalize();
        }
        self.retarget_pending();
        self.write()
    }

    /// Start editing the task at `index`; returns its current line.
    pub fn begin_edit(&mut self, index: usize) -> Result<String> {
        let index = self.locate(index)?;
        let line = self.list.tasks[index].raw_text.clone();
        self.pending = Some(PendingEdit::new(index, line.clone()));
        Ok(line)
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub fn cancel_edit(&mut self) {
        self.pending = None;
    }

    /// Apply the pending edit. The text lands wherever the edited line is
    /// now, or is appended if the line disappeared. Returns the position
    /// written, or `None` if no edit was pending.
    pub fn commit_edit(&mut self, input: &str, today: NaiveDate) -> Result<Option<usize>> {
        if self.pending.is_none() {
            return Ok(None);
        }
        self.refresh()?;
        let Some(edit) = self.pending.take() else {
            return Ok(None);
        };
        let task = self.prepare_input(input, today);
        let index = match edit.index {
            Some(i) if i < self.list.len() => {
                self.list.tasks[i] = task;
                i
            }
            _ => {
                self.list.tasks.push(task);
                self.list.len() - 1
            }
        };
        self.write()?;
        Ok(Some(index))
    }

    fn retarget_pending(&mut self) {
        if let Some(edit) = self.pending.as_mut() {
            edit.index = self.list.position_of(&edit.original);
        }
    }

    /// Explicit refresh: check the file now and reconcile if it changed.
    pub fn refresh(&mut self) -> Result<Option<SyncReport>> {
        let mut last = self.stamp;
        match sync::check(&self.todo_path, &mut last) {
            Some(event) => self.apply_sync_event(event),
            None => Ok(None),
        }
    }

    /// Apply an event from the sync poller. Returns a report when the file
    /// was reloaded.
    ///
    /// Our own writes are recognized by content and ignored. Unsaved local
    /// changes are replayed on top of the new content.
    pub fn apply_sync_event(&mut self, event: SyncEvent) -> Result<Option<SyncReport>> {
        let stamp = match event {
            SyncEvent::Missing => {
                warn!("{} disappeared; keeping tasks in memory", self.todo_path.display());
                return Ok(None);
            }
            SyncEvent::Changed(stamp) => stamp,
        };
        if self.stamp.is_some_and(|s| s.same_content(&stamp)) {
            self.stamp = Some(stamp);
            return Ok(None);
        }
        let incoming = TodoList::load(&self.todo_path)?;
        self.stamp = Some(stamp);
        let target = if self.dirty {
            warn!("file changed while unsaved changes are pending; merging");
            sync::replay_local_changes(&self.synced, &self.list, incoming.clone())
        } else {
            incoming.clone()
        };
        self.synced = incoming;
        let report = sync::reconcile(&mut self.list, target, self.pending.as_mut());
        Ok(Some(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::dates::parse_iso;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        todo: PathBuf,
        done: PathBuf,
    }

    fn fixture(content: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let todo = dir.path().join("todo.txt");
        let done = dir.path().join("done.txt");
        fs::write(&todo, content).unwrap();
        Fixture { _dir: dir, todo, done }
    }

    fn open(f: &Fixture) -> Engine {
        Engine::open(&f.todo, &f.done, Settings::default()).unwrap()
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(Engine::open(&missing, &dir.path().join("done.txt"), Settings::default()).is_err());
    }

    #[test]
    fn test_add_resolves_and_stamps() {
        let f = fixture("existing\n");
        let mut e = open(&f);
        let today = d("2024-01-10");

        let i = e.add("Call +zz @b bob due:tom +aa", today).unwrap();
        assert_eq!(i, Some(1));
        assert_eq!(read(&f.todo), "existing\n2024-01-10 Call bob +aa +zz @b due:2024-01-11\n");

        // Same task again is ignored.
        assert_eq!(e.add("Call bob +aa +zz @b due:2024-01-11", today).unwrap(), None);
        assert_eq!(e.add("   ", today).unwrap(), None);
        assert_eq!(e.tasks().len(), 2);
    }

    #[test]
    fn test_add_without_dates() {
        let f = fixture("");
        let settings = Settings {
            enable_completion_and_creation_dates: false,
            ..Settings::default()
        };
        let mut e = Engine::open(&f.todo, &f.done, settings).unwrap();
        e.add("(a) plain", d("2024-01-10")).unwrap();
        e.toggle(0, d("2024-01-11")).unwrap();
        assert_eq!(read(&f.todo), "x (A) plain\n");
    }

    #[test]
    fn test_reopen_without_dates_keeps_creation_date() {
        let f = fixture("2024-01-01 Task\n");
        let settings = Settings {
            enable_completion_and_creation_dates: false,
            ..Settings::default()
        };
        let mut e = Engine::open(&f.todo, &f.done, settings.clone()).unwrap();
        e.toggle(0, d("2024-01-10")).unwrap();
        assert_eq!(read(&f.todo), "x 2024-01-01 Task\n");

        let mut e = Engine::open(&f.todo, &f.done, settings).unwrap();
        let outcome = e.toggle(0, d("2024-01-11")).unwrap();
        assert!(!outcome.completed);
        assert_eq!(e.tasks()[0].creation_date, Some(d("2024-01-01")));
        assert_eq!(read(&f.todo), "2024-01-01 Task\n");
    }

    #[test]
    fn test_edit_replaces_line() {
        let f = fixture("one\ntwo\n");
        let mut e = open(&f);
        e.edit(1, "two due:fri", d("2024-01-10")).unwrap();
        assert_eq!(read(&f.todo), "one\ntwo due:2024-01-12\n");
        assert!(e.edit(7, "x", d("2024-01-10")).is_err());
    }

    #[test]
    fn test_toggle_recurring_spawns_successor() {
        let f = fixture("2024-01-01 Review +work due:2024-01-10 rec:+1w\n");
        let mut e = open(&f);
        let today = d("2024-01-20");

        let outcome = e.toggle(0, today).unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.successor, Some(1));
        assert!(!outcome.recurrence_fell_back);
        assert_eq!(
            read(&f.todo),
            "x 2024-01-20 2024-01-01 Review +work due:2024-01-10 rec:+1w\n\
             2024-01-20 Review +work due:2024-01-17 rec:+1w\n"
        );

        // Reopening clears the completion date and leaves the successor.
        let outcome = e.toggle(0, today).unwrap();
        assert!(!outcome.completed);
        assert_eq!(e.tasks()[0].raw_text, "2024-01-01 Review +work due:2024-01-10 rec:+1w");
        assert_eq!(e.tasks().len(), 2);

        // Completing again on the same day does not duplicate the successor.
        let outcome = e.toggle(0, today).unwrap();
        assert_eq!(outcome.successor, None);
        assert_eq!(e.tasks().len(), 2);
    }

    #[test]
    fn test_toggle_strict_without_due_reports_fallback() {
        let f = fixture("Stretch rec:+1d\n");
        let mut e = open(&f);
        let outcome = e.toggle(0, d("2024-01-20")).unwrap();
        assert!(outcome.recurrence_fell_back);
        assert_eq!(e.tasks()[1].due_date, Some(d("2024-01-21")));
    }

    #[test]
    fn test_postpone() {
        let f = fixture("late due:2024-01-01\nsoon due:2024-01-15\nundated\n");
        let mut e = open(&f);
        let today = d("2024-01-10");
        assert_eq!(e.postpone(0, today).unwrap(), Some(0));
        assert_eq!(e.postpone(1, today).unwrap(), Some(1));
        assert_eq!(e.postpone(2, today).unwrap(), None);
        assert_eq!(read(&f.todo), "late due:2024-01-11\nsoon due:2024-01-16\nundated\n");
    }

    #[test]
    fn test_priority_and_delete() {
        let f = fixture("(C) one\ntwo\n");
        let mut e = open(&f);
        e.set_priority(1, Priority::from_letter('a')).unwrap();
        e.set_priority(0, None).unwrap();
        assert_eq!(read(&f.todo), "one\n(A) two\n");
        let removed = e.delete(0).unwrap();
        assert_eq!(removed.description, "one");
        assert_eq!(read(&f.todo), "(A) two\n");
        assert!(e.delete(3).is_err());
    }

    #[test]
    fn test_archive_idempotent() {
        let f = fixture("open\n");
        let mut e = open(&f);
        let before = fs::metadata(&f.todo).unwrap().modified().unwrap();
        assert_eq!(e.archive().unwrap(), 0);
        assert_eq!(fs::metadata(&f.todo).unwrap().modified().unwrap(), before);
        assert!(!f.done.exists());
    }

    #[test]
    fn test_complete_and_archive() {
        let f = fixture("keep\nfinish me\n");
        let mut e = open(&f);
        let (outcome, moved) = e.complete_and_archive(1, d("2024-01-10")).unwrap();
        assert!(outcome.completed);
        assert_eq!(moved, 1);
        assert_eq!(read(&f.todo), "keep\n");
        assert_eq!(read(&f.done), "x 2024-01-10 finish me\n");
    }

    #[test]
    fn test_complete_and_archive_reports_successor_position() {
        let f = fixture("x 2024-01-01 old\nWater plants due:2024-01-10 rec:1d\nkeep\n");
        let mut e = open(&f);
        let (outcome, moved) = e.complete_and_archive(1, d("2024-01-10")).unwrap();
        assert_eq!(moved, 2);
        assert_eq!(outcome.successor, Some(1));
        assert_eq!(e.tasks()[1].raw_text, "2024-01-10 Water plants due:2024-01-11 rec:1d");
    }

    #[test]
    fn test_normalize() {
        let f = fixture("due:2024-01-01  b  +z +a\n\n   \nplain\n");
        let mut e = open(&f);
        e.normalize().unwrap();
        assert_eq!(read(&f.todo), "b +a +z due:2024-01-01\nplain\n");
    }

    #[test]
    fn test_own_writes_are_not_external_changes() {
        let f = fixture("one\n");
        let mut e = open(&f);
        e.add("two", d("2024-01-10")).unwrap();
        assert_eq!(e.refresh().unwrap(), None);
    }

    #[test]
    fn test_external_change_is_reconciled() {
        let f = fixture("one\ntwo\n");
        let mut e = open(&f);
        fs::write(&f.todo, "one\ntwo\nthree from phone\n").unwrap();
        let report = e.refresh().unwrap().unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(e.tasks().len(), 3);
        assert_eq!(e.refresh().unwrap(), None);
    }

    #[test]
    fn test_add_keeps_lines_written_since_open() {
        let f = fixture("one\n");
        let mut e = open(&f);
        fs::write(&f.todo, "one\nfrom phone\n").unwrap();
        assert_eq!(e.add("two", d("2024-01-10")).unwrap(), Some(2));
        assert_eq!(read(&f.todo), "one\nfrom phone\n2024-01-10 two\n");
    }

    #[test]
    fn test_change_follows_task_moved_by_another_program() {
        let f = fixture("a\nb\n");
        let mut e = open(&f);
        fs::write(&f.todo, "new\na\nb\n").unwrap();

        // Line 2 as last listed is "b", now on line 3.
        assert!(e.toggle(1, d("2024-01-10")).unwrap().completed);
        assert_eq!(read(&f.todo), "new\na\nx 2024-01-10 b\n");
        assert_eq!(e.set_priority(0, Priority::from_letter('A')).unwrap(), 0);
        assert_eq!(read(&f.todo), "(A) new\na\nx 2024-01-10 b\n");
    }

    #[test]
    fn test_change_to_task_removed_by_another_program() {
        let f = fixture("a\nb\n");
        let mut e = open(&f);
        fs::write(&f.todo, "a\n").unwrap();
        let err = e.toggle(1, d("2024-01-10")).unwrap_err();
        assert!(matches!(err, TodoError::TaskChanged(2)));
        assert_eq!(e.tasks().len(), 1);
        assert_eq!(read(&f.todo), "a\n");
    }

    #[test]
    fn test_pending_edit_survives_external_change() {
        let f = fixture("one\ntwo\n");
        let mut e = open(&f);
        assert_eq!(e.begin_edit(1).unwrap(), "two");

        fs::write(&f.todo, "zero\none\ntwo\n").unwrap();
        let report = e.refresh().unwrap().unwrap();
        assert!(!report.edit_conflict);
        assert_eq!(e.pending_edit().and_then(|p| p.index), Some(2));

        assert_eq!(e.commit_edit("two edited", d("2024-01-10")).unwrap(), Some(2));
        assert_eq!(read(&f.todo), "zero\none\ntwo edited\n");
        assert!(e.pending_edit().is_none());
    }

    #[test]
    fn test_pending_edit_wins_over_removed_line() {
        let f = fixture("one\ntwo\n");
        let mut e = open(&f);
        e.begin_edit(1).unwrap();
        fs::write(&f.todo, "one\n").unwrap();
        assert!(e.refresh().unwrap().unwrap().edit_conflict);
        assert_eq!(e.commit_edit("two kept", d("2024-01-10")).unwrap(), Some(1));
        assert_eq!(read(&f.todo), "one\ntwo kept\n");

        e.begin_edit(0).unwrap();
        e.cancel_edit();
        assert_eq!(e.commit_edit("ignored", d("2024-01-10")).unwrap(), None);
    }

    #[test]
    fn test_failed_write_keeps_state_for_retry() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let todo = sub.join("todo.txt");
        fs::write(&todo, "one\n").unwrap();
        let mut e = Engine::open(&todo, &sub.join("done.txt"), Settings::default()).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        let err = e.add("two", d("2024-01-10")).unwrap_err();
        assert!(err.is_retryable());
        assert!(e.has_unsaved_changes());
        assert_eq!(e.tasks().len(), 2);

        fs::create_dir(&sub).unwrap();
        e.save().unwrap();
        assert!(!e.has_unsaved_changes());
        assert_eq!(read(&todo), "one\n2024-01-10 two\n");
    }

    #[test]
    fn test_unsaved_changes_merge_with_external_ones() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let todo = sub.join("todo.txt");
        fs::write(&todo, "one\ndrop me\n").unwrap();
        let mut e = Engine::open(&todo, &sub.join("done.txt"), Settings::default()).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        assert!(e.add("two", d("2024-01-10")).is_err());
        assert!(e.delete(1).is_err());
        assert!(e.has_unsaved_changes());

        fs::create_dir(&sub).unwrap();
        fs::write(&todo, "one\ndrop me\nfrom phone\n").unwrap();
        e.save().unwrap();
        assert_eq!(read(&todo), "one\nfrom phone\n2024-01-10 two\n");
        assert_eq!(e.refresh().unwrap(), None);
    }

    #[test]
    fn test_visible_uses_settings() {
        let f = fixture("later t:2099-01-01\n(B) b\n(A) a\nsecret h:1\n");
        let e = open(&f);
        let order = e.visible(&e.default_filter(), d("2024-01-10"));
        assert_eq!(order, vec![2, 1]);
    }
}
