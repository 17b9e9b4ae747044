//! Detection and reconciliation of external edits to the task file.
//!
//! A `Poller` thread compares the file's `FileStamp` on an interval and sends
//! `SyncEvent`s over a channel; it never touches the task collection. The
//! owner drains the channel at a point of its choosing and calls
//! `reconcile`, which makes the on-disk content authoritative except for a
//! line with a pending local edit.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};

use crate::db::TodoList;

/// Modification time plus a content hash. The hash catches rewrites that land
/// within the filesystem's timestamp granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub modified: Option<SystemTime>,
    pub len: u64,
    pub hash: u64,
}

impl FileStamp {
    pub fn read(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let bytes = std::fs::read(path)?;
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Ok(FileStamp {
            modified: meta.modified().ok(),
            len: bytes.len() as u64,
            hash: hasher.finish(),
        })
    }

    /// Same content, ignoring timestamps.
    pub fn same_content(&self, other: &FileStamp) -> bool {
        self.len == other.len && self.hash == other.hash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// The file now has this stamp.
    Changed(FileStamp),
    /// The file could not be read (deleted or being replaced).
    Missing,
}

/// Compare the file against `last`, updating it. Returns an event only on a
/// transition.
pub fn check(path: &Path, last: &mut Option<FileStamp>) -> Option<SyncEvent> {
    match FileStamp::read(path) {
        Ok(stamp) if Some(stamp) != *last => {
            *last = Some(stamp);
            Some(SyncEvent::Changed(stamp))
        }
        Ok(_) => None,
        Err(e) if last.is_some() => {
            debug!("{} unreadable: {e}", path.display());
            *last = None;
            Some(SyncEvent::Missing)
        }
        Err(_) => None,
    }
}

/// Background polling of one file.
///
/// Dropping the poller stops the thread.
pub struct Poller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling `path` every `interval`, starting from `baseline`.
    pub fn spawn(
        path: PathBuf,
        interval: Duration,
        baseline: Option<FileStamp>,
    ) -> io::Result<(Poller, Receiver<SyncEvent>)> {
        let (events_tx, events_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("todo-sync".into())
            .spawn(move || poll_loop(&path, interval, baseline, &events_tx, &stop_rx))?;
        Ok((
            Poller {
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            events_rx,
        ))
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the stop channel wakes the thread.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sync thread panicked");
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn poll_loop(
    path: &Path,
    interval: Duration,
    baseline: Option<FileStamp>,
    events: &Sender<SyncEvent>,
    stop: &Receiver<()>,
) {
    let mut last = baseline;
    loop {
        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(event) = check(path, &mut last) {
            if events.send(event).is_err() {
                break;
            }
        }
    }
    debug!("stopped polling {}", path.display());
}

/// A single task open in an editor that reconciliation must not clobber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    /// Where the committed text goes; `None` appends it.
    pub index: Option<usize>,
    /// The line as it was when the edit began.
    pub original: String,
    /// The line was changed or removed on disk while being edited.
    pub conflict: bool,
}

impl PendingEdit {
    pub fn new(index: usize, original: impl Into<String>) -> Self {
        PendingEdit {
            index: Some(index),
            original: original.into(),
            conflict: false,
        }
    }
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
    pub edit_conflict: bool,
}

impl SyncReport {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Replace `list` with `incoming`, re-targeting a pending edit.
///
/// The edit follows its original line wherever it moved. If that line is
/// gone and the file has the same number of lines, the edit keeps its
/// position (the line was changed in place); otherwise the edit will be
/// appended on commit.
pub fn reconcile(
    list: &mut TodoList,
    incoming: TodoList,
    pending: Option<&mut PendingEdit>,
) -> SyncReport {
    let mut report = diff(list, &incoming);
    if let Some(edit) = pending {
        match incoming.position_of(&edit.original) {
            Some(i) => edit.index = Some(i),
            None => {
                edit.conflict = true;
                report.edit_conflict = true;
                if incoming.len() != list.len() {
                    edit.index = None;
                }
                warn!("line under edit changed on disk: {}", edit.original);
            }
        }
    }
    if !report.is_unchanged() {
        info!("external change: {} added, {} removed", report.added, report.removed);
    }
    *list = incoming;
    report
}

/// Replay the changes that turned `base` into `local` on top of `incoming`.
///
/// Lines removed locally are removed from `incoming` (when still present);
/// lines added locally are appended in their local order. A line changed in
/// place counts as one removal plus one addition.
pub fn replay_local_changes(
    base: &TodoList,
    local: &TodoList,
    mut incoming: TodoList,
) -> TodoList {
    let mut balance: HashMap<&str, isize> = HashMap::new();
    for t in &base.tasks {
        *balance.entry(t.raw_text.as_str()).or_default() -= 1;
    }
    for t in &local.tasks {
        *balance.entry(t.raw_text.as_str()).or_default() += 1;
    }
    for t in &base.tasks {
        if let Some(n) = balance.get_mut(t.raw_text.as_str()).filter(|n| **n < 0) {
            if let Some(i) = incoming.position_of(&t.raw_text) {
                incoming.tasks.remove(i);
            }
            *n += 1;
        }
    }
    for t in &local.tasks {
        if let Some(n) = balance.get_mut(t.raw_text.as_str()).filter(|n| **n > 0) {
            incoming.tasks.push(t.clone());
            *n -= 1;
        }
    }
    incoming
}

/// Count lines added and removed, treating each file as a multiset of lines.
pub fn diff(old: &TodoList, new: &TodoList) -> SyncReport {
    let mut counts: HashMap<String, isize> = HashMap::new();
    for t in &old.tasks {
        *counts.entry(t.to_line()).or_default() -= 1;
    }
    for t in &new.tasks {
        *counts.entry(t.to_line()).or_default() += 1;
    }
    let mut report = SyncReport::default();
    for n in counts.values() {
        if *n > 0 {
            report.added += n.unsigned_abs();
        } else {
            report.removed += n.unsigned_abs();
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "a\n").unwrap();

        let mut last = Some(FileStamp::read(&path).unwrap());
        assert_eq!(check(&path, &mut last), None);

        fs::write(&path, "a\nb\n").unwrap();
        assert!(matches!(check(&path, &mut last), Some(SyncEvent::Changed(_))));
        assert_eq!(check(&path, &mut last), None);

        fs::remove_file(&path).unwrap();
        assert_eq!(check(&path, &mut last), Some(SyncEvent::Missing));
        assert_eq!(check(&path, &mut last), None);
    }

    #[test]
    fn test_poller_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "a\n").unwrap();
        let baseline = FileStamp::read(&path).ok();

        let (poller, events) =
            Poller::spawn(path.clone(), Duration::from_millis(20), baseline).unwrap();
        fs::write(&path, "a\nchanged elsewhere\n").unwrap();
        let event = events.recv_timeout(Duration::from_secs(5)).unwrap();
        match event {
            SyncEvent::Changed(stamp) => {
                assert!(stamp.same_content(&FileStamp::read(&path).unwrap()));
            }
            other => panic!("unexpected {other:?}"),
        }
        poller.stop();
    }

    #[test]
    fn test_reconcile_external_wins() {
        let mut list = TodoList::from_text("one\ntwo\n");
        let report = reconcile(&mut list, TodoList::from_text("one\nthree\nfour\n"), None);
        assert_eq!(report, SyncReport { added: 2, removed: 1, edit_conflict: false });
        assert_eq!(list.to_text(), "one\nthree\nfour\n");
    }

    #[test]
    fn test_reconcile_follows_pending_edit() {
        let mut list = TodoList::from_text("one\ntwo\n");
        let mut edit = PendingEdit::new(1, "two");
        let report = reconcile(&mut list, TodoList::from_text("zero\none\ntwo\n"), Some(&mut edit));
        assert!(!report.edit_conflict);
        assert_eq!(edit.index, Some(2));
    }

    #[test]
    fn test_replay_local_changes() {
        let base = TodoList::from_text("one\ntwo\nthree\n");
        let local = TodoList::from_text("one\nx two\nthree\nfour\n");
        let incoming = TodoList::from_text("zero\none\ntwo\nthree\n");
        let merged = replay_local_changes(&base, &local, incoming);
        assert_eq!(merged.to_text(), "zero\none\nthree\nx two\nfour\n");

        // A line deleted on both sides is not removed twice.
        let local = TodoList::from_text("one\nthree\n");
        let incoming = TodoList::from_text("one\nthree\nfrom phone\n");
        let merged = replay_local_changes(&base, &local, incoming);
        assert_eq!(merged.to_text(), "one\nthree\nfrom phone\n");
    }

    #[test]
    fn test_reconcile_flags_conflicts() {
        let mut list = TodoList::from_text("one\ntwo\n");
        let mut edit = PendingEdit::new(1, "two");
        let incoming = TodoList::from_text("one\ntwo changed\n");
        let report = reconcile(&mut list, incoming, Some(&mut edit));
        assert!(report.edit_conflict);
        assert_eq!(edit.index, Some(1));

        let mut edit = PendingEdit::new(1, "two changed");
        reconcile(&mut list, TodoList::from_text("one\n"), Some(&mut edit));
        assert!(edit.conflict);
        assert_eq!(edit.index, None);
    }
}
