//! Next-occurrence computation for recurring tasks.

use chrono::NaiveDate;
use log::{info, warn};

use crate::dates::add_interval;
use crate::fields::RecurrenceAnchor;
use crate::task::Task;

/// The task spawned by completing a recurring task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    pub task: Task,
    /// Anchor actually used for the computation.
    pub anchor_used: RecurrenceAnchor,
    /// A strict rule had no due date to anchor on and fell back to the
    /// completion date.
    pub fell_back: bool,
}

/// Compute the next instance of `task`, completed on `completed_on`.
///
/// Returns `None` when the task has no recurrence rule or the new date would
/// overflow the calendar. `created_on` becomes the successor's creation date
/// (pass `None` when creation dates are not tracked). The completed task
/// itself is not touched.
pub fn next_occurrence(
    task: &Task,
    completed_on: NaiveDate,
    created_on: Option<NaiveDate>,
) -> Option<Successor> {
    let rule = task.recurrence?;

    let (anchor_date, anchor_used, fell_back) = match (rule.anchor, task.due_date) {
        (RecurrenceAnchor::DueDate, Some(due)) => (due, RecurrenceAnchor::DueDate, false),
        (RecurrenceAnchor::DueDate, None) => {
            info!(
                "strict recurrence `rec:{rule}` on `{}` has no due date; anchoring on completion date",
                task.raw_text
            );
            (completed_on, RecurrenceAnchor::CompletionDate, true)
        }
        (RecurrenceAnchor::CompletionDate, _) => {
            (completed_on, RecurrenceAnchor::CompletionDate, false)
        }
    };

    let Some(due) = add_interval(anchor_date, rule.amount, rule.unit) else {
        warn!("next occurrence of `{}` is out of range", task.raw_text);
        return None;
    };

    // Strict rules move the threshold by the same interval; otherwise the
    // gap between threshold and due date is kept.
    let threshold = match (task.threshold_date, anchor_used, task.due_date) {
        (None, _, _) => None,
        (Some(t), RecurrenceAnchor::DueDate, _) => add_interval(t, rule.amount, rule.unit),
        (Some(t), RecurrenceAnchor::CompletionDate, Some(old_due)) => {
            due.checked_sub_signed(old_due - t)
        }
        (Some(_), RecurrenceAnchor::CompletionDate, None) => Some(due),
    };

    let mut next = task.clone();
    next.completed = false;
    next.completion_date = None;
    next.creation_date = created_on;
    next.due_date = Some(due);
    next.threshold_date = threshold;
    next.refresh_raw();

    Some(Successor { task: next, anchor_used, fell_back })
}
