//! Visibility filtering and display order.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::fields::Priority;
use crate::task::Task;

/// What the current view hides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Keep completed tasks in the list.
    pub include_completed: bool,
    /// Keep tasks tagged `h:1`.
    pub show_hidden: bool,
    /// Keep tasks whose threshold date is still in the future.
    pub show_deferred: bool,
    /// Only tasks with this priority.
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the line.
    pub search: Option<String>,
}

impl ViewFilter {
    /// Default view derived from the user's settings.
    pub fn from_settings(settings: &Settings) -> Self {
        ViewFilter {
            show_hidden: settings.display_hidden_tasks_by_default,
            show_deferred: !settings.hide_tasks_with_threshold_dates,
            ..ViewFilter::default()
        }
    }

    pub fn is_visible(&self, task: &Task, today: NaiveDate) -> bool {
        if task.completed && !self.include_completed {
            return false;
        }
        if task.is_hidden_tagged() && !self.show_hidden {
            return false;
        }
        if task.is_deferred(today) && !self.show_deferred {
            return false;
        }
        if let Some(p) = self.priority {
            if task.priority != Some(p) {
                return false;
            }
        }
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            if !task.raw_text.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Display order: due date (undated last), then priority (none last), then
/// description ignoring case.
pub fn compare(a: &Task, b: &Task) -> Ordering {
    fn last_if_none<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
    last_if_none(a.due_date, b.due_date)
        .then_with(|| last_if_none(a.priority, b.priority))
        .then_with(|| a.description.to_lowercase().cmp(&b.description.to_lowercase()))
}

/// Positions of the visible tasks in display order. Full ties keep file order.
pub fn sort_visible(tasks: &[Task], filter: &ViewFilter, today: NaiveDate) -> Vec<usize> {
    let mut visible: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.is_visible(t, today))
        .map(|(i, _)| i)
        .collect();
    visible.sort_by(|&a, &b| compare(&tasks[a], &tasks[b]));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;

    fn d(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    fn tasks(lines: &[&str]) -> Vec<Task> {
        lines.iter().map(|l| Task::parse(l)).collect()
    }

    fn descriptions(tasks: &[Task], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| tasks[i].description.clone()).collect()
    }

    #[test]
    fn test_due_then_priority_then_text() {
        let today = d("2024-01-01");
        for lines in [
            ["(B) zeta due:2024-01-02)", "(A) alpha due:2024-01-01)", "beta"],
            ["(B) zeta due:2024-01-02", "(A) alpha due:2024-01-01", "beta"],
        ] {
            let ts = tasks(&lines);
            let order = sort_visible(&ts, &ViewFilter::default(), today);
            assert_eq!(descriptions(&ts, &order), vec!["alpha", "zeta", "beta"]);
        }
    }

    #[test]
    fn test_full_ordering() {
        let ts = tasks(&[
            "no due no pri",
            "(B) Bravo",
            "(A) charlie due:2024-02-01",
            "Alpha due:2024-02-01",
            "(A) alpha due:2024-02-01",
            "(A) early due:2024-01-15",
            "(A) Able",
        ]);
        let order = sort_visible(&ts, &ViewFilter::default(), d("2024-01-01"));
        assert_eq!(
            descriptions(&ts, &order),
            vec!["early", "alpha", "charlie", "Alpha", "Able", "Bravo", "no due no pri"]
        );
    }

    #[test]
    fn test_stable_for_ties() {
        let ts = tasks(&["Same +one", "same +two", "SAME +three"]);
        let order = sort_visible(&ts, &ViewFilter::default(), d("2024-01-01"));
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_visibility() {
        let today = d("2024-01-10");
        let ts = tasks(&[
            "x 2024-01-09 finished",
            "secret h:1",
            "later t:2024-01-11",
            "now t:2024-01-10",
            "(A) urgent call",
            "(B) normal Call",
        ]);
        let order = sort_visible(&ts, &ViewFilter::default(), today);
        assert_eq!(descriptions(&ts, &order), vec!["urgent call", "normal Call", "now"]);

        let all = ViewFilter {
            include_completed: true,
            show_hidden: true,
            show_deferred: true,
            ..ViewFilter::default()
        };
        assert_eq!(sort_visible(&ts, &all, today).len(), ts.len());

        let by_priority = ViewFilter {
            priority: Priority::from_letter('A'),
            ..ViewFilter::default()
        };
        assert_eq!(sort_visible(&ts, &by_priority, today), vec![4]);

        let search = ViewFilter { search: Some("CALL".into()), ..ViewFilter::default() };
        assert_eq!(sort_visible(&ts, &search, today), vec![4, 5]);
    }

    #[test]
    fn test_filter_from_settings() {
        let settings = Settings {
            display_hidden_tasks_by_default: true,
            hide_tasks_with_threshold_dates: false,
            ..Settings::default()
        };
        let filter = ViewFilter::from_settings(&settings);
        assert!(filter.show_hidden);
        assert!(filter.show_deferred);
        assert!(!filter.include_completed);
    }
}
