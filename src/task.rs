//! Task data structure and the todo.txt line grammar.
//!
//! A line is read as a fixed prefix (completion marker, priority, completion
//! and creation dates) followed by free text in which every whitespace
//! delimited word is classified against an ordered list of matchers:
//! `+project`, `@context`, `key:value` tags (with `due`, `t` and `rec`
//! recognized), and plain words. Nothing in here fails: a malformed tag value
//! is kept verbatim as an extra tag.

use std::iter::Peekable;
use std::str::SplitWhitespace;
use std::sync::LazyLock;

use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::dates;
use crate::error::ParseFailure;
use crate::fields::{Priority, Recurrence};

/// A `key:value` token that is not one of the recognized tags, or a
/// recognized one whose value did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag { key: key.into(), value: value.into() }
    }
}

/// Classification of one word of the free-text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Project(String),
    Context(String),
    Due(NaiveDate),
    Threshold(NaiveDate),
    Recurrence(Recurrence),
    Tag(Tag),
    Word(String),
}

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+):(\S+)$").expect("static regex"));

impl Token {
    /// Classify a single word. With a `reference` date, `due:` and `t:`
    /// values may be relative expressions; without one only ISO dates count.
    pub fn classify(word: &str, reference: Option<NaiveDate>) -> Token {
        if let Some(name) = word.strip_prefix('+').filter(|n| !n.is_empty()) {
            return Token::Project(name.to_string());
        }
        if let Some(name) = word.strip_prefix('@').filter(|n| !n.is_empty()) {
            return Token::Context(name.to_string());
        }
        let Some(caps) = TAG_RE.captures(word) else {
            return Token::Word(word.to_string());
        };
        let (key, value) = (&caps[1], &caps[2]);
        // URLs and paths ("http://...") are text, not tags.
        if value.starts_with('/') {
            return Token::Word(word.to_string());
        }

        let parsed = match key.to_ascii_lowercase().as_str() {
            "due" => resolve_date(value, reference).map(Token::Due),
            "t" => resolve_date(value, reference).map(Token::Threshold),
            "rec" => Recurrence::parse(value).map(Token::Recurrence),
            _ => return Token::Tag(Tag::new(key, value)),
        };
        parsed.unwrap_or_else(|failure| {
            debug!("keeping malformed tag `{word}` verbatim: {failure}");
            Token::Tag(Tag::new(key, value))
        })
    }
}

fn resolve_date(value: &str, reference: Option<NaiveDate>) -> Result<NaiveDate, ParseFailure> {
    match reference {
        Some(today) => dates::resolve(value, today),
        None => dates::parse_iso(value).ok_or_else(|| ParseFailure::Date(value.to_string())),
    }
}

fn take_date(words: &mut Peekable<SplitWhitespace<'_>>) -> Option<NaiveDate> {
    let date = words.peek().and_then(|w| dates::parse_iso(w));
    if date.is_some() {
        words.next();
    }
    date
}

/// One line of a todo.txt file.
///
/// Equality compares the structured fields only; `raw_text` is the line as it
/// was read (or last written) and is what gets saved for untouched tasks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Task {
    #[serde(rename = "text")]
    pub raw_text: String,
    pub completed: bool,
    pub completion_date: Option<NaiveDate>,
    pub creation_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub description: String,
    pub projects: Vec<String>,
    pub contexts: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub threshold_date: Option<NaiveDate>,
    pub recurrence: Option<Recurrence>,
    pub extra_tags: Vec<Tag>,
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.completed == other.completed
            && self.completion_date == other.completion_date
            && self.creation_date == other.creation_date
            && self.priority == other.priority
            && self.description == other.description
            && self.projects == other.projects
            && self.contexts == other.contexts
            && self.due_date == other.due_date
            && self.threshold_date == other.threshold_date
            && self.recurrence == other.recurrence
            && self.extra_tags == other.extra_tags
    }
}

impl Eq for Task {}

impl Task {
    /// Parse a line as stored on disk. Only ISO dates are accepted in tags.
    pub fn parse(line: &str) -> Task {
        Self::parse_with(line, None)
    }

    /// Parse a line typed by the user, resolving relative `due:`/`t:` values
    /// against `today`. The result holds calendar dates only, and its
    /// `raw_text` is the canonical serialization.
    pub fn parse_input(line: &str, today: NaiveDate) -> Task {
        let mut task = Self::parse_with(line, Some(today));
        task.refresh_raw();
        task
    }

    fn parse_with(line: &str, reference: Option<NaiveDate>) -> Task {
        let mut task = Task {
            raw_text: line.trim().to_string(),
            ..Task::default()
        };
        let mut words = line.split_whitespace().peekable();

        if words.peek() == Some(&"x") {
            task.completed = true;
            words.next();
        }
        if let Some(p) = words.peek().and_then(|w| Priority::parse_token(w)) {
            task.priority = Some(p);
            words.next();
        }
        if task.completed {
            task.completion_date = take_date(&mut words);
            if task.completion_date.is_some() {
                task.creation_date = take_date(&mut words);
            }
        } else {
            task.creation_date = take_date(&mut words);
        }

        let mut text: Vec<&str> = Vec::new();
        for word in words {
            match Token::classify(word, reference) {
                Token::Word(_) => text.push(word),
                Token::Project(name) => {
                    if !task.projects.contains(&name) {
                        task.projects.push(name);
                    }
                }
                Token::Context(name) => {
                    if !task.contexts.contains(&name) {
                        task.contexts.push(name);
                    }
                }
                // First occurrence wins; repeats are kept as opaque tags.
                Token::Due(d) if task.due_date.is_none() => task.due_date = Some(d),
                Token::Threshold(d) if task.threshold_date.is_none() => {
                    task.threshold_date = Some(d)
                }
                Token::Recurrence(r) if task.recurrence.is_none() => task.recurrence = Some(r),
                Token::Due(_) | Token::Threshold(_) | Token::Recurrence(_) => {
                    if let Some((key, value)) = word.split_once(':') {
                        task.extra_tags.push(Tag::new(key, value));
                    }
                }
                Token::Tag(tag) => task.extra_tags.push(tag),
            }
        }
        task.description = text.join(" ");
        task
    }

    /// Render the task as a todo.txt line in canonical token order.
    pub fn to_line(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.completed {
            parts.push("x".into());
        }
        if let Some(p) = self.priority {
            parts.push(p.to_string());
        }
        if self.completed {
            if let Some(d) = self.completion_date {
                parts.push(dates::format_iso(d));
            }
        }
        if let Some(d) = self.creation_date {
            parts.push(dates::format_iso(d));
        }
        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }
        parts.extend(self.projects.iter().map(|p| format!("+{p}")));
        parts.extend(self.contexts.iter().map(|c| format!("@{c}")));
        if let Some(d) = self.due_date {
            parts.push(format!("due:{}", dates::format_iso(d)));
        }
        if let Some(r) = self.recurrence {
            parts.push(format!("rec:{r}"));
        }
        if let Some(d) = self.threshold_date {
            parts.push(format!("t:{}", dates::format_iso(d)));
        }
        parts.extend(self.extra_tags.iter().map(|t| format!("{}:{}", t.key, t.value)));
        parts.join(" ")
    }

    /// Re-render `raw_text` after an in-place mutation.
    pub fn refresh_raw(&mut self) {
        self.raw_text = self.to_line();
    }

    /// Sort projects and contexts case-insensitively and re-render.
    pub fn normalize(&mut self) {
        self.projects.sort_by_key(|p| p.to_lowercase());
        self.contexts.sort_by_key(|c| c.to_lowercase());
        self.refresh_raw();
    }

    /// Value of the first extra tag with this key (case-insensitive).
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.extra_tags
            .iter()
            .find(|t| t.key.eq_ignore_ascii_case(key))
            .map(|t| t.value.as_str())
    }

    /// Carries `h:1`.
    pub fn is_hidden_tagged(&self) -> bool {
        self.tag("h") == Some("1")
    }

    /// Threshold date lies after `today`.
    pub fn is_deferred(&self, today: NaiveDate) -> bool {
        self.threshold_date.is_some_and(|t| t > today)
    }

    /// Mark done, stamping the completion date when given.
    pub fn complete(&mut self, on: Option<NaiveDate>) {
        self.completed = true;
        self.completion_date = on;
        self.refresh_raw();
    }

    /// Clear the completion marker and completion date.
    ///
    /// Without date tracking, completion never stamps a date, so a single date
    /// after `x` is the creation date the task had before it was completed.
    pub fn reopen(&mut self, dates_tracked: bool) {
        self.completed = false;
        let stamp = self.completion_date.take();
        if !dates_tracked && self.creation_date.is_none() {
            self.creation_date = stamp;
        }
        self.refresh_raw();
    }
}
