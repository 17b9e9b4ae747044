//! Structured field types carried by a task line.
//!
//! This module defines the priority letter and the recurrence rule, along
//! with the token grammar for each (`(A)`, `rec:+1w`).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseFailure;

/// Single-letter urgency marker, `A` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(char);

impl Priority {
    /// Build a priority from a letter, normalizing case. Non-letters are rejected.
    pub fn from_letter(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        upper.is_ascii_uppercase().then_some(Priority(upper))
    }

    /// Parse the `(A)` form used at the start of a line.
    pub fn parse_token(token: &str) -> Option<Self> {
        let inner = token.strip_prefix('(')?.strip_suffix(')')?;
        let mut chars = inner.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_letter(c)
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// Calendar unit of a recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceUnit {
    fn from_suffix(c: &str) -> Option<Self> {
        match c {
            "d" => Some(RecurrenceUnit::Day),
            "w" => Some(RecurrenceUnit::Week),
            "m" => Some(RecurrenceUnit::Month),
            "y" => Some(RecurrenceUnit::Year),
            _ => None,
        }
    }

    fn suffix(self) -> char {
        match self {
            RecurrenceUnit::Day => 'd',
            RecurrenceUnit::Week => 'w',
            RecurrenceUnit::Month => 'm',
            RecurrenceUnit::Year => 'y',
        }
    }
}

/// Which date the next occurrence is computed from.
///
/// `DueDate` is the strict form written with a leading `+` (`rec:+1w`): the
/// cadence stays fixed regardless of when the task was actually completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceAnchor {
    DueDate,
    CompletionDate,
}

/// A `rec:` rule such as `1w` or `+3m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub amount: u32,
    pub unit: RecurrenceUnit,
    pub anchor: RecurrenceAnchor,
}

static RECURRENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+)?([0-9]+)([dwmy])$").expect("static regex"));

impl Recurrence {
    /// Parse the value of a `rec:` tag. Zero intervals are rejected.
    pub fn parse(value: &str) -> Result<Self, ParseFailure> {
        let fail = || ParseFailure::Recurrence(value.to_string());
        let caps = RECURRENCE_RE.captures(value).ok_or_else(fail)?;
        let amount: u32 = caps[2].parse().map_err(|_| fail())?;
        if amount == 0 {
            return Err(fail());
        }
        let unit = RecurrenceUnit::from_suffix(&caps[3]).ok_or_else(fail)?;
        let anchor = if caps.get(1).is_some() {
            RecurrenceAnchor::DueDate
        } else {
            RecurrenceAnchor::CompletionDate
        };
        Ok(Recurrence { amount, unit, anchor })
    }

    pub fn is_strict(&self) -> bool {
        self.anchor == RecurrenceAnchor::DueDate
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_strict() {
            write!(f, "+")?;
        }
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}
