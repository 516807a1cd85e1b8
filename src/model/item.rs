// File: ./src/model/item.rs
use crate::model::validate::{DATE_FORMAT, DAY_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Serde adapter storing `NaiveDateTime` as `DD-MM-YYYY HH:MM`.
///
/// Decoding is as strict as user input: unpadded fields are rejected.
pub mod date_format {
    use crate::model::validate::{format_date, parse_date};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_date(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// One to-do item, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(with = "date_format")]
    pub deadline: NaiveDateTime,
    #[serde(with = "date_format")]
    pub start_time: NaiveDateTime,
    #[serde(with = "date_format")]
    pub end_time: NaiveDateTime,
    pub priority: Priority,
    // Files written before completion tracking carry no flag.
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// True when the start time or the deadline is written on `day`.
    ///
    /// Compares the stored text, so it is a prefix match on `DD-MM-YYYY`
    /// rather than an interval containment check.
    pub fn is_on_day(&self, day: &NaiveDate) -> bool {
        let prefix = day.format(DAY_FORMAT).to_string();
        self.start_time
            .format(DATE_FORMAT)
            .to_string()
            .starts_with(&prefix)
            || self
                .deadline
                .format(DATE_FORMAT)
                .to_string()
                .starts_with(&prefix)
    }

    /// True when the start time or the deadline lies in `[from, to]`.
    pub fn touches_range(&self, from: &NaiveDateTime, to: &NaiveDateTime) -> bool {
        (from <= &self.start_time && &self.start_time <= to)
            || (from <= &self.deadline && &self.deadline <= to)
    }
}

/// Raw field values for a new task, as collected at the boundary.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub start_time: String,
    pub end_time: String,
    pub priority: String,
}

/// Raw replacement values for an existing task. `None` keeps the field.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub priority: Option<String>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.deadline.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TaskField {
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "description")]
    Description,
    #[strum(serialize = "deadline")]
    Deadline,
    /// Start and end time, which change or revert together.
    #[strum(serialize = "schedule")]
    Schedule,
    #[strum(serialize = "priority")]
    Priority,
}
