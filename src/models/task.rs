use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

pub const EMPTY_DUE_DATE_MESSAGE: &str = "Task due date cannot be empty";

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum. Any status may replace any other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task has not been started.
    #[default]
    #[serde(rename = "Pendente")]
    #[sqlx(rename = "Pendente")]
    Pending,
    /// Task is being worked on.
    #[serde(rename = "EmAndamento")]
    #[sqlx(rename = "EmAndamento")]
    InProgress,
    /// Task is done.
    #[serde(rename = "Finalizado")]
    #[sqlx(rename = "Finalizado")]
    Finished,
    /// Task was abandoned.
    #[serde(rename = "Cancelado")]
    #[sqlx(rename = "Cancelado")]
    Canceled,
    /// Task missed its due date.
    #[serde(rename = "Atrasado")]
    #[sqlx(rename = "Atrasado")]
    Late,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Finished,
        TaskStatus::Canceled,
        TaskStatus::Late,
    ];

    /// The name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pendente",
            TaskStatus::InProgress => "EmAndamento",
            TaskStatus::Finished => "Finalizado",
            TaskStatus::Canceled => "Cancelado",
            TaskStatus::Late => "Atrasado",
        }
    }
}

/// Request body for creating or fully replacing a task.
///
/// Every field is optional on the wire; only the due date is checked, through
/// the `Validate` implementation below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(rename = "titulo", default)]
    pub title: String,

    #[serde(rename = "descricao", default)]
    pub description: String,

    /// Missing, `null`, blank and `0001-01-01T00:00:00` all count as unset.
    #[serde(rename = "data", default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub status: TaskStatus,
}

impl Validate for TaskInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self.due_date {
            Some(due_date) if !is_zero_timestamp(&due_date) => Ok(()),
            _ => {
                let mut error = ValidationError::new("due_date_unset");
                error.message = Some(Cow::from(EMPTY_DUE_DATE_MESSAGE));
                let mut errors = ValidationErrors::new();
                errors.add("data", error);
                Err(errors)
            }
        }
    }
}

impl TaskInput {
    /// Validates the input and turns it into the fields a store persists.
    pub fn into_new_task(self) -> Result<NewTask, AppError> {
        self.validate()?;
        let due_date = self
            .due_date
            .ok_or_else(|| AppError::BadRequest(EMPTY_DUE_DATE_MESSAGE.into()))?;

        Ok(NewTask {
            title: self.title,
            description: self.description,
            due_date,
            status: self.status,
        })
    }
}

/// A validated task that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn with_id(self, id: i32) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status,
        }
    }
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Store-assigned identifier. Never changes after creation.
    pub id: i32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data")]
    pub due_date: NaiveDateTime,
    pub status: TaskStatus,
}

impl Task {
    /// Case-sensitive substring match on the title.
    pub fn title_contains(&self, fragment: &str) -> bool {
        self.title.contains(fragment)
    }

    /// True when the due date falls on `day`, whatever the time of day.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date.date() == day
    }
}

/// Query string of `ObterPorTitulo`. An omitted `titulo` matches every task.
#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub titulo: String,
}

/// Query string of `ObterPorData`. Any time-of-day component is discarded.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(deserialize_with = "deserialize_day")]
    pub data: NaiveDate,
}

/// Query string of `ObterPorStatus`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: TaskStatus,
}

/// `DateTime.MinValue` style placeholder that clients send for "no date".
pub fn is_zero_timestamp(value: &NaiveDateTime) -> bool {
    value.year() == 1
        && value.ordinal() == 1
        && value.num_seconds_from_midnight() == 0
        && value.nanosecond() == 0
}

/// Accepts RFC 3339 (converted to UTC), a naive ISO-8601 timestamp with or
/// without fractional seconds, or a bare date at midnight.
///
/// A zero timestamp stays zero whatever its offset, so it is still seen as unset.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        let local = value.naive_local();
        if is_zero_timestamp(&local) {
            return Some(local);
        }
        return Some(value.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {:?}", value))),
    }
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .map(|value| value.date())
        .ok_or_else(|| de::Error::custom(format!("invalid date: {:?}", raw)))
}
