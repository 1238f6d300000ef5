//! Wire format of the upstream database query and the adapter that turns one
//! upstream record into an `ExpenseEntry`.
//!
//! Expected record shape (property names come from `RecordSchema`):
//!
//! ```text
//! properties.<date>.date.start          "2023-03-01" or an RFC 3339 date-time
//! properties.<title>.title[]            first item with type == "text" gives plain_text
//! properties.<tags>.multi_select[].name category labels, may be empty
//! ```
//!
//! Any absent or mistyped field is reported as a `RecordError`; the record is
//! never silently skipped.

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::RecordSchema;
use crate::error::RecordError;
use crate::expense::ExpenseEntry;

/// Body of one upstream query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
}

/// One page of upstream records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Value>,
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateProperty {
    date: Option<DateValue>,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    start: String,
}

#[derive(Debug, Deserialize)]
struct TitleProperty {
    title: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    plain_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MultiSelectProperty {
    multi_select: Vec<SelectOption>,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

/// Turn one upstream record into an expense entry
pub fn normalize_record(record: &Value, schema: &RecordSchema) -> Result<ExpenseEntry, RecordError> {
    let properties = record
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(RecordError::NotAnObject)?;

    let date_property: DateProperty = property(properties, &schema.date_property)?;
    let start = date_property
        .date
        .map(|date| date.start)
        .ok_or_else(|| RecordError::MissingProperty(format!("{}.date.start", schema.date_property)))?;
    let date = parse_record_date(&start)?;

    let title_property: TitleProperty = property(properties, &schema.title_property)?;
    let text = title_property
        .title
        .into_iter()
        .find(|item| item.kind == "text")
        .and_then(|item| item.plain_text)
        .ok_or_else(|| {
            RecordError::MissingProperty(format!("{}.title[type=text].plain_text", schema.title_property))
        })?;

    let tags_property: MultiSelectProperty = property(properties, &schema.tags_property)?;
    let tags = tags_property
        .multi_select
        .into_iter()
        .map(|option| option.name)
        .collect();

    Ok(ExpenseEntry::new(date, text, tags))
}

/// Calendar date of an upstream date value; date-times keep the calendar day
/// of their own offset.
pub fn parse_record_date(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| RecordError::InvalidDate(value.to_string()))
}

fn property<P: DeserializeOwned>(properties: &Map<String, Value>, name: &str) -> Result<P, RecordError> {
    let value = properties
        .get(name)
        .ok_or_else(|| RecordError::MissingProperty(name.to_string()))?;
    P::deserialize(value).map_err(|e| RecordError::InvalidProperty {
        path: name.to_string(),
        reason: e.to_string(),
    })
}
