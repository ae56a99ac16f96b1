//! Record domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{ANONYMOUS_AUTHOR, DEFAULT_EVENT_LOCATION};
use crate::errors::{Error, Result, ValidationError};

/// JSON object form of a record, as held by the local queue and the remote store.
pub type Document = serde_json::Map<String, Value>;

/// Returns the `id` field of a document, if present and a string.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// The three collections the site persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Newsletters,
    Events,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Newsletters,
        Collection::Events,
        Collection::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Newsletters => "newsletters",
            Collection::Events => "events",
            Collection::Comments => "comments",
        }
    }

    /// Fixed key of the local bucket holding pending records for this collection.
    pub fn bucket_key(&self) -> &'static str {
        match self {
            Collection::Newsletters => "hishk_newsletters",
            Collection::Events => "hishk_events",
            Collection::Comments => "hishk_comments",
        }
    }

    /// Field the read path orders by, newest first.
    pub fn order_field(&self) -> &'static str {
        match self {
            Collection::Newsletters | Collection::Events => "timestamp",
            Collection::Comments => "date",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "newsletters" => Ok(Collection::Newsletters),
            "events" => Ok(Collection::Events),
            "comments" => Ok(Collection::Comments),
            other => Err(Error::not_found(format!("Unknown collection '{}'", other))),
        }
    }
}

/// A typed record owned by exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Serialization(format!(
                "{} record serialized to a non-object: {}",
                Self::COLLECTION,
                other
            ))),
        }
    }

    fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

/// Formats an instant the way records store it (`2024-01-01T10:00:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn require(field: &str, value: Option<&str>) -> Result<()> {
    if value.map_or(true, |v| v.trim().is_empty()) {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(())
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Newsletter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub id: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub title: String,
    #[serde(default = "anonymous", deserialize_with = "field_format::text")]
    pub author: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub date: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub content: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub video_url: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub timestamp: String,
}

fn anonymous() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

impl Record for Newsletter {
    const COLLECTION: Collection = Collection::Newsletters;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Newsletter {
    /// Case-insensitive match on author, title and content.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let author = if self.author.is_empty() {
            ANONYMOUS_AUTHOR
        } else {
            self.author.as_str()
        };
        author.to_lowercase().contains(&needle)
            || self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

/// Input model for publishing a newsletter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNewsletter {
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub video_url: Option<String>,
}

impl NewNewsletter {
    pub fn validate(&self) -> Result<()> {
        require("title", self.title.as_deref())?;
        require("date", self.date.as_deref())?;
        require("content", self.content.as_deref())
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Newsletter {
        Newsletter {
            id,
            title: self.title.unwrap_or_default(),
            author: non_blank_or(self.author, ANONYMOUS_AUTHOR),
            date: self.date.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            video_url: self.video_url.unwrap_or_default(),
            timestamp: format_timestamp(now),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub name: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub date: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub start_time: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub end_time: String,
    #[serde(default, deserialize_with = "field_format::list")]
    pub hosts: Vec<String>,
    #[serde(default, deserialize_with = "field_format::text")]
    pub description: String,
    #[serde(default, deserialize_with = "field_format::list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "field_format::text")]
    pub location: String,
    #[serde(default, deserialize_with = "field_format::option_count")]
    pub capacity: Option<u32>,
    #[serde(default, deserialize_with = "field_format::text")]
    pub form_url: String,
    #[serde(default, deserialize_with = "field_format::count")]
    pub registrations: u32,
    #[serde(default, deserialize_with = "field_format::text")]
    pub timestamp: String,
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input model for creating an event. `hosts` and `tags` take either a
/// comma-separated string or a list; `capacity` takes a number or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "field_format::list")]
    pub hosts: Vec<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "field_format::list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_count")]
    pub capacity: Option<u32>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub form_url: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<()> {
        require("name", self.name.as_deref())?;
        require("date", self.date.as_deref())?;
        require("startTime", self.start_time.as_deref())?;
        require("endTime", self.end_time.as_deref())?;
        if self.hosts.is_empty() {
            return Err(ValidationError::MissingField("hosts".to_string()).into());
        }
        require("description", self.description.as_deref())
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Event {
        Event {
            id,
            name: self.name.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            hosts: self.hosts,
            description: self.description.unwrap_or_default(),
            tags: self.tags,
            location: non_blank_or(self.location, DEFAULT_EVENT_LOCATION),
            capacity: self.capacity,
            form_url: self.form_url.unwrap_or_default(),
            registrations: 0,
            timestamp: format_timestamp(now),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comment
// ─────────────────────────────────────────────────────────────────────────────

/// A comment on a newsletter. `newsletter_id` is a lookup reference only;
/// deleting the newsletter leaves its comments in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub newsletter_id: String,
    #[serde(default = "anonymous", deserialize_with = "field_format::text")]
    pub author: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub content: String,
    #[serde(default, deserialize_with = "field_format::text")]
    pub date: String,
}

impl Record for Comment {
    const COLLECTION: Collection = Collection::Comments;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub newsletter_id: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "field_format::option_text")]
    pub content: Option<String>,
}

impl NewComment {
    pub fn validate(&self) -> Result<()> {
        require("newsletterId", self.newsletter_id.as_deref())?;
        require("content", self.content.as_deref())
    }

    pub fn into_record(self, id: String, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            newsletter_id: self.newsletter_id.unwrap_or_default(),
            author: non_blank_or(self.author, ANONYMOUS_AUTHOR),
            content: self.content.unwrap_or_default().trim().to_string(),
            date: format_timestamp(now),
        }
    }
}

// Records written by older clients carry `hosts` as a plain string, `capacity` as
// a string and nulls in text fields; these accept every shape that has been stored.
mod field_format {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::split_list;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn parse_count(value: Value) -> Option<u32> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                        .map(|f| f as u64)
                })
                .and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn option_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_text(Value::deserialize(deserializer)?))
    }

    pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(values) => values
                .into_iter()
                .filter_map(scalar_text)
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            other => scalar_text(other)
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        };
        Ok(items)
    }

    pub fn option_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parse_count(Value::deserialize(deserializer)?))
    }

    pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(parse_count(Value::deserialize(deserializer)?).unwrap_or_default())
    }
}
