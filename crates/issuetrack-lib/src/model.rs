//! Core data types for issuetrack-lib.
//!
//! The serde layout here is the on-disk and on-the-wire format: a JSON
//! object keyed by project name whose values are arrays of issues.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const fn default_open() -> bool {
    true
}

/// Render a timestamp the way it is persisted.
///
/// Used both by serialization and by string-coerced filtering, so a value
/// read back from a response always matches itself as a filter.
#[must_use]
pub fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::timestamp_text(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A tracked issue within one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub status_text: String,
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(with = "timestamp")]
    pub created_on: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_on: DateTime<Utc>,
}

impl Issue {
    /// Field names as they appear in JSON, in serialization order.
    pub const FIELDS: [&'static str; 9] = [
        "_id",
        "issue_title",
        "issue_text",
        "created_by",
        "assigned_to",
        "status_text",
        "open",
        "created_on",
        "updated_on",
    ];

    /// String-coerced value of a field, as used by list filters.
    ///
    /// Returns `None` for names that are not issue fields.
    #[must_use]
    pub fn field_text(&self, field: &str) -> Option<String> {
        let text = match field {
            "_id" | "id" => self.id.clone(),
            "issue_title" => self.issue_title.clone(),
            "issue_text" => self.issue_text.clone(),
            "created_by" => self.created_by.clone(),
            "assigned_to" => self.assigned_to.clone(),
            "status_text" => self.status_text.clone(),
            "open" => self.open.to_string(),
            "created_on" => timestamp_text(&self.created_on),
            "updated_on" => timestamp_text(&self.updated_on),
            _ => return None,
        };
        Some(text)
    }
}

/// The full persisted dataset: project name to issues in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Datastore {
    projects: BTreeMap<String, Vec<Issue>>,
}

impl Datastore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues of a project; unknown projects read as empty.
    #[must_use]
    pub fn project(&self, name: &str) -> &[Issue] {
        self.projects.get(name).map_or(&[], Vec::as_slice)
    }

    /// Mutable issue list of a project, created empty if absent.
    pub fn project_entry(&mut self, name: &str) -> &mut Vec<Issue> {
        self.projects.entry(name.to_string()).or_default()
    }

    /// Mutable issue list of an existing project.
    pub fn project_mut(&mut self, name: &str) -> Option<&mut Vec<Issue>> {
        self.projects.get_mut(name)
    }

    /// Names of all projects present as keys, including empty ones.
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// Total number of issues across all projects.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.projects.values().map(Vec::len).sum()
    }
}
