//! Request input and filter types for issue operations.
//!
//! Every field is optional at this layer so presence checks happen in the
//! service and produce the contract's error payloads instead of a
//! deserialization failure.

use serde::{Deserialize, Deserializer};

use crate::model::Issue;

/// Accept `true`/`false` either as JSON booleans or as text (form bodies).
fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Bool(bool),
        Text(String),
    }

    match Option::<BoolOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrText::Bool(b)) => Ok(Some(b)),
        Some(BoolOrText::Text(text)) => match text.trim() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean for open: {other:?}"
            ))),
        },
    }
}

/// Fields submitted to create an issue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIssue {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl NewIssue {
    /// The three required fields, if all are present and non-empty.
    #[must_use]
    pub fn required(&self) -> Option<(&str, &str, &str)> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }
        Some((
            present(self.issue_title.as_deref())?,
            present(self.issue_text.as_deref())?,
            present(self.created_by.as_deref())?,
        ))
    }
}

/// Fields to update on an issue, addressed by `_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueUpdate {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_bool")]
    pub open: Option<bool>,
}

impl IssueUpdate {
    /// True when no mutable field was sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }

    /// Merge the provided fields into `issue`. Leaves id and timestamps alone.
    pub fn apply_to(&self, issue: &mut Issue) {
        if let Some(ref title) = self.issue_title {
            issue.issue_title.clone_from(title);
        }
        if let Some(ref text) = self.issue_text {
            issue.issue_text.clone_from(text);
        }
        if let Some(ref created_by) = self.created_by {
            issue.created_by.clone_from(created_by);
        }
        if let Some(ref assigned_to) = self.assigned_to {
            issue.assigned_to.clone_from(assigned_to);
        }
        if let Some(ref status_text) = self.status_text {
            issue.status_text.clone_from(status_text);
        }
        if let Some(open) = self.open {
            issue.open = open;
        }
    }
}

/// Body of a delete request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueRef {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
}

/// Exact-match filters for listing issues.
///
/// Each pair keeps only issues whose field, coerced to a string, equals the
/// value. Pairs combine with AND; a repeated key applies every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pairs: Vec<(String, String)>,
}

impl ListFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field = value` constraint.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((field.into(), value.into()));
        self
    }

    /// Whether `issue` satisfies every filter.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.pairs
            .iter()
            .all(|(field, value)| issue.field_text(field).is_some_and(|text| text == *value))
    }
}

impl From<Vec<(String, String)>> for ListFilters {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl FromIterator<(String, String)> for ListFilters {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
