//! Request and payload types for the repository search endpoint.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A search as received from the inbound layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search terms, embedded verbatim in the `q` parameter.
    #[serde(default)]
    pub query: String,
    /// Optional language qualifier.
    #[serde(default)]
    pub language: Option<String>,
    /// Optional sort key (`stars`, `forks` or `updated`); passed through unchecked.
    #[serde(default)]
    pub sort: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: None,
            sort: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Reject blank queries before anything reaches GitHub.
    ///
    /// Returns `(field, message)` pairs for every violation.
    pub fn validate(&self) -> Result<(), Vec<(&'static str, &'static str)>> {
        if self.query.trim().is_empty() {
            return Err(vec![("query", "Query cannot be empty")]);
        }
        Ok(())
    }
}

/// One entry of the `items` array, decoded with every field optional.
///
/// Required-field checks happen in [`super::convert::to_repository_model`],
/// not here, so a sparse item still decodes. Descriptive fields that carry
/// the wrong JSON type (or an out-of-range count, or an unparseable
/// timestamp) decode as `None` instead of failing the whole item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    pub owner: Option<SearchItemOwner>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub stargazers_count: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub forks_count: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItemOwner {
    pub login: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
