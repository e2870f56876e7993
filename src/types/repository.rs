use crate::error::{Result, ShowcaseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A merged repository entry as persisted in the snapshot: an open field mapping.
pub type Record = Map<String, Value>;

/// The projected view of one repository from the forge listing.
///
/// Deserializing the raw listing into this struct is the projection step: any
/// field not named here is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub pushed_at: DateTime<Utc>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    pub url: String,
    pub releases_url: String,
    #[serde(default)]
    pub release_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// `None` when no readme was requested, `Some(None)` when the forge has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<Option<String>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Repository {
    /// Release listing URL with the `{/id}` URI template suffix removed.
    pub fn releases_listing_url(&self) -> String {
        match self.releases_url.find('{') {
            Some(idx) => self.releases_url[..idx].to_string(),
            None => self.releases_url.clone(),
        }
    }

    pub fn readme_url(&self) -> String {
        format!("{}/readme", self.url.trim_end_matches('/'))
    }

    /// Records the release summary, keeping `release_date`/`release_version`
    /// present only when at least one release exists.
    pub fn apply_releases(&mut self, releases: &[Release]) {
        self.release_count = releases.len() as u64;
        let latest = releases.iter().max_by_key(|release| release.date());
        self.release_date = latest.map(Release::date);
        self.release_version = latest.map(|release| release.tag_name.clone());
    }

    pub fn into_record(self) -> Result<Record> {
        let url = self.url.clone();
        record_from_value(&url, serde_json::to_value(self)?)
    }
}

fn record_from_value(url: &str, value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ShowcaseError::payload(
            url,
            format!("expected a JSON object for the repository record, found {other}"),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Release {
    pub fn date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}
