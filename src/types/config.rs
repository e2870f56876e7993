use crate::error::{Result, ShowcaseError};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const SCORE_MULTIPLIER_KEY: &str = "score_multiplier";

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub github_organisation: String,
    pub username: Option<String>,
    pub token: Option<String>,
    pub name: Option<String>,
    pub organisation_name: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
    #[serde(default = "default_readme_count")]
    pub readme_count: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_featured_count() -> usize {
    3
}

fn default_readme_count() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.github_organisation.trim().is_empty() {
            return Err(ShowcaseError::configuration(
                "github_organisation must not be empty",
            ));
        }
        match (&self.username, &self.token) {
            (Some(_), None) => Err(ShowcaseError::configuration(
                "username is set but token is missing; add a personal access token as `token`",
            )),
            (None, Some(_)) => Err(ShowcaseError::configuration(
                "token is set but username is missing; add your GitHub login as `username`",
            )),
            _ => Ok(()),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.token) {
            (Some(username), Some(token)) => Some(Credentials {
                username: username.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }

    pub fn organisation_name(&self) -> String {
        self.organisation_name
            .clone()
            .unwrap_or_else(|| self.github_organisation.clone())
    }

    pub fn site_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} on GitHub", self.organisation_name()))
    }
}

/// Locally curated fields for one repository, keyed by the override file's stem.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub name: String,
    pub score_multiplier: Option<f64>,
    pub fields: Map<String, Value>,
}

impl Override {
    /// Reads `score_multiplier` from the raw mapping. Every key, the multiplier
    /// included, stays in `fields` as an overlay field.
    pub fn from_fields(name: &str, fields: Map<String, Value>) -> Result<Self> {
        let score_multiplier = match fields.get(SCORE_MULTIPLIER_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(other) => {
                return Err(ShowcaseError::configuration(format!(
                    "{name}: score_multiplier must be a number, found {other}"
                )))
            }
        };
        Ok(Self {
            name: name.to_string(),
            score_multiplier,
            fields,
        })
    }

    pub fn multiplier(&self) -> f64 {
        self.score_multiplier.unwrap_or(1.0)
    }
}
