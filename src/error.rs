use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("forge API request failed with status {status}: {url}")]
    ForgeApi { status: u16, url: String },

    #[error("forge API rate limit reached: {url}")]
    RateLimited { url: String },

    #[error("no readme available: {url}")]
    MissingReadme { url: String },

    #[error("unexpected forge payload from {url}: {reason}")]
    Payload { url: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ShowcaseError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn payload(url: &str, reason: impl Into<String>) -> Self {
        Self::Payload {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShowcaseError>;
