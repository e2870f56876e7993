pub mod http;
pub mod pagination;
pub mod readme;

use crate::error::{Result, ShowcaseError};
use crate::types::repository::{Release, Repository};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// One HTTP response as seen by the forge client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
    /// Raw value of the `Link` header, if any.
    pub link: Option<String>,
}

/// Performs a single GET. The blocking reqwest client in [`http`] is the
/// production implementation.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Response>;
}

pub struct ForgeClient<T: Transport> {
    transport: T,
    api_url: String,
}

impl<T: Transport> ForgeClient<T> {
    pub fn new(transport: T, api_url: &str) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches one URL and classifies the status code.
    pub(crate) fn fetch(&self, url: &str) -> Result<Response> {
        debug!("GET {url}");
        let response = self.transport.get(url)?;
        check_status(url, response)
    }

    fn fetch_all<D: DeserializeOwned>(&self, first_url: &str) -> Result<Vec<D>> {
        let pages = pagination::fetch_pages(self, first_url)?;
        let mut items = Vec::new();
        for (url, body) in pages {
            let page: Vec<D> = serde_json::from_str(&body)
                .map_err(|e| ShowcaseError::payload(&url, e.to_string()))?;
            items.extend(page);
        }
        Ok(items)
    }

    pub fn organisation_repos(&self, organisation: &str) -> Result<Vec<Repository>> {
        let url = format!("{}/orgs/{}/repos?page=1", self.api_url, organisation);
        self.fetch_all(&url)
    }

    pub fn releases(&self, repo: &Repository) -> Result<Vec<Release>> {
        self.fetch_all(&repo.releases_listing_url())
    }

    /// Returns the decoded readme text; a 404 surfaces as `MissingReadme`.
    pub fn readme(&self, repo: &Repository) -> Result<String> {
        let url = repo.readme_url();
        let response = match self.fetch(&url) {
            Ok(response) => response,
            Err(ShowcaseError::ForgeApi { status: 404, url }) => {
                return Err(ShowcaseError::MissingReadme { url })
            }
            Err(e) => return Err(e),
        };
        readme::decode_payload(&url, &response.body)
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    match response.status {
        200..=299 => Ok(response),
        403 => {
            warn!("forge returned 403 for {url}; the API rate limit has probably been reached");
            Err(ShowcaseError::RateLimited {
                url: url.to_string(),
            })
        }
        status => Err(ShowcaseError::ForgeApi {
            status,
            url: url.to_string(),
        }),
    }
}
