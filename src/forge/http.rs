use super::{Response, Transport};
use crate::error::Result;
use crate::types::config::Credentials;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, LINK};

const USER_AGENT: &str = concat!("showcase/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

pub struct HttpTransport {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Response> {
        let mut request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.token));
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;
        Ok(Response { status, body, link })
    }
}
