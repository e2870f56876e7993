use super::{ForgeClient, Transport};
use crate::error::Result;
use tracing::warn;

pub const MAX_PAGES: usize = 100;

/// Fetches `first_url` and every page reachable through `rel="next"` links,
/// up to [`MAX_PAGES`]. Returns `(url, body)` per page in request order.
pub fn fetch_pages<T: Transport>(
    client: &ForgeClient<T>,
    first_url: &str,
) -> Result<Vec<(String, String)>> {
    let mut pages = Vec::new();
    let mut next = Some(first_url.to_string());

    while let Some(url) = next.take() {
        if pages.len() == MAX_PAGES {
            warn!("stopped after {MAX_PAGES} pages; {url} was not fetched");
            break;
        }
        let response = client.fetch(&url)?;
        next = response.link.as_deref().and_then(next_link);
        pages.push((url, response.body));
    }

    Ok(pages)
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header value.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
