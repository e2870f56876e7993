use crate::error::{Result, ShowcaseError};
use base64::Engine as _;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

#[derive(Debug, Deserialize)]
struct ReadmePayload {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Decodes the forge's readme payload (`{"content": <base64>, "encoding": "base64"}`)
/// and cleans the markdown for display.
pub fn decode_payload(url: &str, body: &str) -> Result<String> {
    let payload: ReadmePayload =
        serde_json::from_str(body).map_err(|e| ShowcaseError::payload(url, e.to_string()))?;
    let text = match payload.encoding.as_deref() {
        Some("base64") | None => {
            let compact: String = payload
                .content
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| ShowcaseError::payload(url, e.to_string()))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Some(other) => {
            return Err(ShowcaseError::payload(
                url,
                format!("unsupported readme encoding {other}"),
            ))
        }
    };
    Ok(clean_markdown(&text))
}

struct Patterns {
    image: Regex,
    inline_link: Regex,
    reference_link: Regex,
    reference_definition: Regex,
    setext_underline: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        image: Regex::new(r"!\[[^\]]*\]\([^)]*\)|!\[[^\]]*\]\[[^\]]*\]").expect("valid regex"),
        inline_link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid regex"),
        reference_link: Regex::new(r"\[([^\]]+)\]\[[^\]]*\]").expect("valid regex"),
        reference_definition: Regex::new(r"^\s{0,3}\[[^\]]+\]:\s*\S+").expect("valid regex"),
        setext_underline: Regex::new(r"^\s{0,3}(=+|-+)\s*$").expect("valid regex"),
    })
}

/// Strips headings, drops images and reference definitions, replaces links with
/// their text, trims each line and collapses runs of blank lines.
pub fn clean_markdown(text: &str) -> String {
    let p = patterns();
    let lines: Vec<&str> = text.lines().collect();
    let mut kept: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let next_is_underline = lines
            .get(i + 1)
            .map(|next| !line.trim().is_empty() && p.setext_underline.is_match(next))
            .unwrap_or(false);
        if next_is_underline {
            i += 2;
            continue;
        }
        i += 1;

        if line.trim_start().starts_with('#') || p.reference_definition.is_match(line) {
            continue;
        }
        let without_images = p.image.replace_all(line, "");
        let inline = p.inline_link.replace_all(&without_images, "$1");
        let dereferenced = p.reference_link.replace_all(&inline, "$1");
        let cleaned = dereferenced.trim();

        if cleaned.is_empty() {
            if kept.last().map(|l| l.is_empty()).unwrap_or(true) {
                continue;
            }
            kept.push(String::new());
        } else {
            kept.push(cleaned.to_string());
        }
    }

    while kept.last().map(|l| l.is_empty()).unwrap_or(false) {
        kept.pop();
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_removed() {
        let text = "# Roary\n\nRapid pan-genome analysis.\n\n## Install\nUse conda.\n\nUsage\n-----\nrun it";
        assert_eq!(
            clean_markdown(text),
            "Rapid pan-genome analysis.\n\nUse conda.\n\nrun it"
        );
    }

    #[test]
    fn links_are_dereferenced_and_images_dropped() {
        let text = "[![Build](https://ci/badge.svg)](https://ci) \
                    See [the docs](https://docs.example) and [paper][1].\n\n\
                    [1]: https://doi.example/123";
        assert_eq!(clean_markdown(text), "See the docs and paper.");
    }

    #[test]
    fn blank_line_runs_collapse() {
        let text = "\n\nfirst\n\n\n\nsecond\n\n";
        assert_eq!(clean_markdown(text), "first\n\nsecond");
    }

    #[test]
    fn decode_payload_handles_wrapped_base64() {
        // "# Title\nBody text\n" split across lines the way the forge wraps it.
        let body = r#"{"content":"IyBUaXRsZQpC\nb2R5IHRleHQK\n","encoding":"base64"}"#;
        let text = decode_payload("https://api.test/readme", body).expect("payload should decode");
        assert_eq!(text, "Body text");
    }

    #[test]
    fn decode_payload_rejects_bad_base64() {
        let body = r#"{"content":"@@@@","encoding":"base64"}"#;
        let result = decode_payload("https://api.test/readme", body);
        assert!(matches!(result, Err(ShowcaseError::Payload { .. })));
    }
}
