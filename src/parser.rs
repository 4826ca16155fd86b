//! Splits a raw assistant reply into display prose and cited sources.
//!
//! The backend appends a human-readable source listing after a marker
//! substring; the same articles arrive structurally in the reply payload,
//! so the trailing text block is redundant and dropped here.

use crate::types::Source;

/// Literal substring the backend uses to delimit prose from its trailing
/// source listing.
pub const CITATION_MARKER: &str = "📚 **Sources:**";

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedResponse {
    pub content: String,
    pub sources: Vec<Source>,
}

/// Pure and total: absent marker and absent articles are both valid inputs.
pub fn parse_response(raw: &str, articles: Option<Vec<Source>>) -> ParsedResponse {
    let content = match raw.find(CITATION_MARKER) {
        Some(index) => raw[..index].trim().to_string(),
        None => raw.to_string(),
    };
    ParsedResponse {
        content,
        sources: articles.unwrap_or_default(),
    }
}

/// Hostname of a source URL for display, without a leading `www.`.
/// Falls back to the raw input when the URL does not parse.
pub fn source_hostname(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str) -> Source {
        Source {
            url: url.to_string(),
            title: "article".to_string(),
            description: None,
        }
    }

    #[test]
    fn strips_marker_and_trailing_listing() {
        let raw = "Paris hosts summit. 📚 **Sources:** 1. Le Monde...";
        let parsed = parse_response(raw, Some(vec![article("https://a.com")]));
        assert_eq!(parsed.content, "Paris hosts summit.");
        assert_eq!(parsed.sources, vec![article("https://a.com")]);
    }

    #[test]
    fn leaves_content_untouched_without_marker() {
        let parsed = parse_response("No citations here", None);
        assert_eq!(parsed.content, "No citations here");
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn trims_whitespace_before_marker() {
        let parsed = parse_response("Summary.\n\n📚 **Sources:**\n- x", None);
        assert_eq!(parsed.content, "Summary.");
    }

    #[test]
    fn marker_at_start_yields_empty_content() {
        let parsed = parse_response("📚 **Sources:** only a listing", None);
        assert_eq!(parsed.content, "");
    }

    #[test]
    fn hostname_strips_www() {
        assert_eq!(source_hostname("https://www.reuters.com/article"), "reuters.com");
        assert_eq!(source_hostname("https://apnews.com/x"), "apnews.com");
    }

    #[test]
    fn hostname_falls_back_on_malformed_url() {
        assert_eq!(source_hostname("not a url"), "not a url");
        assert_eq!(source_hostname(""), "");
    }
}
