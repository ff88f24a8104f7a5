//! DuckDuckGo Instant Answer search.
//!
//! The Instant Answer API needs no key. It returns an abstract plus related
//! topics rather than a full result listing; both are mapped to
//! `ResourceResult`s. Course-style queries usually match no instant answer,
//! so an empty result list is the common case.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::SearchError;

use super::{ResourceResult, ResourceSearchProvider};

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

const USER_AGENT: &str = concat!("CourseCompass/", env!("CARGO_PKG_VERSION"));

/// Resource search over the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: DDG_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// The query sent for a subject.
pub fn search_query(subject: &str) -> String {
    format!("learn {} course tutorial guide", subject.trim())
}

#[async_trait]
impl ResourceSearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(
        &self,
        subject: &str,
        limit: usize,
    ) -> Result<Vec<ResourceResult>, SearchError> {
        let query = search_query(subject);
        debug!(query = %query, limit, "Searching DuckDuckGo");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(parse_results(&body, limit))
    }
}

/// Map an Instant Answer response to at most `limit` results.
///
/// The abstract (if any) comes first, followed by related topics in order.
/// Topic groups are flattened.
pub fn parse_results(data: &serde_json::Value, limit: usize) -> Vec<ResourceResult> {
    let mut results = Vec::new();

    let abstract_text = data["AbstractText"].as_str().unwrap_or("");
    let abstract_url = data["AbstractURL"].as_str().unwrap_or("");
    if !abstract_text.is_empty() && !abstract_url.is_empty() {
        let title = data["Heading"]
            .as_str()
            .filter(|h| !h.is_empty())
            .or_else(|| data["AbstractSource"].as_str())
            .unwrap_or("Summary");
        results.push(ResourceResult::new(title, abstract_text, abstract_url));
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        collect_topics(topics, &mut results);
    }

    results.truncate(limit);
    results
}

fn collect_topics(topics: &[serde_json::Value], out: &mut Vec<ResourceResult>) {
    for topic in topics {
        if let Some(group) = topic["Topics"].as_array() {
            collect_topics(group, out);
            continue;
        }
        let text = topic["Text"].as_str().unwrap_or("");
        let url = topic["FirstURL"].as_str().unwrap_or("");
        if text.is_empty() || url.is_empty() {
            continue;
        }
        out.push(ResourceResult::new(topic_title(text), text, url));
    }
}

/// Topic text reads "Title - description"; fall back to a short prefix.
fn topic_title(text: &str) -> String {
    if let Some((title, _)) = text.split_once(" - ") {
        return title.trim().to_string();
    }
    const MAX_CHARS: usize = 60;
    if text.chars().count() <= MAX_CHARS {
        return text.to_string();
    }
    let short: String = text.chars().take(MAX_CHARS).collect();
    format!("{}...", short.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_wraps_subject() {
        assert_eq!(search_query(" Rust "), "learn Rust course tutorial guide");
    }

    #[test]
    fn parse_abstract_first() {
        let data = serde_json::json!({
            "Heading": "Rust (programming language)",
            "AbstractText": "Rust is a systems programming language.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "RelatedTopics": [
                {"Text": "Cargo - The Rust package manager", "FirstURL": "https://duckduckgo.com/Cargo"}
            ]
        });

        let results = parse_results(&data, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust (programming language)");
        assert_eq!(results[0].body, "Rust is a systems programming language.");
        assert_eq!(results[1].title, "Cargo");
        assert_eq!(results[1].url, "https://duckduckgo.com/Cargo");
    }

    #[test]
    fn parse_flattens_topic_groups_and_truncates() {
        let data = serde_json::json!({
            "AbstractText": "",
            "RelatedTopics": [
                {"Text": "Topic 1 - first", "FirstURL": "https://example.com/1"},
                {
                    "Name": "Courses",
                    "Topics": [
                        {"Text": "Topic 2 - second", "FirstURL": "https://example.com/2"},
                        {"Text": "Topic 3 - third", "FirstURL": "https://example.com/3"}
                    ]
                },
                {"Text": "", "FirstURL": "https://example.com/skip"},
                {"Text": "Topic 4 - fourth", "FirstURL": "https://example.com/4"}
            ]
        });

        let results = parse_results(&data, 3);
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/1",
                "https://example.com/2",
                "https://example.com/3"
            ]
        );
    }

    #[test]
    fn parse_empty_response() {
        let data = serde_json::json!({
            "AbstractText": "",
            "Answer": "",
            "RelatedTopics": []
        });
        assert!(parse_results(&data, 5).is_empty());
    }

    #[test]
    fn long_topic_text_gets_short_title() {
        let text = "a".repeat(100);
        let title = topic_title(&text);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), 63);
    }
}
