//! Wikipedia REST `page/summary/{title}` payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    #[default]
    Standard,
    Disambiguation,
    MainPage,
    NoExtract,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageSummary {
    pub title: String,

    #[serde(rename = "type", default)]
    pub kind: SummaryKind,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub extract: Option<String>,

    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,

    #[serde(default)]
    pub content_urls: Option<ContentUrls>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Thumbnail {
    pub source: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentUrls {
    #[serde(default)]
    pub desktop: Option<PageUrl>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageUrl {
    pub page: String,
}

impl PageSummary {
    /// Non-empty extract of a regular article; disambiguation pages do not count.
    pub fn usable_extract(&self) -> Option<&str> {
        if self.kind == SummaryKind::Disambiguation {
            return None;
        }
        self.extract
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn page_url(&self) -> Option<&str> {
        self.content_urls
            .as_ref()
            .and_then(|u| u.desktop.as_ref())
            .map(|d| d.page.as_str())
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(|t| t.source.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_summary() {
        let raw = r#"{
            "type": "standard",
            "title": "Paracetamolo",
            "description": "composto chimico",
            "extract": "Il paracetamolo è un farmaco analgesico e antipiretico.",
            "thumbnail": {"source": "https://upload.wikimedia.org/x.png", "width": 320, "height": 200},
            "content_urls": {"desktop": {"page": "https://it.wikipedia.org/wiki/Paracetamolo"}}
        }"#;

        let summary: PageSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.kind, SummaryKind::Standard);
        assert!(summary.usable_extract().unwrap().starts_with("Il paracetamolo"));
        assert_eq!(
            summary.page_url(),
            Some("https://it.wikipedia.org/wiki/Paracetamolo")
        );
        assert_eq!(
            summary.thumbnail_url(),
            Some("https://upload.wikimedia.org/x.png")
        );
    }

    #[test]
    fn disambiguation_has_no_usable_extract() {
        let raw = r#"{"type":"disambiguation","title":"Aspirina","extract":"Aspirina può riferirsi a:"}"#;

        let summary: PageSummary = serde_json::from_str(raw).unwrap();
        assert!(summary.usable_extract().is_none());
    }

    #[test]
    fn unknown_kind_falls_back_to_other() {
        let raw = r#"{"type":"something_new","title":"X","extract":"  "}"#;

        let summary: PageSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.kind, SummaryKind::Other);
        assert!(summary.usable_extract().is_none());
    }
}
