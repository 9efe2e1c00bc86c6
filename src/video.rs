//! Video identifiers and extracted records.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+-\d+$").expect("valid video code regex"));

/// Rejected video identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("video code `{0}` does not match LETTERS-NUMBERS")]
pub struct InvalidCode(pub String);

/// A catalog-style video code such as `pppe-356`.
///
/// Casing is preserved as provided.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoCode(String);

impl VideoCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidCode> {
        if CODE_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidCode(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata extracted from one rendered video page.
///
/// Missing values serialize as `null` so every record has the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_code: String,
    pub title: Option<String>,
    pub actress: Vec<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub views: Option<String>,
    pub tags: Vec<String>,
    pub text_info: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_hyphen_digits() {
        assert!(VideoCode::parse("pppe-356").is_ok());
        assert!(VideoCode::parse("SSIS-001").is_ok());
        assert!(VideoCode::parse("AbC-9").is_ok());
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in ["", "pppe", "356", "pppe-", "-356", "pppe_356", "pp1e-356", "pppe-356a", "pppe-356 ", "ppp-e-356"] {
            assert_eq!(VideoCode::parse(raw), Err(InvalidCode(raw.to_string())), "{raw:?}");
        }
    }

    #[test]
    fn preserves_casing() {
        assert_eq!(VideoCode::parse("PpPe-356").unwrap().as_str(), "PpPe-356");
    }

    #[test]
    fn record_serializes_camel_case_with_nulls() {
        let record = VideoRecord {
            video_code: "abc-1".to_string(),
            title: None,
            actress: vec![],
            thumbnail: None,
            duration: None,
            views: None,
            tags: vec![],
            text_info: None,
            description: None,
            url: "https://jable.tv/videos/abc-1/".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["videoCode"], "abc-1");
        assert!(json["textInfo"].is_null());
        assert!(json.get("title").is_some());
        assert_eq!(json.as_object().unwrap().len(), 10);
    }
}
