//! Title / performer segmentation.
//!
//! Video titles end with performer names written entirely in CJK ideographs or
//! kana, e.g. `ABC-123 Some Title 愛花 美月`. Trailing name tokens are peeled off
//! from the end until the first token that is not a name.

use std::sync::LazyLock;

use regex::Regex;

static CATALOG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-\d+\s+").expect("valid catalog prefix regex"));

/// A title split into its text and trailing performer names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSegments {
    pub title: String,
    /// Performer names, left to right as they appear in the title.
    pub performers: Vec<String>,
}

/// Split `full_title` into a clean title and trailing performer names.
#[must_use]
pub fn segment_title(full_title: &str) -> TitleSegments {
    let tokens: Vec<&str> = full_title.split_whitespace().collect();
    let boundary = performer_boundary(&tokens);

    let (head, tail) = tokens.split_at(boundary);
    let joined = head.join(" ");
    let title = CATALOG_PREFIX.replace(&joined, "").trim().to_string();

    TitleSegments {
        title,
        performers: tail.iter().map(|t| (*t).to_string()).collect(),
    }
}

/// Index of the first token in the trailing run of performer tokens.
///
/// Equals `tokens.len()` when the last token is not a performer name.
fn performer_boundary(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .rposition(|t| !is_performer_token(t))
        .map_or(0, |i| i + 1)
}

/// `true` if every character is a CJK ideograph, hiragana or katakana.
#[must_use]
pub fn is_performer_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK unified ideographs
        | '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
    )
}
