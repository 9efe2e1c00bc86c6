//! Video page field extraction.
//!
//! Turns a rendered video page into a [`VideoRecord`]. Every field is
//! extracted independently and tolerates missing markup; a page only fails
//! as a whole when it looks like a not-found page.
//!
//! # Example
//!
//! ```rust
//! use jable_info::extract::extract_video;
//!
//! let html = r#"<html><head><title>ABC-123 Title 愛花 - Jable.tv</title></head>
//!     <body><video poster="https://cdn/p.jpg"></video></body></html>"#;
//! let record = extract_video(html, "abc-123", "https://jable.tv/videos/abc-123/", " - Jable.tv")
//!     .expect("page has a video");
//! assert_eq!(record.title.as_deref(), Some("Title"));
//! assert_eq!(record.actress, vec!["愛花"]);
//! ```

pub mod document;
pub mod segment;

pub use document::{DocumentQuery, HtmlDocument, Rule};
pub use segment::{segment_title, TitleSegments};

use crate::video::VideoRecord;

const VIDEO: Rule = Rule::css("video");
const HEADER_TITLE: Rule = Rule::css(".info-header h4");
const PAGE_TITLE: Rule = Rule::css("title");
const BODY: Rule = Rule::css("body");
const DURATION: Rule = Rule::css(".duration, .video-duration");
const VIEWS: Rule = Rule::css(".views, .view-count");
const TAGS: Rule = Rule::css("h5.tags a");
const TEXT_INFO: Rule = Rule::parent_of(".text-info");
const DESCRIPTION: Rule = Rule::css(".description, .video-description");
const META_DESCRIPTION: Rule = Rule::css(r#"meta[name="description"]"#);

const BULLET: char = '●';

/// Lowercase markers that identify an error page.
const NOT_FOUND_MARKERS: &[&str] = &["404", "not found", "找不到"];

/// Parse `html` and extract a record.
///
/// Returns `None` when the page is a not-found page (see [`is_not_found`]).
#[must_use]
pub fn extract_video(
    html: &str,
    video_code: &str,
    url: &str,
    title_suffix: &str,
) -> Option<VideoRecord> {
    let doc = HtmlDocument::parse(html);
    extract_from(&doc, video_code, url, title_suffix)
}

/// Extract a record from an already-queryable document.
pub fn extract_from<D: DocumentQuery + ?Sized>(
    doc: &D,
    video_code: &str,
    url: &str,
    title_suffix: &str,
) -> Option<VideoRecord> {
    let full_title = full_title(doc, title_suffix);

    if is_not_found(doc, full_title.as_deref()) {
        tracing::debug!(video_code, "Page has no video and looks like a not-found page");
        return None;
    }

    let (title, actress) = match full_title {
        Some(full) => {
            let TitleSegments { title, performers } = segment_title(&full);
            (Some(title), performers)
        }
        None => (None, Vec::new()),
    };

    Some(VideoRecord {
        video_code: video_code.to_string(),
        title,
        actress,
        thumbnail: doc.attr(VIDEO, "poster").and_then(non_empty),
        duration: doc.text(DURATION).and_then(non_empty),
        views: doc.text(VIEWS).and_then(non_empty),
        tags: doc.texts(TAGS).into_iter().filter_map(non_empty).collect(),
        text_info: doc
            .text(TEXT_INFO)
            .and_then(|t| non_empty(t.replace(BULLET, "").trim().to_string())),
        description: doc
            .text(DESCRIPTION)
            .and_then(non_empty)
            .or_else(|| doc.attr(META_DESCRIPTION, "content").and_then(non_empty)),
        url: url.to_string(),
    })
}

/// Composite title: the info header, else `<title>` without the site suffix.
fn full_title<D: DocumentQuery + ?Sized>(doc: &D, title_suffix: &str) -> Option<String> {
    doc.text(HEADER_TITLE).and_then(non_empty).or_else(|| {
        doc.text(PAGE_TITLE).and_then(|t| {
            let stripped = if title_suffix.is_empty() {
                t.as_str()
            } else {
                t.strip_suffix(title_suffix).unwrap_or(&t)
            };
            non_empty(stripped.trim().to_string())
        })
    })
}

/// A page is not found when it has no video evidence (no `<video>` and no
/// info header) and either carries a not-found marker in its title or body,
/// or yields no title at all.
pub fn is_not_found<D: DocumentQuery + ?Sized>(doc: &D, full_title: Option<&str>) -> bool {
    if doc.exists(VIDEO) || doc.exists(HEADER_TITLE) {
        return false;
    }
    if full_title.is_none() {
        return true;
    }

    let has_marker = |text: Option<String>| {
        text.is_some_and(|t| {
            let lower = t.to_lowercase();
            NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m))
        })
    };
    has_marker(doc.text(PAGE_TITLE)) || has_marker(doc.text(BODY))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
