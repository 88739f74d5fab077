use serde::{Deserialize, Serialize};

/// Characters a list-view summary keeps before the truncation marker.
pub const SUMMARY_MAX_CHARS: usize = 70;

/// Marker appended when a summary was truncated.
pub const SUMMARY_MARKER: &str = "[...]";

/// Post entity - a titled piece of content belonging to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    /// Owning category. `None` only while a post is detached ahead of
    /// deletion or reassignment; a persisted post always has one.
    pub category_id: Option<i32>,
}

/// A post that has not been persisted yet. Ids are assigned by the
/// persistence layer on insert, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category_id: i32,
}

impl Post {
    /// Bounded preview of the body for list views.
    pub fn summary(&self) -> String {
        summarize(&self.body, SUMMARY_MAX_CHARS)
    }
}

/// Truncate `body` to at most `max_chars` characters, appending `[...]`
/// when anything was cut. Counts characters, not bytes, so multi-byte
/// text is never split mid-character.
pub fn summarize(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        None => body.to_owned(),
        Some((cut, _)) => format!("{}{}", &body[..cut], SUMMARY_MARKER),
    }
}
