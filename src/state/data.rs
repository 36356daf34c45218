//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the database layer and the UI layer.

use chrono::{DateTime, Utc};
use std::fmt;

/// Database ID of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub i64);

/// Database ID of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single journal entry: one photo with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Unique database ID
    pub id: PostId,
    /// Owner of the post
    pub user_id: UserId,
    /// Display title (file stem on import)
    pub title: String,
    pub description: Option<String>,
    /// Locator for the image. Opaque to everything except the renderer.
    pub media_url: String,
    pub tags: Vec<String>,
    /// Counted from the likes table by every query that returns posts
    pub like_count: u32,
    pub comment_count: u32,
    /// Path to the 256px thumbnail (None if not yet generated)
    pub thumbnail_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Label used in the before/after pickers, e.g. "Week 3 (Mar 4, 2026)"
    pub fn picker_label(&self) -> String {
        format!("{} ({})", self.title, self.created_at.format("%b %-d, %Y"))
    }

    /// Image to show in small cells: the thumbnail if present
    pub fn preview_ref(&self) -> &str {
        self.thumbnail_path.as_deref().unwrap_or(&self.media_url)
    }

    /// "#fitness #week2", empty when untagged
    pub fn tag_line(&self) -> String {
        self.tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A comment under a post, with its author's username joined in
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub media_url: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A journal user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.full_name {
            Some(name) => write!(f, "{} (@{})", name, self.username),
            None => write!(f, "@{}", self.username),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_picker_label_includes_date() {
        let p = post(1, "Morning", 0);
        assert_eq!(p.picker_label(), "Morning (Jan 1, 2026)");
    }

    #[test]
    fn test_preview_prefers_thumbnail() {
        let mut p = post(1, "Morning", 0);
        assert_eq!(p.preview_ref(), "/photos/Morning.jpg");
        p.thumbnail_path = Some("/cache/1.jpg".to_string());
        assert_eq!(p.preview_ref(), "/cache/1.jpg");
    }

    #[test]
    fn test_tag_line() {
        let mut p = post(1, "Morning", 0);
        assert_eq!(p.tag_line(), "");
        p.tags = vec!["fitness".to_string(), "week2".to_string()];
        assert_eq!(p.tag_line(), "#fitness #week2");
    }
}
