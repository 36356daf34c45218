//! A single post with its like button and comments
//!
//! Liking and commenting change the page at once and are written to the
//! catalog in the background. When the write fails the page goes back to
//! what it showed before.

use chrono::{DateTime, Utc};
use log::{error, warn};
use std::fmt::Display;

use crate::state::data::{Comment, Post, PostId};

#[derive(Debug)]
pub struct PostDetail {
    post: Post,
    liked: bool,
    /// Like state and count from before the toggle in flight
    like_rollback: Option<(bool, u32)>,
    /// `None` until the first load finishes
    comments: Option<Vec<Comment>>,
    load_failed: bool,
    draft: String,
    /// Text of the comment being saved, shown above the list meanwhile
    pending_comment: Option<String>,
    description_draft: String,
}

impl PostDetail {
    pub fn new(post: Post) -> Self {
        let description_draft = post.description.clone().unwrap_or_default();
        Self {
            post,
            liked: false,
            like_rollback: None,
            comments: None,
            load_failed: false,
            draft: String::new(),
            pending_comment: None,
            description_draft,
        }
    }

    pub fn id(&self) -> PostId {
        self.post.id
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Whether the signed-in user likes the post
    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn like_count(&self) -> u32 {
        self.post.like_count
    }

    pub fn like_pending(&self) -> bool {
        self.like_rollback.is_some()
    }

    /// Apply the user's like state and comments once they are fetched
    pub fn loaded<E: Display>(&mut self, result: Result<(bool, Vec<Comment>), E>) {
        match result {
            Ok((liked, comments)) => {
                // A toggle in flight already knows better
                if self.like_rollback.is_none() {
                    self.liked = liked;
                }
                self.post.comment_count = comments.len() as u32;
                self.comments = Some(comments);
                self.load_failed = false;
            }
            Err(e) => {
                error!("Error loading comments for post {}: {}", self.post.id, e);
                self.comments = Some(Vec::new());
                self.load_failed = true;
            }
        }
    }

    pub fn comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Includes a comment that is still being saved
    pub fn comment_count(&self) -> u32 {
        self.post.comment_count + u32::from(self.pending_comment.is_some())
    }

    /// Flip the like on the page. Returns false, changing nothing, while a
    /// previous toggle is still being saved.
    pub fn toggle_like(&mut self) -> bool {
        if self.like_pending() {
            return false;
        }

        self.like_rollback = Some((self.liked, self.post.like_count));
        self.liked = !self.liked;
        self.post.like_count = if self.liked {
            self.post.like_count + 1
        } else {
            self.post.like_count.saturating_sub(1)
        };
        true
    }

    /// Settle the toggle in flight. On failure the previous state comes back.
    pub fn like_saved<E: Display>(&mut self, result: Result<bool, E>) {
        let Some((was_liked, was_count)) = self.like_rollback.take() else {
            return;
        };

        match result {
            Ok(liked) if liked == self.liked => {}
            Ok(liked) => {
                // The catalog disagreed with the page: it already had the
                // state we toggled away from
                self.liked = liked;
                self.post.like_count = was_count;
            }
            Err(e) => {
                warn!("⚠️  Could not save like on post {}: {}", self.post.id, e);
                self.liked = was_liked;
                self.post.like_count = was_count;
            }
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: String) {
        self.draft = draft;
    }

    pub fn can_submit(&self) -> bool {
        self.pending_comment.is_none() && !self.draft.trim().is_empty()
    }

    /// Show the draft as posted and clear the input.
    /// Returns the text to save, or `None` if there is nothing to submit.
    pub fn submit_comment(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let content = self.draft.trim().to_string();
        self.draft.clear();
        self.pending_comment = Some(content.clone());
        Some(content)
    }

    pub fn pending_comment(&self) -> Option<&str> {
        self.pending_comment.as_deref()
    }

    /// Settle the comment in flight. On failure the text goes back into the
    /// input unless something new was typed meanwhile.
    pub fn comment_saved<E: Display>(&mut self, result: Result<Comment, E>) {
        let Some(content) = self.pending_comment.take() else {
            return;
        };

        match result {
            Ok(comment) => {
                let comments = self.comments.get_or_insert_with(Vec::new);
                // A load that finished meanwhile may already list it
                if !comments.iter().any(|c| c.id == comment.id) {
                    comments.insert(0, comment);
                    self.post.comment_count += 1;
                }
            }
            Err(e) => {
                warn!("⚠️  Could not save comment on post {}: {}", self.post.id, e);
                if self.draft.trim().is_empty() {
                    self.draft = content;
                }
            }
        }
    }

    pub fn description_draft(&self) -> &str {
        &self.description_draft
    }

    pub fn set_description_draft(&mut self, draft: String) {
        self.description_draft = draft;
    }

    /// True when the draft differs from the saved description
    pub fn description_changed(&self) -> bool {
        self.description_draft.trim() != self.post.description.as_deref().unwrap_or("")
    }

    pub fn description_saved<E: Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => {
                let saved = self.description_draft.trim();
                self.post.description = (!saved.is_empty()).then(|| saved.to_string());
                self.description_draft = saved.to_string();
            }
            Err(e) => error!("Error saving description for post {}: {}", self.post.id, e),
        }
    }
}

/// "just now", "5 minutes ago", "1 day ago", ...
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes == 0 {
        "just now".to_string()
    } else if hours == 0 {
        ago(minutes, "minute")
    } else if days == 0 {
        ago(hours, "hour")
    } else if days < 30 {
        ago(days, "day")
    } else if days < 365 {
        ago(days / 30, "month")
    } else {
        ago(days / 365, "year")
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::post;
    use crate::state::data::CommentId;
    use chrono::Duration;

    fn comment(id: i64, content: &str) -> Comment {
        Comment {
            id: CommentId(id),
            username: "mika".to_string(),
            content: content.to_string(),
            created_at: post(0, "x", 3).created_at,
        }
    }

    fn detail() -> PostDetail {
        let mut p = post(1, "Morning", 0);
        p.like_count = 4;
        p.comment_count = 1;
        PostDetail::new(p)
    }

    #[test]
    fn test_load_sets_like_state_and_comments() {
        let mut detail = detail();
        assert!(detail.comments().is_none());

        detail.loaded::<String>(Ok((true, vec![comment(1, "nice"), comment(2, "wow")])));

        assert!(detail.liked());
        assert_eq!(detail.comments().map(|c| c.len()), Some(2));
        assert_eq!(detail.comment_count(), 2);
    }

    #[test]
    fn test_failed_load_shows_empty_list() {
        let mut detail = detail();

        detail.loaded(Err("locked"));

        assert!(detail.load_failed());
        assert_eq!(detail.comments(), Some(&[][..]));
    }

    #[test]
    fn test_like_is_shown_before_it_is_saved() {
        let mut detail = detail();

        assert!(detail.toggle_like());
        assert!(detail.liked());
        assert_eq!(detail.like_count(), 5);

        // a second click waits for the first
        assert!(!detail.toggle_like());
        assert_eq!(detail.like_count(), 5);

        detail.like_saved::<String>(Ok(true));
        assert!(!detail.like_pending());
        assert_eq!(detail.like_count(), 5);
    }

    #[test]
    fn test_failed_like_reverts() {
        let mut detail = detail();
        detail.toggle_like();

        detail.like_saved(Err("disk full"));

        assert!(!detail.liked());
        assert_eq!(detail.like_count(), 4);
        assert!(!detail.like_pending());
    }

    #[test]
    fn test_unlike_never_goes_below_zero() {
        let mut detail = PostDetail::new(post(1, "Morning", 0));
        detail.loaded::<String>(Ok((true, Vec::new())));

        detail.toggle_like();

        assert!(!detail.liked());
        assert_eq!(detail.like_count(), 0);
    }

    #[test]
    fn test_catalog_disagreement_wins() {
        let mut detail = detail();
        detail.toggle_like();

        // the catalog already had a like, so the toggle removed it
        detail.like_saved::<String>(Ok(false));

        assert!(!detail.liked());
        assert_eq!(detail.like_count(), 4);
    }

    #[test]
    fn test_comment_is_shown_while_saving() {
        let mut detail = detail();
        detail.loaded::<String>(Ok((false, vec![comment(1, "first")])));
        detail.set_draft("  looking strong ".to_string());

        assert_eq!(detail.submit_comment().as_deref(), Some("looking strong"));
        assert_eq!(detail.draft(), "");
        assert_eq!(detail.pending_comment(), Some("looking strong"));
        assert_eq!(detail.comment_count(), 2);
        assert!(detail.submit_comment().is_none());

        detail.comment_saved::<String>(Ok(comment(2, "looking strong")));

        assert!(detail.pending_comment().is_none());
        assert_eq!(detail.comment_count(), 2);
        let contents: Vec<_> = detail.comments().unwrap().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["looking strong", "first"]);
    }

    #[test]
    fn test_saved_comment_already_loaded_is_not_doubled() {
        let mut detail = detail();
        detail.set_draft("hello".to_string());
        detail.submit_comment();
        detail.loaded::<String>(Ok((false, vec![comment(7, "hello"), comment(1, "first")])));

        detail.comment_saved::<String>(Ok(comment(7, "hello")));

        assert_eq!(detail.comments().map(|c| c.len()), Some(2));
        assert_eq!(detail.comment_count(), 2);
    }

    #[test]
    fn test_failed_comment_returns_to_the_input() {
        let mut detail = detail();
        detail.set_draft("hello".to_string());
        detail.submit_comment();

        detail.comment_saved(Err("read-only"));

        assert_eq!(detail.draft(), "hello");
        assert_eq!(detail.comment_count(), 1);
        assert!(detail.can_submit());
    }

    #[test]
    fn test_failed_comment_keeps_newer_typing() {
        let mut detail = detail();
        detail.set_draft("hello".to_string());
        detail.submit_comment();
        detail.set_draft("second thought".to_string());

        detail.comment_saved(Err("read-only"));

        assert_eq!(detail.draft(), "second thought");
    }

    #[test]
    fn test_blank_draft_cannot_be_submitted() {
        let mut detail = detail();
        detail.set_draft("   ".to_string());

        assert!(!detail.can_submit());
        assert!(detail.submit_comment().is_none());
    }

    #[test]
    fn test_description_edit() {
        let mut detail = detail();
        assert!(!detail.description_changed());

        detail.set_description_draft(" Week one ".to_string());
        assert!(detail.description_changed());
        detail.description_saved::<String>(Ok(()));

        assert_eq!(detail.post().description.as_deref(), Some("Week one"));
        assert!(!detail.description_changed());

        detail.set_description_draft(String::new());
        detail.description_saved::<String>(Ok(()));
        assert_eq!(detail.post().description, None);
    }

    #[test]
    fn test_time_ago() {
        let now = post(0, "now", 400).created_at;
        let cases = [
            (Duration::seconds(20), "just now"),
            (Duration::minutes(1), "1 minute ago"),
            (Duration::minutes(59), "59 minutes ago"),
            (Duration::hours(3), "3 hours ago"),
            (Duration::days(1), "1 day ago"),
            (Duration::days(45), "1 month ago"),
            (Duration::days(400), "1 year ago"),
            (Duration::days(-2), "just now"),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(time_ago(now - elapsed, now), expected, "{:?}", elapsed);
        }
    }
}
