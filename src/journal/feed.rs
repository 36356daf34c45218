//! The post feed: text search, a tag filter and sort order over the catalog

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use crate::state::data::Post;

/// How many tags the filter bar offers
pub const POPULAR_TAGS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
    MostLiked,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Latest, SortOrder::Oldest, SortOrder::MostLiked];
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortOrder::Latest => "Latest",
            SortOrder::Oldest => "Oldest",
            SortOrder::MostLiked => "Most liked",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    tag: Option<String>,
    search: String,
    sort: SortOrder,
}

impl FeedFilter {
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Filter by `tag`; picking the active tag again clears it
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.tag.as_deref() == Some(tag) {
            self.tag = None;
        } else {
            self.tag = Some(tag.to_string());
        }
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Drop the tag and search text, keep the sort order
    pub fn clear(&mut self) {
        self.tag = None;
        self.search.clear();
    }

    /// True when something hides posts
    pub fn is_active(&self) -> bool {
        self.tag.is_some() || !self.search.trim().is_empty()
    }

    /// Case-insensitive match on title, description and tags
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(tag) = &self.tag {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        post.title.to_lowercase().contains(&needle)
            || post
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || post.tags.iter().any(|t| t.contains(&needle))
    }

    /// Matching posts in the chosen order
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        let mut shown: Vec<&Post> = posts.iter().filter(|post| self.matches(post)).collect();
        match self.sort {
            SortOrder::Latest => shown.sort_by_key(|p| Reverse((p.created_at, p.id))),
            SortOrder::Oldest => shown.sort_by_key(|p| (p.created_at, p.id)),
            SortOrder::MostLiked => {
                shown.sort_by_key(|p| Reverse((p.like_count, p.created_at, p.id)))
            }
        }
        shown
    }
}

/// Most used tags first, ties alphabetical
pub fn popular_tags(posts: &[Post], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|post| &post.tags) {
        *counts.entry(tag.as_str()).or_insert(0) += 1;
    }

    let mut tags: Vec<(&str, usize)> = counts.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    tags.into_iter().take(limit).map(|(tag, _)| tag.to_string()).collect()
}
