//! Which two posts are being compared

use log::debug;

use crate::state::data::{Post, PostId};

/// The current catalog plus the chosen "before" and "after" posts.
///
/// Slots hold copies of posts, not indices. If the catalog is replaced and a
/// chosen post is no longer in it, that slot reads as empty.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    catalog: Vec<Post>,
    before: Option<Post>,
    after: Option<Post>,
    initialized: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the first catalog of the session and pick defaults:
    /// after = newest, before = second newest. Fewer than two posts leaves
    /// both slots empty.
    ///
    /// Only the first call seeds. Later calls just replace the catalog.
    pub fn initialize(&mut self, catalog: Vec<Post>) {
        if self.initialized {
            self.replace_catalog(catalog);
            return;
        }
        self.initialized = true;

        if let [newest, second, ..] = catalog.as_slice() {
            self.after = Some(newest.clone());
            self.before = Some(second.clone());
        }
        self.catalog = catalog;
    }

    /// Swap in a fresh catalog without touching the chosen slots
    pub fn replace_catalog(&mut self, catalog: Vec<Post>) {
        self.catalog = catalog;
    }

    /// Returns false (and changes nothing) if `id` is not in the catalog
    pub fn set_before(&mut self, id: PostId) -> bool {
        match self.find(id) {
            Some(post) => {
                self.before = Some(post);
                true
            }
            None => {
                debug!("Ignoring unknown before post {}", id);
                false
            }
        }
    }

    /// Returns false (and changes nothing) if `id` is not in the catalog
    pub fn set_after(&mut self, id: PostId) -> bool {
        match self.find(id) {
            Some(post) => {
                self.after = Some(post);
                true
            }
            None => {
                debug!("Ignoring unknown after post {}", id);
                false
            }
        }
    }

    pub fn before(&self) -> Option<&Post> {
        self.resolve(self.before.as_ref())
    }

    pub fn after(&self) -> Option<&Post> {
        self.resolve(self.after.as_ref())
    }

    pub fn is_complete(&self) -> bool {
        self.before().is_some() && self.after().is_some()
    }

    pub fn catalog(&self) -> &[Post] {
        &self.catalog
    }

    fn find(&self, id: PostId) -> Option<Post> {
        self.catalog.iter().find(|post| post.id == id).cloned()
    }

    fn resolve<'a>(&'a self, slot: Option<&'a Post>) -> Option<&'a Post> {
        slot.filter(|chosen| self.catalog.iter().any(|post| post.id == chosen.id))
    }
}
