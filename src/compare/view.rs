//! Before/after comparison page state machine
//!
//! ```text
//! Unauthenticated --user--> Loading --catalog--> Ready | InsufficientItems
//!        ^                     ^                             |
//!        +------ sign out -----+------ user change / reset --+
//! ```
//!
//! Nothing leaves `Ready` except a full reset. Selecting posts and dragging
//! the divider mutate the view without changing its state.

use log::{debug, error, info};
use std::fmt::Display;

use super::gap::format_gap;
use super::reveal::{RevealController, RevealLayout};
use super::selection::SelectionState;
use crate::error::Result;
use crate::state::data::{Post, PostId, Profile, UserId};
use crate::state::library::PostSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Loading,
    /// Fewer than two posts, or the catalog could not be fetched
    InsufficientItems,
    Ready,
}

/// Identifies one catalog request. Only the latest ticket's result is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub user: UserId,
    generation: u64,
}

/// Derived display data for a complete selection
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    pub before: &'a Post,
    pub after: &'a Post,
    pub layout: RevealLayout,
    /// e.g. "3 weeks"
    pub gap: String,
}

#[derive(Debug)]
pub struct ComparisonView {
    user: Option<Profile>,
    state: ViewState,
    selection: SelectionState,
    reveal: RevealController,
    generation: u64,
    latest: Option<LoadTicket>,
    fetch_failed: bool,
}

impl ComparisonView {
    /// Build the view for whoever is signed in. Returns the catalog request
    /// to run when there is a user.
    pub fn new(user: Option<Profile>) -> (Self, Option<LoadTicket>) {
        let mut view = Self {
            user: None,
            state: ViewState::Unauthenticated,
            selection: SelectionState::new(),
            reveal: RevealController::new(),
            generation: 0,
            latest: None,
            fetch_failed: false,
        };
        let ticket = view.user_changed(user);
        (view, ticket)
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    /// True when the last catalog request failed and nothing could be shown
    pub fn fetch_failed(&self) -> bool {
        self.fetch_failed
    }

    /// React to a sign-in, sign-out or account switch.
    ///
    /// A different user is a full reset: a new selection session and a new
    /// catalog request. The same user again is a no-op.
    pub fn user_changed(&mut self, user: Option<Profile>) -> Option<LoadTicket> {
        let same_user = match (&self.user, &user) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        if same_user {
            return None;
        }

        self.user = user;
        self.reset()
    }

    /// Re-fetch the catalog, e.g. after an import.
    ///
    /// In `Ready` this happens in the background and keeps the selection.
    /// Anywhere else it is a full reset.
    pub fn refresh(&mut self) -> Option<LoadTicket> {
        match (self.state, &self.user) {
            (ViewState::Ready, Some(user)) => {
                let user = user.id;
                Some(self.issue_ticket(user))
            }
            _ => self.reset(),
        }
    }

    /// Apply the result of a catalog request.
    ///
    /// Results for any but the latest ticket are dropped.
    pub fn catalog_loaded<E: Display>(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Vec<Post>, E>,
    ) {
        if self.latest != Some(ticket) {
            debug!("Dropping superseded catalog for user {}", ticket.user);
            return;
        }
        self.latest = None;

        match result {
            Ok(posts) => {
                self.fetch_failed = false;
                if self.state == ViewState::Ready {
                    self.selection.replace_catalog(posts);
                    return;
                }

                self.selection.initialize(posts);
                self.state = if self.selection.catalog().len() >= 2 {
                    ViewState::Ready
                } else {
                    ViewState::InsufficientItems
                };
                info!(
                    "🖼️  Comparison loaded {} posts for user {}",
                    self.selection.catalog().len(),
                    ticket.user
                );
            }
            Err(e) => {
                error!("Error fetching posts for user {}: {}", ticket.user, e);
                if self.state != ViewState::Ready {
                    self.fetch_failed = true;
                    self.selection = SelectionState::new();
                    self.state = ViewState::InsufficientItems;
                }
            }
        }
    }

    pub fn select_before(&mut self, id: PostId) {
        if self.state == ViewState::Ready {
            self.selection.set_before(id);
        }
    }

    pub fn select_after(&mut self, id: PostId) {
        if self.state == ViewState::Ready {
            self.selection.set_after(id);
        }
    }

    pub fn set_reveal(&mut self, position: f32) {
        if self.state == ViewState::Ready {
            self.reveal.set_position(position);
        }
    }

    /// Display data when both posts are chosen and the view is ready
    pub fn comparison(&self) -> Option<Comparison<'_>> {
        if self.state != ViewState::Ready || !self.selection.is_complete() {
            return None;
        }

        let before = self.selection.before()?;
        let after = self.selection.after()?;
        Some(Comparison {
            before,
            after,
            layout: self.reveal.layout(),
            gap: format_gap(before.created_at, after.created_at),
        })
    }

    fn reset(&mut self) -> Option<LoadTicket> {
        self.selection = SelectionState::new();
        self.fetch_failed = false;

        match &self.user {
            Some(user) => {
                let user = user.id;
                self.state = ViewState::Loading;
                Some(self.issue_ticket(user))
            }
            None => {
                self.state = ViewState::Unauthenticated;
                self.latest = None;
                None
            }
        }
    }

    fn issue_ticket(&mut self, user: UserId) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            user,
            generation: self.generation,
        };
        self.latest = Some(ticket);
        ticket
    }
}

/// Run a catalog request against a post source
pub fn fetch_catalog(source: &impl PostSource, ticket: LoadTicket) -> Result<Vec<Post>> {
    source.list_posts_for_user(ticket.user)
}
