//! Local sign-in session
//!
//! There is no real authentication here: "signing in" picks a local profile.
//! The current user is published on a `watch` channel so views can observe
//! changes without reaching for a global.

use log::info;
use tokio::sync::watch;

use super::data::Profile;

/// Who is using the journal right now
pub trait AuthService {
    fn current_user(&self) -> Option<Profile>;

    /// Receiver that is marked changed whenever the user signs in or out
    fn subscribe(&self) -> watch::Receiver<Option<Profile>>;
}

#[derive(Debug)]
pub struct Session {
    user: watch::Sender<Option<Profile>>,
}

impl Session {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self { user }
    }

    pub fn sign_in(&self, profile: Profile) {
        let changed = self.user.send_if_modified(|current| {
            if current.as_ref() == Some(&profile) {
                return false;
            }
            info!("🔑 Signed in as @{}", profile.username);
            *current = Some(profile);
            true
        });
        if !changed {
            log::debug!("Already signed in, nothing to do");
        }
    }

    pub fn sign_out(&self) {
        self.user.send_if_modified(|current| match current.take() {
            Some(previous) => {
                info!("👋 Signed out @{}", previous.username);
                true
            }
            None => false,
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthService for Session {
    fn current_user(&self) -> Option<Profile> {
        self.user.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.user.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::profile;

    #[test]
    fn test_starts_signed_out() {
        let session = Session::new();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_subscriber_sees_sign_in_and_out() {
        let session = Session::new();
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        session.sign_in(profile(1, "mika"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().map(|p| p.id.0), Some(1));

        session.sign_out();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn test_repeat_sign_in_does_not_notify() {
        let session = Session::new();
        session.sign_in(profile(1, "mika"));

        let mut rx = session.subscribe();
        rx.borrow_and_update();
        session.sign_in(profile(1, "mika"));

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_sign_out_when_signed_out_does_not_notify() {
        let session = Session::new();
        let rx = session.subscribe();

        session.sign_out();

        assert!(!rx.has_changed().unwrap());
    }
}
