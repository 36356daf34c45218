use env_logger::Env;
use iced::widget::{button, column, container, horizontal_space, pick_list, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use log::{error, info, warn};
use rfd::FileDialog;
use std::path::PathBuf;
use tokio::sync::watch;

mod compare;
mod config;
mod error;
mod journal;
mod media;
mod state;
mod ui;

use compare::view::fetch_catalog;
use compare::{ComparisonView, LoadTicket, ViewState};
use config::AppConfig;
use journal::calendar::MonthCursor;
use journal::detail::PostDetail;
use journal::feed::{FeedFilter, SortOrder};
use journal::stats::Timeframe;
use media::import::{import_folder, ImportResult};
use state::data::{Comment, Post, PostId, Profile, UserId};
use state::library::Library;
use state::session::{AuthService, Session};
use ui::compare::PostChoice;

/// Top-level pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Feed,
    Compare,
    Calendar,
    Stats,
}

/// Main application state
struct Journal {
    config: AppConfig,
    /// The catalog database
    library: state::library::Library,
    /// Who is signed in
    session: Session,
    /// Marked changed on every sign in / sign out
    user_events: watch::Receiver<Option<Profile>>,
    /// Before/after page, also owns the signed-in user's catalog
    compare: ComparisonView,
    /// Open post, shown over the feed or calendar
    detail: Option<PostDetail>,
    feed: FeedFilter,
    tab: Tab,
    month: MonthCursor,
    timeframe: Timeframe,
    /// Sign-in text field
    username: String,
    profiles: Vec<Profile>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    UsernameChanged(String),
    SignIn,
    ProfilePicked(Profile),
    SignOut,
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// Background import completed with results
    ImportComplete(Result<ImportResult, String>),
    /// Background catalog fetch finished
    CatalogLoaded(LoadTicket, Result<Vec<Post>, String>),
    BeforePicked(PostChoice),
    AfterPicked(PostChoice),
    /// Slider or divider drag, in percent of the image width
    RevealMoved(f32),
    PrevMonth,
    NextMonth,
    TimeframePicked(Timeframe),
    FeedSearchChanged(String),
    FeedTagToggled(String),
    FeedSortPicked(SortOrder),
    ClearFeedFilters,
    OpenPost(PostId),
    ClosePost,
    /// Like state and comments for the open post
    PostLoaded(PostId, Result<(bool, Vec<Comment>), String>),
    ToggleLike,
    LikeSaved(PostId, Result<bool, String>),
    CommentDraftChanged(String),
    SubmitComment,
    CommentSaved(PostId, Result<Comment, String>),
    DescriptionDraftChanged(String),
    SaveDescription,
    DescriptionSaved(PostId, Result<(), String>),
}

impl Journal {
    /// Create a new instance of the application
    fn new(config: AppConfig, library: Library) -> (Self, Task<Message>) {
        let session = Session::new();
        let mut status = "Sign in to start your journal.".to_string();

        if let Some(username) = &config.default_user {
            match library.find_or_create_profile(username) {
                Ok(profile) => session.sign_in(profile),
                Err(e) => {
                    warn!("Could not sign in default user @{}: {}", username, e);
                    status = format!("Could not sign in @{}.", username);
                }
            }
        }

        let profiles = library.profiles().unwrap_or_else(|e| {
            error!("Error listing profiles: {}", e);
            Vec::new()
        });

        if let Some(user) = session.current_user() {
            let count = library.post_count(user.id).unwrap_or_else(|e| {
                error!("Error counting posts for @{}: {}", user.username, e);
                0
            });
            info!("🎨 Journal initialized for @{} with {} posts", user.username, count);
            status = format!("Ready. {} posts in your journal.", count);
        }

        // Subscribe after the startup sign-in so it is not replayed
        let user_events = session.subscribe();
        let (compare, ticket) = ComparisonView::new(session.current_user());

        let mut journal = Journal {
            month: MonthCursor::containing(chrono::Local::now().date_naive()),
            config,
            library,
            session,
            user_events,
            compare,
            detail: None,
            feed: FeedFilter::default(),
            tab: Tab::Feed,
            timeframe: Timeframe::default(),
            username: String::new(),
            profiles,
            status,
        };

        let task = match ticket {
            Some(ticket) => journal.load_catalog(ticket),
            None => Task::none(),
        };
        (journal, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        // Session changes from this message reach the views here
        let user_task = self.sync_user();
        Task::batch([task, user_task])
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                self.detail = None;
                Task::none()
            }
            Message::UsernameChanged(username) => {
                self.username = username;
                Task::none()
            }
            Message::SignIn => {
                let username = self.username.trim().to_string();
                if username.is_empty() {
                    return Task::none();
                }
                match self.library.find_or_create_profile(&username) {
                    Ok(profile) => {
                        self.status = format!("Signed in as @{}.", profile.username);
                        self.session.sign_in(profile);
                        self.username.clear();
                        self.reload_profiles();
                    }
                    Err(e) => {
                        error!("Error signing in @{}: {}", username, e);
                        self.status = format!("Could not sign in @{}.", username);
                    }
                }
                Task::none()
            }
            Message::ProfilePicked(profile) => {
                self.status = format!("Signed in as @{}.", profile.username);
                self.session.sign_in(profile);
                Task::none()
            }
            Message::SignOut => {
                self.session.sign_out();
                self.status = "Signed out.".to_string();
                Task::none()
            }
            Message::ImportFolder => {
                let Some(user) = self.session.current_user() else {
                    self.status = "Sign in before importing photos.".to_string();
                    return Task::none();
                };

                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    // Update status to show we're importing
                    self.status = format!("Importing from {}...", folder_path.display());

                    // Get the database path for the background thread
                    let db_path = self.library.path().clone();

                    // Launch async import task
                    return Task::perform(
                        import_folder_async(folder_path, db_path, user.id, self.config.clone()),
                        Message::ImportComplete,
                    );
                }

                Task::none()
            }
            Message::ImportComplete(Ok(result)) => {
                self.status = format!(
                    "✅ Import complete! Added {} photos, skipped {} duplicates, {} failed.",
                    result.imported_count, result.skipped_count, result.failed_count
                );

                self.refresh_catalog()
            }
            Message::ImportComplete(Err(e)) => {
                error!("Import failed: {}", e);
                self.status = "Import failed, see the log for details.".to_string();
                // Posts added before the failure should still show up
                self.refresh_catalog()
            }
            Message::CatalogLoaded(ticket, result) => {
                self.compare.catalog_loaded(ticket, result);
                Task::none()
            }
            Message::BeforePicked(choice) => {
                self.compare.select_before(choice.id);
                Task::none()
            }
            Message::AfterPicked(choice) => {
                self.compare.select_after(choice.id);
                Task::none()
            }
            Message::RevealMoved(position) => {
                self.compare.set_reveal(position);
                Task::none()
            }
            Message::PrevMonth => {
                self.month = self.month.prev();
                Task::none()
            }
            Message::NextMonth => {
                self.month = self.month.next();
                Task::none()
            }
            Message::TimeframePicked(timeframe) => {
                self.timeframe = timeframe;
                Task::none()
            }
            Message::FeedSearchChanged(search) => {
                self.feed.set_search(search);
                Task::none()
            }
            Message::FeedTagToggled(tag) => {
                self.feed.toggle_tag(&tag);
                Task::none()
            }
            Message::FeedSortPicked(sort) => {
                self.feed.set_sort(sort);
                Task::none()
            }
            Message::ClearFeedFilters => {
                self.feed.clear();
                Task::none()
            }
            Message::OpenPost(id) => {
                let Some(user) = self.session.current_user() else {
                    return Task::none();
                };
                let Some(post) = self.compare.selection().catalog().iter().find(|p| p.id == id) else {
                    log::debug!("Post {} is not in the catalog", id);
                    return Task::none();
                };

                self.detail = Some(PostDetail::new(post.clone()));
                let db_path = self.library.path().clone();
                Task::perform(
                    with_library(db_path, move |library| {
                        Ok((library.is_liked(id, user.id)?, library.comments_for_post(id)?))
                    }),
                    move |result| Message::PostLoaded(id, result),
                )
            }
            Message::ClosePost => {
                self.detail = None;
                Task::none()
            }
            Message::PostLoaded(id, result) => {
                if let Some(detail) = self.open_post(id) {
                    detail.loaded(result);
                }
                Task::none()
            }
            Message::ToggleLike => {
                let Some(user) = self.session.current_user() else {
                    return Task::none();
                };
                let Some(detail) = self.detail.as_mut() else {
                    return Task::none();
                };
                if !detail.toggle_like() {
                    return Task::none();
                }

                let id = detail.id();
                let db_path = self.library.path().clone();
                Task::perform(
                    with_library(db_path, move |library| library.toggle_like(id, user.id)),
                    move |result| Message::LikeSaved(id, result),
                )
            }
            Message::LikeSaved(id, result) => {
                let saved = result.is_ok();
                if let Some(detail) = self.open_post(id) {
                    detail.like_saved(result);
                }
                self.after_post_write(saved, "Could not update like.")
            }
            Message::CommentDraftChanged(draft) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.set_draft(draft);
                }
                Task::none()
            }
            Message::SubmitComment => {
                let Some(user) = self.session.current_user() else {
                    return Task::none();
                };
                let Some(detail) = self.detail.as_mut() else {
                    return Task::none();
                };
                let Some(content) = detail.submit_comment() else {
                    return Task::none();
                };

                let id = detail.id();
                let db_path = self.library.path().clone();
                Task::perform(
                    with_library(db_path, move |library| library.add_comment(id, user.id, &content)),
                    move |result| Message::CommentSaved(id, result),
                )
            }
            Message::CommentSaved(id, result) => {
                let saved = result.is_ok();
                if let Some(detail) = self.open_post(id) {
                    detail.comment_saved(result);
                }
                self.after_post_write(saved, "Could not add comment.")
            }
            Message::DescriptionDraftChanged(draft) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.set_description_draft(draft);
                }
                Task::none()
            }
            Message::SaveDescription => {
                let Some(detail) = self.detail.as_ref() else {
                    return Task::none();
                };
                if !detail.description_changed() {
                    return Task::none();
                }

                let id = detail.id();
                let description = detail.description_draft().to_string();
                let db_path = self.library.path().clone();
                Task::perform(
                    with_library(db_path, move |library| library.set_description(id, &description)),
                    move |result| Message::DescriptionSaved(id, result),
                )
            }
            Message::DescriptionSaved(id, result) => {
                let saved = result.is_ok();
                if let Some(detail) = self.open_post(id) {
                    detail.description_saved(result);
                }
                self.after_post_write(saved, "Could not save description.")
            }
        }
    }

    /// The open post, if it is `id`
    fn open_post(&mut self, id: PostId) -> Option<&mut PostDetail> {
        self.detail.as_mut().filter(|detail| detail.id() == id)
    }

    /// Counts changed in the catalog: reload it so the other pages agree
    fn after_post_write(&mut self, saved: bool, failure: &str) -> Task<Message> {
        if saved {
            self.refresh_catalog()
        } else {
            self.status = failure.to_string();
            Task::none()
        }
    }

    fn refresh_catalog(&mut self) -> Task<Message> {
        match self.compare.refresh() {
            Some(ticket) => self.load_catalog(ticket),
            None => Task::none(),
        }
    }

    /// Forward a sign in / sign out to the comparison view
    fn sync_user(&mut self) -> Task<Message> {
        if !self.user_events.has_changed().unwrap_or(false) {
            return Task::none();
        }

        let user = self.user_events.borrow_and_update().clone();
        self.detail = None;
        self.feed = FeedFilter::default();
        match self.compare.user_changed(user) {
            Some(ticket) => self.load_catalog(ticket),
            None => Task::none(),
        }
    }

    fn load_catalog(&self, ticket: LoadTicket) -> Task<Message> {
        let db_path = self.library.path().clone();
        Task::perform(load_catalog_async(db_path, ticket), move |result| {
            Message::CatalogLoaded(ticket, result)
        })
    }

    fn reload_profiles(&mut self) {
        match self.library.profiles() {
            Ok(profiles) => self.profiles = profiles,
            Err(e) => error!("Error listing profiles: {}", e),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let tab_button = |label, tab| {
            let tab_button = button(text(label)).padding([6, 14]);
            if self.tab == tab {
                tab_button
            } else {
                tab_button
                    .on_press(Message::TabSelected(tab))
                    .style(button::secondary)
            }
        };

        let account: Element<Message> = match self.compare.user() {
            Some(user) => row![
                text(user.to_string()),
                button("Import Folder").on_press(Message::ImportFolder).padding(8),
                button("Sign out").on_press(Message::SignOut).padding(8).style(button::secondary),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into(),
            None => row![
                pick_list(self.profiles.as_slice(), None::<Profile>, Message::ProfilePicked)
                    .placeholder("Pick a profile"),
                text_input("or new username", &self.username)
                    .on_input(Message::UsernameChanged)
                    .on_submit(Message::SignIn)
                    .width(Length::Fixed(180.0)),
                button("Sign in").on_press(Message::SignIn).padding(8),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into(),
        };

        let top_bar = row![
            tab_button("Journal", Tab::Feed),
            tab_button("Compare", Tab::Compare),
            tab_button("Calendar", Tab::Calendar),
            tab_button("Stats", Tab::Stats),
            horizontal_space(),
            account,
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let posts = self.compare.selection().catalog();
        let loading = self.compare.state() == ViewState::Loading;
        let page: Element<Message> = match (self.tab, self.compare.user(), self.detail.as_ref()) {
            (Tab::Compare, _, _) => ui::compare::view(&self.compare),
            (_, None, _) => text("Please sign in to see your journal.").into(),
            (Tab::Feed | Tab::Calendar, Some(user), Some(detail)) => ui::post::view(detail, user),
            (Tab::Feed, Some(_), None) => ui::feed::view(posts, &self.feed, loading),
            (Tab::Calendar, Some(_), None) => ui::calendar::view(self.month, posts),
            (Tab::Stats, Some(_), _) => ui::stats::view(posts, self.timeframe),
        };

        let content = column![
            top_bar,
            scrollable(container(page).padding([0, 8])).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(20)
        .padding(24);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_warning) = AppConfig::load();

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str())).init();
    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    let library = Library::new(&config)?;

    iced::application("Progress Journal", Journal::update, Journal::view)
        .theme(Journal::theme)
        .centered()
        .run_with(move || Journal::new(config, library))?;

    Ok(())
}

/// Fetch a catalog off the UI thread
async fn load_catalog_async(db_path: PathBuf, ticket: LoadTicket) -> Result<Vec<Post>, String> {
    with_library(db_path, move |library| fetch_catalog(library, ticket)).await
}

/// Run catalog work off the UI thread.
/// rusqlite::Connection is not Sync, so the worker opens its own connection.
async fn with_library<T, F>(db_path: PathBuf, work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&Library) -> error::Result<T> + Send + 'static,
{
    run_blocking(move || {
        let library = Library::open_at(&db_path)?;
        work(&library)
    })
    .await
}

/// Async function to import all photos from a folder
/// Runs in a background thread to avoid blocking the UI
async fn import_folder_async(
    folder_path: PathBuf,
    db_path: PathBuf,
    user: UserId,
    config: AppConfig,
) -> Result<ImportResult, String> {
    with_library(db_path, move |library| import_folder(&folder_path, library, user, &config)).await
}

/// Run blocking catalog work on tokio's blocking pool.
/// Errors are flattened to strings because messages must be `Clone`.
async fn run_blocking<T, F>(work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> error::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| error::JournalError::Task(e.to_string()))
        .and_then(|result| result)
        .map_err(|e| e.to_string())
}
