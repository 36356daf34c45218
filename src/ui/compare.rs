//! Before & After page

use iced::widget::image::Handle;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{button, canvas, column, container, image, pick_list, responsive, row, scrollable, slider, text, Stack};
use iced::{Alignment, ContentFit, Element, Length};
use std::fmt;

use super::divider::Divider;
use crate::compare::reveal::{RevealLayout, MAX_POSITION, MIN_POSITION};
use crate::compare::view::{Comparison, ComparisonView, ViewState};
use crate::state::data::{Post, PostId};
use crate::Message;

/// Height of the stacked image area (4:3 at 640px wide)
const STACK_HEIGHT: f32 = 480.0;

/// One entry in the before/after pickers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChoice {
    pub id: PostId,
    label: String,
}

impl From<&Post> for PostChoice {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            label: post.picker_label(),
        }
    }
}

impl fmt::Display for PostChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub fn view(compare: &ComparisonView) -> Element<'_, Message> {
    let heading = text("Before & After").size(32);

    let body: Element<Message> = match compare.state() {
        ViewState::Unauthenticated => column![
            text("Not signed in").size(20),
            text("Please sign in to compare your posts."),
        ]
        .spacing(8)
        .into(),
        ViewState::Loading => text("Loading your posts...").into(),
        ViewState::InsufficientItems => {
            let reason = if compare.fetch_failed() {
                "Your posts could not be loaded right now."
            } else {
                "You need at least two posts to use the comparison feature."
            };
            column![
                text("Not enough posts").size(20),
                text(reason),
                button("Import photos").on_press(Message::ImportFolder).padding(10),
            ]
            .spacing(8)
            .into()
        }
        ViewState::Ready => ready(compare),
    };

    column![heading, body].spacing(20).into()
}

fn ready(compare: &ComparisonView) -> Element<'_, Message> {
    let selection = compare.selection();
    let choices: Vec<PostChoice> = selection.catalog().iter().map(PostChoice::from).collect();

    let pickers = row![
        column![
            text("Before").size(14),
            pick_list(
                choices.clone(),
                selection.before().map(PostChoice::from),
                Message::BeforePicked,
            )
            .placeholder("Select a post")
            .width(Length::Fill),
        ]
        .spacing(6)
        .width(Length::Fill),
        column![
            text("After").size(14),
            pick_list(choices, selection.after().map(PostChoice::from), Message::AfterPicked)
                .placeholder("Select a post")
                .width(Length::Fill),
        ]
        .spacing(6)
        .width(Length::Fill),
    ]
    .spacing(16);

    let comparison: Element<Message> = match compare.comparison() {
        Some(comparison) => comparison_panel(comparison, compare.reveal().position()),
        None => container(text("Select two posts to compare"))
            .padding(48)
            .center_x(Length::Fill)
            .into(),
    };

    column![
        pickers,
        comparison,
        text("Tip: For best results, choose photos taken from the same angle and lighting conditions.")
            .size(14),
    ]
    .spacing(20)
    .into()
}

fn comparison_panel(comparison: Comparison<'_>, position: f32) -> Element<'_, Message> {
    let caption = |post: &Post| {
        let mut caption = column![
            text(post.title.clone()),
            text(post.created_at.format("%B %-d, %Y").to_string()).size(14),
        ]
        .align_x(Alignment::Center)
        .width(Length::Fill);
        if let Some(description) = &post.description {
            caption = caption.push(text(description.clone()).size(13));
        }
        caption
    };

    column![
        image_stack(comparison.before, comparison.after, comparison.layout),
        slider(MIN_POSITION..=MAX_POSITION, position, Message::RevealMoved).step(1.0),
        row![caption(comparison.before), caption(comparison.after)].spacing(16),
        container(text(format!("Time difference: {}", comparison.gap)).size(14)).center_x(Length::Fill),
    ]
    .spacing(16)
    .into()
}

/// After image underneath, before image in a clip window on top,
/// divider canvas above both
fn image_stack<'a>(before: &Post, after: &Post, layout: RevealLayout) -> Element<'a, Message> {
    let before_ref = before.media_url.clone();
    let after_ref = after.media_url.clone();

    let stack = responsive(move |size| {
        let after_layer = image(Handle::from_path(&after_ref))
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover);

        let mut layers = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(after_layer);

        // Position 0 hides the before image: no scaled inset at all
        if let Some(inset_width) = layout.before_inset_width_px(size.width) {
            let inset = image(Handle::from_path(&before_ref))
                .width(Length::Fixed(inset_width))
                .height(Length::Fixed(size.height))
                .content_fit(ContentFit::Cover);

            // A horizontal scrollable lets the inset be wider than its
            // window; the window clips it
            let window = scrollable(inset)
                .direction(Direction::Horizontal(Scrollbar::new().width(0.0).scroller_width(0.0)))
                .width(Length::Fixed(layout.clip_width_px(size.width)))
                .height(Length::Fill);
            layers = layers.push(window);
        }

        layers
            .push(canvas(Divider { layout }).width(Length::Fill).height(Length::Fill))
            .into()
    });

    container(stack)
        .width(Length::Fill)
        .height(Length::Fixed(STACK_HEIGHT))
        .clip(true)
        .into()
}
