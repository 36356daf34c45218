//! Post detail page

use chrono::{Local, Utc};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, image, row, text, text_input, Column};
use iced::{Alignment, ContentFit, Element, Length};

use crate::journal::detail::{time_ago, PostDetail};
use crate::state::data::Profile;
use crate::Message;

const IMAGE_HEIGHT: f32 = 420.0;

pub fn view<'a>(detail: &'a PostDetail, user: &'a Profile) -> Element<'a, Message> {
    let post = detail.post();
    let now = Utc::now();

    let back = row![
        button("← Back").on_press(Message::ClosePost).style(button::text),
        horizontal_space(),
    ];

    let photo = image(Handle::from_path(&post.media_url))
        .width(Length::Fill)
        .height(Length::Fixed(IMAGE_HEIGHT))
        .content_fit(ContentFit::Contain);

    let taken = post
        .created_at
        .with_timezone(&Local)
        .format("%B %-d, %Y at %-I:%M %p")
        .to_string();

    let heart = if detail.liked() { "♥" } else { "♡" };
    let like = button(text(format!("{} {}", heart, detail.like_count())))
        .padding([6, 14])
        .style(button::secondary)
        .on_press_maybe((!detail.like_pending()).then_some(Message::ToggleLike));

    // Only the owner edits the description
    let description: Element<Message> = if post.user_id == user.id {
        row![
            text_input("Add a description...", detail.description_draft())
                .on_input(Message::DescriptionDraftChanged)
                .on_submit(Message::SaveDescription),
            button("Save")
                .padding(8)
                .on_press_maybe(detail.description_changed().then_some(Message::SaveDescription)),
        ]
        .spacing(8)
        .into()
    } else {
        text(post.description.as_deref().unwrap_or_default()).into()
    };

    let mut about = column![
        text(&post.title).size(28),
        text(format!("@{} · {}", user.username, time_ago(post.created_at, now))).size(14),
        description,
    ]
    .spacing(8);
    if !post.tags.is_empty() {
        about = about.push(text(post.tag_line()).size(14));
    }
    about = about.push(row![like, text(taken).size(14)].spacing(16).align_y(Alignment::Center));

    column![back, photo, about, comments(detail, user)]
        .spacing(20)
        .into()
}

fn comments<'a>(detail: &'a PostDetail, user: &'a Profile) -> Element<'a, Message> {
    let input = row![
        text_input("Add a comment...", detail.draft())
            .on_input(Message::CommentDraftChanged)
            .on_submit(Message::SubmitComment),
        button("Comment")
            .padding(8)
            .on_press_maybe(detail.can_submit().then_some(Message::SubmitComment)),
    ]
    .spacing(8);

    let mut list = Column::new().spacing(12);
    if let Some(pending) = detail.pending_comment() {
        list = list.push(comment_line(&user.username, "posting...", pending));
    }

    let now = Utc::now();
    list = match detail.comments() {
        None => list.push(text("Loading comments...")),
        Some(_) if detail.load_failed() => list.push(text("Comments could not be loaded right now.")),
        Some([]) if detail.pending_comment().is_none() => {
            list.push(text("No comments yet. Be the first to comment!"))
        }
        Some(comments) => comments.iter().fold(list, |list, comment| {
            list.push(comment_line(&comment.username, time_ago(comment.created_at, now), &comment.content))
        }),
    };

    column![
        text(format!("Comments ({})", detail.comment_count())).size(20),
        input,
        container(list).padding([4, 0]),
    ]
    .spacing(12)
    .into()
}

fn comment_line<'a>(username: &'a str, when: impl ToString, content: &'a str) -> Element<'a, Message> {
    column![
        row![text(username).size(14), text(when.to_string()).size(12)]
            .spacing(8)
            .align_y(Alignment::Center),
        text(content),
    ]
    .spacing(2)
    .into()
}
