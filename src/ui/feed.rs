use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, image, pick_list, row, text, text_input, Column, Row};
use iced::{Alignment, ContentFit, Element, Length};

use crate::journal::feed::{popular_tags, FeedFilter, SortOrder, POPULAR_TAGS};
use crate::state::data::Post;
use crate::Message;

const CARDS_PER_ROW: usize = 4;
const CARD_IMAGE_HEIGHT: f32 = 160.0;

pub fn view<'a>(posts: &'a [Post], filter: &'a FeedFilter, loading: bool) -> Element<'a, Message> {
    let header = row![
        text("Journal").size(32),
        horizontal_space(),
        text_input("Search posts...", filter.search())
            .on_input(Message::FeedSearchChanged)
            .width(Length::Fixed(220.0)),
        pick_list(SortOrder::ALL, Some(filter.sort()), Message::FeedSortPicked),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut tags = popular_tags(posts, POPULAR_TAGS)
        .into_iter()
        .fold(Row::new().spacing(6), |tags, tag| {
            let chip = button(text(format!("#{}", tag)).size(13)).padding([4, 10]);
            let chip = if filter.tag() == Some(tag.as_str()) {
                chip
            } else {
                chip.style(button::secondary)
            };
            tags.push(chip.on_press(Message::FeedTagToggled(tag)))
        });
    if filter.is_active() {
        tags = tags.push(
            button(text("Clear").size(13))
                .padding([4, 10])
                .style(button::text)
                .on_press(Message::ClearFeedFilters),
        );
    }

    let body: Element<Message> = if loading {
        text("Loading your posts...").into()
    } else if posts.is_empty() {
        column![
            text("No posts yet").size(20),
            text("Start capturing your journey by importing your first photos."),
            button("Import photos").on_press(Message::ImportFolder).padding(10),
        ]
        .spacing(8)
        .into()
    } else {
        grid(filter.apply(posts))
    };

    column![header, tags, body].spacing(16).into()
}

fn grid(posts: Vec<&Post>) -> Element<'_, Message> {
    if posts.is_empty() {
        return text("No posts match these filters.").into();
    }

    posts
        .chunks(CARDS_PER_ROW)
        .fold(Column::new().spacing(16), |rows, chunk| {
            let mut cards = chunk
                .iter()
                .copied()
                .fold(Row::new().spacing(16), |cards, post| cards.push(card(post)));
            // Keep cards the same width on a short last row
            for _ in chunk.len()..CARDS_PER_ROW {
                cards = cards.push(horizontal_space());
            }
            rows.push(cards)
        })
        .into()
}

fn card(post: &Post) -> Element<'_, Message> {
    let mut info = column![
        image(Handle::from_path(post.preview_ref()))
            .width(Length::Fill)
            .height(Length::Fixed(CARD_IMAGE_HEIGHT))
            .content_fit(ContentFit::Cover),
        text(&post.title).size(16),
    ]
    .spacing(6);

    if let Some(description) = &post.description {
        info = info.push(text(description).size(13));
    }
    if !post.tags.is_empty() {
        info = info.push(text(post.tag_line()).size(12));
    }
    info = info.push(text(format!("♥ {}   💬 {}", post.like_count, post.comment_count)).size(12));

    button(container(info).width(Length::Fill))
        .padding(8)
        .width(Length::Fill)
        .style(button::secondary)
        .on_press(Message::OpenPost(post.id))
        .into()
}
