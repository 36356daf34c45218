use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, image, row, text, Column, Row};
use iced::{Alignment, ContentFit, Element, Length};

use crate::journal::calendar::{month_grid, CalendarDay, MonthCursor, WEEKDAYS};
use crate::state::data::Post;
use crate::Message;

const CELL_HEIGHT: f32 = 120.0;
const PREVIEW_SIZE: f32 = 32.0;

pub fn view<'a>(month: MonthCursor, posts: &'a [Post]) -> Element<'a, Message> {
    let grid = month_grid(month, posts, &chrono::Local);

    let header = row![
        text(grid.title.clone()).size(24),
        horizontal_space(),
        button("<").on_press(Message::PrevMonth),
        button(">").on_press(Message::NextMonth),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let weekdays = WEEKDAYS.iter().fold(Row::new().spacing(4), |row, day| {
        row.push(container(text(*day).size(14)).center_x(Length::Fill))
    });

    let weeks = grid.weeks().into_iter().fold(Column::new().spacing(4), |rows, week| {
        let cells = week.into_iter().fold(Row::new().spacing(4), |cells, day| {
            cells.push(day_cell(day))
        });
        rows.push(cells)
    });

    column![header, weekdays, weeks].spacing(12).into()
}

fn day_cell<'a>(day: Option<&CalendarDay<'a>>) -> Element<'a, Message> {
    let Some(day) = day else {
        return container(text(""))
            .width(Length::Fill)
            .height(Length::Fixed(CELL_HEIGHT))
            .into();
    };

    // Two previews per row
    let previews = day.previews.chunks(2).fold(Column::new().spacing(2), |rows, pair| {
        let row = pair.iter().fold(Row::new().spacing(2), |row, post| {
            row.push(
                button(
                    image(Handle::from_path(post.preview_ref()))
                        .width(Length::Fixed(PREVIEW_SIZE))
                        .height(Length::Fixed(PREVIEW_SIZE))
                        .content_fit(ContentFit::Cover),
                )
                .padding(0)
                .style(button::text)
                .on_press(Message::OpenPost(post.id)),
            )
        });
        rows.push(row)
    });

    let count = match day.post_count() {
        0 => String::new(),
        1 => "1 post".to_string(),
        n => format!("{} posts", n),
    };
    let mut content = column![
        row![
            text(count).size(11),
            horizontal_space(),
            text(day.date.format("%-d").to_string()).size(12),
        ],
        previews,
    ]
    .spacing(2);
    if let Some(more) = day.overflow_label() {
        content = content.push(text(more).size(11));
    }

    container(content)
        .padding(4)
        .width(Length::Fill)
        .height(Length::Fixed(CELL_HEIGHT))
        .style(container::bordered_box)
        .into()
}
