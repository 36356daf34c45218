use iced::widget::{canvas, column, container, horizontal_space, pick_list, row, text, Column};
use iced::{Alignment, Element, Length};

use super::tag_chart::{color_for, TagChart};
use crate::journal::stats::{self, JournalStats, Timeframe};
use crate::state::data::Post;
use crate::Message;

pub fn view(posts: &[Post], timeframe: Timeframe) -> Element<'_, Message> {
    let stats = stats::compute(posts, timeframe, chrono::Utc::now(), &chrono::Local);

    let header = row![
        text("Statistics").size(32),
        horizontal_space(),
        pick_list(Timeframe::ALL, Some(timeframe), Message::TimeframePicked),
    ]
    .align_y(Alignment::Center);

    let totals = row![
        total_card("Total Posts", stats.totals.posts, stats.change.posts),
        total_card("Total Likes", stats.totals.likes, stats.change.likes),
        total_card("Total Comments", stats.totals.comments, stats.change.comments),
    ]
    .spacing(16);

    column![header, totals, tags_section(&stats), activity_section(&stats)]
        .spacing(24)
        .into()
}

fn total_card<'a>(label: &'a str, value: u64, change: Option<f64>) -> Element<'a, Message> {
    let trend = match change {
        Some(pct) if pct >= 0.0 => format!("↑ {:.0}% from previous period", pct),
        Some(pct) => format!("↓ {:.0}% from previous period", -pct),
        None => String::new(),
    };

    container(
        column![
            text(value.to_string()).size(28),
            text(label).size(14),
            text(trend).size(12),
        ]
        .spacing(4),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

fn tags_section<'a>(stats: &JournalStats) -> Element<'a, Message> {
    if stats.tags.is_empty() {
        return text("No tagged posts in this period.").into();
    }

    let legend = stats
        .tags
        .iter()
        .enumerate()
        .fold(Column::new().spacing(4), |legend, (i, share)| {
            legend.push(
                text(format!("#{}  {}", share.name, share.posts))
                    .size(14)
                    .color(color_for(i)),
            )
        });

    let chart = canvas(TagChart {
        shares: stats.tags.clone(),
    })
    .width(Length::Fill)
    .height(Length::Fixed(28.0 * stats.tags.len() as f32));

    column![
        text("Tags Distribution").size(20),
        row![legend.width(Length::Fixed(180.0)), chart].spacing(16),
    ]
    .spacing(8)
    .into()
}

fn activity_section<'a>(stats: &JournalStats) -> Element<'a, Message> {
    let rows = stats.activity.iter().fold(Column::new().spacing(2), |rows, month| {
        rows.push(
            row![
                text(month.label.clone()).width(Length::Fixed(100.0)),
                text(format!("{} posts", month.totals.posts)).width(Length::Fixed(100.0)),
                text(format!("{} likes", month.totals.likes)).width(Length::Fixed(100.0)),
                text(format!("{} comments", month.totals.comments)),
            ]
            .spacing(8),
        )
    });

    column![text("Activity Overview").size(20), rows].spacing(8).into()
}
