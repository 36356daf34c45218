/// Tag distribution bars for the stats page
use iced::widget::canvas::{self, Path};
use iced::{Color, Point, Rectangle, Size};

use crate::journal::stats::TagShare;
use crate::Message;

/// Bar colors, cycled
const PALETTE: [Color; 5] = [
    Color::from_rgb(0.91, 0.45, 0.32),
    Color::from_rgb(0.16, 0.62, 0.56),
    Color::from_rgb(0.15, 0.27, 0.33),
    Color::from_rgb(0.91, 0.77, 0.42),
    Color::from_rgb(0.96, 0.64, 0.38),
];

pub fn color_for(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Horizontal bars, one per tag, widths normalized to the biggest tag
#[derive(Debug, Clone)]
pub struct TagChart {
    pub shares: Vec<TagShare>,
}

impl canvas::Program<Message> for TagChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        // Find maximum value for normalization
        let max_posts = self.shares.iter().map(|share| share.posts).max().unwrap_or(0);
        if max_posts == 0 {
            return vec![frame.into_geometry()];
        }

        let row_height = bounds.height / self.shares.len() as f32;
        let bar_height = (row_height * 0.7).max(1.0);

        for (i, share) in self.shares.iter().enumerate() {
            let normalized = share.posts as f32 / max_posts as f32;
            let y = i as f32 * row_height + (row_height - bar_height) / 2.0;
            let bar = Path::rectangle(
                Point::new(0.0, y),
                Size::new(normalized * bounds.width, bar_height),
            );
            frame.fill(&bar, color_for(i));
        }

        vec![frame.into_geometry()]
    }
}
