use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Theme};

use crate::compare::reveal::RevealLayout;
use crate::Message;

/// Radius of the round drag handle
const HANDLE_RADIUS: f32 = 20.0;

/// Top layer of the comparison stack: draws the divider line and handle,
/// and turns press/drag on the image into reveal positions.
pub struct Divider {
    pub layout: RevealLayout,
}

impl Program<Message> for Divider {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let x = self.layout.divider_x_px(bounds.width);
        let line = Path::line(Point::new(x, 0.0), Point::new(x, bounds.height));
        frame.stroke(&line, Stroke::default().with_color(Color::WHITE).with_width(2.0));

        let center = Point::new(x, bounds.height / 2.0);
        frame.fill(&Path::circle(center, HANDLE_RADIUS), Color::WHITE);
        frame.fill(
            &Path::circle(center, 4.0),
            Color::from_rgb(0.2, 0.4, 0.9),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Press anywhere on the image jumps the divider there
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.is_dragging = true;
                    let percent = pointer_percent(pos.x, bounds.width);
                    return (canvas::event::Status::Captured, Some(Message::RevealMoved(percent)));
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.is_dragging {
                    state.is_dragging = false;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Keep following the pointer even when it leaves the image;
            // the controller clamps
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if state.is_dragging {
                    let percent = pointer_percent(position.x - bounds.x, bounds.width);
                    return (canvas::event::Status::Captured, Some(Message::RevealMoved(percent)));
                }
            }

            // The before layer underneath is a hidden-scrollbar scrollable;
            // swallow the wheel so it never pans
            canvas::Event::Mouse(mouse::Event::WheelScrolled { .. }) => {
                if cursor.is_over(bounds) {
                    return (canvas::event::Status::Captured, None);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::ResizingHorizontally
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Pointer x (relative to the image) as a reveal position, unclamped
fn pointer_percent(x: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    x / width * 100.0
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_percent() {
        assert_eq!(pointer_percent(200.0, 800.0), 25.0);
        assert_eq!(pointer_percent(-40.0, 800.0), -5.0);
        assert_eq!(pointer_percent(10.0, 0.0), 0.0);
    }
}
