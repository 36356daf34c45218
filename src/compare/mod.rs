/// Before/after comparison
///
/// - `selection.rs` - which two posts are compared
/// - `reveal.rs` - divider position and the derived slider geometry
/// - `gap.rs` - the "3 weeks" style time difference
/// - `view.rs` - the page state machine tying them together

pub mod gap;
pub mod reveal;
pub mod selection;
pub mod view;

pub use view::{ComparisonView, LoadTicket, ViewState};
