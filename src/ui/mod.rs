/// Page renderers
///
/// - `feed.rs` - post grid with filters
/// - `post.rs` - post detail with likes and comments
/// - `compare.rs` - before/after pickers, image stack and slider
/// - `divider.rs` - canvas that draws and drags the divider
/// - `calendar.rs` - month grid
/// - `stats.rs` / `tag_chart.rs` - statistics page

pub mod calendar;
pub mod compare;
pub mod divider;
pub mod feed;
pub mod post;
pub mod stats;
pub mod tag_chart;
