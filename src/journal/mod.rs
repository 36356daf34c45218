/// Journal pages beyond the comparison
///
/// - `feed.rs` - search, tag filter and sort for the post grid
/// - `detail.rs` - one post with likes and comments
/// - `calendar.rs` - month grid of posts
/// - `stats.rs` - totals, tag distribution and monthly activity

pub mod calendar;
pub mod detail;
pub mod feed;
pub mod stats;
