//! Aggregate statistics over a user's posts

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use std::collections::HashMap;
use std::fmt;

use super::calendar::MonthCursor;
use crate::state::data::Post;

/// Tags listed by name before the rest fold into "Other"
pub const TOP_TAGS: usize = 4;
pub const OTHER_TAG: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    Last30Days,
    Last3Months,
    #[default]
    Last6Months,
    LastYear,
    AllTime,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Last30Days,
        Timeframe::Last3Months,
        Timeframe::Last6Months,
        Timeframe::LastYear,
        Timeframe::AllTime,
    ];

    /// Start of the window ending at `now`; `None` for all time
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::Last30Days => Some(now - Duration::days(30)),
            Timeframe::Last3Months => now.checked_sub_months(Months::new(3)),
            Timeframe::Last6Months => now.checked_sub_months(Months::new(6)),
            Timeframe::LastYear => now.checked_sub_months(Months::new(12)),
            Timeframe::AllTime => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timeframe::Last30Days => "Last 30 days",
            Timeframe::Last3Months => "Last 3 months",
            Timeframe::Last6Months => "Last 6 months",
            Timeframe::LastYear => "Last year",
            Timeframe::AllTime => "All time",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub posts: u64,
    pub likes: u64,
    pub comments: u64,
}

impl Totals {
    fn add(&mut self, post: &Post) {
        self.posts += 1;
        self.likes += u64::from(post.like_count);
        self.comments += u64::from(post.comment_count);
    }
}

/// Percentage change versus the previous window of equal length
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Change {
    pub posts: Option<f64>,
    pub likes: Option<f64>,
    pub comments: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagShare {
    pub name: String,
    pub posts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthActivity {
    /// e.g. "Mar 2026"
    pub label: String,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    pub timeframe: Timeframe,
    pub totals: Totals,
    pub change: Change,
    pub tags: Vec<TagShare>,
    /// Oldest month first, months without posts included as zeros
    pub activity: Vec<MonthActivity>,
}

/// `None` when there is nothing to compare against
pub fn change_percent(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

/// Compute everything the stats page shows for `timeframe` ending at `now`
pub fn compute<Tz: TimeZone>(posts: &[Post], timeframe: Timeframe, now: DateTime<Utc>, tz: &Tz) -> JournalStats {
    let start = timeframe.start(now);
    let in_window: Vec<&Post> = posts
        .iter()
        .filter(|post| post.created_at <= now && start.map_or(true, |s| post.created_at > s))
        .collect();

    let mut totals = Totals::default();
    for post in &in_window {
        totals.add(post);
    }

    let change = match start {
        Some(start) => {
            let previous_start = start - (now - start);
            let mut previous = Totals::default();
            for post in posts
                .iter()
                .filter(|post| post.created_at > previous_start && post.created_at <= start)
            {
                previous.add(post);
            }
            Change {
                posts: change_percent(totals.posts, previous.posts),
                likes: change_percent(totals.likes, previous.likes),
                comments: change_percent(totals.comments, previous.comments),
            }
        }
        None => Change::default(),
    };

    JournalStats {
        timeframe,
        totals,
        change,
        tags: tag_distribution(&in_window),
        activity: monthly_activity(&in_window, tz),
    }
}

/// Posts per tag, biggest first (ties alphabetical). Past `TOP_TAGS`, and
/// for untagged posts, counts go to "Other".
pub fn tag_distribution(posts: &[&Post]) -> Vec<TagShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut untagged = 0;
    for post in posts {
        if post.tags.is_empty() {
            untagged += 1;
        }
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut shares: Vec<TagShare> = counts
        .into_iter()
        .map(|(name, posts)| TagShare {
            name: name.to_string(),
            posts,
        })
        .collect();
    shares.sort_by(|a, b| b.posts.cmp(&a.posts).then_with(|| a.name.cmp(&b.name)));

    let other: usize = shares.iter().skip(TOP_TAGS).map(|share| share.posts).sum::<usize>() + untagged;
    shares.truncate(TOP_TAGS);
    if other > 0 {
        shares.push(TagShare {
            name: OTHER_TAG.to_string(),
            posts: other,
        });
    }
    shares
}

/// Totals per calendar month from the oldest to the newest post
pub fn monthly_activity<Tz: TimeZone>(posts: &[&Post], tz: &Tz) -> Vec<MonthActivity> {
    let Some(first) = posts.iter().map(|post| month_of(post, tz)).min_by_key(MonthCursor::first_day) else {
        return Vec::new();
    };
    let last = posts
        .iter()
        .map(|post| month_of(post, tz))
        .max_by_key(MonthCursor::first_day)
        .unwrap_or(first);

    let mut activity = Vec::new();
    let mut month = first;
    loop {
        let mut totals = Totals::default();
        for post in posts.iter().filter(|post| month_of(post, tz) == month) {
            totals.add(post);
        }
        activity.push(MonthActivity {
            label: month.first_day().format("%b %Y").to_string(),
            totals,
        });

        let next = month.next();
        if month == last || next == month {
            break;
        }
        month = next;
    }
    activity
}

fn month_of<Tz: TimeZone>(post: &Post, tz: &Tz) -> MonthCursor {
    MonthCursor::containing(post.created_at.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::post;

    fn tagged(id: i64, day: i64, tags: &[&str], likes: u32, comments: u32) -> Post {
        let mut p = post(id, &format!("p{}", id), day);
        p.tags = tags.iter().map(|t| t.to_string()).collect();
        p.like_count = likes;
        p.comment_count = comments;
        p
    }

    fn now() -> DateTime<Utc> {
        // fixtures count from 2026-01-01; day 100 = 2026-04-11
        post(0, "now", 100).created_at
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(change_percent(12, 10), Some(20.0));
        assert_eq!(change_percent(5, 10), Some(-50.0));
        assert_eq!(change_percent(3, 0), None);
    }

    #[test]
    fn test_window_totals_and_change() {
        let posts = vec![
            tagged(1, 95, &["fitness"], 4, 1),
            tagged(2, 80, &["fitness"], 2, 0),
            // previous 30-day window
            tagged(3, 60, &["travel"], 3, 2),
            // outside both windows
            tagged(4, 10, &["travel"], 9, 9),
        ];

        let stats = compute(&posts, Timeframe::Last30Days, now(), &Utc);

        assert_eq!(stats.totals, Totals { posts: 2, likes: 6, comments: 1 });
        assert_eq!(stats.change.posts, Some(100.0));
        assert_eq!(stats.change.likes, Some(100.0));
        assert_eq!(stats.change.comments, Some(-50.0));
    }

    #[test]
    fn test_all_time_has_no_change() {
        let posts = vec![tagged(1, 95, &[], 1, 1), tagged(2, 1, &[], 1, 1)];

        let stats = compute(&posts, Timeframe::AllTime, now(), &Utc);

        assert_eq!(stats.totals.posts, 2);
        assert_eq!(stats.change, Change::default());
    }

    #[test]
    fn test_tag_distribution_folds_the_tail() {
        let posts = vec![
            tagged(1, 1, &["fitness", "progress"], 0, 0),
            tagged(2, 2, &["fitness"], 0, 0),
            tagged(3, 3, &["travel"], 0, 0),
            tagged(4, 4, &["food"], 0, 0),
            tagged(5, 5, &["family"], 0, 0),
            tagged(6, 6, &[], 0, 0),
        ];
        let refs: Vec<&Post> = posts.iter().collect();

        let shares = tag_distribution(&refs);
        let names: Vec<_> = shares.iter().map(|s| (s.name.as_str(), s.posts)).collect();

        // ties sort alphabetically, "travel" is fifth and joins the untagged post
        assert_eq!(
            names,
            [("fitness", 2), ("family", 1), ("food", 1), ("progress", 1), ("Other", 2)]
        );
    }

    #[test]
    fn test_monthly_activity_fills_gaps() {
        let posts = vec![
            tagged(1, 95, &[], 2, 1), // April
            tagged(2, 5, &[], 1, 0),  // January
            tagged(3, 6, &[], 1, 1),  // January
        ];
        let refs: Vec<&Post> = posts.iter().collect();

        let activity = monthly_activity(&refs, &Utc);
        let labels: Vec<_> = activity.iter().map(|m| m.label.as_str()).collect();

        assert_eq!(labels, ["Jan 2026", "Feb 2026", "Mar 2026", "Apr 2026"]);
        assert_eq!(activity[0].totals, Totals { posts: 2, likes: 2, comments: 1 });
        assert_eq!(activity[1].totals, Totals::default());
        assert_eq!(activity[3].totals.likes, 2);
    }

    #[test]
    fn test_empty_catalog() {
        let stats = compute(&[], Timeframe::default(), now(), &Utc);

        assert_eq!(stats.timeframe, Timeframe::Last6Months);
        assert_eq!(stats.totals, Totals::default());
        assert!(stats.tags.is_empty());
        assert!(stats.activity.is_empty());
    }
}
