//! Month grid of posts for the calendar page

use chrono::{Datelike, Duration, Months, NaiveDate, TimeZone};

use crate::state::data::Post;

/// Column headers, weeks start on Sunday
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Thumbnails shown per day before collapsing into "+N more"
pub const PREVIEWS_PER_DAY: usize = 4;

/// The month currently shown, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    first_day: NaiveDate,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn next(self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    pub fn prev(self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    /// e.g. "March 2026"
    pub fn title(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        let days = self.next().first_day.signed_duration_since(self.first_day).num_days();
        // December of the last representable year cannot advance
        if days <= 0 { 31 } else { days as u32 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    /// At most `PREVIEWS_PER_DAY` posts, in catalog order
    pub previews: Vec<&'a Post>,
    /// Posts that did not fit in `previews`
    pub overflow: usize,
}

impl CalendarDay<'_> {
    pub fn overflow_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }

    pub fn post_count(&self) -> usize {
        self.previews.len() + self.overflow
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid<'a> {
    pub title: String,
    /// Empty cells before the 1st so it lands under its weekday
    pub leading_blanks: usize,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Rows of seven cells; `None` is padding before the 1st or after the last day
    pub fn weeks(&self) -> Vec<Vec<Option<&CalendarDay<'a>>>> {
        let mut cells: Vec<Option<&CalendarDay<'a>>> = vec![None; self.leading_blanks];
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// Bucket `posts` into the days of `month`, as seen in time zone `tz`
pub fn month_grid<'a, Tz: TimeZone>(month: MonthCursor, posts: &'a [Post], tz: &Tz) -> MonthGrid<'a> {
    let first = month.first_day();
    let days = (0..month.days_in_month())
        .map(|offset| {
            let date = first + Duration::days(i64::from(offset));
            let on_day: Vec<&Post> = posts
                .iter()
                .filter(|post| post.created_at.with_timezone(tz).date_naive() == date)
                .collect();
            let overflow = on_day.len().saturating_sub(PREVIEWS_PER_DAY);
            CalendarDay {
                date,
                previews: on_day.into_iter().take(PREVIEWS_PER_DAY).collect(),
                overflow,
            }
        })
        .collect();

    MonthGrid {
        title: month.title(),
        leading_blanks: first.weekday().num_days_from_sunday() as usize,
        days,
    }
}
