// Date context shared by the tabs: the timeline range and the day selected
// on the Details tab.

use chrono::{Duration, Local, NaiveDate};

use crate::api::TimelineQuery;

#[derive(Debug, Clone)]
pub struct DateContext {
    /// Trailing day count for the timeline.
    pub range_days: u32,
    /// Day shown on the Details tab.
    pub selected_date: NaiveDate,
}

impl Default for DateContext {
    fn default() -> Self {
        Self {
            range_days: 30,
            selected_date: yesterday(),
        }
    }
}

/// The most recent fully-aggregated day.
pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

impl DateContext {
    pub fn new(range_days: u32, selected_date: Option<NaiveDate>) -> Self {
        Self {
            range_days,
            selected_date: selected_date.unwrap_or_else(yesterday),
        }
    }

    /// Query for the timeline endpoint at the current range.
    pub fn timeline_query(&self) -> TimelineQuery {
        TimelineQuery::Days(self.range_days)
    }

    /// Switch the timeline range. Returns true when it changed.
    pub fn set_range_days(&mut self, days: u32) -> bool {
        if self.range_days == days {
            return false;
        }
        self.range_days = days;
        true
    }

    /// Step the selected day backward.
    pub fn prev_day(&mut self) {
        self.selected_date -= Duration::days(1);
    }

    /// Step the selected day forward, never past the last aggregated day.
    pub fn next_day(&mut self) -> bool {
        if self.selected_date < yesterday() {
            self.selected_date += Duration::days(1);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_and_date() {
        let ctx = DateContext::default();
        assert_eq!(ctx.range_days, 30);
        assert_eq!(ctx.selected_date, yesterday());
    }

    #[test]
    fn test_set_range_days_reports_change() {
        let mut ctx = DateContext::default();
        assert!(ctx.set_range_days(7));
        assert!(!ctx.set_range_days(7));
        assert_eq!(ctx.timeline_query(), TimelineQuery::Days(7));
    }

    #[test]
    fn test_next_day_stops_at_yesterday() {
        let mut ctx = DateContext::default();
        assert!(!ctx.next_day());

        ctx.prev_day();
        ctx.prev_day();
        assert_eq!(ctx.selected_date, yesterday() - Duration::days(2));
        assert!(ctx.next_day());
        assert!(ctx.next_day());
        assert!(!ctx.next_day());
        assert_eq!(ctx.selected_date, yesterday());
    }
}
