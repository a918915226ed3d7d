//! Client-side filtering of the loaded snap list.
//!
//! The filtered list is always recomputed from scratch out of the full list
//! and the current [`FilterCriteria`]; nothing patches it incrementally.

use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::api::types::Snap;

/// Which snap field the filter looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Message,
    Username,
    CreatedAt,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Message => "Message",
            FilterMode::Username => "Author",
            FilterMode::CreatedAt => "Date",
        }
    }

    /// Lower-cased text of the field this mode searches. Dates are searched in
    /// their RFC 3339 form; a snap without one has empty text.
    fn field_text(self, snap: &Snap) -> String {
        match self {
            FilterMode::Message => snap.message.to_lowercase(),
            FilterMode::Username => snap.username.to_lowercase(),
            FilterMode::CreatedAt => snap
                .created_at
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true).to_lowercase())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    mode: FilterMode,
    term: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Switch the filtered field. Any mode other than the date mode resets the
    /// search term and both date bounds.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
        if mode != FilterMode::CreatedAt {
            self.term.clear();
            self.start = None;
            self.end = None;
        }
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.end = end;
    }

    /// Both bounds, when the date range is active.
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.mode, self.start, self.end) {
            (FilterMode::CreatedAt, Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn matches(&self, snap: &Snap) -> bool {
        if let Some((start, end)) = self.date_range() {
            // Calendar-day comparison: `start 00:00 < day 00:00 <= end 23:59:59.999`.
            return snap
                .created_at
                .map(|ts| ts.date_naive())
                .is_some_and(|day| day > start && day <= end);
        }

        // Without a complete range the date mode falls back to a text match,
        // so a term carried over from a text mode keeps narrowing the list.
        self.mode.field_text(snap).contains(&self.term.to_lowercase())
    }

    /// Indices into `snaps` of every snap that passes, in list order.
    pub fn apply(&self, snaps: &[Snap]) -> Vec<usize> {
        snaps
            .iter()
            .enumerate()
            .filter(|(_, snap)| self.matches(snap))
            .map(|(i, _)| i)
            .collect()
    }

    /// One-line description for the status bar.
    pub fn summary(&self) -> String {
        match self.mode {
            FilterMode::CreatedAt => {
                let fmt =
                    |d: Option<NaiveDate>| d.map_or_else(|| "…".to_string(), |d| d.to_string());
                let range = format!("Date {} → {}", fmt(self.start), fmt(self.end));
                if self.date_range().is_none() && !self.term.is_empty() {
                    format!("{range} ~ \"{}\"", self.term)
                } else {
                    range
                }
            }
            mode if self.term.is_empty() => mode.label().to_string(),
            mode => format!("{} ~ \"{}\"", mode.label(), self.term),
        }
    }
}

/// Parse a `YYYY-MM-DD` date-input value. Partial or invalid input is treated
/// as an absent bound.
pub fn parse_date_bound(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::parse_timestamp;

    fn snap(id: &str, message: &str, username: &str, created_at: &str) -> Snap {
        Snap {
            id: id.into(),
            message: message.into(),
            username: username.into(),
            email: format!("{username}@example.com"),
            created_at: parse_timestamp(created_at),
            likes: 0,
            hashtags: Default::default(),
            is_blocked: false,
        }
    }

    fn sample() -> Vec<Snap> {
        vec![
            snap("1", "hi", "ana", "2024-01-05"),
            snap("2", "bye", "bob", "2024-02-10"),
        ]
    }

    fn date(s: &str) -> Option<NaiveDate> {
        parse_date_bound(s)
    }

    #[test]
    fn username_term_example() {
        let mut f = FilterCriteria::default();
        f.set_mode(FilterMode::Username);
        f.set_term("an");
        assert_eq!(f.apply(&sample()), vec![0]);
    }

    #[test]
    fn date_range_example() {
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2024-02-01"));
        f.set_end(date("2024-02-28"));
        assert_eq!(f.apply(&sample()), vec![1]);
    }

    #[test]
    fn term_match_is_case_insensitive_substring() {
        let snaps = vec![
            snap("1", "Hello World", "x", "2024-01-01"),
            snap("2", "nothing here", "y", "2024-01-01"),
            snap("3", "say HELLO", "z", "2024-01-01"),
        ];
        let mut f = FilterCriteria::default();
        f.set_term("hElLo");
        assert_eq!(f.apply(&snaps), vec![0, 2]);
    }

    #[test]
    fn empty_term_matches_everything() {
        let f = FilterCriteria::default();
        assert_eq!(f.apply(&sample()), vec![0, 1]);
    }

    #[test]
    fn start_day_is_exclusive_end_day_is_inclusive() {
        let snaps = vec![
            snap("a", "", "", "2024-03-01T09:00:00Z"),
            snap("b", "", "", "2024-03-02T00:00:00Z"),
            snap("c", "", "", "2024-03-10T23:59:59.500Z"),
            snap("d", "", "", "2024-03-11T00:00:00Z"),
        ];
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2024-03-01"));
        f.set_end(date("2024-03-10"));
        assert_eq!(f.apply(&snaps), vec![1, 2]);
    }

    #[test]
    fn same_start_and_end_matches_nothing() {
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2024-02-10"));
        f.set_end(date("2024-02-10"));
        assert!(f.apply(&sample()).is_empty());
    }

    #[test]
    fn snaps_without_dates_never_match_a_range() {
        let snaps = vec![snap("1", "", "", "garbage")];
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2000-01-01"));
        f.set_end(date("2100-01-01"));
        assert!(f.apply(&snaps).is_empty());
    }

    #[test]
    fn incomplete_range_matches_everything() {
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2024-02-01"));
        assert_eq!(f.apply(&sample()), vec![0, 1]);
    }

    #[test]
    fn carried_term_matches_dates_until_range_is_complete() {
        let mut f = FilterCriteria::default();
        f.set_term("zzz");
        f.set_mode(FilterMode::CreatedAt);
        assert_eq!(f.term(), "zzz");
        assert!(f.apply(&sample()).is_empty());

        f.set_term("2024-02");
        assert_eq!(f.apply(&sample()), vec![1]);

        f.set_start(date("2024-01-01"));
        f.set_end(date("2024-01-31"));
        assert_eq!(f.apply(&sample()), vec![0]);
    }

    #[test]
    fn leaving_date_mode_clears_inputs() {
        let mut f = FilterCriteria::new(FilterMode::CreatedAt);
        f.set_start(date("2024-02-01"));
        f.set_end(date("2024-02-28"));
        f.set_mode(FilterMode::Message);
        assert_eq!(f.term(), "");
        assert!(f.start().is_none() && f.end().is_none());
        assert_eq!(f.apply(&sample()), vec![0, 1]);
    }

    #[test]
    fn switching_between_text_modes_clears_term() {
        let mut f = FilterCriteria::default();
        f.set_term("hi");
        f.set_mode(FilterMode::Username);
        assert_eq!(f.term(), "");
    }

    #[test]
    fn partial_date_input_is_absent() {
        assert_eq!(date("2024-02"), None);
        assert_eq!(date(" 2024-02-03 "), NaiveDate::from_ymd_opt(2024, 2, 3));
    }

    #[test]
    fn summary_text() {
        let mut f = FilterCriteria::default();
        assert_eq!(f.summary(), "Message");
        f.set_term("rust");
        assert_eq!(f.summary(), "Message ~ \"rust\"");
        f.set_mode(FilterMode::CreatedAt);
        f.set_start(date("2024-01-01"));
        assert_eq!(f.summary(), "Date 2024-01-01 → … ~ \"rust\"");
        f.set_end(date("2024-01-31"));
        assert_eq!(f.summary(), "Date 2024-01-01 → 2024-01-31");
    }
}
