use chrono::{DateTime, NaiveDate, Utc};

/// Remembered start/end strings for the linked date pair.
///
/// Both hold raw field text rather than parsed dates, so an unparsable entry
/// is remembered verbatim. `start` also follows the value written back when
/// an end edit carries the interval over; that write is not a separate start
/// edit in a browser page, but treating it as one keeps repeated end edits at
/// a constant interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateLink {
    pub start: String,
    pub end: String,
}

impl DateLink {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn on_start_changed(&self, value: &str) -> DateLink {
        DateLink {
            start: value.to_string(),
            end: self.end.clone(),
        }
    }

    /// Returns the advanced state and, when the interval could be carried
    /// over, the new start date to write. The interval is measured from the
    /// remembered pair before `value` is taken into account.
    pub fn on_end_changed(&self, value: &str) -> (DateLink, Option<String>) {
        let shifted = shifted_start(&self.start, &self.end, value);
        let next = DateLink {
            start: shifted.clone().unwrap_or_else(|| self.start.clone()),
            end: value.to_string(),
        };
        (next, shifted)
    }
}

fn shifted_start(old_start: &str, old_end: &str, new_end: &str) -> Option<String> {
    let new_end = parse_timestamp(new_end)?;
    let old_start = parse_timestamp(old_start)?;
    let old_end = parse_timestamp(old_end)?;
    let delta = old_end.signed_duration_since(old_start);
    let start = new_end.checked_sub_signed(delta)?;
    Some(iso_date(start))
}

/// Parses a date field value as a UTC timestamp. Bare `YYYY-MM-DD` dates
/// are taken as midnight UTC; full RFC 3339 timestamps are also accepted.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn iso_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_edit_keeps_interval() {
        let link = DateLink::new("2024-01-01", "2024-01-08");
        let (next, start) = link.on_end_changed("2024-02-01");
        assert_eq!(start.as_deref(), Some("2024-01-25"));
        assert_eq!(next, DateLink::new("2024-01-25", "2024-02-01"));
    }

    #[test]
    fn epoch_dates_are_ordinary_dates() {
        let link = DateLink::new("1970-01-01", "1970-01-08");
        let (next, start) = link.on_end_changed("1970-02-01");
        assert_eq!(start.as_deref(), Some("1970-01-25"));
        assert_eq!(next, DateLink::new("1970-01-25", "1970-02-01"));

        let link = DateLink::new("1969-12-25", "1970-01-01");
        let (_, start) = link.on_end_changed("1970-01-01");
        assert_eq!(start.as_deref(), Some("1969-12-25"));
    }

    #[test]
    fn end_edit_across_month_and_leap_day() {
        let link = DateLink::new("2024-02-20", "2024-03-05");
        let (_, start) = link.on_end_changed("2025-03-01");
        // 14 day interval
        assert_eq!(start.as_deref(), Some("2025-02-15"));
    }

    #[test]
    fn negative_interval_is_preserved() {
        let link = DateLink::new("2024-01-10", "2024-01-07");
        let (_, start) = link.on_end_changed("2024-01-20");
        assert_eq!(start.as_deref(), Some("2024-01-23"));
    }

    #[test]
    fn empty_remembered_start_skips() {
        let link = DateLink::new("", "2024-01-08");
        let (next, start) = link.on_end_changed("2024-02-01");
        assert_eq!(start, None);
        assert_eq!(next.end, "2024-02-01");
        assert_eq!(next.start, "");
    }

    #[test]
    fn empty_remembered_end_skips() {
        let link = DateLink::new("2024-01-01", "");
        let (next, start) = link.on_end_changed("2024-02-01");
        assert_eq!(start, None);
        assert_eq!(next.end, "2024-02-01");
    }

    #[test]
    fn unparsable_new_end_skips_but_advances() {
        let link = DateLink::new("2024-01-01", "2024-01-08");
        let (next, start) = link.on_end_changed("next week-ish");
        assert_eq!(start, None);
        assert_eq!(next.start, "2024-01-01");
        assert_eq!(next.end, "next week-ish");

        // The garbage end is now remembered, so the following edit cannot
        // derive an interval either.
        let (after, start) = next.on_end_changed("2024-03-01");
        assert_eq!(start, None);
        assert_eq!(after.end, "2024-03-01");
    }

    #[test]
    fn unparsable_remembered_start_skips() {
        let link = DateLink::new("soon", "2024-01-08");
        let (_, start) = link.on_end_changed("2024-02-01");
        assert_eq!(start, None);
    }

    #[test]
    fn start_edit_only_updates_memory() {
        let link = DateLink::new("2024-01-01", "2024-01-08");
        let next = link.on_start_changed("2024-01-05");
        assert_eq!(next, DateLink::new("2024-01-05", "2024-01-08"));
        let (_, start) = next.on_end_changed("2024-01-10");
        assert_eq!(start.as_deref(), Some("2024-01-07"));
    }

    #[test]
    fn rfc3339_values_use_millisecond_delta() {
        let link = DateLink::new("2024-01-01T12:00:00Z", "2024-01-02T00:00:00Z");
        let (_, start) = link.on_end_changed("2024-01-10");
        // 12h earlier than midnight on the 10th lands on the 9th.
        assert_eq!(start.as_deref(), Some("2024-01-09"));
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("2024-13-01").is_none());
        assert!(parse_timestamp("2024-02-30").is_none());
        assert!(parse_timestamp(" 2024-02-29 ").is_some());
    }
}
