use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Resolves a typed date relative to `base`: ISO dates, `today`/`tomorrow`/
/// `yesterday`, signed offsets (`+3d`, `-1w`, `+1m`) and weekday names
/// (`fri`, `next fri`).
pub(crate) fn parse_relative_date_input(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    match trimmed.as_str() {
        "today" => Some(base),
        "tomorrow" => base.succ_opt(),
        "yesterday" => base.pred_opt(),
        _ => parse_offset(&trimmed, base).or_else(|| parse_weekday_input(&trimmed, base)),
    }
}

/// What a date field holds after the user commits `raw`: the ISO form when
/// it resolves, otherwise the text exactly as typed.
pub(crate) fn normalize_date_input(raw: &str, base: NaiveDate) -> String {
    match parse_relative_date_input(raw, base) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}

fn parse_offset(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let (sign, rest) = match input.as_bytes().first()? {
        b'+' => (1i64, &input[1..]),
        b'-' => (-1i64, &input[1..]),
        _ => (1i64, input),
    };
    let unit = rest.chars().last()?;
    let qty: i64 = rest[..rest.len() - unit.len_utf8()].parse().ok()?;
    let qty = qty.checked_mul(sign)?;

    match unit {
        'd' => base.checked_add_signed(Duration::try_days(qty)?),
        'w' => base.checked_add_signed(Duration::try_weeks(qty)?),
        'm' => add_months(base, qty),
        _ => None,
    }
}

fn parse_weekday_input(input: &str, base: NaiveDate) -> Option<NaiveDate> {
    let mut parts = input.split_whitespace();
    let (force_next, token) = match (parts.next()?, parts.next(), parts.next()) {
        ("next", Some(day), None) => (true, day),
        (day, None, None) => (false, day),
        _ => return None,
    };
    let weekday = parse_weekday(token)?;
    let from = base.weekday().num_days_from_monday() as i64;
    let to = weekday.num_days_from_monday() as i64;
    let mut delta = (to - from).rem_euclid(7);
    if force_next && delta == 0 {
        delta = 7;
    }
    base.checked_add_signed(Duration::days(delta))
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    const DAYS: [(&str, Weekday); 7] = [
        ("mon", Weekday::Mon),
        ("tue", Weekday::Tue),
        ("wed", Weekday::Wed),
        ("thu", Weekday::Thu),
        ("fri", Weekday::Fri),
        ("sat", Weekday::Sat),
        ("sun", Weekday::Sun),
    ];
    DAYS.iter()
        .find(|(prefix, _)| token.starts_with(prefix))
        .map(|(_, day)| *day)
}

fn add_months(base: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total = (base.year() as i64 * 12 + base.month0() as i64).checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    // Clamp to the target month's length (Jan 31 + 1m = Feb 28/29).
    (1..=base.day())
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        // Wednesday
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_relative_date_input("today", base()), Some(base()));
        assert_eq!(
            parse_relative_date_input(" Tomorrow ", base()),
            Some(base() + Duration::days(1))
        );
        assert_eq!(
            parse_relative_date_input("yesterday", base()),
            Some(base() - Duration::days(1))
        );
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(
            parse_relative_date_input("+3d", base()),
            Some(base() + Duration::days(3))
        );
        assert_eq!(
            parse_relative_date_input("2w", base()),
            Some(base() + Duration::weeks(2))
        );
        assert_eq!(
            parse_relative_date_input("-1w", base()),
            Some(base() - Duration::weeks(1))
        );
        assert_eq!(parse_relative_date_input("+d", base()), None);
        assert_eq!(parse_relative_date_input("+3y", base()), None);
    }

    #[test]
    fn parses_weekdays() {
        let next_mon = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(parse_relative_date_input("mon", base()), Some(next_mon));
        assert_eq!(parse_relative_date_input("wed", base()), Some(base()));
        assert_eq!(
            parse_relative_date_input("next wed", base()),
            Some(base() + Duration::days(7))
        );
        assert_eq!(parse_relative_date_input("next", base()), None);
    }

    #[test]
    fn clamps_month_length() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            parse_relative_date_input("+1m", jan31),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            parse_relative_date_input("-2m", jan31),
            NaiveDate::from_ymd_opt(2023, 11, 30)
        );
    }

    #[test]
    fn normalize_keeps_unresolved_text() {
        assert_eq!(normalize_date_input("+1d", base()), "2025-01-16");
        assert_eq!(normalize_date_input("2025-02-02", base()), "2025-02-02");
        assert_eq!(normalize_date_input("someday", base()), "someday");
        assert_eq!(normalize_date_input("", base()), "");
    }

    #[test]
    fn out_of_range_offsets_pass_through() {
        assert_eq!(
            normalize_date_input("+99999999999999999d", base()),
            "+99999999999999999d"
        );
        assert_eq!(
            normalize_date_input("+99999999999999w", base()),
            "+99999999999999w"
        );
        assert_eq!(normalize_date_input("-9999999999d", base()), "-9999999999d");
        assert_eq!(
            normalize_date_input("+9223372036854775807m", base()),
            "+9223372036854775807m"
        );
    }
}
