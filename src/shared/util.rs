use once_cell::sync::Lazy;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, Weekday};

/// All calendar state (day boundaries, week starts) lives in JST.
pub static JST: Lazy<UtcOffset> =
    Lazy::new(|| UtcOffset::from_hms(9, 0, 0).expect("UTC+9 is a valid offset."));

pub fn jst_now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(*JST)
}

pub fn jst_today() -> Date {
    jst_now().date()
}

/// The Monday that starts the calendar week containing `date`.
pub fn week_start_of(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// The next local midnight strictly after `now`. `now` must already carry
/// the JST offset.
pub fn next_daily_occurrence(now: OffsetDateTime) -> OffsetDateTime {
    PrimitiveDateTime::new(now.date(), Time::MIDNIGHT).assume_offset(now.offset())
        + Duration::days(1)
}

/// The next Monday midnight strictly after `now`.
pub fn next_weekly_occurrence(now: OffsetDateTime) -> OffsetDateTime {
    let mut next = next_daily_occurrence(now);
    while next.weekday() != Weekday::Monday {
        next += Duration::days(1);
    }
    next
}

/// Keycap rendering used for the lucky number: 7 -> 7⃣, 12 -> 1⃣2⃣.
pub fn number_emoji(number: u8) -> String {
    if number <= 10 {
        format!("{}\u{20e3}", number)
    } else {
        format!("1\u{20e3}{}\u{20e3}", number - 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-05-25 is a Sunday, 2025-05-26 a Monday.
        assert_eq!(
            week_start_of(date(2025, Month::May, 25)),
            date(2025, Month::May, 19)
        );
        assert_eq!(
            week_start_of(date(2025, Month::May, 26)),
            date(2025, Month::May, 26)
        );
        assert_eq!(
            week_start_of(date(2025, Month::May, 28)),
            date(2025, Month::May, 26)
        );
    }

    #[test]
    fn daily_occurrence_is_the_next_midnight() {
        let now = PrimitiveDateTime::new(date(2025, Month::May, 25), Time::from_hms(13, 0, 0).unwrap())
            .assume_offset(*JST);
        let next = next_daily_occurrence(now);
        assert_eq!(next.date(), date(2025, Month::May, 26));
        assert_eq!(next.time(), Time::MIDNIGHT);
        assert!(next > now);
    }

    #[test]
    fn weekly_occurrence_lands_on_monday_midnight() {
        let sunday = PrimitiveDateTime::new(date(2025, Month::May, 25), Time::from_hms(9, 30, 0).unwrap())
            .assume_offset(*JST);
        let next = next_weekly_occurrence(sunday);
        assert_eq!(next.date(), date(2025, Month::May, 26));
        assert_eq!(next.time(), Time::MIDNIGHT);

        // Already Monday: the job fires next week, never twice a day.
        let monday = PrimitiveDateTime::new(date(2025, Month::May, 26), Time::from_hms(10, 0, 0).unwrap())
            .assume_offset(*JST);
        let next = next_weekly_occurrence(monday);
        assert_eq!(next.date(), date(2025, Month::June, 2));
    }

    #[test]
    fn keycap_rendering_matches_the_panel() {
        assert_eq!(number_emoji(1), "1\u{20e3}");
        assert_eq!(number_emoji(10), "10\u{20e3}");
        assert_eq!(number_emoji(11), "1\u{20e3}1\u{20e3}");
        assert_eq!(number_emoji(15), "1\u{20e3}5\u{20e3}");
    }
}
