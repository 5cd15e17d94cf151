use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Utc};

/// Current UTC time without offset, the representation stored in the database.
pub fn now_naive_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Adds whole months to a date, clamping to the last day of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Number of whole months from `start` until `end`.
///
/// A month only counts once the day-of-month has been reached, so
/// 2024-01-31 → 2024-02-29 is zero months. Returns 0 when `end <= start`.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }
    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_whole_months_between() {
        assert_eq!(whole_months_between(d(2024, 1, 15), d(2024, 1, 20)), 0);
        assert_eq!(whole_months_between(d(2024, 1, 15), d(2024, 2, 15)), 1);
        assert_eq!(whole_months_between(d(2024, 1, 15), d(2024, 2, 14)), 0);
        assert_eq!(whole_months_between(d(2024, 1, 31), d(2024, 2, 29)), 0);
        assert_eq!(whole_months_between(d(2024, 3, 1), d(2026, 3, 1)), 24);
        assert_eq!(whole_months_between(d(2024, 3, 1), d(2023, 3, 1)), 0);
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2024, 1, 15), 12), d(2025, 1, 15));
    }
}
