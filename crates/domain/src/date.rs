use chrono::prelude::*;
use chrono::LocalResult;
use chrono_tz::Tz;

/// Interprets a wall clock time in `tz` as an instant.
///
/// Ambiguous times (DST fall back) resolve to the earliest instant and
/// nonexistent ones (DST spring forward) are shifted by the gap.
pub fn assume_timezone(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let shifted = naive + chrono::Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
        }
    }
}

/// The calendar date in `tz` at the given instant
pub fn local_date(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod test {
    use super::*;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .expect("Valid datetime")
    }

    #[test]
    fn naive_utc_is_unchanged() {
        let n = naive(2024, 5, 1, 12, 30);
        let utc = assume_timezone(n, &Tz::UTC);
        assert_eq!(utc, Utc.from_utc_datetime(&n));
    }

    #[test]
    fn naive_is_read_in_the_reference_timezone() {
        // Oslo is UTC+2 in May
        let n = naive(2024, 5, 1, 12, 0);
        let utc = assume_timezone(n, &chrono_tz::Europe::Oslo);
        assert_eq!(utc, Utc.from_utc_datetime(&naive(2024, 5, 1, 10, 0)));
    }

    #[test]
    fn nonexistent_local_time_is_shifted_past_the_gap() {
        // Clocks jump from 02:00 to 03:00 in Oslo on this date
        let n = naive(2024, 3, 31, 2, 30);
        let utc = assume_timezone(n, &chrono_tz::Europe::Oslo);
        assert_eq!(utc, Utc.from_utc_datetime(&naive(2024, 3, 31, 1, 30)));
    }

    #[test]
    fn local_date_depends_on_timezone() {
        let instant = Utc.from_utc_datetime(&naive(2024, 5, 1, 23, 30));
        assert_eq!(local_date(&instant, &Tz::UTC), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            local_date(&instant, &chrono_tz::Europe::Oslo),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }
}
