//! Calendar days in the tracker's configured UTC offset.
//!
//! Logs are keyed by the local date; instants stay in UTC everywhere else.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

/// Offset of the machine the service runs on.
pub fn server_offset() -> FixedOffset {
    *Local::now().offset()
}

pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

pub fn local_hour(now: DateTime<Utc>, offset: FixedOffset) -> u32 {
    now.with_timezone(&offset).hour()
}

fn to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    (local - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// Local midnight opening `date`.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    to_utc(date.and_time(NaiveTime::MIN), offset)
}

/// Last local millisecond of `date`.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(date, offset) + Duration::days(1) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dhaka() -> FixedOffset {
        offset_from_minutes(6 * 60).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_local_date_east_of_utc_rolls_forward() {
        let now = Utc.with_ymd_and_hms(2026, 2, 12, 20, 0, 0).unwrap();
        assert_eq!(local_date(now, dhaka()), date(2026, 2, 13));
        assert_eq!(local_hour(now, dhaka()), 2);
        assert_eq!(local_date(now, offset_from_minutes(0).unwrap()), date(2026, 2, 12));
    }

    #[test]
    fn test_local_date_west_of_utc_lags() {
        let now = Utc.with_ymd_and_hms(2026, 2, 13, 3, 0, 0).unwrap();
        let new_york = offset_from_minutes(-5 * 60).unwrap();
        assert_eq!(local_date(now, new_york), date(2026, 2, 12));
    }

    #[test]
    fn test_day_bounds_follow_offset() {
        let day = date(2026, 2, 13);
        assert_eq!(
            start_of_day(day, dhaka()),
            Utc.with_ymd_and_hms(2026, 2, 12, 18, 0, 0).unwrap()
        );
        let eod = end_of_day(day, dhaka());
        assert_eq!(local_date(eod, dhaka()), day);
        assert_eq!(
            local_date(eod + Duration::milliseconds(1), dhaka()),
            date(2026, 2, 14)
        );
    }

    #[test]
    fn test_utc_end_of_day_is_last_millisecond() {
        let utc = offset_from_minutes(0).unwrap();
        let day = date(2026, 2, 10);
        let eod = end_of_day(day, utc);
        assert_eq!(eod.date_naive(), day);
        assert_eq!((eod + Duration::milliseconds(1)).date_naive(), date(2026, 2, 11));
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(offset_from_minutes(24 * 60).is_none());
        assert!(offset_from_minutes(i32::MAX).is_none());
    }
}
