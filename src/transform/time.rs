use crate::config::TimeFormat;
use crate::types::TimeRow;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Calendar breakdown of an epoch-millisecond timestamp, in UTC.
///
/// Returns `None` when `ts` is outside the range chrono can represent.
pub fn time_row(ts: i64, format: TimeFormat) -> Option<TimeRow> {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(ts)?;

    Some(TimeRow {
        start_time: dt.format(format.pattern()).to_string(),
        hour: dt.hour(),
        day: dt.day(),
        week: dt.iso_week().week(),
        month: dt.month(),
        year: dt.year(),
        weekday: dt.weekday().num_days_from_monday(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown() {
        // 2018-11-02 01:25:34.796 UTC, a Friday
        let row = time_row(1541121934796, TimeFormat::TwentyFourHour).unwrap();

        assert_eq!(
            row,
            TimeRow {
                start_time: "2018-11-02 01:25:34".to_string(),
                hour: 1,
                day: 2,
                week: 44,
                month: 11,
                year: 2018,
                weekday: 4,
            }
        );
    }

    #[test]
    fn test_afternoon_formats() {
        // 2018-11-02 13:25:34 UTC
        let ts = 1541121934796 + 12 * 3600 * 1000;

        let row = time_row(ts, TimeFormat::TwentyFourHour).unwrap();
        assert_eq!(row.start_time, "2018-11-02 13:25:34");
        assert_eq!(row.hour, 13);

        // The 12-hour key drops the half of the day, the hour column does not
        let legacy = time_row(ts, TimeFormat::Legacy12Hour).unwrap();
        assert_eq!(legacy.start_time, "2018-11-02 01:25:34");
        assert_eq!(legacy.hour, 13);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2018-12-31 is a Monday in ISO week 1 of 2019
        let row = time_row(1546214400000, TimeFormat::TwentyFourHour).unwrap();
        assert_eq!(row.start_time, "2018-12-31 00:00:00");
        assert_eq!(row.week, 1);
        assert_eq!(row.year, 2018);
        assert_eq!(row.weekday, 0);
    }

    #[test]
    fn test_out_of_range() {
        assert!(time_row(i64::MAX, TimeFormat::TwentyFourHour).is_none());
    }
}
