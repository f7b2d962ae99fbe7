//! Week and date arithmetic for the scheduler views
//!
//! Weeks start on Sunday. Week `n` of a year begins `(n - 1) * 7` days after
//! the Sunday on or before January 1, so week 1 may start in December of the
//! previous year.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::invariants;

/// First and last selectable week numbers
pub const MIN_WEEK: i32 = 1;
pub const MAX_WEEK: i32 = 52;

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const WIRE_FORMAT: &str = "%Y-%m-%d";

/// A Sunday-to-Saturday span of seven days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeekRange {
    /// The seven days of the week, Sunday first
    pub fn days(&self) -> [NaiveDate; 7] {
        let mut days = [self.start_date; 7];
        for (offset, day) in days.iter_mut().enumerate().skip(1) {
            *day = self.start_date + Duration::days(offset as i64);
        }
        days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Position of `date` within the week (0 = Sunday), if it falls inside
    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start_date).num_days() as usize)
        } else {
            None
        }
    }
}

impl std::fmt::Display for WeekRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            display_date(self.start_date),
            display_date(self.end_date)
        )
    }
}

/// Resolve `(year, week_number)` to its seven-day range.
///
/// `week_number` is not clamped; callers keep it within
/// [`MIN_WEEK`]..=[`MAX_WEEK`] (see [`clamp_week_number`]).
pub fn resolve_week_range(year: i32, week_number: i32) -> Result<WeekRange> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::InvalidDate(format!("year {} is out of range", year)))?;

    let offset_days = (i64::from(week_number) - 1) * 7;
    let align = i64::from(jan1.weekday().num_days_from_sunday());

    let start_date = jan1
        .checked_add_signed(Duration::days(offset_days - align))
        .ok_or_else(|| out_of_range(year, week_number))?;
    let end_date = start_date
        .checked_add_signed(Duration::days(6))
        .ok_or_else(|| out_of_range(year, week_number))?;

    let range = WeekRange {
        start_date,
        end_date,
    };
    invariants::assert_week_range_invariants(&range);
    Ok(range)
}

fn out_of_range(year: i32, week_number: i32) -> Error {
    Error::InvalidDate(format!("week {} of {} is out of range", week_number, year))
}

pub fn clamp_week_number(week_number: i32) -> i32 {
    week_number.clamp(MIN_WEEK, MAX_WEEK)
}

/// The `(year, week_number)` whose range contains `date`, clamped to the
/// selectable weeks of that year.
pub fn week_number_of(date: NaiveDate) -> (i32, i32) {
    let year = date.year();
    // Jan 1 always exists for a year taken from a valid date
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date);
    let align = i64::from(jan1.weekday().num_days_from_sunday());
    let days = (date - jan1).num_days();
    let week = (days + align) / 7 + 1;
    (year, clamp_week_number(week as i32))
}

/// `DD/MM/YYYY`, as shown to users
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// `YYYY-MM-DD`, as sent to the API
pub fn wire_date(date: NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

pub fn parse_display_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DISPLAY_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{:?}: {}", text, e)))
}

pub fn parse_wire_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), WIRE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{:?}: {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_week_of_2024() {
        // Jan 1, 2024 is a Monday
        let range = resolve_week_range(2024, 1).unwrap();
        assert_eq!(range.start_date, ymd(2023, 12, 31));
        assert_eq!(range.end_date, ymd(2024, 1, 6));
    }

    #[test]
    fn test_year_starting_on_sunday() {
        // Jan 1, 2023 is a Sunday
        let range = resolve_week_range(2023, 1).unwrap();
        assert_eq!(range.start_date, ymd(2023, 1, 1));
        assert_eq!(resolve_week_range(2023, 10).unwrap().start_date, ymd(2023, 3, 5));
    }

    #[test]
    fn test_range_spans_six_days_and_starts_on_sunday() {
        for year in 1999..=2031 {
            for week in MIN_WEEK..=MAX_WEEK {
                let range = resolve_week_range(year, week).unwrap();
                assert_eq!((range.end_date - range.start_date).num_days(), 6);
                assert_eq!(range.start_date.weekday(), Weekday::Sun);
            }
        }
    }

    #[test]
    fn test_week_one_starts_within_six_days_before_jan1() {
        for year in 1999..=2031 {
            let jan1 = ymd(year, 1, 1);
            let start = resolve_week_range(year, 1).unwrap().start_date;
            assert!(start <= jan1);
            assert!((jan1 - start).num_days() <= 6);
        }
    }

    #[test]
    fn test_unclamped_week_numbers() {
        assert_eq!(
            resolve_week_range(2024, 0).unwrap().start_date,
            ymd(2023, 12, 24)
        );
        assert_eq!(
            resolve_week_range(2024, 53).unwrap().start_date,
            ymd(2024, 12, 29)
        );
        assert!(resolve_week_range(i32::MAX, 1).is_err());
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(
            resolve_week_range(2025, 17).unwrap(),
            resolve_week_range(2025, 17).unwrap()
        );
    }

    #[test]
    fn test_week_number_of_inverts_resolve() {
        for week in MIN_WEEK..=MAX_WEEK {
            let range = resolve_week_range(2025, week).unwrap();
            for day in range.days() {
                if day.year() == 2025 {
                    assert_eq!(week_number_of(day), (2025, week));
                }
            }
        }
        // Last days of a year clamp to week 52
        assert_eq!(week_number_of(ymd(2024, 12, 31)), (2024, 52));
    }

    #[test]
    fn test_days_and_offsets() {
        let range = resolve_week_range(2024, 1).unwrap();
        let days = range.days();
        assert_eq!(days[0], range.start_date);
        assert_eq!(days[6], range.end_date);
        assert_eq!(range.day_offset(ymd(2024, 1, 3)), Some(3));
        assert_eq!(range.day_offset(ymd(2024, 1, 7)), None);
        assert_eq!(range.to_string(), "31/12/2023 - 06/01/2024");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_week_number(0), 1);
        assert_eq!(clamp_week_number(60), 52);
        assert_eq!(clamp_week_number(7), 7);
    }

    #[test]
    fn test_formatters_zero_pad() {
        let date = ymd(2024, 3, 5);
        assert_eq!(display_date(date), "05/03/2024");
        assert_eq!(wire_date(date), "2024-03-05");
    }

    #[test]
    fn test_wire_format_stable_through_display_parse() {
        let mut date = ymd(2023, 12, 25);
        for _ in 0..400 {
            let reparsed = parse_display_date(&display_date(date)).unwrap();
            assert_eq!(wire_date(reparsed), wire_date(date));
            assert_eq!(parse_wire_date(&wire_date(date)).unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_malformed_dates_rejected() {
        assert!(parse_wire_date("2024-13-01").is_err());
        assert!(parse_display_date("2024-01-01").is_err());
        assert!(parse_display_date("").is_err());
    }
}
