//! Pay period domain logic.
//!
//! Commissions are settled weekly over a fixed window that starts on Thursday
//! at 00:00 and ends on the following Wednesday at 23:59. The window that
//! encloses a timestamp is derived from the calendar date of that timestamp
//! in the organization's timezone. Every part of the backend that needs a
//! pay period goes through [`PayPeriodCalculator`].

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, Utc, Weekday};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{PortalError, PortalResult};

/// Weekday every pay period starts on
pub const PERIOD_START_WEEKDAY: Weekday = Weekday::Thu;

/// Days between the first and last day of a period
const PERIOD_SPAN_DAYS: u64 = 6;

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Offset-aware timestamp layouts accepted as anchors, besides RFC 3339
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// Naive layouts, read as wall-clock time in the organization's timezone
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &[ISO_FORMAT, DISPLAY_FORMAT];

/// Number of days to roll back from `weekday` to reach the period start.
///
/// Sunday = 0 ... Saturday = 6, so Thursday (4) maps to 0: a Thursday is the
/// start of its own period, never of the previous one.
pub fn days_since_period_start(weekday: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - PERIOD_START_WEEKDAY.num_days_from_sunday()) % 7
}

/// A Thursday-to-Wednesday window.
///
/// Only the calendar days matter for equality: two periods derived from
/// different anchors in the same week are the same period.
#[derive(Debug, Clone, Copy)]
pub struct PayPeriod {
    anchor: DateTime<FixedOffset>,
    start: NaiveDate,
    end: NaiveDate,
}

impl PayPeriod {
    /// Build the period enclosing a calendar date
    pub fn containing_date(date: NaiveDate, anchor: DateTime<FixedOffset>) -> PortalResult<Self> {
        let rollback = days_since_period_start(date.weekday());
        let start = date
            .checked_sub_days(Days::new(rollback as u64))
            .ok_or_else(|| PortalError::invalid_input(format!("Date {} is out of range", date)))?;
        let end = start
            .checked_add_days(Days::new(PERIOD_SPAN_DAYS))
            .ok_or_else(|| PortalError::invalid_input(format!("Date {} is out of range", date)))?;

        Ok(Self { anchor, start, end })
    }

    pub fn anchor(&self) -> DateTime<FixedOffset> {
        self.anchor
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    pub fn start_iso(&self) -> String {
        self.start.format(ISO_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(ISO_FORMAT).to_string()
    }

    pub fn start_display(&self) -> String {
        self.start.format(DISPLAY_FORMAT).to_string()
    }

    pub fn end_display(&self) -> String {
        self.end.format(DISPLAY_FORMAT).to_string()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The period starting the day after this one ends
    pub fn next(&self) -> PortalResult<Self> {
        let date = self
            .end
            .succ_opt()
            .ok_or_else(|| PortalError::invalid_input("No period after the last representable date"))?;
        Self::containing_date(date, self.anchor)
    }

    /// The period ending the day before this one starts
    pub fn previous(&self) -> PortalResult<Self> {
        let date = self
            .start
            .pred_opt()
            .ok_or_else(|| PortalError::invalid_input("No period before the first representable date"))?;
        Self::containing_date(date, self.anchor)
    }
}

impl PartialEq for PayPeriod {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
    }
}

impl Eq for PayPeriod {}

impl Hash for PayPeriod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_display(), self.end_display())
    }
}

/// Derives pay periods in a fixed organizational timezone
#[derive(Debug, Clone, Copy)]
pub struct PayPeriodCalculator {
    offset: FixedOffset,
}

impl PayPeriodCalculator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The period enclosing `anchor`, read in the organization's timezone
    pub fn compute_period(&self, anchor: DateTime<FixedOffset>) -> PortalResult<PayPeriod> {
        let local = anchor.with_timezone(&self.offset);
        PayPeriod::containing_date(local.date_naive(), local)
    }

    /// Parse `raw` as an anchor timestamp and compute its period
    pub fn compute_from_str(&self, raw: &str) -> PortalResult<PayPeriod> {
        let anchor = self.parse_anchor(raw)?;
        self.compute_period(anchor)
    }

    /// The period enclosing the given clock reading
    pub fn current_period(&self, now: DateTime<Utc>) -> PortalResult<PayPeriod> {
        self.compute_period(now.with_timezone(&self.offset))
    }

    /// Calendar date of a timestamp in the organization's timezone
    pub fn local_date(&self, timestamp: DateTime<FixedOffset>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    pub fn contains(&self, period: &PayPeriod, timestamp: DateTime<FixedOffset>) -> bool {
        period.contains_date(self.local_date(timestamp))
    }

    /// Interpret a stored or user-supplied timestamp.
    ///
    /// Timestamps with an explicit offset keep it; naive timestamps and bare
    /// dates are taken as wall-clock time in the organization's timezone.
    pub fn parse_anchor(&self, raw: &str) -> PortalResult<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PortalError::invalid_input("Anchor timestamp is empty"));
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(parsed);
        }
        for format in OFFSET_FORMATS {
            if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
                return Ok(parsed);
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return self.localize(naive, raw);
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                let midnight = date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| PortalError::invalid_input(format!("Invalid date: {}", raw)))?;
                return self.localize(midnight, raw);
            }
        }

        Err(PortalError::invalid_input(format!(
            "Could not parse '{}' as a timestamp",
            raw
        )))
    }

    /// Start of the first day and start of the day after the last day, in
    /// the organization's timezone. Half-open: `start <= t < end`.
    pub fn bounds(&self, period: &PayPeriod) -> PortalResult<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let start = self.midnight(period.start_date())?;
        let day_after = period
            .end_date()
            .succ_opt()
            .ok_or_else(|| PortalError::invalid_input("Period end is out of range"))?;
        let end = self.midnight(day_after)?;
        Ok((start, end))
    }

    fn midnight(&self, date: NaiveDate) -> PortalResult<DateTime<FixedOffset>> {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| PortalError::invalid_input(format!("Invalid date: {}", date)))?;
        self.localize(naive, &date.to_string())
    }

    fn localize(&self, naive: NaiveDateTime, raw: &str) -> PortalResult<DateTime<FixedOffset>> {
        naive
            .and_local_timezone(self.offset)
            .single()
            .ok_or_else(|| PortalError::invalid_input(format!("Timestamp '{}' is out of range", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn brasilia() -> PayPeriodCalculator {
        PayPeriodCalculator::new(FixedOffset::west_opt(3 * 3600).unwrap())
    }

    fn utc() -> PayPeriodCalculator {
        PayPeriodCalculator::new(FixedOffset::east_opt(0).unwrap())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, ISO_FORMAT).unwrap()
    }

    #[test]
    fn test_days_since_period_start() {
        assert_eq!(days_since_period_start(Weekday::Thu), 0);
        assert_eq!(days_since_period_start(Weekday::Fri), 1);
        assert_eq!(days_since_period_start(Weekday::Sun), 3);
        assert_eq!(days_since_period_start(Weekday::Mon), 4);
        assert_eq!(days_since_period_start(Weekday::Wed), 6);
    }

    #[test]
    fn test_thursday_anchor_maps_to_itself() {
        let period = brasilia().compute_from_str("2024-03-14T10:00:00").unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");
        assert_eq!(period.end_iso(), "2024-03-20");
    }

    #[test]
    fn test_monday_late_evening() {
        let period = brasilia().compute_from_str("2024-03-18T23:59:00").unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");
        assert_eq!(period.end_iso(), "2024-03-20");
    }

    #[test]
    fn test_last_day_of_window() {
        let period = brasilia().compute_from_str("2024-03-20T00:00:01").unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");
        assert_eq!(period.end_iso(), "2024-03-20");
    }

    #[test]
    fn test_next_thursday_starts_new_period() {
        let period = brasilia().compute_from_str("2024-03-21T00:00:00").unwrap();
        assert_eq!(period.start_iso(), "2024-03-21");
        assert_eq!(period.end_iso(), "2024-03-27");
    }

    #[test]
    fn test_thursday_midnight_is_not_rolled_back() {
        let period = utc().compute_from_str("2024-03-14 00:00:00").unwrap();
        assert_eq!(period.start_date(), date("2024-03-14"));
    }

    #[test]
    fn test_window_length_and_weekday_for_every_anchor() {
        let calculator = brasilia();
        let first = date("2023-12-01").and_hms_opt(0, 0, 0).unwrap();

        // Every 5 hours over roughly two years, crossing a leap day
        for step in 0..3600 {
            let naive = first + Duration::hours(5 * step);
            let anchor = naive.and_local_timezone(calculator.offset()).single().unwrap();
            let period = calculator.compute_period(anchor).unwrap();

            assert_eq!(period.end_date() - period.start_date(), Duration::days(6));
            assert_eq!(period.start_date().weekday(), Weekday::Thu);
            assert_eq!(period.end_date().weekday(), Weekday::Wed);
            assert!(period.contains_date(naive.date()));
        }
    }

    #[test]
    fn test_same_window_gives_same_period() {
        let calculator = brasilia();
        let earliest = calculator.compute_from_str("2024-02-29 00:00:00").unwrap();
        let latest = calculator.compute_from_str("2024-03-06 23:59:59").unwrap();
        let middle = calculator.compute_from_str("2024-03-03T12:30:00-03:00").unwrap();

        assert_eq!(earliest, latest);
        assert_eq!(earliest, middle);
        assert_eq!(earliest.start_iso(), "2024-02-29");
        assert_ne!(earliest.anchor(), latest.anchor());
    }

    #[test]
    fn test_display_and_iso_denote_same_date() {
        let period = brasilia().compute_from_str("2024-12-30T08:00:00").unwrap();

        for (iso, display) in [
            (period.start_iso(), period.start_display()),
            (period.end_iso(), period.end_display()),
        ] {
            let from_iso = NaiveDate::parse_from_str(&iso, ISO_FORMAT).unwrap();
            let from_display = NaiveDate::parse_from_str(&display, DISPLAY_FORMAT).unwrap();
            assert_eq!(from_iso, from_display);
        }
        assert_eq!(period.start_display(), "26/12/2024");
        assert_eq!(period.end_display(), "01/01/2025");
        assert_eq!(period.to_string(), "26/12/2024 - 01/01/2025");
    }

    #[test]
    fn test_offset_anchor_is_read_in_organization_timezone() {
        let calculator = brasilia();

        // Thursday 02:00 UTC is still Wednesday 23:00 in Brasilia
        let period = calculator.compute_from_str("2024-03-21T02:00:00Z").unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");

        // Same instant in UTC already belongs to the next period
        let period = utc().compute_from_str("2024-03-21T02:00:00Z").unwrap();
        assert_eq!(period.start_iso(), "2024-03-21");
    }

    #[test]
    fn test_postgres_style_timestamps() {
        let calculator = brasilia();
        let period = calculator
            .compute_from_str("2024-03-18 13:45:12.123456+00")
            .unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");

        let anchor = calculator.parse_anchor("2024-03-18 13:45:12+00:00").unwrap();
        assert_eq!(anchor.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_naive_and_date_only_anchors_use_organization_offset() {
        let calculator = brasilia();
        let anchor = calculator.parse_anchor("2024-03-18").unwrap();
        assert_eq!(anchor.offset().local_minus_utc(), -3 * 3600);
        assert_eq!(anchor.to_rfc3339(), "2024-03-18T00:00:00-03:00");

        let anchor = calculator.parse_anchor("18/03/2024").unwrap();
        assert_eq!(calculator.local_date(anchor), date("2024-03-18"));
    }

    #[test]
    fn test_unparseable_anchor_is_invalid_input() {
        let calculator = brasilia();
        for raw in ["", "   ", "yesterday", "2024-13-01", "2024-02-30T10:00:00"] {
            match calculator.compute_from_str(raw) {
                Err(PortalError::InvalidInput(_)) => {}
                other => panic!("Expected InvalidInput for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_next_and_previous() {
        let period = brasilia().compute_from_str("2024-03-18").unwrap();
        let next = period.next().unwrap();
        let previous = period.previous().unwrap();

        assert_eq!(next.start_iso(), "2024-03-21");
        assert_eq!(previous.start_iso(), "2024-03-07");
        assert_eq!(previous.next().unwrap(), period);
    }

    #[test]
    fn test_bounds_are_half_open_days() {
        let calculator = brasilia();
        let period = calculator.compute_from_str("2024-03-18").unwrap();
        let (start, end) = calculator.bounds(&period).unwrap();

        assert_eq!(start.to_rfc3339(), "2024-03-14T00:00:00-03:00");
        assert_eq!(end.to_rfc3339(), "2024-03-21T00:00:00-03:00");

        let last_second = calculator.parse_anchor("2024-03-20T23:59:59-03:00").unwrap();
        assert!(calculator.contains(&period, last_second));
        assert!(!calculator.contains(&period, end));
    }

    #[test]
    fn test_current_period_uses_clock() {
        let now = DateTime::parse_from_rfc3339("2024-03-16T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let period = brasilia().current_period(now).unwrap();
        assert_eq!(period.start_iso(), "2024-03-14");
    }

    #[test]
    fn test_edge_of_calendar_is_invalid_input() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let at_midnight = |date: NaiveDate| {
            date.and_hms_opt(0, 0, 0)
                .unwrap()
                .and_local_timezone(offset)
                .single()
                .unwrap()
        };

        // Only a Wednesday at the very end of the calendar has a representable period
        let result = utc().compute_period(at_midnight(NaiveDate::MAX));
        assert_eq!(result.is_err(), NaiveDate::MAX.weekday() != Weekday::Wed);
        if let Err(err) = result {
            assert!(matches!(err, PortalError::InvalidInput(_)));
        }

        let result = utc().compute_period(at_midnight(NaiveDate::MIN));
        assert_eq!(result.is_err(), NaiveDate::MIN.weekday() != Weekday::Thu);
    }
}
