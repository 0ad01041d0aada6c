//! Booking date ranges.

use crate::error::CommerceError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Display format for a single date, e.g. "10 May 2025".
const DISPLAY_FORMAT: &str = "%d %b %Y";

/// A check-in / check-out pair.
///
/// Check-out is always strictly after check-in. Moving check-in onto or past
/// the current check-out drags check-out along to the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBookingDate", rename_all = "camelCase")]
pub struct BookingDate {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBookingDate {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<RawBookingDate> for BookingDate {
    type Error = CommerceError;

    fn try_from(raw: RawBookingDate) -> Result<Self, Self::Error> {
        BookingDate::new(raw.check_in, raw.check_out)
    }
}

impl BookingDate {
    /// Create a range, rejecting a check-out that is not after check-in.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, CommerceError> {
        if check_out <= check_in {
            return Err(CommerceError::InvalidDateRange {
                check_in: check_in.to_string(),
                check_out: check_out.to_string(),
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// A one-night range starting at `check_in`.
    pub fn starting(check_in: NaiveDate) -> Result<Self, CommerceError> {
        Ok(Self {
            check_in,
            check_out: next_day(check_in)?,
        })
    }

    /// Parse a range from ISO `YYYY-MM-DD` strings.
    ///
    /// A trailing time component (`2025-05-10T00:00:00.000Z`) is ignored.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, CommerceError> {
        Self::new(parse_date(check_in)?, parse_date(check_out)?)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Move check-in, pushing check-out forward when it would no longer be after it.
    ///
    /// Fails, leaving the range untouched, when there is no following day.
    pub fn set_check_in(&mut self, check_in: NaiveDate) -> Result<(), CommerceError> {
        if self.check_out <= check_in {
            self.check_out = next_day(check_in)?;
        }
        self.check_in = check_in;
        Ok(())
    }

    /// Move check-out. Dates on or before check-in are rejected.
    pub fn set_check_out(&mut self, check_out: NaiveDate) -> Result<(), CommerceError> {
        if check_out <= self.check_in {
            return Err(CommerceError::InvalidDateRange {
                check_in: self.check_in.to_string(),
                check_out: check_out.to_string(),
            });
        }
        self.check_out = check_out;
        Ok(())
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Human-readable range, e.g. "10 May 2025 - 11 May 2025".
    pub fn display(&self) -> String {
        format!(
            "{} - {}",
            self.check_in.format(DISPLAY_FORMAT),
            self.check_out.format(DISPLAY_FORMAT)
        )
    }
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, CommerceError> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| CommerceError::InvalidDate(date.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate, CommerceError> {
    let day = value.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| CommerceError::InvalidDate(value.to_string()))
}
