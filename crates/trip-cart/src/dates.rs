//! Local fallback for booking dates the server does not echo back.

use crate::CartError;
use trip_cache::{cache_key, Cache};
use trip_commerce::cart::{BookingDate, MergedLineItem};
use trip_commerce::ActivityId;

const PREFIX: &str = "booking-date";

/// Booking dates remembered per activity.
///
/// Only read for display; the server remains authoritative.
#[derive(Debug, Clone)]
pub struct DateCache {
    cache: Cache,
}

impl DateCache {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    pub fn in_memory() -> Self {
        Self::new(Cache::in_memory())
    }

    pub fn remember(&self, activity_id: &ActivityId, dates: BookingDate) -> Result<(), CartError> {
        self.cache.set(&cache_key!(PREFIX, activity_id), &dates)?;
        Ok(())
    }

    /// Remembered dates for an activity. Unreadable entries count as absent.
    pub fn lookup(&self, activity_id: &ActivityId) -> Option<BookingDate> {
        match self.cache.get(&cache_key!(PREFIX, activity_id)) {
            Ok(dates) => dates,
            Err(e) => {
                tracing::debug!(activity_id = %activity_id, error = %e, "ignoring unreadable booking date");
                None
            }
        }
    }

    pub fn forget(&self, activity_id: &ActivityId) -> Result<(), CartError> {
        self.cache.delete(&cache_key!(PREFIX, activity_id))?;
        Ok(())
    }

    /// Dates to show for a cart row: the server's, else the remembered ones.
    pub fn display(&self, row: &MergedLineItem) -> Option<String> {
        row.booking_date
            .or_else(|| self.lookup(&row.activity_id))
            .map(|dates| dates.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use trip_commerce::cart::{merge_line_items, LineItem};
    use trip_commerce::{Currency, LineItemId, Money};

    fn dates(check_in: &str, check_out: &str) -> BookingDate {
        BookingDate::parse(check_in, check_out).unwrap()
    }

    fn row(activity: &str, booking_date: Option<BookingDate>) -> MergedLineItem {
        let mut item = LineItem::new(
            LineItemId::new("li-1"),
            ActivityId::new(activity),
            1,
            Money::new(1000, Currency::IDR),
        );
        item.booking_date = booking_date;
        merge_line_items(&[item]).remove(0)
    }

    #[test]
    fn test_remember_and_lookup() {
        let cache = DateCache::in_memory();
        let a1 = ActivityId::new("A1");
        assert!(cache.lookup(&a1).is_none());

        cache.remember(&a1, dates("2025-05-10", "2025-05-12")).unwrap();
        let found = cache.lookup(&a1).unwrap();
        assert_eq!(found.check_in(), NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        assert_eq!(found.nights(), 2);

        cache.forget(&a1).unwrap();
        assert!(cache.lookup(&a1).is_none());
    }

    #[test]
    fn test_display_prefers_server_dates() {
        let cache = DateCache::in_memory();
        cache
            .remember(&ActivityId::new("A1"), dates("2025-01-01", "2025-01-02"))
            .unwrap();

        let from_server = row("A1", Some(dates("2025-05-10", "2025-05-11")));
        assert_eq!(
            cache.display(&from_server).as_deref(),
            Some("10 May 2025 - 11 May 2025")
        );

        let fallback = row("A1", None);
        assert_eq!(
            cache.display(&fallback).as_deref(),
            Some("01 Jan 2025 - 02 Jan 2025")
        );

        assert_eq!(cache.display(&row("A2", None)), None);
    }

    #[test]
    fn test_shares_backing_cache() {
        let cache = Cache::in_memory();
        DateCache::new(cache.clone())
            .remember(&ActivityId::new("A1"), dates("2025-05-10", "2025-05-11"))
            .unwrap();
        assert!(cache.exists("booking-date:A1"));
    }
}
