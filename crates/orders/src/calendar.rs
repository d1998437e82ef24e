//! Delivery-date calendar rule.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};

/// Orders confirmed at or after this warehouse-local hour deliver the next day.
pub const CUTOFF_HOUR: u32 = 10;

/// Computes delivery dates from confirmation timestamps.
///
/// The cutoff is evaluated on warehouse-local wall-clock time, so the
/// calendar carries the warehouse's UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryCalendar {
    offset: FixedOffset,
}

impl DeliveryCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar for the Mérida warehouses (UTC-6 year round).
    pub fn merida() -> Self {
        // west_opt only fails outside +/-24h.
        Self::new(FixedOffset::west_opt(6 * 3600).expect("valid offset"))
    }

    pub fn delivery_date_for(&self, now: DateTime<Utc>) -> NaiveDate {
        Self::from_local(now.with_timezone(&self.offset).naive_local())
    }

    /// Today's date on the warehouse clock.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Core rule over a local wall-clock timestamp:
    /// - at/after the cutoff hour the delivery moves to the next day;
    /// - a resulting Sunday moves to Monday;
    /// - a resulting Saturday reached past the cutoff skips to Monday
    ///   (Saturday before the cutoff keeps same-day delivery).
    pub fn from_local(now: NaiveDateTime) -> NaiveDate {
        let after_cutoff = now.hour() >= CUTOFF_HOUR;

        let mut date = now.date();
        if after_cutoff {
            date = date + Days::new(1);
        }

        match date.weekday() {
            Weekday::Sun => date + Days::new(1),
            Weekday::Sat if after_cutoff => date + Days::new(2),
            _ => date,
        }
    }
}

impl Default for DeliveryCalendar {
    fn default() -> Self {
        Self::merida()
    }
}
