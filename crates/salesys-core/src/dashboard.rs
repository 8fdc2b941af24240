//! # Dashboard
//!
//! Statistics over the sales returned by `get_sales_by_date_range`.
//!
//! ```text
//!   get_sales_by_date_range(DateRange) ──► Vec<Sale>
//!                                             │
//!                     ┌───────────────────────┼──────────────────────┐
//!                     ▼                                              ▼
//!        SalesSummary::from_sales                           filter_sales(term)
//!        count / total / taxes / net                        search box
//!        (canceled sales excluded)
//! ```
//!
//! Nothing here reads the clock: callers pass "today".

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Sale, SaleStatus};
use crate::wire::format_timestamp;

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive range of sale timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidDateRange {
                start: format_timestamp(&start),
                end: format_timestamp(&end),
            });
        }
        Ok(DateRange { start, end })
    }

    /// From the first day at 00:00:00 to the last day at 23:59:59.
    pub fn days(first: NaiveDate, last: NaiveDate) -> CoreResult<Self> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// One whole day.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date - Duration::days(i64::from(date.day0()));
        let next_month = first + Duration::days(32);
        let next_first = next_month - Duration::days(i64::from(next_month.day0()));
        DateRange {
            start: start_of_day(first),
            end: end_of_day(next_first - Duration::days(1)),
        }
    }

    /// From `days` days before `today` up to the end of `today`.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        DateRange {
            start: start_of_day(today - Duration::days(i64::from(days))),
            end: end_of_day(today),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// `(start, end)` as the backend expects them.
    pub fn to_wire(&self) -> (String, String) {
        (format_timestamp(&self.start), format_timestamp(&self.end))
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::seconds(1)
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Aggregate of a list of sales. Canceled sales are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub count: usize,
    #[ts(type = "number")]
    pub total: Money,
    #[ts(type = "number")]
    pub taxes: Money,
    /// `total - taxes`
    #[ts(type = "number")]
    pub net: Money,
}

impl SalesSummary {
    pub fn from_sales<'a, I>(sales: I) -> Self
    where
        I: IntoIterator<Item = &'a Sale>,
    {
        let mut summary = SalesSummary::default();
        for sale in sales
            .into_iter()
            .filter(|s| s.status != SaleStatus::Canceled)
        {
            summary.count += 1;
            summary.total += sale.total;
            summary.taxes += sale.taxes;
        }
        summary.net = summary.total - summary.taxes;
        summary
    }
}

// =============================================================================
// Search
// =============================================================================

/// Sales whose id, customer id, payment method or total contains `term`
/// (case-insensitive). A blank term keeps everything.
pub fn filter_sales<'a>(sales: &'a [Sale], term: &str) -> Vec<&'a Sale> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return sales.iter().collect();
    }

    sales
        .iter()
        .filter(|sale| {
            sale.id.to_string().contains(&term)
                || sale
                    .customer_id
                    .is_some_and(|c| c.to_string().contains(&term))
                || sale.payment_method.as_str().contains(&term)
                || sale.total.to_decimal().to_string().contains(&term)
        })
        .collect()
}
