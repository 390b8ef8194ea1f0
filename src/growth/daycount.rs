//! Day-count conventions for simple-interest periods
//!
//! Two classical rules: ordinary simple interest (30/360) and the
//! Banker's rule (actual/360).

use chrono::{Datelike, NaiveDate};

/// Day count between two dates under the 30/360 ordinary simple interest
/// rule
pub fn osi_days(begin: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(begin.year());
    let months = i64::from(end.month()) - i64::from(begin.month());
    let days = i64::from(end.day()) - i64::from(begin.day());
    360 * years + 30 * months + days
}

/// Year fraction between two dates under the 30/360 rule
pub fn osi_year_frac(begin: NaiveDate, end: NaiveDate) -> f64 {
    osi_days(begin, end) as f64 / 360.0
}

/// Day count between two dates under the Banker's rule (actual days)
pub fn bankers_rule_days(begin: NaiveDate, end: NaiveDate) -> i64 {
    (end - begin).num_days()
}

/// Year fraction between two dates under the Banker's rule (actual/360)
pub fn bankers_rule_year_frac(begin: NaiveDate, end: NaiveDate) -> f64 {
    bankers_rule_days(begin, end) as f64 / 360.0
}
