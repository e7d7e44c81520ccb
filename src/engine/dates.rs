use chrono::{Datelike, NaiveDate};

/// First-of-month truncation. Month values are plain dates pinned to day 1,
/// so equality and ordering work unchanged as grouping and partition keys.
pub fn month_of(d: NaiveDate) -> NaiveDate {
    // day 1 always exists for a valid (year, month)
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1).unwrap_or(d)
}

/// Whole-month distance from `a` to `b` (positive when `b` is later).
/// Day-of-month is ignored; callers pass first-of-month values.
pub fn month_diff(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32)
}

/// Day distance from `a` to `b` (positive when `b` is later).
pub fn day_diff(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}
