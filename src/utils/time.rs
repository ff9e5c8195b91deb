use chrono::{NaiveDate, Utc};

/// Calendar day used for attendance and dashboard counts.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
