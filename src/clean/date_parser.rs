use chrono::{Datelike, NaiveDate};

/// Days from 0001-01-01 (CE) to the Unix epoch.
pub const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const FALLBACK_FORMATS: &[&str] = &["%m/%d/%Y", "%d-%m-%Y", "%B %d, %Y", "%b %d, %Y"];

/// Fast parse of `"YYYY-MM-DD"` / `"YYYY/MM/DD"` (an optional time part is
/// ignored), with a few common fallback formats. Returns days since the
/// Unix epoch, i.e. an arrow `Date32` value.
pub fn parse_date_days(s: &str) -> Option<i32> {
    let s = s.trim();
    fast_iso(s)
        .or_else(|| fallback(s))
        .map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
}

/// Turn a `Date32` value back into a calendar date.
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
}

fn fast_iso(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() < 10 {
        return None;
    }
    let sep = b[4];
    if (sep != b'-' && sep != b'/') || b[7] != sep {
        return None;
    }
    // anything after the date must be a time component
    if b.len() > 10 && b[10] != b' ' && b[10] != b'T' {
        return None;
    }
    let num = |range: std::ops::Range<usize>| {
        b[range]
            .iter()
            .try_fold(0u32, |acc, &c| c.is_ascii_digit().then(|| acc * 10 + (c - b'0') as u32))
    };
    let year = num(0..4)? as i32;
    let month = num(5..7)?;
    let day = num(8..10)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn fallback(s: &str) -> Option<NaiveDate> {
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
