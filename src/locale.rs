//! Polish display helpers: plural noun forms and long dates.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Polish plural category for a non-negative count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    /// Exactly one.
    One,
    /// Ends in 2-4, except 12-14.
    Few,
    /// Everything else, including zero and the teens.
    Many,
}

pub fn plural_category(n: u64) -> PluralCategory {
    if n == 1 {
        return PluralCategory::One;
    }
    let rem10 = n % 10;
    let rem100 = n % 100;
    if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

/// Noun form of "photo" that agrees with `n`.
pub fn photo_count_label(n: u64) -> &'static str {
    match plural_category(n) {
        PluralCategory::One => "zdjęcie",
        PluralCategory::Few => "zdjęcia",
        PluralCategory::Many => "zdjęć",
    }
}

/// `"{n} {label}"`, e.g. `"3 zdjęcia"`.
pub fn format_photo_count(n: u64) -> String {
    format!("{} {}", n, photo_count_label(n))
}

// Genitive month names, as used after a day number
const MONTHS_GENITIVE: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

/// Long Polish date such as `"5 maja 2024"`, using the calendar day in
/// `date`'s own time zone.
pub fn format_date_long<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let month = MONTHS_GENITIVE[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// [`format_date_long`] for a stored timestamp, shown on the local calendar.
pub fn format_local_date_long(date: &DateTime<Utc>) -> String {
    format_date_long(&date.with_timezone(&Local))
}
