//! Publication dates as stored in the feed (`YYYY-MM-DD` or an ISO timestamp).
//!
//! Dates are always built from explicit year/month/day components so a
//! `2024-01-01` never shifts to the previous day in a western timezone.

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// A publication date together with the raw string it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedDate {
    raw: Option<String>,
    date: Option<NaiveDate>,
}

impl PublishedDate {
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        Self {
            raw: raw.map(str::to_string),
            date: raw.and_then(parse_ymd),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// The calendar part of the raw value (everything before a `T`).
    pub fn date_part(&self) -> Option<&str> {
        self.raw
            .as_deref()
            .and_then(|raw| raw.split('T').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Ordering for "newest first" lists. Missing or unparseable dates count
    /// as the earliest possible date, so they land at the end.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.date, other.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn parse_ymd(raw: &str) -> Option<NaiveDate> {
    let day_part = raw.split(['T', ' ']).next()?;
    let mut parts = day_part.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `15 de enero de 2024`
pub fn format_long(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// `Lunes, 15 de enero de 2024`
pub fn format_long_with_weekday(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    capitalize_first(&format!("{}, {}", weekday, format_long(date)))
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
