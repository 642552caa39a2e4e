// src/normalize.rs
//! Date/time normalization for schedule pages.
//!
//! Pages show a date heading (`"Monday, November 3, 2025"`, `"Sat, Nov 8"`) and a
//! per-game time (`"6:30 PM"`, `"7:00 PM ET"`, `"19:00"`). These are combined into
//! one naive local instant through a fixed grammar:
//!
//! ```text
//! [weekday[,]] month-name day[st|nd|rd|th][[,] year]   hour:minute [am|pm] [zone]
//! ```
//!
//! The zone abbreviation is dropped: instants are read as the viewer's wall clock.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::config::consts::TIME_PLACEHOLDER;
use crate::error::ParseFailure;

/// North American zone abbreviations that may trail a time.
pub const ZONE_ABBREVIATIONS: &[&str] = &[
    "ET", "CT", "MT", "PT", "EST", "CST", "MST", "PST", "EDT", "CDT", "MDT", "PDT",
];

static LEADING_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues?|wed|thur?s?|fri|sat|sun)\.?,?\s*").unwrap()
});
static TRAILING_ZONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\s*\b(?:{})\s*$", ZONE_ABBREVIATIONS.join("|"))).unwrap()
});
static GAME_OVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)final|postponed|canceled|cancelled").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*,?\s*(\d{4}))?$").unwrap()
});
static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\s*(?:([AaPp])\.?\s*[Mm]\.?)?$").unwrap());

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// `"Nov"`, `"Sept"`, `"november"` -> 11. At least three letters, prefix of the full name.
fn month_number(name: &str) -> Option<u32> {
    let lc = name.to_ascii_lowercase();
    if lc.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lc))
        .map(|i| i as u32 + 1)
}

fn strip_weekday(date_text: &str) -> String {
    LEADING_WEEKDAY.replace(date_text.trim(), "").trim().to_string()
}

fn strip_zone(time_text: &str) -> String {
    TRAILING_ZONE.replace(time_text.trim(), "").trim().to_string()
}

fn parse_clock(text: &str) -> Option<(u32, u32)> {
    let caps = TIME.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let hour = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (meridiem.as_str(), hour) {
                ("a", 12) => 0,
                ("a", h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };
    (hour < 24 && minute < 60).then_some((hour, minute))
}

fn parse_day(text: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = DATE.captures(text)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        Some(y) => y.as_str().parse().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Combine a date heading and a game time into one instant.
///
/// `default_year` fills in headings that carry no year.
pub fn parse_date_time(
    date_text: &str,
    time_text: Option<&str>,
    default_year: i32,
) -> Result<NaiveDateTime, ParseFailure> {
    let time_text = time_text.map(str::trim).filter(|t| !t.is_empty()).ok_or(ParseFailure::MissingTime)?;
    if time_text.eq_ignore_ascii_case(TIME_PLACEHOLDER) {
        return Err(ParseFailure::Placeholder(time_text.to_string()));
    }
    if GAME_OVER.is_match(time_text) {
        return Err(ParseFailure::GameOver(time_text.to_string()));
    }

    let date = strip_weekday(date_text);
    let clock = strip_zone(time_text);
    let combined = format!("{date} {clock}");

    let day = parse_day(&date, default_year).ok_or_else(|| ParseFailure::Unparseable(combined.clone()))?;
    let (hour, minute) = parse_clock(&clock).ok_or_else(|| ParseFailure::Unparseable(combined.clone()))?;
    day.and_hms_opt(hour, minute, 0).ok_or(ParseFailure::Unparseable(combined))
}

/// `start` plus `duration_hours` (fractions allowed), rolling over days, months and years.
pub fn compute_end_time(start: NaiveDateTime, duration_hours: f64) -> NaiveDateTime {
    let millis = (duration_hours * 3_600_000.0).round() as i64;
    start + TimeDelta::milliseconds(millis)
}
