// src/sports.rs
//! Sport slugs as they appear in schedule URLs, with the typical length of a
//! game and a glyph for event titles.
//!
//! Duration and glyph live in one row per slug, so every slug always has both.

pub const DEFAULT_SPORT: &str = "default";
pub const BASKETBALL: &str = "basketball";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sport {
    pub key: &'static str,
    pub hours: f64,
    pub emoji: &'static str,
}

const fn sport(key: &'static str, hours: f64, emoji: &'static str) -> Sport {
    Sport { key, hours, emoji }
}

pub static SPORTS: &[Sport] = &[
    sport("football", 3.5, "🏈"),
    sport("nfl", 3.5, "🏈"),
    sport("college-football", 3.5, "🏈"),
    sport("basketball", 2.0, "🏀"),
    sport("nba", 2.0, "🏀"),
    sport("mens-college-basketball", 2.0, "🏀"),
    sport("womens-college-basketball", 2.0, "🏀"),
    sport("wnba", 2.0, "🏀"),
    sport("baseball", 3.0, "⚾"),
    sport("mlb", 3.0, "⚾"),
    sport("college-baseball", 3.0, "⚾"),
    sport("hockey", 2.5, "🏒"),
    sport("nhl", 2.5, "🏒"),
    sport("college-hockey", 2.5, "🏒"),
    sport("soccer", 2.0, "⚽"),
    sport("mls", 2.0, "⚽"),
    sport("golf", 4.0, "⛳"),
    sport("tennis", 3.0, "🎾"),
    sport("racing", 3.0, "🏁"),
    sport(DEFAULT_SPORT, 3.0, "🏆"),
];

fn find(key: &str) -> Option<&'static Sport> {
    SPORTS.iter().find(|s| s.key == key)
}

/// Row for `key`, or the `default` row. Keys are matched exactly (lower-case slugs).
pub fn lookup(key: &str) -> &'static Sport {
    find(key)
        .or_else(|| find(DEFAULT_SPORT))
        .unwrap_or(&SPORTS[SPORTS.len() - 1])
}

pub fn sport_duration(key: &str) -> f64 {
    lookup(key).hours
}

pub fn sport_emoji(key: &str) -> &'static str {
    lookup(key).emoji
}

/// First path segment that names a known sport, else `default`.
pub fn detect_sport_from_path(path: &str) -> &'static str {
    path.split('/')
        .filter(|part| !part.is_empty())
        .find_map(find)
        .map(|s| s.key)
        .unwrap_or(DEFAULT_SPORT)
}
