// src/core/sanitize.rs
use std::sync::LazyLock;

use regex::Regex;

static LEADING_RANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s+").unwrap());
static RECORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d+-\d+\)").unwrap());
static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Team label cleanup: `"1 Duke (5-2)"` -> `"Duke"`.
/// Drops a leading ranking number and a win-loss record in parentheses.
pub fn clean_team_label(s: &str) -> String {
    let s = normalize_ws(s);
    let s = LEADING_RANK.replace(&s, "");
    let s = RECORD.replace(&s, "");
    normalize_ws(&s)
}

pub fn is_all_digits(s: &str) -> bool {
    ALL_DIGITS.is_match(s)
}

/// Escape for a double-quoted HTML attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
