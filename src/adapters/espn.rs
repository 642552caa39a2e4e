// src/adapters/espn.rs
//! Tabular schedule layout: games in tables (or game cards) under date headings.
//!
//! Class names on these pages change often, so every lookup here is a
//! heuristic with fallbacks rather than a fixed path.

use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;
use scraper::Selector;

use super::{first_found, first_non_empty, DateGroup, Matchup, PageAdapter, Scope};
use crate::core::sanitize::{clean_team_label, is_all_digits, normalize_ws};
use crate::core::{css, Page};
use crate::error::ExtractError;
use crate::normalize::ZONE_ABBREVIATIONS;
use crate::registry::GameId;
use crate::sports::detect_sport_from_path;

static TABLE: LazyLock<Selector> = LazyLock::new(|| css("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| css("tr"));
static SCHEDULE_HINT: LazyLock<Selector> =
    LazyLock::new(|| css(r#"[class*="schedule"], [class*="Schedule"]"#));
static HEADING_LIKE: LazyLock<Selector> = LazyLock::new(|| css("div, section, header, h2, h3"));
static DATE_HINT: LazyLock<Selector> = LazyLock::new(|| css(r#"[class*="date"], [class*="Date"]"#));
static DATE_HINT_LOWER: LazyLock<Selector> = LazyLock::new(|| css(r#"[class*="date"]"#));
static GAME_LINK: LazyLock<Selector> =
    LazyLock::new(|| css(r#"a[href*="/gameId/"], a[href*="/game/_/gameId/"]"#));
static GAME_HINT: LazyLock<Selector> = LazyLock::new(|| {
    css(r#"[class*="game"], [class*="Game"], [class*="event"], [class*="Event"]"#)
});
static TIME_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| css("span, div, td, a"));
static TEAM_LINK: LazyLock<Selector> = LazyLock::new(|| css(r#"a[href*="/team/"]"#));
static IMG: LazyLock<Selector> = LazyLock::new(|| css("img"));
static NAME_PARTS: LazyLock<Selector> = LazyLock::new(|| css("span, div"));
static ABBR_TITLE: LazyLock<Selector> = LazyLock::new(|| css("abbr[title]"));
static NETWORK_NAME: LazyLock<Selector> = LazyLock::new(|| css(".network-name"));
static BROADCAST_COL: LazyLock<Selector> = LazyLock::new(|| css(".broadcast__col, td.broadcast__col"));
static IMG_ALT: LazyLock<Selector> = LazyLock::new(|| css("img[alt]"));
static NETWORK_CONTAINER: LazyLock<Selector> = LazyLock::new(|| css(".network-container"));
static LOCATION_HINT: LazyLock<Selector> =
    LazyLock::new(|| css(r#"[class*="location"], [class*="Location"]"#));

const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!("(?i)({WEEKDAYS})")).unwrap());
static WEEKDAY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)({WEEKDAYS}),?\s+\w+\s+\d+")).unwrap());
static GROUP_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({WEEKDAYS}),?\s+(\w+\s+\d+(?:,\s*\d{{4}})?)")).unwrap()
});
static CLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+:\d+").unwrap());
static TIME_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^\d+:\d+\s*(?:AM|PM)?\s*(?:{})?$", ZONE_ABBREVIATIONS.join("|"))).unwrap()
});
static GAME_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"gameId/(\d+)").unwrap());

/// Maximum length (exclusive, in chars) accepted for a team name read from text.
const MAX_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Copy, Default)]
pub struct EspnAdapter;

type GroupStrategy<'p> = fn(&'p Page) -> Vec<DateGroup>;
type TextStrategy<'p> = fn(Scope<'p>) -> Option<String>;

// ---- date groups ----------------------------------------------------------

/// Tables paired with the nearest earlier sibling that names a weekday.
fn tables_after_weekday_heading(page: &Page) -> Vec<DateGroup> {
    let mut groups = Vec::new();
    for table in page.select(&TABLE) {
        let mut prev = page.prev_element_sibling(table);
        while let Some(el) = prev {
            if page.tag_name(el) == Some("table") {
                break;
            }
            if WEEKDAY.is_match(&page.text_content(el)) {
                groups.push(DateGroup { container: table, heading: Some(el) });
                break;
            }
            prev = page.prev_element_sibling(el);
        }
    }
    groups
}

/// Schedule-hinted wrappers that hold a table.
fn schedule_wrappers(page: &Page) -> Vec<DateGroup> {
    page.select(&SCHEDULE_HINT)
        .into_iter()
        .filter(|&el| page.select_first_in(el, &TABLE).is_some())
        .map(|container| DateGroup { container, heading: None })
        .collect()
}

/// Heading-like elements whose text reads "Weekday, Month Day".
fn weekday_headings(page: &Page) -> Vec<DateGroup> {
    page.select(&HEADING_LIKE)
        .into_iter()
        .filter(|&el| WEEKDAY_HEADING.is_match(&page.text_content(el)))
        .map(|container| DateGroup { container, heading: None })
        .collect()
}

// ---- team names -------------------------------------------------------------

fn short_label(raw: &str) -> Option<String> {
    let cleaned = clean_team_label(raw);
    let len = cleaned.chars().count();
    (len > 0 && len < MAX_NAME_LEN).then_some(cleaned)
}

fn name_from_rendered(s: Scope<'_>) -> Option<String> {
    short_label(&s.page.rendered_text(s.node))
}

fn name_from_text(s: Scope<'_>) -> Option<String> {
    short_label(&s.page.text_content(s.node))
}

fn name_from_parts(s: Scope<'_>) -> Option<String> {
    s.page.select_in(s.node, &NAME_PARTS).into_iter().find_map(|part| {
        let rendered = normalize_ws(&s.page.rendered_text(part));
        let text = if rendered.is_empty() { normalize_ws(&s.page.text_content(part)) } else { rendered };
        let len = text.chars().count();
        if len > 2 && len < MAX_NAME_LEN && !is_all_digits(&text) {
            Some(clean_team_label(&text)).filter(|c| !c.is_empty())
        } else {
            None
        }
    })
}

fn name_from_label_attr(s: Scope<'_>) -> Option<String> {
    ["title", "aria-label"]
        .into_iter()
        .filter_map(|name| s.page.attr(s.node, name))
        .map(clean_team_label)
        .find(|c| !c.is_empty())
}

fn name_from_abbr(s: Scope<'_>) -> Option<String> {
    let abbr = s.page.select_first_in(s.node, &ABBR_TITLE)?;
    Some(clean_team_label(s.page.attr(abbr, "title")?)).filter(|c| !c.is_empty())
}

/// Team name behind one team link; empty when every method comes up blank.
pub fn extract_team_name<'p>(page: &'p Page, link: NodeId) -> String {
    let methods: [TextStrategy<'p>; 5] = [
        name_from_rendered as TextStrategy<'p>,
        name_from_text as TextStrategy<'p>,
        name_from_parts as TextStrategy<'p>,
        name_from_label_attr as TextStrategy<'p>,
        name_from_abbr as TextStrategy<'p>,
    ];
    first_found(Scope::new(page, link), &methods).unwrap_or_default()
}

/// Team links in a container, logo-only links removed.
pub fn team_links(page: &Page, container: NodeId) -> Vec<NodeId> {
    page.select_in(container, &TEAM_LINK)
        .into_iter()
        .filter(|&link| {
            let has_text = !page.text_content(link).trim().is_empty();
            has_text || page.select_first_in(link, &IMG).is_none()
        })
        .collect()
}

// ---- network ---------------------------------------------------------------

fn network_names(s: Scope<'_>) -> Option<String> {
    let names: Vec<String> = s
        .page
        .select_in(s.node, &NETWORK_NAME)
        .into_iter()
        .map(|el| normalize_ws(&s.page.text_content(el)))
        .collect();
    if names.is_empty() || names.iter().all(String::is_empty) {
        return None;
    }
    Some(names.join("/"))
}

fn broadcast_logo(s: Scope<'_>) -> Option<String> {
    let col = s.page.select_first_in(s.node, &BROADCAST_COL)?;
    let img = s.page.select_first_in(col, &IMG_ALT)?;
    let alt = s.page.attr(img, "alt")?.trim();
    (!alt.is_empty()).then(|| alt.to_string())
}

fn network_container(s: Scope<'_>) -> Option<String> {
    let el = s.page.select_first_in(s.node, &NETWORK_CONTAINER)?;
    let text = normalize_ws(&s.page.text_content(el));
    (!text.is_empty()).then_some(text)
}

impl PageAdapter for EspnAdapter {
    fn name(&self) -> &'static str {
        "espn"
    }

    fn sport(&self, page: &Page) -> &'static str {
        detect_sport_from_path(page.address().path())
    }

    fn date_groups<'p>(&self, page: &'p Page) -> Vec<DateGroup> {
        let strategies: [GroupStrategy<'p>; 3] = [
            tables_after_weekday_heading as GroupStrategy<'p>,
            schedule_wrappers as GroupStrategy<'p>,
            weekday_headings as GroupStrategy<'p>,
        ];
        match first_non_empty(page, &strategies) {
            Some((index, groups)) => {
                tracing::debug!(strategy = index + 1, count = groups.len(), "found date sections");
                groups
            }
            None => {
                tracing::warn!("no date sections found");
                Vec::new()
            }
        }
    }

    fn group_date(&self, page: &Page, group: &DateGroup) -> Option<String> {
        let section = group.container;
        let candidates = [
            Some(section),
            page.prev_element_sibling(section),
            page.select_first_in(section, &DATE_HINT),
            page.closest(section, &DATE_HINT_LOWER),
            group.heading,
        ];
        candidates.into_iter().flatten().find_map(|el| {
            let text = page.text_content(el);
            GROUP_DATE.find(&text).map(|m| normalize_ws(m.as_str()))
        })
    }

    fn game_containers(&self, page: &Page, group: &DateGroup) -> Vec<NodeId> {
        let mut containers: Vec<NodeId> = Vec::new();
        for link in page.select_in(group.container, &GAME_LINK) {
            let container = page.closest(link, &ROW).or_else(|| page.closest(link, &GAME_HINT));
            if let Some(c) = container {
                if !containers.contains(&c) {
                    containers.push(c);
                }
            }
        }
        containers
    }

    fn game_id(&self, page: &Page, container: NodeId) -> Option<GameId> {
        let link = page.select_first_in(container, &GAME_LINK)?;
        let href = page.attr(link, "href")?;
        GAME_ID.captures(href).map(|c| GameId::new(&c[1]))
    }

    fn time_element(&self, page: &Page, container: NodeId) -> Option<NodeId> {
        if let Some(link) = page.select_first_in(container, &GAME_LINK) {
            if CLOCK.is_match(&page.text_content(link)) {
                return Some(link);
            }
        }
        page.select_in(container, &TIME_CANDIDATES)
            .into_iter()
            .find(|&el| TIME_ONLY.is_match(page.text_content(el).trim()))
    }

    fn matchup(&self, page: &Page, container: NodeId) -> Result<Matchup, ExtractError> {
        let links = team_links(page, container);
        if links.len() < 2 {
            return Err(ExtractError::TeamLinks { found: links.len() });
        }
        let away = extract_team_name(page, links[0]);
        let home = extract_team_name(page, links[1]);
        if away.is_empty() || home.is_empty() {
            return Err(ExtractError::MissingTeamName);
        }
        Ok(Matchup { away, home })
    }

    fn network<'p>(&self, page: &'p Page, container: NodeId) -> Option<String> {
        let sources: [TextStrategy<'p>; 3] = [
            network_names as TextStrategy<'p>,
            broadcast_logo as TextStrategy<'p>,
            network_container as TextStrategy<'p>,
        ];
        first_found(Scope::new(page, container), &sources)
    }

    fn location(&self, page: &Page, container: NodeId) -> Option<String> {
        let el = page.select_first_in(container, &LOCATION_HINT)?;
        let text = normalize_ws(&page.text_content(el));
        (!text.is_empty()).then_some(text)
    }
}
