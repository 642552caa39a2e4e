// src/adapters/mod.rs
//! # Layout adapters
//!
//! Each adapter knows how one family of schedule pages is put together: where
//! the date sections are, which element is one game, and where the time, teams
//! and broadcast info sit inside it. Adapters only read the page, except for
//! `insert_action`, which places the calendar button next to the game time.
//!
//! Two families exist and are picked by hostname:
//! - [`espn::EspnAdapter`]: tables grouped under date headings, found by heuristics.
//! - [`kenpom::KenPomAdapter`]: one results table, date taken from the address.
//!
//! Where a page offers several plausible answers, adapters try an ordered list
//! of strategies and keep the first one that finds anything
//! ([`first_non_empty`], [`first_found`]). Results are never merged across
//! strategies; the order is the priority.

use ego_tree::NodeId;
use std::sync::LazyLock;
use scraper::Selector;
use url::Url;

use crate::config::consts::{ESPN_HOST, KENPOM_HOST, WRAPPER_CLASS, WRAPPER_STYLE};
use crate::core::{css, Fragment, Page};
use crate::error::{DomError, ExtractError};
use crate::registry::GameId;

pub mod espn;
pub mod kenpom;

pub use espn::EspnAdapter;
pub use kenpom::KenPomAdapter;

static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| css("td"));

/// One calendar date worth of games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateGroup {
    pub container: NodeId,
    /// Heading element the container was paired with, when a strategy found one.
    pub heading: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub away: String,
    pub home: String,
}

/// An element of the page that strategies look inside.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub page: &'a Page,
    pub node: NodeId,
}

impl<'a> Scope<'a> {
    pub fn new(page: &'a Page, node: NodeId) -> Self {
        Self { page, node }
    }
}

pub trait PageAdapter {
    fn name(&self) -> &'static str;

    /// Sport slug used for duration and title glyph.
    fn sport(&self, page: &Page) -> &'static str;

    fn date_groups(&self, page: &Page) -> Vec<DateGroup>;

    /// Date text for the group, or `None` when the group must be skipped.
    fn group_date(&self, page: &Page, group: &DateGroup) -> Option<String>;

    /// Distinct game containers, in document order.
    fn game_containers(&self, page: &Page, group: &DateGroup) -> Vec<NodeId>;

    fn game_id(&self, page: &Page, container: NodeId) -> Option<GameId>;

    fn time_element(&self, page: &Page, container: NodeId) -> Option<NodeId>;

    fn matchup(&self, page: &Page, container: NodeId) -> Result<Matchup, ExtractError>;

    fn network(&self, page: &Page, container: NodeId) -> Option<String>;

    fn location(&self, _page: &Page, _container: NodeId) -> Option<String> {
        None
    }

    fn insert_action(&self, page: &mut Page, action: &Fragment, time: NodeId) -> Result<NodeId, DomError> {
        insert_beside_time(page, action, time)
    }
}

/// Put the action next to the time element.
///
/// Inside a table cell the time is replaced by a flex wrapper holding a copy of
/// the time followed by the action (returns the wrapper). Elsewhere the action
/// goes right after the time (returns the action).
pub fn insert_beside_time(page: &mut Page, action: &Fragment, time: NodeId) -> Result<NodeId, DomError> {
    if page.closest(time, &TABLE_CELL).is_some() {
        let wrapper = Fragment::parse(&format!(r#"<div class="{WRAPPER_CLASS}" style="{WRAPPER_STYLE}"></div>"#))?;
        page.wrap_with(time, &wrapper, action)
    } else {
        page.insert_after(time, action)
    }
}

/// Adapter for the page at `address`. Decided once per run.
pub fn select_adapter(address: &Url) -> Result<Box<dyn PageAdapter>, ExtractError> {
    let host = address.host_str().unwrap_or_default();
    if host.contains(KENPOM_HOST) {
        Ok(Box::new(KenPomAdapter::from_address(address)?))
    } else if host.contains(ESPN_HOST) {
        Ok(Box::new(EspnAdapter))
    } else {
        Err(ExtractError::UnsupportedHost(host.to_string()))
    }
}

/// Run strategies in order; the first non-empty result wins, with its index.
pub fn first_non_empty<C: Copy, T>(ctx: C, strategies: &[fn(C) -> Vec<T>]) -> Option<(usize, Vec<T>)> {
    strategies.iter().enumerate().find_map(|(i, strategy)| {
        let found = strategy(ctx);
        (!found.is_empty()).then_some((i, found))
    })
}

/// Run strategies in order; the first `Some` wins.
pub fn first_found<C: Copy, T>(ctx: C, strategies: &[fn(C) -> Option<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn picks_adapter_by_host() {
        assert_eq!(select_adapter(&url("https://www.espn.com/nba/schedule")).unwrap().name(), "espn");
        assert_eq!(select_adapter(&url("https://kenpom.com/fanmatch.php?d=2025-11-03")).unwrap().name(), "kenpom");
        assert_eq!(
            select_adapter(&url("https://kenpom.com/fanmatch.php")).err(),
            Some(ExtractError::MissingDateParam)
        );
        assert_eq!(
            select_adapter(&url("https://example.org/schedule")).err(),
            Some(ExtractError::UnsupportedHost("example.org".into()))
        );
    }

    fn none(_: u8) -> Vec<u8> { Vec::new() }
    fn two(_: u8) -> Vec<u8> { vec![2, 2] }
    fn three(_: u8) -> Vec<u8> { vec![3] }

    #[test]
    fn first_non_empty_never_merges() {
        assert_eq!(first_non_empty(0u8, &[none, two, three]), Some((1, vec![2, 2])));
        assert_eq!(first_non_empty(0u8, &[three, two]), Some((0, vec![3])));
        assert_eq!(first_non_empty(0u8, &[none, none]), None);
    }

    #[test]
    fn first_found_respects_order() {
        fn a(x: u8) -> Option<u8> { (x > 5).then_some(1) }
        fn b(_: u8) -> Option<u8> { Some(2) }
        assert_eq!(first_found(9u8, &[a, b]), Some(1));
        assert_eq!(first_found(1u8, &[a, b]), Some(2));
    }

    #[test]
    fn inserts_after_time_outside_tables() {
        let mut page = Page::parse(
            r#"<div class="game"><span class="time">7:00 PM</span><span>ESPN</span></div>"#,
            "https://www.espn.com/nba/schedule",
        )
        .unwrap();
        let time = page.select(&css("span.time"))[0];
        let button = Fragment::parse("<button>add</button>").unwrap();
        let id = insert_beside_time(&mut page, &button, time).unwrap();
        assert_eq!(page.tag_name(id), Some("button"));
        assert_eq!(page.select(&css("span.time + button")).len(), 1);
    }

    #[test]
    fn wraps_time_inside_table_cells() {
        let mut page = Page::parse(
            r#"<table><tr><td><a class="time" href="/nba/game/_/gameId/1">7:00 PM</a></td></tr></table>"#,
            "https://www.espn.com/nba/schedule",
        )
        .unwrap();
        let time = page.select(&css("a.time"))[0];
        let button = Fragment::parse("<button>add</button>").unwrap();
        insert_beside_time(&mut page, &button, time).unwrap();
        let wrapped = page.select(&css("td > div.espn-cal-link-time-wrapper > a.time + button"));
        assert_eq!(wrapped.len(), 1);
        let style = page.attr(page.select(&css("div.espn-cal-link-time-wrapper"))[0], "style");
        assert_eq!(style, Some("display:flex;align-items:center;gap:8px"));
    }
}
