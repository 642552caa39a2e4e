// src/adapters/kenpom.rs
//! Single results table, one date per page (the `d` query parameter).

use std::sync::LazyLock;

use chrono::NaiveDate;
use ego_tree::NodeId;
use regex::Regex;
use scraper::Selector;
use url::Url;

use super::{DateGroup, Matchup, PageAdapter};
use crate::config::consts::{KENPOM_DATE_PARAM, KENPOM_ID_PREFIX};
use crate::core::sanitize::normalize_ws;
use crate::core::{css, Page};
use crate::error::ExtractError;
use crate::registry::GameId;
use crate::sports::BASKETBALL;

static RESULTS_TABLE: LazyLock<Selector> = LazyLock::new(|| css("#fanmatch-table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| css("tr"));
static TEAM_LINK: LazyLock<Selector> = LazyLock::new(|| css(r#"a[href*="team.php"]"#));
static GAMEPREP_LINK: LazyLock<Selector> = LazyLock::new(|| css(r#"a[href*="gameprep.php"]"#));
static TV_BLOCK: LazyLock<Selector> = LazyLock::new(|| css("span.seed-gray-block"));
static LINK: LazyLock<Selector> = LazyLock::new(|| css("a"));

static GAMEPREP_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"gameprep\.php\?g=(\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KenPomAdapter {
    /// `"Monday, November 3, 2025"`
    date: String,
}

/// `2025-11-03` -> `"Monday, November 3, 2025"`.
pub fn format_date_param(value: &str) -> Result<String, ExtractError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ExtractError::InvalidDateParam(value.to_string()))?;
    Ok(date.format("%A, %B %-d, %Y").to_string())
}

impl KenPomAdapter {
    /// Reads the page date from the address. No usable date means nothing on the
    /// page can be placed on a calendar.
    pub fn from_address(address: &Url) -> Result<Self, ExtractError> {
        let value = address
            .query_pairs()
            .find(|(k, _)| k == KENPOM_DATE_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ExtractError::MissingDateParam)?;
        Ok(Self { date: format_date_param(&value)? })
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

fn link_text(page: &Page, id: NodeId) -> String {
    normalize_ws(&page.text_content(id))
}

impl PageAdapter for KenPomAdapter {
    fn name(&self) -> &'static str {
        "kenpom"
    }

    fn sport(&self, _page: &Page) -> &'static str {
        BASKETBALL
    }

    fn date_groups(&self, page: &Page) -> Vec<DateGroup> {
        let groups: Vec<DateGroup> = page
            .select(&RESULTS_TABLE)
            .into_iter()
            .take(1)
            .map(|container| DateGroup { container, heading: None })
            .collect();
        if groups.is_empty() {
            tracing::warn!("results table not found");
        }
        groups
    }

    fn group_date(&self, _page: &Page, _group: &DateGroup) -> Option<String> {
        Some(self.date.clone())
    }

    fn game_containers(&self, page: &Page, group: &DateGroup) -> Vec<NodeId> {
        let rows: Vec<NodeId> = page
            .select_in(group.container, &ROW)
            .into_iter()
            .filter(|&row| page.select_in(row, &TEAM_LINK).len() >= 2)
            .collect();
        tracing::debug!(count = rows.len(), "game rows");
        rows
    }

    fn game_id(&self, page: &Page, container: NodeId) -> Option<GameId> {
        let link = page.select_first_in(container, &GAMEPREP_LINK)?;
        let href = page.attr(link, "href")?;
        GAMEPREP_ID
            .captures(href)
            .map(|c| GameId::new(format!("{KENPOM_ID_PREFIX}{}", &c[1])))
    }

    fn time_element(&self, page: &Page, container: NodeId) -> Option<NodeId> {
        page.select_first_in(container, &GAMEPREP_LINK)
    }

    fn matchup(&self, page: &Page, container: NodeId) -> Result<Matchup, ExtractError> {
        let links = page.select_in(container, &TEAM_LINK);
        if links.len() < 2 {
            return Err(ExtractError::TeamLinks { found: links.len() });
        }
        let first = link_text(page, links[0]);
        let second = link_text(page, links[1]);
        if first.is_empty() || second.is_empty() {
            return Err(ExtractError::MissingTeamName);
        }

        // nbsp between words would hide the marker from a plain substring test
        let row_text = format!(" {} ", normalize_ws(&page.text_content(container)));
        let matchup = if row_text.contains(" vs ") {
            Matchup { away: second, home: first }
        } else {
            // " at " and no marker both read first-away
            Matchup { away: first, home: second }
        };
        Ok(matchup)
    }

    fn network(&self, page: &Page, container: NodeId) -> Option<String> {
        let block = page.select_first_in(container, &TV_BLOCK)?;
        let source = page.select_first_in(block, &LINK).unwrap_or(block);
        let text = link_text(page, source);
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "https://kenpom.com/fanmatch.php?d=2025-11-03";

    const FANMATCH: &str = r#"
        <table id="fanmatch-table">
          <thead><tr><th>Game</th><th>Prediction</th><th>Time (ET)</th></tr></thead>
          <tbody>
            <tr>
              <td>3 <a href="team.php?team=Florida">Florida</a> vs 45 <a href="team.php?team=Georgia">Georgia</a></td>
              <td>Florida 81-70 (84%)</td>
              <td><a href="gameprep.php?g=1234">7:00 pm</a> <span class="seed-gray-block"><a href="tv.php">SECN</a></span></td>
            </tr>
            <tr>
              <td><a href="team.php?team=Duke">Duke</a>&nbsp;at&nbsp;<a href="team.php?team=Kansas">Kansas</a></td>
              <td><a href="gameprep.php?g=1235">9:00 pm</a> <span class="seed-gray-block">ESPN</span></td>
            </tr>
            <tr>
              <td><a href="team.php?team=Iowa">Iowa</a> <a href="team.php?team=Utah">Utah</a></td>
              <td><a href="gameprep.php?g=1236">TBD</a></td>
            </tr>
            <tr><td><a href="team.php?team=Solo">Solo</a></td></tr>
          </tbody>
        </table>"#;

    fn setup() -> (KenPomAdapter, Page, Vec<NodeId>) {
        let address = Url::parse(ADDRESS).unwrap();
        let adapter = KenPomAdapter::from_address(&address).unwrap();
        let page = Page::parse(FANMATCH, ADDRESS).unwrap();
        let groups = adapter.date_groups(&page);
        assert_eq!(groups.len(), 1);
        let rows = adapter.game_containers(&page, &groups[0]);
        (adapter, page, rows)
    }

    #[test]
    fn date_param_is_required_and_formatted() {
        let adapter = KenPomAdapter::from_address(&Url::parse(ADDRESS).unwrap()).unwrap();
        assert_eq!(adapter.date(), "Monday, November 3, 2025");
        let no_d = Url::parse("https://kenpom.com/fanmatch.php").unwrap();
        assert_eq!(KenPomAdapter::from_address(&no_d), Err(ExtractError::MissingDateParam));
        let bad = Url::parse("https://kenpom.com/fanmatch.php?d=2025-13-40").unwrap();
        assert_eq!(
            KenPomAdapter::from_address(&bad),
            Err(ExtractError::InvalidDateParam("2025-13-40".into()))
        );
        assert_eq!(format_date_param("2026-03-09").unwrap(), "Monday, March 9, 2026");
    }

    #[test]
    fn only_rows_with_two_team_links_qualify() {
        let (_, _, rows) = setup();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn ids_are_namespaced() {
        let (adapter, page, rows) = setup();
        assert_eq!(adapter.game_id(&page, rows[0]), Some(GameId::new("kenpom-1234")));
        let time = adapter.time_element(&page, rows[0]).unwrap();
        assert_eq!(page.text_content(time), "7:00 pm");
    }

    #[test]
    fn vs_means_first_team_is_home() {
        let (adapter, page, rows) = setup();
        assert_eq!(
            adapter.matchup(&page, rows[0]).unwrap(),
            Matchup { away: "Georgia".into(), home: "Florida".into() }
        );
        assert_eq!(
            adapter.matchup(&page, rows[1]).unwrap(),
            Matchup { away: "Duke".into(), home: "Kansas".into() }
        );
        assert_eq!(
            adapter.matchup(&page, rows[2]).unwrap(),
            Matchup { away: "Iowa".into(), home: "Utah".into() }
        );
    }

    #[test]
    fn network_prefers_nested_link() {
        let (adapter, page, rows) = setup();
        assert_eq!(adapter.network(&page, rows[0]).as_deref(), Some("SECN"));
        assert_eq!(adapter.network(&page, rows[1]).as_deref(), Some("ESPN"));
        assert_eq!(adapter.network(&page, rows[2]), None);
        assert_eq!(adapter.location(&page, rows[0]), None);
        assert_eq!(adapter.sport(&page), "basketball");
    }
}
