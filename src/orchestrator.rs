// src/orchestrator.rs
//! One extraction pass over a page: find games, skip the ones already handled,
//! build events for the rest and place an action next to each game time.
//!
//! A run never fails as a whole. Per-game problems are logged, recorded in the
//! [`RunReport`] and leave the game unregistered so the next run retries it.

use std::collections::HashSet;

use ego_tree::NodeId;

use crate::adapters::{select_adapter, Matchup, PageAdapter};
use crate::calendar::{CalendarAction, CanonicalEvent};
use crate::config::options::Options;
use crate::core::sanitize::normalize_ws;
use crate::core::{Fragment, Page};
use crate::error::ExtractError;
use crate::format::{format_description, format_title};
use crate::normalize::{compute_end_time, parse_date_time};
use crate::registry::{GameId, ProcessedRegistry};
use crate::sports::sport_duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFailure {
    /// `None` when the container did not even yield an identifier.
    pub game_id: Option<GameId>,
    pub error: ExtractError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Name of the adapter used, if one matched the address.
    pub adapter: Option<&'static str>,
    pub inserted: Vec<CalendarAction>,
    pub already_processed: usize,
    pub failures: Vec<GameFailure>,
    /// Set when the whole page was unusable (unknown host, missing date parameter).
    pub aborted: Option<ExtractError>,
}

impl RunReport {
    pub fn summary(&self) -> String {
        if let Some(err) = &self.aborted {
            return format!("nothing done: {err}");
        }
        format!(
            "{} added, {} already present, {} skipped",
            self.inserted.len(),
            self.already_processed,
            self.failures.len()
        )
    }
}

pub struct Orchestrator {
    registry: ProcessedRegistry,
    options: Options,
}

impl Orchestrator {
    pub fn new(options: Options) -> Self {
        Self { registry: ProcessedRegistry::new(), options }
    }

    pub fn registry(&self) -> &ProcessedRegistry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Takes effect on the next run; games already handled keep their actions.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn run(&mut self, page: &mut Page) -> RunReport {
        let mut report = RunReport::default();

        let adapter = match select_adapter(page.address()) {
            Ok(adapter) => adapter,
            Err(error) => {
                tracing::warn!(address = %page.address(), %error, "page not supported");
                report.aborted = Some(error);
                return report;
            }
        };
        report.adapter = Some(adapter.name());
        let _span = tracing::info_span!("run", adapter = adapter.name(), revision = page.revision()).entered();

        let year = self.options.resolved_year();
        // nested sections can reach one game twice; only the first visit counts
        let mut visited: HashSet<GameId> = HashSet::new();
        for group in adapter.date_groups(page) {
            let Some(date) = adapter.group_date(page, &group) else {
                tracing::debug!("date section without a readable date, skipped");
                continue;
            };

            for container in adapter.game_containers(page, &group) {
                let Some(game_id) = adapter.game_id(page, container) else {
                    tracing::warn!("game without an identifier");
                    report.failures.push(GameFailure { game_id: None, error: ExtractError::MissingGameId });
                    continue;
                };
                if !visited.insert(game_id.clone()) {
                    continue;
                }
                if self.registry.has(&game_id) {
                    report.already_processed += 1;
                    continue;
                }

                match self.inject(page, adapter.as_ref(), container, &date, year, &game_id) {
                    Ok(action) => {
                        tracing::debug!(game = %game_id, title = action.event.title(), "action added");
                        self.registry.add(game_id);
                        report.inserted.push(action);
                    }
                    Err(error) => {
                        tracing::warn!(game = %game_id, kind = ?error.kind(), %error, "game skipped");
                        report.failures.push(GameFailure { game_id: Some(game_id), error });
                    }
                }
            }
        }

        tracing::info!(
            inserted = report.inserted.len(),
            already = report.already_processed,
            failed = report.failures.len(),
            "run finished"
        );
        report
    }

    fn inject(
        &self,
        page: &mut Page,
        adapter: &dyn PageAdapter,
        container: NodeId,
        date: &str,
        year: i32,
        game_id: &GameId,
    ) -> Result<CalendarAction, ExtractError> {
        let (event, time) = self.extract_event(page, adapter, container, date, year)?;
        let action = CalendarAction::new(game_id.clone(), event);
        let markup = Fragment::parse(&action.markup(&self.options.popup))?;
        adapter.insert_action(page, &markup, time)?;
        Ok(action)
    }

    /// Build the event for one game container. Also returns the time element,
    /// which is where the action goes.
    pub fn extract_event(
        &self,
        page: &Page,
        adapter: &dyn PageAdapter,
        container: NodeId,
        date: &str,
        year: i32,
    ) -> Result<(CanonicalEvent, NodeId), ExtractError> {
        let time = adapter.time_element(page, container).ok_or(ExtractError::MissingTime)?;
        let time_text = normalize_ws(&page.text_content(time));
        let start = parse_date_time(date, Some(&time_text), year)?;

        let Matchup { away, home } = adapter.matchup(page, container)?;
        let network = adapter.network(page, container);
        let location = adapter.location(page, container).unwrap_or_default();

        let sport = adapter.sport(page);
        let end = compute_end_time(start, sport_duration(sport));

        let title_opts = self.options.title;
        let title = format_title(&away, &home, network.as_deref(), title_opts.sport_emoji.then_some(sport));
        let description = if title_opts.description {
            format_description(&away, &home, network.as_deref())
        } else {
            String::new()
        };

        let event = CanonicalEvent::new(title, start, end, description, location)?;
        Ok((event, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseFailure;
    use chrono::NaiveDate;

    fn options() -> Options {
        Options { default_year: Some(2025), ..Options::default() }
    }

    const ROW: &str = r#"
        <h2>Saturday, November 8</h2>
        <table><tr>
          <td><a href="/nfl/team/_/name/kc">Kansas City</a></td>
          <td><a href="/nfl/team/_/name/buf">Buffalo</a></td>
          <td><a href="/nfl/game/_/gameId/77">4:25 PM</a></td>
          <td><div class="network-name">CBS</div></td>
        </tr></table>"#;

    #[test]
    fn builds_event_with_sport_duration() {
        let mut page = Page::parse(ROW, "https://www.espn.com/nfl/schedule").unwrap();
        let mut orch = Orchestrator::new(options());
        let report = orch.run(&mut page);
        assert_eq!(report.adapter, Some("espn"));
        assert_eq!(report.inserted.len(), 1, "{report:?}");

        let ev = &report.inserted[0].event;
        assert_eq!(ev.title(), "Kansas City @ Buffalo (CBS)");
        let start = NaiveDate::from_ymd_opt(2025, 11, 8).unwrap().and_hms_opt(16, 25, 0).unwrap();
        assert_eq!(ev.start(), start);
        assert_eq!((ev.end() - ev.start()).num_minutes(), 210);
        assert_eq!(ev.description(), "");
        assert!(orch.registry().has(&GameId::new("77")));
    }

    #[test]
    fn richer_title_paths_are_opt_in() {
        let mut page = Page::parse(ROW, "https://www.espn.com/nfl/schedule").unwrap();
        let mut opts = options();
        opts.title.sport_emoji = true;
        opts.title.description = true;
        let report = Orchestrator::new(opts).run(&mut page);
        let ev = &report.inserted[0].event;
        assert_eq!(ev.title(), "🏈 Kansas City @ Buffalo (CBS)");
        assert_eq!(ev.description(), "Kansas City @ Buffalo (CBS)");
    }

    #[test]
    fn unsupported_host_aborts_quietly() {
        let mut page = Page::parse(ROW, "https://example.org/nfl/schedule").unwrap();
        let before = page.to_html();
        let report = Orchestrator::new(options()).run(&mut page);
        assert_eq!(report.aborted, Some(ExtractError::UnsupportedHost("example.org".into())));
        assert!(report.summary().starts_with("nothing done"));
        assert_eq!(page.to_html(), before);
    }

    #[test]
    fn finished_games_are_reported_not_registered() {
        let html = ROW.replace("4:25 PM", "Final");
        let mut page = Page::parse(&html, "https://www.espn.com/nfl/schedule").unwrap();
        let mut orch = Orchestrator::new(options());
        let report = orch.run(&mut page);
        assert!(report.inserted.is_empty());
        // "Final" is not a clock, so no time element is found at all
        assert_eq!(report.failures[0].error, ExtractError::MissingTime);
        assert!(orch.registry().is_empty());

        let html = ROW.replace("4:25 PM", "TBD 0:00");
        let mut page = Page::parse(&html, "https://www.espn.com/nfl/schedule").unwrap();
        let report = orch.run(&mut page);
        assert!(matches!(
            report.failures[0].error,
            ExtractError::Time(ParseFailure::Unparseable(_))
        ));
    }

    #[test]
    fn game_in_nested_sections_counts_once() {
        let table = &ROW[ROW.find("<table>").unwrap()..];
        let html = format!(
            r#"<div class="schedule-outer"><div class="schedule-inner">{table}<div class="date">Saturday, November 8</div></div></div>"#
        );
        let mut page = Page::parse(&html, "https://www.espn.com/nfl/schedule").unwrap();
        let mut orch = Orchestrator::new(options());
        let report = orch.run(&mut page);
        assert_eq!(report.inserted.len(), 1, "{report:?}");
        assert_eq!(report.already_processed, 0);
        assert_eq!(report.summary(), "1 added, 0 already present, 0 skipped");

        let report = orch.run(&mut page);
        assert_eq!(report.already_processed, 1);
    }
}
