// tests/kenpom_flow.rs
use chrono::NaiveDate;

use gamecal::config::options::Options;
use gamecal::core::{css, Page};
use gamecal::error::{ExtractError, FailureKind};
use gamecal::registry::GameId;
use gamecal::Orchestrator;

const FANMATCH: &str = r#"
<html><body>
<div id="content-header"><h2>Fanmatch</h2></div>
<table id="fanmatch-table">
  <thead><tr><th>Game</th><th>Prediction</th><th>Time (ET)</th><th>Location</th></tr></thead>
  <tbody>
    <tr>
      <td>8 <a href="team.php?team=Florida">Florida</a> vs 61 <a href="team.php?team=Georgia">Georgia</a></td>
      <td>Florida 84-72 (87%) [66]</td>
      <td><a href="gameprep.php?g=1001">7:00 pm</a> <span class="seed-gray-block"><a href="https://www.espn.com/watch">ESPN2</a></span></td>
      <td>Gainesville, FL</td>
    </tr>
    <tr>
      <td>3 <a href="team.php?team=Duke">Duke</a> at 12 <a href="team.php?team=Kansas">Kansas</a></td>
      <td>Kansas 75-74 (52%) [70]</td>
      <td><a href="gameprep.php?g=1002">9:30 pm</a> <span class="seed-gray-block">CBS</span></td>
      <td>Lawrence, KS</td>
    </tr>
    <tr>
      <td><a href="team.php?team=Iona">Iona</a> <a href="team.php?team=Rider">Rider</a></td>
      <td></td>
      <td><a href="gameprep.php?g=1003">Final</a></td>
      <td></td>
    </tr>
  </tbody>
</table>
</body></html>"#;

fn run(address: &str) -> (gamecal::RunReport, Page) {
    let mut page = Page::parse(FANMATCH, address).unwrap();
    let report = Orchestrator::new(Options::default()).run(&mut page);
    (report, page)
}

#[test]
fn home_and_away_follow_the_row_wording() {
    let (report, page) = run("https://kenpom.com/fanmatch.php?d=2025-11-21");
    assert_eq!(report.adapter, Some("kenpom"));
    assert_eq!(report.inserted.len(), 2);

    let florida = &report.inserted[0];
    assert_eq!(florida.game_id, GameId::new("kenpom-1001"));
    assert_eq!(florida.event.title(), "Georgia @ Florida (ESPN2)");
    let start = NaiveDate::from_ymd_opt(2025, 11, 21).unwrap().and_hms_opt(19, 0, 0).unwrap();
    assert_eq!(florida.event.start(), start);
    assert_eq!((florida.event.end() - start).num_hours(), 2);
    assert_eq!(florida.event.location(), "");

    let duke = &report.inserted[1];
    assert_eq!(duke.event.title(), "Duke @ Kansas (CBS)");

    // finished game: reported as unparseable, no button
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].game_id, Some(GameId::new("kenpom-1003")));
    assert_eq!(report.failures[0].error.kind(), FailureKind::Unparseable);

    // the time links sit in table cells, so they get wrapped
    assert_eq!(page.select(&css("div.espn-cal-link-time-wrapper")).len(), 2);
}

#[test]
fn year_comes_from_the_address_not_the_clock() {
    let (report, _) = run("https://kenpom.com/fanmatch.php?d=2031-01-02");
    let start = report.inserted[0].event.start();
    assert_eq!(start, NaiveDate::from_ymd_opt(2031, 1, 2).unwrap().and_hms_opt(19, 0, 0).unwrap());
}

#[test]
fn missing_or_bad_date_aborts_the_page() {
    let (report, page) = run("https://kenpom.com/fanmatch.php");
    assert_eq!(report.aborted, Some(ExtractError::MissingDateParam));
    assert!(report.inserted.is_empty());
    assert!(page.select(&css("button")).is_empty());

    let (report, _) = run("https://kenpom.com/fanmatch.php?d=yesterday");
    assert_eq!(report.aborted, Some(ExtractError::InvalidDateParam("yesterday".into())));
    assert_eq!(report.aborted.as_ref().map(|e| e.kind()), Some(FailureKind::UnsupportedPage));
}
