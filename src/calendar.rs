// src/calendar.rs
//! Canonical events and the calendar-service link built from them.

use chrono::NaiveDateTime;
use url::form_urlencoded;

use crate::config::consts::{
    BUTTON_CLASS, BUTTON_LABEL, BUTTON_TITLE, CALENDAR_ENDPOINT, POPUP_TARGET,
};
use crate::config::options::PopupGeometry;
use crate::core::sanitize::escape_attr;
use crate::error::EventError;
use crate::registry::GameId;

/// One game, normalized and ready for a calendar. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEvent {
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    description: String,
    location: String,
}

impl CanonicalEvent {
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, EventError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }
        if end <= start {
            return Err(EventError::EndNotAfterStart);
        }
        Ok(Self { title, start, end, description: description.into(), location: location.into() })
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn start(&self) -> NaiveDateTime { self.start }
    pub fn end(&self) -> NaiveDateTime { self.end }
    pub fn description(&self) -> &str { &self.description }
    pub fn location(&self) -> &str { &self.location }
}

/// Wall-clock stamp, no zone: `20251103T190000`.
pub fn calendar_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%S").to_string()
}

/// Event-creation link. `details` and `location` only appear when non-empty.
pub fn build_link(event: &CanonicalEvent) -> String {
    let dates = format!("{}/{}", calendar_stamp(event.start), calendar_stamp(event.end));

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.title)
        .append_pair("dates", &dates);
    if !event.description.is_empty() {
        query.append_pair("details", &event.description);
    }
    if !event.location.is_empty() {
        query.append_pair("location", &event.location);
    }

    format!("{CALENDAR_ENDPOINT}?{}", query.finish())
}

/// Something that can open a link in a new browsing context.
pub trait LinkOpener {
    fn open(&mut self, url: &str, target: &str, features: &str);
}

/// An injected "Add to Calendar" action: the game it belongs to and what it adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarAction {
    pub game_id: GameId,
    pub event: CanonicalEvent,
}

impl CalendarAction {
    pub fn new(game_id: GameId, event: CanonicalEvent) -> Self {
        Self { game_id, event }
    }

    pub fn url(&self) -> String {
        build_link(&self.event)
    }

    /// User clicked the action: open the link in a centered popup.
    pub fn activate(&self, opener: &mut dyn LinkOpener, popup: &PopupGeometry, screen: (u32, u32)) {
        let url = self.url();
        tracing::debug!(game = %self.game_id, %url, "opening calendar link");
        opener.open(&url, POPUP_TARGET, &popup.features(screen.0, screen.1));
    }

    /// Button markup for the page. The click handler opens the same popup
    /// from inside a browser.
    pub fn markup(&self, popup: &PopupGeometry) -> String {
        let onclick = format!(
            "event.preventDefault();event.stopPropagation();window.open('{}','{}',{});",
            self.url(),
            POPUP_TARGET,
            popup.features_script()
        );
        format!(
            r#"<button class="{}" title="{}" data-game-id="{}" onclick="{}">{}</button>"#,
            BUTTON_CLASS,
            BUTTON_TITLE,
            escape_attr(self.game_id.as_str()),
            escape_attr(&onclick),
            BUTTON_LABEL
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use url::Url;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn params(link: &str) -> HashMap<String, String> {
        Url::parse(link).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn event_invariants() {
        assert_eq!(CanonicalEvent::new(" ", at(3, 19, 0), at(3, 21, 0), "", ""), Err(EventError::EmptyTitle));
        assert_eq!(
            CanonicalEvent::new("A @ B", at(3, 19, 0), at(3, 19, 0), "", ""),
            Err(EventError::EndNotAfterStart)
        );
    }

    #[test]
    fn link_has_required_params_only() {
        let ev = CanonicalEvent::new("Duke @ UNC (ESPN)", at(3, 19, 0), at(3, 21, 0), "", "").unwrap();
        let link = build_link(&ev);
        assert!(link.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&text="));
        assert!(link.contains("text=Duke+%40+UNC+%28ESPN%29"));
        assert!(link.contains("dates=20251103T190000%2F20251103T210000"));
        assert!(!link.contains("details="));
        assert!(!link.contains("location="));
        assert!(!link.contains('Z'));
    }

    #[test]
    fn link_round_trips_all_fields() {
        let ev = CanonicalEvent::new(
            "🏀 St. John's @ Texas A&M (ESPN+/SECN)",
            at(8, 23, 30),
            at(9, 1, 30),
            "St. John's @ Texas A&M (ESPN+/SECN)",
            "Reed Arena, College Station, TX",
        )
        .unwrap();
        let p = params(&build_link(&ev));
        assert_eq!(p["action"], "TEMPLATE");
        assert_eq!(p["text"], ev.title());
        assert_eq!(p["dates"], "20251108T233000/20251109T013000");
        assert_eq!(p["details"], ev.description());
        assert_eq!(p["location"], ev.location());
    }

    #[test]
    fn markup_carries_link_and_id() {
        let ev = CanonicalEvent::new("A @ B", at(3, 19, 0), at(3, 21, 0), "", "").unwrap();
        let action = CalendarAction::new(GameId::new("401"), ev);
        let html = action.markup(&PopupGeometry::default());
        assert!(html.starts_with(r#"<button class="espn-cal-link-button""#));
        assert!(html.contains(r#"data-game-id="401""#));
        assert!(html.contains("calendar.google.com/calendar/render?action=TEMPLATE&amp;text=A+%40+B"));
        assert!(html.contains("📅 Add to Calendar"));
    }

    struct Recorder(Vec<(String, String, String)>);

    impl LinkOpener for Recorder {
        fn open(&mut self, url: &str, target: &str, features: &str) {
            self.0.push((url.into(), target.into(), features.into()));
        }
    }

    #[test]
    fn activation_opens_centered_popup() {
        let ev = CanonicalEvent::new("A @ B", at(3, 19, 0), at(3, 21, 0), "", "").unwrap();
        let action = CalendarAction::new(GameId::new("401"), ev);
        let mut rec = Recorder(Vec::new());
        action.activate(&mut rec, &PopupGeometry::default(), (1600, 900));
        let (url, target, features) = &rec.0[0];
        assert_eq!(url, &action.url());
        assert_eq!(target, "googleCalendarPopup");
        assert!(features.starts_with("width=800,height=700,left=400,top=100"));
    }
}
