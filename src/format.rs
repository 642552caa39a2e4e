// src/format.rs
// Human-readable event labels.

use crate::config::consts::NETWORK_PLACEHOLDER;
use crate::sports::sport_emoji;

fn with_network(away: &str, home: &str, network: Option<&str>) -> String {
    match network.map(str::trim) {
        Some(n) if !n.is_empty() && n != NETWORK_PLACEHOLDER => format!("{away} @ {home} ({n})"),
        _ => format!("{away} @ {home}"),
    }
}

/// `"Duke @ UNC (ESPN)"`, or `"🏀 Duke @ UNC (ESPN)"` when a sport is given.
pub fn format_title(away: &str, home: &str, network: Option<&str>, sport: Option<&str>) -> String {
    let base = with_network(away, home, network);
    match sport {
        Some(key) => format!("{} {base}", sport_emoji(key)),
        None => base,
    }
}

/// Same matchup line as the title, never prefixed.
pub fn format_description(away: &str, home: &str, network: Option<&str>) -> String {
    with_network(away, home, network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_variants() {
        assert_eq!(format_title("Duke", "UNC", Some("ESPN"), None), "Duke @ UNC (ESPN)");
        assert_eq!(format_title("Duke", "UNC", Some("--"), None), "Duke @ UNC");
        assert_eq!(format_title("Duke", "UNC", None, None), "Duke @ UNC");
        assert_eq!(format_title("Duke", "UNC", Some(""), None), "Duke @ UNC");
        assert_eq!(format_title("Duke", "UNC", Some("ESPN"), Some("basketball")), "🏀 Duke @ UNC (ESPN)");
        assert_eq!(format_title("Duke", "UNC", None, Some("unknown-sport")), "🏆 Duke @ UNC");
    }

    #[test]
    fn description_has_no_emoji() {
        assert_eq!(format_description("Duke", "UNC", Some("ESPN2/ESPN+")), "Duke @ UNC (ESPN2/ESPN+)");
        assert_eq!(format_description("Duke", "UNC", Some("--")), "Duke @ UNC");
    }
}
