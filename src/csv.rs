// src/csv.rs
use std::io::{self, Write};

use crate::calendar::CalendarAction;

pub const EXPORT_HEADERS: [&str; 7] = ["Id", "Title", "Start", "End", "Description", "Location", "Link"];

const STAMP: &str = "%Y-%m-%d %H:%M";

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// One export row per action, columns as in [`EXPORT_HEADERS`].
pub fn action_row(action: &CalendarAction) -> Vec<String> {
    let ev = &action.event;
    vec![
        action.game_id.to_string(),
        ev.title().to_string(),
        ev.start().format(STAMP).to_string(),
        ev.end().format(STAMP).to_string(),
        ev.description().to_string(),
        ev.location().to_string(),
        action.url(),
    ]
}

/// Full export text for Copy/Export.
pub fn to_export_string(actions: &[CalendarAction], include_headers: bool, sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        let _ = write_row(&mut buf, &EXPORT_HEADERS, sep);
    }
    for action in actions {
        let _ = write_row(&mut buf, &action_row(action), sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CanonicalEvent;
    use crate::registry::GameId;
    use chrono::NaiveDate;

    fn action(title: &str, location: &str) -> CalendarAction {
        let start = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().and_hms_opt(19, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().and_hms_opt(21, 0, 0).unwrap();
        let ev = CanonicalEvent::new(title, start, end, "", location).unwrap();
        CalendarAction::new(GameId::new("401"), ev)
    }

    #[test]
    fn quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["a", "b,c", "say \"hi\""], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,\"b,c\",\"say \"\"hi\"\"\"\n");

        let mut buf = Vec::new();
        write_row(&mut buf, &["b,c", "d"], '\t').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "b,c\td\n");
    }

    #[test]
    fn export_rows_follow_headers() {
        let text = to_export_string(&[action("Duke @ UNC (ESPN)", "Durham, NC")], true, ',');
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Id,Title,Start,End,Description,Location,Link"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("401,Duke @ UNC (ESPN),2025-11-03 19:00,2025-11-03 21:00,,\"Durham, NC\",https://"));
        assert_eq!(lines.next(), None);

        let text = to_export_string(&[action("A @ B", "")], false, '\t');
        assert!(text.starts_with("401\tA @ B\t"));
    }
}
