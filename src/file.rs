// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::calendar::CalendarAction;
use crate::config::options::ExportOptions;
use crate::csv::to_export_string;

/// Write the session's actions to the file named by `export`.
/// Returns the final path written to.
pub fn export_actions(
    export: &ExportOptions,
    actions: &[CalendarAction],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = export.out_path();
    ensure_parent(&path)?;

    let contents = to_export_string(actions, export.include_headers, export.format.delimiter());
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), rows = actions.len(), "export written");
    Ok(path)
}

/// Save the annotated document.
pub fn write_annotated(path: &Path, html: &str) -> Result<(), Box<dyn std::error::Error>> {
    ensure_parent(path)?;
    fs::write(path, html)?;
    Ok(())
}

/// `user_o` may name a file or (trailing separator / existing dir) a directory.
pub fn resolve_single_out_path(user_o: &str, default_filename: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if user_o.is_empty() { return Ok(PathBuf::from(default_filename)); }
    let p = PathBuf::from(normalize_separators(user_o));
    if looks_like_dir_hint(user_o) || p.is_dir() {
        ensure_directory(&p)?; Ok(p.join(default_filename))
    } else {
        Ok(p)
    }
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

fn looks_like_dir_hint(p: &str) -> bool {
    p.ends_with('/') || p.ends_with('\\')
}

fn ensure_parent(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gamecal-file-{}-{name}", std::process::id()))
    }

    #[test]
    fn dir_hint_gets_default_name() {
        let dir = scratch("hint");
        let raw = format!("{}/", dir.display());
        let resolved = resolve_single_out_path(&raw, "schedule.html").unwrap();
        assert_eq!(resolved, dir.join("schedule.html"));
        assert!(dir.is_dir());
        assert_eq!(resolve_single_out_path("", "x.html").unwrap(), PathBuf::from("x.html"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let path = scratch("blocker");
        fs::write(&path, "x").unwrap();
        assert!(ensure_directory(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
