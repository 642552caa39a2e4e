// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local};

use super::consts::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Quiet period after the last mutation before a re-run.
    pub debounce: Duration,
    pub popup: PopupGeometry,
    pub title: TitleOptions,
    /// Year for date headings that omit one. `None` means the current local year.
    pub default_year: Option<i32>,
    pub export: ExportOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            popup: PopupGeometry::default(),
            title: TitleOptions::default(),
            default_year: None,
            export: ExportOptions::default(),
        }
    }
}

impl Options {
    pub fn resolved_year(&self) -> i32 {
        self.default_year.unwrap_or_else(|| Local::now().year())
    }
}

/// Which of the richer formatter paths the orchestrator uses.
/// Both off reproduces the plain `Away @ Home (Network)` title with no description.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TitleOptions {
    pub sport_emoji: bool,
    pub description: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for PopupGeometry {
    fn default() -> Self {
        Self { width: POPUP_WIDTH, height: POPUP_HEIGHT }
    }
}

impl PopupGeometry {
    /// `window.open` feature string, centered on a screen of the given size.
    pub fn features(&self, screen_w: u32, screen_h: u32) -> String {
        let left = (f64::from(screen_w) - f64::from(self.width)) / 2.0;
        let top = (f64::from(screen_h) - f64::from(self.height)) / 2.0;
        format!(
            "width={},height={},left={},top={},scrollbars=yes,resizable=yes",
            self.width, self.height, left, top
        )
    }

    /// Same geometry, computed by the browser at click time.
    pub fn features_script(&self) -> String {
        format!(
            "'width={w},height={h},left='+((screen.width-{w})/2)+',top='+((screen.height-{h})/2)+',scrollbars=yes,resizable=yes'",
            w = self.width,
            h = self.height
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
        }
    }

    pub fn delimiter(self) -> char {
        match self {
            ExportFormat::Csv => ',',
            ExportFormat::Tsv => '\t',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    pub out_path: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_path: None,
        }
    }
}

impl ExportOptions {
    /// Explicit path if set, else `out/games.<ext>`.
    pub fn out_path(&self) -> PathBuf {
        match &self.out_path {
            Some(p) => p.clone(),
            None => Path::new(DEFAULT_OUT_DIR).join(format!("games.{}", self.format.ext())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centered() {
        let popup = PopupGeometry::default();
        assert_eq!(
            popup.features(1920, 1080),
            "width=800,height=700,left=560,top=190,scrollbars=yes,resizable=yes"
        );
        // odd remainder keeps the half pixel, like the browser arithmetic
        assert!(popup.features(1365, 768).contains("left=282.5"));
    }

    #[test]
    fn default_export_path_follows_format() {
        let mut export = ExportOptions::default();
        assert!(export.out_path().ends_with("games.csv"));
        export.format = ExportFormat::Tsv;
        assert!(export.out_path().ends_with("games.tsv"));
    }

    #[test]
    fn explicit_year_wins() {
        let opts = Options { default_year: Some(2025), ..Options::default() };
        assert_eq!(opts.resolved_year(), 2025);
    }

    #[test]
    fn defaults_keep_plain_titles_and_half_second_debounce() {
        let opts = Options::default();
        assert_eq!(opts.debounce, Duration::from_millis(500));
        assert!(!opts.title.sport_emoji);
        assert!(!opts.title.description);
    }
}
