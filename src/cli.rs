// src/cli.rs
use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    time::Duration,
};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::calendar::LinkOpener;
use crate::config::consts::{DEBOUNCE_MS, FALLBACK_SCREEN, LOG_FILE};
use crate::config::options::{ExportFormat, Options};
use crate::file::{export_actions, resolve_single_out_path, write_annotated};
use crate::session::PageSession;
use crate::watcher::{self, Signal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Tsv => ExportFormat::Tsv,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gamecal-cli")]
#[command(version)]
#[command(about = "Add calendar links to a saved sports schedule page", long_about = None)]
pub struct Args {
    /// Saved schedule page (HTML)
    pub file: PathBuf,

    /// Address the page was loaded from; decides which layout is expected
    #[arg(short, long = "url")]
    pub url: String,

    /// Write the annotated page here (file, or directory with trailing slash)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Print every new calendar link
    #[arg(long)]
    pub links: bool,

    /// Export the added events as CSV/TSV
    #[arg(long)]
    pub export: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    #[arg(long)]
    pub include_headers: bool,

    /// Keep running and re-process the page whenever the file changes
    #[arg(long)]
    pub watch: bool,

    #[arg(long, default_value_t = DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Prefix titles with the sport's emoji
    #[arg(long)]
    pub sport_emoji: bool,

    /// Fill the event description with the matchup line
    #[arg(long)]
    pub describe: bool,

    /// Year for date headings that carry none (default: current year)
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long, default_value = LOG_FILE)]
    pub log: PathBuf,
}

impl Args {
    pub fn options(&self) -> Options {
        let mut options = Options::default();
        options.debounce = Duration::from_millis(self.debounce_ms);
        options.title.sport_emoji = self.sport_emoji;
        options.title.description = self.describe;
        options.default_year = self.year;
        options.export.format = self.format.into();
        options.export.include_headers = self.include_headers;
        options.export.out_path = self.export.clone();
        options
    }
}

/// Terminal stand-in for a popup: the link goes to stdout.
struct PrintOpener;

impl LinkOpener for PrintOpener {
    fn open(&mut self, url: &str, target: &str, features: &str) {
        tracing::debug!(target_window = target, features, "link printed");
        println!("{url}");
    }
}

fn boxed(e: Box<dyn std::error::Error>) -> color_eyre::Report {
    eyre!("{e}")
}

pub fn run(args: Args) -> Result<()> {
    crate::log::init(&args.log);

    let options = args.options();
    let markup = read_page(&args.file)?;
    let mut session = PageSession::open(&markup, &args.url, options)?;

    process(&mut session, &args)?;
    if args.watch {
        watch(&mut session, &args)?;
    }
    Ok(())
}

fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))
}

/// One run plus everything that follows from it: links, summary, output files.
fn process(session: &mut PageSession, args: &Args) -> Result<()> {
    let report = session.run().clone();
    if args.links {
        let popup = session.options().popup;
        for action in &report.inserted {
            println!("{}\t{}", action.game_id, action.event.title());
            action.activate(&mut PrintOpener, &popup, FALLBACK_SCREEN);
        }
    }
    for failure in &report.failures {
        let id = failure.game_id.as_ref().map(|g| g.as_str()).unwrap_or("?");
        eprintln!("skipped {id}: {}", failure.error);
    }
    eprintln!("{}", report.summary());

    if let Some(out) = &args.out {
        let stem = args.file.file_stem().and_then(|s| s.to_str()).unwrap_or("schedule");
        let path = resolve_single_out_path(out, &format!("{stem}.cal.html")).map_err(boxed)?;
        write_annotated(&path, &session.page().to_html()).map_err(boxed)?;
        eprintln!("Wrote {}", path.display());
    }
    if args.export.is_some() {
        let path = export_actions(&session.options().export, session.actions()).map_err(boxed)?;
        eprintln!("Exported {} events to {}", session.actions().len(), path.display());
    }
    Ok(())
}

/// Every filesystem event on the page is one mutation batch for the debouncer.
/// Runs until interrupted.
fn watch(session: &mut PageSession, args: &Args) -> Result<()> {
    let (signal_tx, signal_rx) = mpsc::channel::<Signal>();
    let (settled_tx, settled_rx) = mpsc::channel::<()>();

    let _debounce = watcher::spawn(session.options().debounce, signal_rx, move || {
        let _ = settled_tx.send(());
    });
    let _file_watch = watcher::watch_file(&args.file, move || {
        let _ = signal_tx.send(Signal::Mutated);
    })
    .wrap_err_with(|| format!("watching {}", args.file.display()))?;

    eprintln!("Watching {} (Ctrl+C to stop)", args.file.display());
    for () in settled_rx {
        let markup = read_page(&args.file)?;
        session.apply_mutation(&markup);
        process(session, args)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let args = Args::parse_from([
            "gamecal-cli",
            "page.html",
            "--url",
            "https://www.espn.com/nba/schedule",
            "--export",
            "out/games.tsv",
            "--format",
            "tsv",
            "--sport-emoji",
            "--year",
            "2026",
            "--debounce-ms",
            "50",
        ]);
        let opts = args.options();
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.out_path(), PathBuf::from("out/games.tsv"));
        assert!(!opts.export.include_headers);
        assert!(opts.title.sport_emoji);
        assert!(!opts.title.description);
        assert_eq!(opts.default_year, Some(2026));
        assert_eq!(opts.debounce, Duration::from_millis(50));
        assert_eq!(args.log, PathBuf::from(".store/debug.log"));
    }
}
