// src/gui/app.rs
use std::{
    error::Error,
    fs,
    path::Path,
    sync::mpsc::{self, Receiver},
    time::Instant,
};

use eframe::egui;
use notify::RecommendedWatcher;

use crate::{
    config::state::AppState,
    session::PageSession,
    watcher::{watch_file, Debouncer},
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    crate::log::init(crate::log::LOG_FILE);
    eframe::run_native(
        "Game Calendar",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // the loaded page, if any
    pub session: Option<PageSession>,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    pub status: String,

    // file watching
    pub debouncer: Debouncer,
    file_watch: Option<FileWatch>,
}

/// Live watcher on the loaded file; events arrive on `changes`.
struct FileWatch {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let out_path_text = state.options.export.out_path().to_string_lossy().into_owned();
        let debouncer = Debouncer::new(state.options.debounce);
        tracing::info!("gui started");
        Self {
            state,
            session: None,
            out_path_text,
            out_path_dirty: false,
            status: "Open a saved schedule page".into(),
            debouncer,
            file_watch: None,
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&mut self, msg: T) {
        self.status = msg.into();
    }

    /// Start a new session from the file and address fields.
    pub fn load(&mut self) {
        let path = self.state.gui.document_path.trim().to_string();
        if path.is_empty() {
            self.status("No file selected");
            return;
        }
        let markup = match fs::read_to_string(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(%path, error = %e, "cannot read page");
                self.status(format!("Cannot read {path}: {e}"));
                return;
            }
        };

        match PageSession::open(&markup, self.state.gui.address.trim(), self.state.options.clone()) {
            Ok(mut session) => {
                let summary = session.run().summary();
                tracing::info!(%path, %summary, "page loaded");
                self.session = Some(session);
                self.file_watch = None;
                self.debouncer.cancel();
                let name = Path::new(&path).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or(path);
                self.status(format!("{name}: {summary}"));
            }
            Err(e) => {
                self.session = None;
                self.status(format!("Error: {e}"));
            }
        }
    }

    /// The file changed and the debounce settled: same session, new markup.
    fn reload(&mut self) {
        let path = self.state.gui.document_path.trim().to_string();
        let Some(session) = self.session.as_mut() else { return };
        match fs::read_to_string(&path) {
            Ok(markup) => {
                session.apply_mutation(&markup);
                let summary = session.run().summary();
                self.status = format!("Updated: {summary}");
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "reload failed");
                self.status = format!("Cannot re-read {path}: {e}");
            }
        }
    }

    /// Push option edits into the running session (next run picks them up).
    pub fn options_changed(&mut self) {
        self.debouncer.set_delay(self.state.options.debounce);
        if let Some(session) = self.session.as_mut() {
            session.set_options(self.state.options.clone());
        }
    }

    fn start_watch(&mut self, ctx: &egui::Context) {
        let path = self.state.gui.document_path.trim().to_string();
        let (tx, changes) = mpsc::channel();
        let repaint = ctx.clone();
        match watch_file(Path::new(&path), move || {
            let _ = tx.send(());
            repaint.request_repaint();
        }) {
            Ok(watcher) => self.file_watch = Some(FileWatch { _watcher: watcher, changes }),
            Err(e) => {
                tracing::warn!(%path, error = %e, "cannot watch file");
                self.state.gui.watch = false;
                self.status(format!("Cannot watch {path}: {e}"));
            }
        }
    }

    fn watch_tick(&mut self, ctx: &egui::Context) {
        if !self.state.gui.watch || self.session.is_none() {
            self.file_watch = None;
            self.debouncer.cancel();
            return;
        }
        if self.file_watch.is_none() {
            self.start_watch(ctx);
        }

        let now = Instant::now();
        if let Some(watch) = &self.file_watch {
            while watch.changes.try_recv().is_ok() {
                self.debouncer.touch(now);
            }
        }
        if self.debouncer.fire_due(now) {
            self.reload();
        }
        if let Some(wait) = self.debouncer.remaining(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.watch_tick(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            crate::gui::components::toolbar::draw(ui, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::action_table::draw(ui, self);
        });
    }
}
