// src/gui/components/toolbar.rs
//
// Page source, title options and export controls. Writes straight into
// App.state and tells the session when options move.

use std::path::PathBuf;

use chrono::{Datelike, Local};
use eframe::egui;

use crate::{
    config::options::ExportFormat,
    csv::to_export_string,
    file,
    gui::app::App,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    // --- Source ---
    ui.horizontal(|ui| {
        ui.label("Page file:");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.document_path)
                .desired_width(320.0)
                .font(egui::TextStyle::Monospace),
        );
        ui.label("Address:");
        ui.add(egui::TextEdit::singleline(&mut app.state.gui.address).desired_width(320.0));
        if ui.button("Load").clicked() {
            app.load();
        }
        ui.checkbox(&mut app.state.gui.watch, "Watch file");
    });

    // --- Titles ---
    let mut changed = false;
    ui.horizontal(|ui| {
        let title = &mut app.state.options.title;
        changed |= ui.checkbox(&mut title.sport_emoji, "Sport emoji in title").changed();
        changed |= ui.checkbox(&mut title.description, "Matchup as description").changed();

        let mut fixed = app.state.options.default_year.is_some();
        if ui.checkbox(&mut fixed, "Fixed year").changed() {
            app.state.options.default_year = fixed.then(|| Local::now().year());
            changed = true;
        }
        if let Some(year) = app.state.options.default_year.as_mut() {
            changed |= ui.add(egui::DragValue::new(year).range(2000..=2100)).changed();
        }

        let mut ms = app.state.options.debounce.as_millis() as u64;
        ui.label("Debounce (ms):");
        if ui.add(egui::DragValue::new(&mut ms).range(0..=5000)).changed() {
            app.state.options.debounce = std::time::Duration::from_millis(ms);
            changed = true;
        }
    });
    if changed {
        tracing::debug!(options = ?app.state.options.title, year = ?app.state.options.default_year, "options changed");
        app.options_changed();
    }

    // --- Export ---
    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;
        let prev_fmt = export.format;

        ui.label("Format:");
        ui.selectable_value(&mut export.format, ExportFormat::Csv, "CSV");
        ui.selectable_value(&mut export.format, ExportFormat::Tsv, "TSV");
        if export.format != prev_fmt && !app.out_path_dirty {
            app.out_path_text = export.out_path().to_string_lossy().into_owned();
        }
        ui.checkbox(&mut export.include_headers, "Include headers");

        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text).font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
        }
    });

    ui.horizontal(|ui| {
        let actions = app.session.as_ref().map(|s| s.actions().to_vec()).unwrap_or_default();
        let export = app.state.options.export.clone();

        if ui.button("Copy").clicked() {
            if actions.is_empty() {
                app.status("Nothing to copy");
            } else {
                let txt = to_export_string(&actions, export.include_headers, export.format.delimiter());
                ui.ctx().copy_text(txt);
                app.status(format!("Copied {} events", actions.len()));
            }
        }

        if ui.button("Export").clicked() {
            if actions.is_empty() {
                app.status("Nothing to export");
            } else {
                let mut export = export;
                export.out_path = Some(PathBuf::from(app.out_path_text.trim()));
                match file::export_actions(&export, &actions) {
                    Ok(path) => app.status(format!("Exported {} events to {}", actions.len(), path.display())),
                    Err(e) => app.status(format!("Export failed: {e}")),
                }
            }
        }

        if ui.button("Save annotated page").clicked() {
            if let Some(session) = app.session.as_ref() {
                let path = PathBuf::from(format!("{}.cal.html", app.state.gui.document_path.trim_end_matches(".html")));
                let result = file::write_annotated(&path, &session.page().to_html());
                match result {
                    Ok(()) => app.status(format!("Wrote {}", path.display())),
                    Err(e) => app.status(format!("Save failed: {e}")),
                }
            }
        }
    });
}
