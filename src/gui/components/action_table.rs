// src/gui/components/action_table.rs
//
// One row per calendar action added in this session. The button opens the
// event link the same way the injected page button would.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::calendar::LinkOpener;
use crate::config::consts::{BUTTON_LABEL, FALLBACK_SCREEN};
use crate::gui::app::App;

/// Opens links in the system browser. A tab cannot be sized, so the popup
/// features are only logged.
struct BrowserOpener<'a> {
    ctx: &'a egui::Context,
}

impl LinkOpener for BrowserOpener<'_> {
    fn open(&mut self, url: &str, target: &str, features: &str) {
        tracing::debug!(target_window = target, features, "opening in browser");
        self.ctx.open_url(egui::OpenUrl::new_tab(url));
    }
}

fn screen_size(ctx: &egui::Context) -> (u32, u32) {
    ctx.input(|i| i.viewport().monitor_size)
        .map(|s| (s.x as u32, s.y as u32))
        .unwrap_or(FALLBACK_SCREEN)
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(session) = app.session.as_ref() else {
        ui.centered_and_justified(|ui| ui.label("No page loaded"));
        return;
    };
    let actions = session.actions();
    if actions.is_empty() {
        ui.centered_and_justified(|ui| ui.label("No games found yet"));
        return;
    }

    let ctx = ui.ctx().clone();
    let popup = session.options().popup;
    let mut clicked: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::initial(140.0).resizable(true).clip(true))
        .column(Column::initial(360.0).resizable(true).clip(true))
        .column(Column::initial(240.0).resizable(true).clip(true))
        .column(Column::remainder().at_least(140.0))
        .header(24.0, |mut header| {
            for label in ["Start", "Title", "Location", ""] {
                header.col(|ui| {
                    ui.add(egui::Label::new(RichText::new(label).strong()).selectable(false));
                });
            }
        })
        .body(|body| {
            body.rows(24.0, actions.len(), |mut row| {
                let ix = row.index();
                let ev = &actions[ix].event;
                row.col(|ui| {
                    ui.label(ev.start().format("%a %b %-d, %H:%M").to_string());
                });
                row.col(|ui| {
                    ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                    ui.label(ev.title());
                });
                row.col(|ui| {
                    ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                    ui.label(ev.location());
                });
                row.col(|ui| {
                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                        if ui.button(BUTTON_LABEL).clicked() {
                            clicked = Some(ix);
                        }
                    });
                });
            });
        });

    if let Some(ix) = clicked {
        let action = &actions[ix];
        action.activate(&mut BrowserOpener { ctx: &ctx }, &popup, screen_size(&ctx));
        let msg = format!("Opened calendar link for {}", action.event.title());
        app.status(msg);
    }
}
