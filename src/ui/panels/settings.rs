// ClassDesk - ui/panels/settings.rs
//
// Classroom settings tab: name, subject and description form with a live
// word count, Save and Reset, and the cover image upload.

use crate::app::state::AppState;
use crate::core::content::format_size;
use crate::core::model::Panel;
use crate::core::text::word_count;
use crate::ui::panels::banner;
use crate::ui::theme;
use crate::util::constants::{COVER_IMAGE_EXTENSIONS, DESCRIPTION_MAX_WORDS, MAX_COVER_IMAGE_BYTES};
use std::time::Instant;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    banner::render(ui, state, Panel::Settings);
    render_form(ui, state);
    ui.add_space(8.0);
    ui.separator();
    render_cover_image(ui, state);
}

fn render_form(ui: &mut egui::Ui, state: &mut AppState) {
    let mut description_changed = false;
    egui::Grid::new("settings_form")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .min_col_width(theme::FORM_LABEL_WIDTH)
        .show(ui, |ui| {
            ui.label("Classroom name");
            ui.add(
                egui::TextEdit::singleline(&mut state.settings_draft.name)
                    .desired_width(theme::FORM_FIELD_WIDTH),
            );
            ui.end_row();

            ui.label("Subject");
            ui.add(
                egui::TextEdit::singleline(&mut state.settings_draft.subject)
                    .desired_width(theme::FORM_FIELD_WIDTH),
            );
            ui.end_row();

            ui.label("Description");
            ui.vertical(|ui| {
                description_changed = ui
                    .add(
                        egui::TextEdit::multiline(&mut state.settings_draft.description)
                            .desired_rows(5)
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    )
                    .changed();
            });
            ui.end_row();
        });

    if description_changed {
        state.enforce_description_limit();
    }

    let words = word_count(&state.settings_draft.description);
    ui.horizontal(|ui| {
        ui.add_space(theme::FORM_LABEL_WIDTH + 8.0);
        let counter = egui::RichText::new(format!("{words}/{DESCRIPTION_MAX_WORDS} words")).small();
        if words >= DESCRIPTION_MAX_WORDS {
            ui.label(counter.color(theme::WARNING_TEXT));
        } else {
            ui.label(counter.weak());
        }
        if state.description_truncated {
            ui.colored_label(
                theme::WARNING_TEXT,
                format!("Trimmed to the first {DESCRIPTION_MAX_WORDS} words."),
            );
        }
    });

    if let Err(e) = state.settings_draft.validate() {
        ui.colored_label(theme::ERROR_TEXT, e.to_string());
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(state.settings_savable(), egui::Button::new("Save changes"))
            .clicked()
        {
            state.save_settings(Instant::now());
        }
        if ui
            .add_enabled(!state.in_flight.settings, egui::Button::new("Reset"))
            .on_hover_text("Discard unsaved edits")
            .clicked()
        {
            state.reset_settings();
        }
        if state.in_flight.settings {
            ui.spinner();
            ui.label("Saving\u{2026}");
        }
    });
}

fn render_cover_image(ui: &mut egui::Ui, state: &mut AppState) {
    ui.strong("Cover image");
    ui.label(
        egui::RichText::new(format!(
            "{} up to {}",
            COVER_IMAGE_EXTENSIONS.join(", ").to_uppercase(),
            format_size(MAX_COVER_IMAGE_BYTES)
        ))
        .small()
        .weak(),
    );

    let current = state
        .classroom
        .as_ref()
        .and_then(|c| c.cover_image.clone())
        .filter(|c| !c.is_empty());
    if let Some(url) = current {
        if ui.small_button("View current cover image").clicked() {
            state.pending_open_url = Some(url);
        }
    }

    ui.horizontal(|ui| {
        if ui.button("Choose image\u{2026}").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", COVER_IMAGE_EXTENSIONS)
                .pick_file()
            {
                state.set_cover_image(path, Instant::now());
            }
        }
        if let Some(name) = state
            .cover_image
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            ui.label(egui::RichText::new(name).monospace());
        }

        let busy = state.in_flight.cover_image;
        if ui
            .add_enabled(
                state.cover_image.is_some() && !busy,
                egui::Button::new("Upload"),
            )
            .clicked()
        {
            state.upload_cover_image();
        }
        if busy {
            ui.spinner();
        }
    });
}
