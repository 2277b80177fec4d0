// ClassDesk - ui/panels/course_content.rs
//
// Course content tab: upload form, filter bar, content list with Preview and
// Delete actions, and the text preview window.

use crate::app::state::{AppState, PreviewStatus};
use crate::core::content::{format_size, ContentKind, PreviewKind};
use crate::core::model::Panel;
use crate::ui::panels::banner;
use crate::ui::theme;
use std::time::Instant;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    banner::render(ui, state, Panel::Content);
    render_upload_form(ui, state);
    ui.add_space(6.0);
    render_filter_bar(ui, state);
    ui.separator();
    render_list(ui, state);
}

fn render_upload_form(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Upload content")
        .id_salt("upload_content")
        .default_open(false)
        .show(ui, |ui| {
            egui::Grid::new("upload_form")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Title");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.upload.title)
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    );
                    ui.end_row();

                    ui.label("Description");
                    ui.add(
                        egui::TextEdit::multiline(&mut state.upload.description)
                            .desired_rows(2)
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    );
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut state.upload.is_public, "Visible to students");
                    ui.end_row();

                    ui.label("File");
                    ui.horizontal(|ui| {
                        if ui.button("Choose\u{2026}").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .set_title("Choose a file to upload")
                                .pick_file()
                            {
                                state.set_upload_file(path, Instant::now());
                            }
                        }
                        match state.upload_file_name() {
                            Some(name) => {
                                ui.label(egui::RichText::new(name).monospace());
                                ui.label(
                                    egui::RichText::new(format_size(state.upload.size)).weak(),
                                );
                            }
                            None => {
                                ui.label(egui::RichText::new("No file chosen").weak());
                            }
                        }
                    });
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                let busy = state.in_flight.upload;
                if ui
                    .add_enabled(!busy, egui::Button::new("Upload"))
                    .clicked()
                {
                    state.submit_upload(Instant::now());
                }
                if busy {
                    ui.spinner();
                    ui.label("Uploading\u{2026}");
                }
            });
        });
}

fn render_filter_bar(ui: &mut egui::Ui, state: &mut AppState) {
    let mut changed = false;
    ui.horizontal_wrapped(|ui| {
        ui.label("Search:");
        changed |= ui
            .add(
                egui::TextEdit::singleline(&mut state.content_filter.search)
                    .hint_text("title or description")
                    .desired_width(200.0),
            )
            .changed();

        ui.label("Kind:");
        let selected = state
            .content_filter
            .kind
            .map(|k| k.label())
            .unwrap_or("All");
        egui::ComboBox::from_id_salt("content_kind")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut state.content_filter.kind, None, "All")
                    .changed();
                for kind in ContentKind::all() {
                    changed |= ui
                        .selectable_value(&mut state.content_filter.kind, Some(*kind), kind.label())
                        .changed();
                }
            });

        changed |= ui
            .checkbox(&mut state.content_filter.public_only, "Public only")
            .changed();
    });

    if changed {
        state.apply_content_filter();
    }
}

fn render_list(ui: &mut egui::Ui, state: &mut AppState) {
    if state.contents.is_empty() {
        if state.in_flight.content {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading content\u{2026}");
            });
        } else {
            ui.horizontal(|ui| {
                ui.label("No content uploaded yet.");
                if ui.small_button("Reload").clicked() {
                    state.request_content();
                }
            });
        }
        return;
    }
    if state.filtered_content.is_empty() {
        ui.label("No content matches the current filters.");
        return;
    }

    let mut preview: Option<String> = None;
    let mut delete: Option<String> = None;

    egui::Grid::new("content_table")
        .num_columns(6)
        .striped(true)
        .min_row_height(theme::TABLE_ROW_HEIGHT)
        .spacing([14.0, 2.0])
        .show(ui, |ui| {
            for heading in ["Kind", "Title", "Size", "Uploaded by", "Date", ""] {
                ui.strong(heading);
            }
            ui.end_row();

            for &idx in &state.filtered_content {
                let Some(item) = state.contents.get(idx) else {
                    continue;
                };
                let kind = ContentKind::of(item);
                ui.label(
                    egui::RichText::new(kind.label())
                        .small()
                        .color(theme::content_kind_colour(kind)),
                );

                ui.horizontal(|ui| {
                    let title = ui.label(&item.title);
                    if !item.description.is_empty() {
                        title.on_hover_text(&item.description);
                    }
                    if item.is_public {
                        ui.label(
                            egui::RichText::new("public")
                                .small()
                                .color(theme::PUBLIC_BADGE),
                        );
                    }
                });

                ui.label(format_size(item.file_size));
                ui.label(
                    item.uploaded_by
                        .as_ref()
                        .map(|u| u.display_name())
                        .unwrap_or("--"),
                );
                ui.label(
                    item.created_at
                        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "--".to_string()),
                );

                ui.horizontal(|ui| {
                    let hint = if PreviewKind::for_item(item).is_inline() {
                        "Show the file here"
                    } else {
                        "Open the file in your browser"
                    };
                    if ui.small_button("Preview").on_hover_text(hint).clicked() {
                        preview = Some(item.id.clone());
                    }
                    if ui.small_button("Delete").clicked() {
                        delete = Some(item.id.clone());
                    }
                });
                ui.end_row();
            }
        });

    if let Some(id) = preview {
        state.preview_content(&id, Instant::now());
    }
    if let Some(id) = delete {
        state.ask_delete_content(&id);
    }
}

/// Floating window showing a fetched text preview.
pub fn render_preview(ctx: &egui::Context, state: &mut AppState) {
    let Some(window) = &state.preview else {
        return;
    };

    let mut open = true;
    egui::Window::new(format!("Preview: {}", window.title))
        .id(egui::Id::new("content_preview"))
        .open(&mut open)
        .default_size([theme::PREVIEW_WINDOW_WIDTH, theme::PREVIEW_WINDOW_HEIGHT])
        .resizable(true)
        .show(ctx, |ui| match &window.status {
            PreviewStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Fetching file\u{2026}");
                });
            }
            PreviewStatus::Failed(e) => {
                ui.colored_label(theme::ERROR_TEXT, format!("Preview failed: {e}"));
            }
            PreviewStatus::Ready(preview) => {
                if preview.truncated {
                    ui.colored_label(
                        theme::WARNING_TEXT,
                        "File is larger than the preview limit; showing the beginning only.",
                    );
                }
                egui::ScrollArea::both()
                    .id_salt("preview_text")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.add(egui::Label::new(egui::RichText::new(&preview.text).monospace()).extend());
                    });
            }
        });

    if !open {
        state.preview = None;
    }
}
