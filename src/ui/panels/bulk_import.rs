// ClassDesk - ui/panels/bulk_import.rs
//
// Bulk import tab: template download, file picker with a local preview of
// the spreadsheet, the Import action, and the server's per-row results.

use crate::app::state::AppState;
use crate::core::model::Panel;
use crate::ui::panels::banner;
use crate::ui::theme;
use crate::util::constants::{IMPORT_EXTENSIONS, IMPORT_TEMPLATE_FILE_NAME, MAX_IMPORT_ROWS};
use std::time::Instant;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    banner::render(ui, state, Panel::Import);

    ui.label(format!(
        "Import up to {MAX_IMPORT_ROWS} students from a CSV or XLSX file. \
         Columns: name, email, and optionally rollNumber."
    ));
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui.button("Download template\u{2026}").clicked() {
            if let Some(dest) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv"])
                .set_file_name(IMPORT_TEMPLATE_FILE_NAME)
                .save_file()
            {
                state.save_import_template(&dest, Instant::now());
            }
        }
        if ui.button("Choose file\u{2026}").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Spreadsheets", IMPORT_EXTENSIONS)
                .pick_file()
            {
                state.set_import_file(path);
            }
        }
        if let Some(name) = state
            .import_path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            ui.label(egui::RichText::new(name).monospace());
        }
    });

    ui.separator();
    render_preview(ui, state);

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let busy = state.in_flight.import;
        if ui
            .add_enabled(state.import_ready() && !busy, egui::Button::new("Import students"))
            .clicked()
        {
            state.submit_import(Instant::now());
        }
        if busy {
            ui.spinner();
            ui.label("Importing\u{2026}");
        }
    });

    render_summary(ui, state);
}

fn render_preview(ui: &mut egui::Ui, state: &AppState) {
    let Some(result) = &state.import_preview else {
        ui.label(egui::RichText::new("No file chosen.").weak());
        return;
    };
    let preview = match result {
        Ok(p) => p,
        Err(e) => {
            ui.colored_label(theme::ERROR_TEXT, e.as_str());
            return;
        }
    };

    ui.horizontal_wrapped(|ui| {
        ui.label(format!("{} rows", preview.total_rows));
        if preview.blank_rows > 0 {
            ui.label(
                egui::RichText::new(format!("{} blank rows ignored", preview.blank_rows)).weak(),
            );
        }
        if preview.missing_email_rows > 0 {
            ui.colored_label(
                theme::WARNING_TEXT,
                format!("{} rows have no email and will be rejected", preview.missing_email_rows),
            );
        }
        if !preview.has_roll_column {
            ui.label(egui::RichText::new("no rollNumber column").weak());
        }
    });

    if preview.rows.is_empty() {
        return;
    }
    egui::Grid::new("import_preview")
        .num_columns(4)
        .striped(true)
        .spacing([14.0, 2.0])
        .show(ui, |ui| {
            for heading in ["Row", "Name", "Email", "Roll number"] {
                ui.strong(heading);
            }
            ui.end_row();
            for row in &preview.rows {
                ui.label(egui::RichText::new(row.row.to_string()).weak());
                ui.label(&row.name);
                if row.email.is_empty() {
                    ui.colored_label(theme::WARNING_TEXT, "(missing)");
                } else {
                    ui.label(&row.email);
                }
                ui.label(&row.roll_number);
                ui.end_row();
            }
        });
    if preview.total_rows > preview.rows.len() {
        ui.label(
            egui::RichText::new(format!(
                "\u{2026} and {} more",
                preview.total_rows - preview.rows.len()
            ))
            .weak(),
        );
    }
}

fn render_summary(ui: &mut egui::Ui, state: &AppState) {
    let Some(summary) = &state.import_summary else {
        return;
    };
    ui.separator();
    ui.strong("Import results");
    egui::Grid::new("import_summary")
        .num_columns(2)
        .spacing([8.0, 2.0])
        .show(ui, |ui| {
            ui.label("Rows:");
            ui.label(summary.total_rows.to_string());
            ui.end_row();
            ui.label("Imported:");
            ui.colored_label(theme::PUBLIC_BADGE, summary.imported.to_string());
            ui.end_row();
            ui.label("Skipped:");
            ui.label(summary.skipped.to_string());
            ui.end_row();
            ui.label("Failed:");
            if summary.failed > 0 {
                ui.colored_label(theme::ERROR_TEXT, summary.failed.to_string());
            } else {
                ui.label("0");
            }
            ui.end_row();
        });

    if summary.errors.is_empty() {
        return;
    }
    ui.add_space(4.0);
    egui::CollapsingHeader::new(format!("Row errors ({})", summary.errors.len()))
        .id_salt("import_errors")
        .default_open(summary.errors.len() <= 20)
        .show(ui, |ui| {
            egui::Grid::new("import_errors_grid")
                .num_columns(3)
                .striped(true)
                .spacing([14.0, 2.0])
                .show(ui, |ui| {
                    for heading in ["Row", "Field", "Problem"] {
                        ui.strong(heading);
                    }
                    ui.end_row();
                    for err in &summary.errors {
                        ui.label(err.row.to_string());
                        ui.label(if err.field.is_empty() { "--" } else { err.field.as_str() });
                        ui.label(&err.message);
                        ui.end_row();
                    }
                });
        });
}
