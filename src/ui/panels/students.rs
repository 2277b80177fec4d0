// ClassDesk - ui/panels/students.rs
//
// Student manager: add-student form, search/filter/sort bar, the roster
// table with per-row Remove, and roster export.
//
// Row actions are collected during rendering and applied afterwards so no
// mutable borrow of `state` overlaps the borrow of `state.students`.

use crate::app::state::AppState;
use crate::core::export::ExportFormat;
use crate::core::model::Panel;
use crate::core::roster::{JoinedWithin, SortKey};
use crate::ui::panels::banner;
use crate::ui::theme;
use std::time::Instant;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    banner::render(ui, state, Panel::Students);
    render_add_form(ui, state);
    ui.add_space(6.0);
    render_filter_bar(ui, state);
    ui.separator();
    render_table(ui, state);
}

fn render_add_form(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Add student")
        .id_salt("add_student")
        .default_open(true)
        .show(ui, |ui| {
            let mut submit = false;
            egui::Grid::new("add_student_form")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.student_draft.name)
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    );
                    ui.end_row();

                    ui.label("Email");
                    let email = ui.add(
                        egui::TextEdit::singleline(&mut state.student_draft.email)
                            .hint_text("name@school.example")
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    );
                    ui.end_row();

                    ui.label("Roll number");
                    let roll = ui.add(
                        egui::TextEdit::singleline(&mut state.student_draft.roll_number)
                            .hint_text("optional")
                            .desired_width(theme::FORM_FIELD_WIDTH),
                    );
                    ui.end_row();

                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if enter && (email.lost_focus() || roll.lost_focus()) {
                        submit = true;
                    }
                });

            ui.horizontal(|ui| {
                let busy = state.in_flight.add_student;
                if ui
                    .add_enabled(!busy, egui::Button::new("Add student"))
                    .clicked()
                {
                    submit = true;
                }
                if busy {
                    ui.spinner();
                }
            });

            if submit {
                state.submit_student(Instant::now());
            }
        });
}

fn render_filter_bar(ui: &mut egui::Ui, state: &mut AppState) {
    let mut changed = false;
    ui.horizontal_wrapped(|ui| {
        ui.label("Search:");
        changed |= ui
            .add(
                egui::TextEdit::singleline(&mut state.roster_filter.search)
                    .hint_text("name, email or roll number")
                    .desired_width(200.0),
            )
            .changed();

        ui.label("Joined:");
        egui::ComboBox::from_id_salt("joined_filter")
            .selected_text(state.roster_filter.joined.label())
            .show_ui(ui, |ui| {
                for preset in JoinedWithin::presets() {
                    changed |= ui
                        .selectable_value(&mut state.roster_filter.joined, *preset, preset.label())
                        .changed();
                }
            });

        ui.label("Sort:");
        egui::ComboBox::from_id_salt("sort_key")
            .selected_text(state.roster_filter.sort_key.label())
            .show_ui(ui, |ui| {
                for key in SortKey::all() {
                    changed |= ui
                        .selectable_value(&mut state.roster_filter.sort_key, *key, key.label())
                        .changed();
                }
            });
        if ui
            .button(state.roster_filter.direction.arrow())
            .on_hover_text("Toggle sort direction")
            .clicked()
        {
            state.roster_filter.direction = state.roster_filter.direction.toggled();
            changed = true;
        }

        if !state.roster_filter.is_unfiltered() && ui.button("Clear").clicked() {
            state.roster_filter.search.clear();
            state.roster_filter.joined = JoinedWithin::Any;
            changed = true;
        }

        ui.separator();
        let has_rows = !state.filtered_students.is_empty();
        ui.add_enabled_ui(has_rows, |ui| {
            ui.menu_button("Export", |ui| {
                for format in [ExportFormat::Csv, ExportFormat::Json] {
                    if ui.button(format!("{}\u{2026}", format.label())).clicked() {
                        let classroom = state
                            .classroom
                            .as_ref()
                            .map(|c| c.name.as_str())
                            .unwrap_or_default();
                        if let Some(dest) = rfd::FileDialog::new()
                            .add_filter(format.label(), &[format.extension()])
                            .set_file_name(format.default_file_name(classroom))
                            .save_file()
                        {
                            state.export_students(&dest, format, Instant::now());
                        }
                        ui.close_menu();
                    }
                }
            });
        });
        if state.last_export.is_some()
            && ui
                .small_button("Show in folder")
                .on_hover_text("Open the last exported file's folder")
                .clicked()
        {
            state.pending_reveal = state.last_export.clone();
        }
    });

    if changed {
        state.apply_roster_filter();
    }
}

fn render_table(ui: &mut egui::Ui, state: &mut AppState) {
    if state.students.is_empty() {
        if state.in_flight.students {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading students\u{2026}");
            });
        } else if !state.students_loaded {
            if ui.button("Retry loading students").clicked() {
                state.request_students();
            }
        } else {
            ui.label("No students enrolled yet.");
        }
        return;
    }

    ui.label(
        egui::RichText::new(format!(
            "Showing {} of {} students",
            state.filtered_students.len(),
            state.students.len()
        ))
        .small()
        .weak(),
    );

    if state.filtered_students.is_empty() {
        ui.label("No students match the current filters.");
        return;
    }

    let mut sort_click: Option<SortKey> = None;
    let mut remove: Option<String> = None;

    egui::Grid::new("roster_table")
        .num_columns(5)
        .striped(true)
        .min_row_height(theme::TABLE_ROW_HEIGHT)
        .spacing([16.0, 2.0])
        .show(ui, |ui| {
            for key in SortKey::all() {
                let arrow = if state.roster_filter.sort_key == *key {
                    format!(" {}", state.roster_filter.direction.arrow())
                } else {
                    String::new()
                };
                if ui
                    .add(egui::Button::new(egui::RichText::new(format!("{}{arrow}", key.label())).strong()).frame(false))
                    .clicked()
                {
                    sort_click = Some(*key);
                }
            }
            ui.label("");
            ui.end_row();

            for &idx in &state.filtered_students {
                let Some(student) = state.students.get(idx) else {
                    continue;
                };
                ui.label(&student.name);
                ui.label(egui::RichText::new(&student.email).monospace());
                ui.label(if student.roll_number.is_empty() {
                    "--"
                } else {
                    student.roll_number.as_str()
                });
                ui.label(
                    student
                        .created_at
                        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "--".to_string()),
                );
                if ui
                    .small_button("Remove")
                    .on_hover_text("Remove this student from the classroom")
                    .clicked()
                {
                    remove = Some(student.id.clone());
                }
                ui.end_row();
            }
        });

    if let Some(key) = sort_click {
        state.roster_filter.sort_by(key);
        state.apply_roster_filter();
    }
    if let Some(id) = remove {
        state.ask_remove_student(&id);
    }
}
