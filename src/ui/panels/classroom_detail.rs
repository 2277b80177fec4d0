// ClassDesk - ui/panels/classroom_detail.rs
//
// Classroom detail shell: classroom header with summary counts, the tab bar
// and routing to the active tab's panel, plus the shared confirmation dialog.

use crate::app::state::{AppState, Confirm};
use crate::core::content::format_size;
use crate::core::model::Panel;
use crate::ui::panels::{banner, bulk_import, course_content, settings, students};
use crate::ui::theme;
use std::time::Instant;

/// Render the shell into the central area.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    banner::render(ui, state, Panel::Detail);

    if state.connection.is_none() {
        ui.centered_and_justified(|ui| {
            ui.label("Not connected.\nEnter a server URL and classroom ID on the left, then Connect.");
        });
        return;
    }

    render_header(ui, state);
    ui.separator();

    ui.horizontal(|ui| {
        for &tab in Panel::tabs() {
            let label = match tab {
                Panel::Students => format!("{} ({})", tab.label(), state.summary.student_count),
                Panel::Content => format!("{} ({})", tab.label(), state.summary.content_count),
                _ => tab.label().to_string(),
            };
            ui.selectable_value(&mut state.active_tab, tab, label);
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("tab_body")
        .auto_shrink([false; 2])
        .show(ui, |ui| match state.active_tab {
            Panel::Students | Panel::Detail => students::render(ui, state),
            Panel::Content => course_content::render(ui, state),
            Panel::Import => bulk_import::render(ui, state),
            Panel::Settings => settings::render(ui, state),
        });
}

fn render_header(ui: &mut egui::Ui, state: &mut AppState) {
    if state.classroom.is_none() {
        ui.horizontal(|ui| {
            if state.in_flight.classroom {
                ui.spinner();
                ui.label("Loading classroom\u{2026}");
            } else if ui.button("Retry").clicked() {
                state.request_classroom();
            }
        });
        return;
    }
    let Some(classroom) = &state.classroom else {
        return;
    };

    let mut open_cover: Option<String> = None;
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(&classroom.name);
            if !classroom.subject.is_empty() {
                ui.label(egui::RichText::new(&classroom.subject).italics());
            }
            if !classroom.description.is_empty() {
                ui.add(egui::Label::new(egui::RichText::new(&classroom.description).weak()).wrap());
            }
            if let Some(cover) = classroom.cover_image.as_ref().filter(|c| !c.is_empty()) {
                if ui.small_button("View cover image").clicked() {
                    open_cover = Some(cover.clone());
                }
            }
        });
    });
    if open_cover.is_some() {
        state.pending_open_url = open_cover;
    }

    ui.add_space(4.0);
    let summary = &state.summary;
    let mut refresh_now = false;
    ui.horizontal(|ui| {
        egui::Grid::new("classroom_summary")
            .num_columns(8)
            .spacing([8.0, 2.0])
            .show(ui, |ui| {
                ui.label("Students:");
                ui.strong(summary.student_count.to_string());
                ui.label("Content:");
                ui.strong(summary.content_count.to_string());
                ui.label("Public:");
                ui.strong(summary.public_content_count.to_string());
                ui.label("Total size:");
                ui.strong(format_size(summary.total_content_bytes));
                ui.end_row();
            });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let busy = state.in_flight.summary || state.in_flight.classroom;
            if ui
                .add_enabled(!busy, egui::Button::new("\u{21bb} Refresh"))
                .on_hover_text("Refresh classroom summary now")
                .clicked()
            {
                refresh_now = true;
            }
            if busy {
                ui.spinner();
            }
            if let Some(at) = summary.refreshed_at {
                ui.label(
                    egui::RichText::new(format!(
                        "Updated {}",
                        at.with_timezone(&chrono::Local).format("%H:%M:%S")
                    ))
                    .small()
                    .weak(),
                );
            }
        });
    });

    if refresh_now {
        state.refresh.reset();
        state.tick_refresh(Instant::now());
    }
}

/// Confirmation dialog for destructive actions.
pub fn render_confirm(ctx: &egui::Context, state: &mut AppState) {
    let Some(confirm) = &state.confirm else {
        return;
    };
    let (title, question) = match confirm {
        Confirm::RemoveStudent { name, .. } => (
            "Remove student",
            format!("Remove {name} from this classroom?"),
        ),
        Confirm::DeleteContent { title, .. } => (
            "Delete content",
            format!("Delete \"{title}\"? This cannot be undone."),
        ),
    };

    let mut decision: Option<bool> = None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(question);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(egui::RichText::new("Confirm").color(theme::ERROR_TEXT))
                    .clicked()
                {
                    decision = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(false);
                }
            });
        });

    match decision {
        Some(true) => state.confirm_pending(),
        Some(false) => state.cancel_confirm(),
        None => {}
    }
}
