// ClassDesk - ui/panels/about.rs
//
// About dialog: version, the active connection, and where session state is
// kept. Rendered as a centred, non-resizable modal window.

use crate::app::state::AppState;
use crate::util::constants::{APP_NAME, APP_VERSION};

/// Render the About dialog (if `state.show_about` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_about {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("About {APP_NAME}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(APP_NAME).size(28.0).strong());
                ui.add_space(4.0);
                ui.label(egui::RichText::new(format!("v{APP_VERSION}")).weak());
                ui.add_space(6.0);
                ui.label("Desktop client for managing a classroom:");
                ui.label("students, course content, bulk import and settings.");
            });

            ui.add_space(10.0);
            ui.separator();

            egui::Grid::new("about_details")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Server:");
                    match &state.connection {
                        Some(conn) => ui.monospace(&conn.base_url),
                        None => ui.weak("not connected"),
                    };
                    ui.end_row();

                    ui.label("Classroom:");
                    match &state.connection {
                        Some(conn) => ui.monospace(&conn.classroom_id),
                        None => ui.weak("--"),
                    };
                    ui.end_row();

                    ui.label("Summary refresh:");
                    ui.label(format!("every {}s", state.refresh.interval().as_secs()));
                    ui.end_row();

                    ui.label("Session file:");
                    match &state.session_path {
                        Some(p) => ui.monospace(p.display().to_string()),
                        None => ui.weak("not saved"),
                    };
                    ui.end_row();

                    if state.debug_mode {
                        ui.label("Logging:");
                        ui.label("debug");
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Built with Rust & egui").small().weak());
            });
        });

    if !open {
        state.show_about = false;
    }
}
