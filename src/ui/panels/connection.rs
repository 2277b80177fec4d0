// ClassDesk - ui/panels/connection.rs
//
// Left sidebar: server URL, access token and classroom ID, the Connect and
// Reload actions, and a short status of the current connection.
//
// This panel only writes the form and calls `connect` / `load_all`; gui.rs
// picks up `state.reconnect_requested` and rebuilds the API client.

use crate::app::state::AppState;
use crate::core::content::format_size;
use crate::util::constants::DEFAULT_BASE_URL;
use std::time::Instant;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Connection");
    ui.add_space(4.0);

    let mut submit = false;
    ui.label("Server URL");
    ui.add(
        egui::TextEdit::singleline(&mut state.connection_form.base_url)
            .hint_text(DEFAULT_BASE_URL)
            .desired_width(f32::INFINITY),
    );

    ui.label("Access token");
    ui.add(
        egui::TextEdit::singleline(&mut state.connection_form.token)
            .password(true)
            .hint_text("optional")
            .desired_width(f32::INFINITY),
    );

    ui.label("Classroom ID");
    let id = ui.add(
        egui::TextEdit::singleline(&mut state.connection_form.classroom_id)
            .desired_width(f32::INFINITY),
    );
    if id.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
        submit = true;
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui.button("Connect").clicked() {
            submit = true;
        }
        let connected = state.connection.is_some();
        if ui
            .add_enabled(connected, egui::Button::new("Reload"))
            .on_hover_text("Fetch classroom, students and content again")
            .clicked()
        {
            state.load_all();
        }
    });

    if submit {
        state.connect(Instant::now());
    }

    ui.add_space(10.0);
    ui.separator();
    render_status(ui, state);
}

fn render_status(ui: &mut egui::Ui, state: &AppState) {
    let Some(conn) = &state.connection else {
        ui.weak("Not connected.");
        return;
    };

    egui::Grid::new("connection_status")
        .num_columns(2)
        .spacing([6.0, 2.0])
        .show(ui, |ui| {
            ui.label("Server:");
            ui.label(egui::RichText::new(&conn.base_url).monospace().small());
            ui.end_row();
            ui.label("Classroom:");
            ui.label(egui::RichText::new(&conn.classroom_id).monospace().small());
            ui.end_row();
            ui.label("Token:");
            ui.label(if conn.token.is_some() { "set" } else { "none" });
            ui.end_row();
        });

    if let Some(classroom) = &state.classroom {
        ui.add_space(6.0);
        ui.strong(&classroom.name);
        ui.label(
            egui::RichText::new(format!(
                "{} students \u{00b7} {} items \u{00b7} {}",
                state.summary.student_count,
                state.summary.content_count,
                format_size(state.summary.total_content_bytes)
            ))
            .small()
            .weak(),
        );
    }

    if state.in_flight.any() {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Working\u{2026}").small());
        });
    }
}
