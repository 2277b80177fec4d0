// ClassDesk - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and runs the request lifecycle: panels queue
// requests on `state.outbox`, this file dispatches them to the
// RequestManager and feeds completed events back into the state.

use crate::api::{ApiClient, ApiConfig};
use crate::app::requests::RequestManager;
use crate::app::state::AppState;
use crate::core::model::Panel;
use crate::platform::config::AppConfig;
use crate::ui;
use crate::util::constants::IN_FLIGHT_REPAINT_MS;
use std::time::{Duration, Instant};

/// The ClassDesk application.
pub struct ClassDeskApp {
    pub state: AppState,
    pub requests: RequestManager,
    /// Client for the current connection; rebuilt on every connect.
    client: Option<ApiClient>,
    config: AppConfig,
    dark_mode: bool,
}

impl ClassDeskApp {
    pub fn new(state: AppState, config: AppConfig) -> Self {
        Self {
            state,
            requests: RequestManager::new(),
            client: None,
            dark_mode: config.dark_mode,
            config,
        }
    }

    /// Build a fresh client for the current connection and drop the old
    /// request channel so late results for the previous classroom are lost.
    fn reconnect(&mut self, now: Instant) {
        self.state.reconnect_requested = false;
        self.requests = RequestManager::new();
        self.client = None;

        let Some(conn) = &self.state.connection else {
            return;
        };
        let config = ApiConfig {
            base_url: conn.base_url.clone(),
            token: conn.token.clone(),
            timeout: Duration::from_secs(self.config.timeout_secs),
        };
        match ApiClient::new(&config) {
            Ok(client) => self.client = Some(client),
            Err(e) => {
                tracing::error!(error = %e, "Could not create API client");
                self.state.outbox.clear();
                self.state.in_flight = Default::default();
                self.state
                    .banners
                    .error(Panel::Detail, format!("Cannot connect: {e}"), now);
                self.state.status_message = "Not connected.".to_string();
            }
        }
    }

    /// Send every queued request to a worker thread.
    fn dispatch_outbox(&mut self) {
        let queued = self.state.drain_outbox();
        let Some(client) = &self.client else {
            if !queued.is_empty() {
                tracing::debug!(dropped = queued.len(), "No client; queued requests dropped");
            }
            return;
        };
        for request in queued {
            self.requests.dispatch(client.clone(), request);
        }
    }

    /// Hand a pending file URL to the system browser.
    fn open_pending_url(&mut self, now: Instant) {
        let Some(file_url) = self.state.pending_open_url.take() else {
            return;
        };
        let panel = self.state.active_tab;
        match self.state.resolve_url(&file_url) {
            Some(url) => {
                if let Err(e) = crate::platform::fs::open_in_browser(&url) {
                    tracing::warn!(error = %e, "Could not open browser");
                    self.state
                        .banners
                        .error(panel, format!("Could not open the file: {e}"), now);
                }
            }
            None => self
                .state
                .banners
                .error(panel, "The file address is not valid.", now),
        }
    }

    fn reveal_pending_export(&mut self, now: Instant) {
        let Some(path) = self.state.pending_reveal.take() else {
            return;
        };
        if let Err(e) = crate::platform::fs::reveal_in_file_manager(&path) {
            self.state.banners.error(
                Panel::Students,
                format!("Could not open the folder: {e}"),
                now,
            );
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let connected = self.state.connection.is_some();
                    if ui
                        .add_enabled(connected, egui::Button::new("Reload"))
                        .clicked()
                    {
                        self.state.load_all();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    for &tab in Panel::tabs() {
                        if ui.button(tab.label()).clicked() {
                            self.state.active_tab = tab;
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    let label = if self.dark_mode {
                        "Light theme"
                    } else {
                        "Dark theme"
                    };
                    if ui.button(label).clicked() {
                        self.dark_mode = !self.dark_mode;
                        ui::theme::apply(ctx, self.dark_mode, self.config.font_size);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.connection.is_some() {
                        let secs = self.state.refresh.remaining(now).as_secs();
                        ui.label(
                            egui::RichText::new(format!("next refresh in {secs}s"))
                                .small()
                                .weak(),
                        );
                    }
                    let pending = self.requests.pending();
                    if pending > 0 {
                        ui.separator();
                        ui.spinner();
                        ui.label(format!("{pending} running"));
                    }
                });
            });
        });
    }
}

impl eframe::App for ClassDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if self.state.reconnect_requested {
            self.reconnect(now);
        }

        let events = self.requests.poll_events();
        let had_events = !events.is_empty();
        for event in events {
            self.state.handle_event(event, now);
        }
        self.state.banners.expire(now);
        self.state.tick_refresh(now);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx, now);

        egui::SidePanel::left("connection")
            .default_width(ui::theme::CONNECTION_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("connection_scroll")
                    .show(ui, |ui| {
                        ui::panels::connection::render(ui, &mut self.state);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::classroom_detail::render(ui, &mut self.state);
        });

        ui::panels::classroom_detail::render_confirm(ctx, &mut self.state);
        ui::panels::course_content::render_preview(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);

        // Panels may have connected or queued work during this frame.
        if self.state.reconnect_requested {
            self.reconnect(now);
        }
        self.dispatch_outbox();
        self.open_pending_url(now);
        self.reveal_pending_export(now);

        if had_events || self.state.is_busy() || self.requests.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(IN_FLIGHT_REPAINT_MS));
        } else if self.state.connection.is_some() {
            // Wake for the next refresh and to keep the countdown current.
            let wait = self
                .state
                .refresh
                .remaining(now)
                .clamp(Duration::from_millis(IN_FLIGHT_REPAINT_MS), Duration::from_secs(1));
            ctx.request_repaint_after(wait);
        } else if !self.state.banners.is_empty() {
            ctx.request_repaint_after(Duration::from_secs(1));
        }
    }

    /// Called by eframe when the window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.save_session();
    }
}
