// ClassDesk - ui/panels/banner.rs
//
// The active banner of one panel, drawn as a coloured strip with a dismiss
// button. Expiry happens in the frame loop; this only draws.

use crate::app::state::AppState;
use crate::core::banner::BannerKind;
use crate::core::model::Panel;
use crate::ui::theme;

pub fn render(ui: &mut egui::Ui, state: &mut AppState, panel: Panel) {
    let Some(banner) = state.banners.get(panel) else {
        return;
    };
    let (fg, bg) = theme::banner_colours(banner.kind, ui.visuals().dark_mode);
    let icon = match banner.kind {
        BannerKind::Success => "\u{2714}",
        BannerKind::Info => "\u{2139}",
        BannerKind::Error => "\u{26a0}",
    };
    let message = banner.message.clone();

    let mut dismiss = false;
    egui::Frame::NONE
        .fill(bg)
        .corner_radius(4.0)
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).color(fg).strong());
                ui.add(egui::Label::new(egui::RichText::new(message).color(fg)).wrap());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button("\u{2715}")
                        .on_hover_text("Dismiss")
                        .clicked()
                    {
                        dismiss = true;
                    }
                });
            });
        });
    ui.add_space(6.0);

    if dismiss {
        state.banners.dismiss(panel);
    }
}
