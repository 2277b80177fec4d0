// ClassDesk - ui/theme.rs
//
// Colour scheme, banner and content-kind colours, and layout constants.
// No dependencies on app state or business logic.

use crate::core::banner::BannerKind;
use crate::core::content::ContentKind;
use egui::Color32;

/// Foreground and background for a banner.
pub fn banner_colours(kind: BannerKind, dark_mode: bool) -> (Color32, Color32) {
    match (kind, dark_mode) {
        (BannerKind::Success, true) => (
            Color32::from_rgb(134, 239, 172),                 // Green 300
            Color32::from_rgba_premultiplied(22, 101, 52, 90), // Green 800
        ),
        (BannerKind::Success, false) => (
            Color32::from_rgb(22, 101, 52),
            Color32::from_rgb(220, 252, 231), // Green 100
        ),
        (BannerKind::Info, true) => (
            Color32::from_rgb(147, 197, 253),                  // Blue 300
            Color32::from_rgba_premultiplied(30, 64, 175, 90), // Blue 800
        ),
        (BannerKind::Info, false) => (
            Color32::from_rgb(30, 64, 175),
            Color32::from_rgb(219, 234, 254), // Blue 100
        ),
        (BannerKind::Error, true) => (
            Color32::from_rgb(252, 165, 165),                  // Red 300
            Color32::from_rgba_premultiplied(153, 27, 27, 90), // Red 800
        ),
        (BannerKind::Error, false) => (
            Color32::from_rgb(153, 27, 27),
            Color32::from_rgb(254, 226, 226), // Red 100
        ),
    }
}

/// Accent colour for a content kind badge.
pub fn content_kind_colour(kind: ContentKind) -> Color32 {
    match kind {
        ContentKind::Document => Color32::from_rgb(96, 165, 250), // Blue 400
        ContentKind::Image => Color32::from_rgb(52, 211, 153),    // Emerald 400
        ContentKind::Video => Color32::from_rgb(244, 114, 182),   // Pink 400
        ContentKind::Audio => Color32::from_rgb(251, 191, 36),    // Amber 400
        ContentKind::Archive => Color32::from_rgb(167, 139, 250), // Violet 400
        ContentKind::Other => Color32::from_rgb(156, 163, 175),   // Gray 400
    }
}

/// Text colours for inline validation and counts.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300
pub const PUBLIC_BADGE: Color32 = Color32::from_rgb(74, 222, 128); // Green 400

/// Apply dark/light visuals and the configured body font size.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            font.size = match text_style {
                egui::TextStyle::Heading => font_size + 6.0,
                egui::TextStyle::Small => font_size - 3.0,
                _ => font_size,
            };
        }
    });
}

/// Layout constants.
pub const CONNECTION_PANEL_WIDTH: f32 = 260.0;
pub const FORM_LABEL_WIDTH: f32 = 110.0;
pub const FORM_FIELD_WIDTH: f32 = 320.0;
pub const TABLE_ROW_HEIGHT: f32 = 22.0;
pub const PREVIEW_WINDOW_WIDTH: f32 = 640.0;
pub const PREVIEW_WINDOW_HEIGHT: f32 = 480.0;
