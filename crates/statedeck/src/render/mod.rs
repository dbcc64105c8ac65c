pub mod chrome;
pub mod image_cache;
pub mod text;

use eframe::egui;

use crate::engine::render::RenderFrame;
use crate::theme::Theme;

use image_cache::ImageCache;

/// Reference resolution slides are laid out for.
pub const REFERENCE_SIZE: egui::Vec2 = egui::vec2(1920.0, 1080.0);

pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REFERENCE_SIZE.x).min(rect.height() / REFERENCE_SIZE.y)
}

/// Draw the current frame's blocks inside the padded slide area. Returns the
/// rects of drawn content so clicks can tell content from blank space.
pub fn draw_frame(
    ui: &egui::Ui,
    frame: &RenderFrame,
    theme: &Theme,
    rect: egui::Rect,
    image_cache: &ImageCache,
    scale: f32,
) -> Vec<egui::Rect> {
    let padding = 80.0 * scale;
    let content = rect.shrink2(egui::vec2(padding * 1.5, padding));
    text::draw_blocks(ui, &frame.blocks, theme, content, image_cache, scale)
}
