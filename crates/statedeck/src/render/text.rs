use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Stroke};

use crate::engine::render::Block;
use crate::render::image_cache::ImageCache;
use crate::theme::Theme;

/// Paint wrapped text at `pos`, returning the rect it covers.
pub fn draw_text(
    ui: &egui::Ui,
    text: &str,
    pos: Pos2,
    font: FontId,
    color: Color32,
    max_width: f32,
) -> egui::Rect {
    let galley = ui.painter().layout(text.to_string(), font, color, max_width);
    let rect = egui::Rect::from_min_size(pos, galley.rect.size());
    ui.painter().galley(pos, galley, color);
    rect
}

pub fn draw_heading(
    ui: &egui::Ui,
    text: &str,
    level: u8,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> egui::Rect {
    let font = FontId::proportional(theme.heading_size(level) * scale);
    draw_text(ui, text, pos, font, theme.heading_color, max_width)
}

pub fn draw_paragraph(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> egui::Rect {
    let font = FontId::proportional(theme.body_size * scale);
    draw_text(ui, text, pos, font, theme.foreground, max_width)
}

/// Bulleted list. Returns the bounding rect of all items.
pub fn draw_list(
    ui: &egui::Ui,
    items: &[String],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> egui::Rect {
    let marker_width = 45.0 * scale;
    let item_spacing = 8.0 * scale;
    let font = FontId::proportional(theme.body_size * scale);
    let mut y_offset = 0.0;
    let mut widest: f32 = 0.0;

    for item in items {
        let marker_pos = Pos2::new(pos.x, pos.y + y_offset);
        let marker = ui
            .painter()
            .layout_no_wrap("\u{2022}".to_string(), font.clone(), theme.accent);
        ui.painter().galley(marker_pos, marker, theme.accent);

        let text_pos = Pos2::new(pos.x + marker_width, pos.y + y_offset);
        let rect = draw_text(
            ui,
            item,
            text_pos,
            font.clone(),
            theme.foreground,
            max_width - marker_width,
        );
        widest = widest.max(rect.width() + marker_width);
        y_offset += rect.height() + item_spacing;
    }

    egui::Rect::from_min_size(pos, egui::vec2(widest, (y_offset - item_spacing).max(0.0)))
}

pub fn draw_code_block(
    ui: &egui::Ui,
    code: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    scale: f32,
) -> egui::Rect {
    let padding = 16.0 * scale;
    let font = FontId::new(theme.code_size * scale, FontFamily::Monospace);
    let galley = ui.painter().layout(
        code.to_string(),
        font,
        theme.code_foreground,
        max_width - padding * 2.0,
    );
    let height = galley.rect.height() + padding * 2.0;
    let bg_rect = egui::Rect::from_min_size(pos, egui::vec2(max_width, height));
    ui.painter()
        .rect_filled(bg_rect, 8.0 * scale, theme.code_background);
    ui.painter().galley(
        Pos2::new(pos.x + padding, pos.y + padding),
        galley,
        theme.code_foreground,
    );
    bg_rect
}

/// Fit an image inside `available`, preserving its aspect ratio. Falls back
/// to a labelled placeholder when the image is unavailable.
pub fn draw_image_in_area(
    ui: &egui::Ui,
    path: &str,
    alt: &str,
    theme: &Theme,
    available: egui::Rect,
    image_cache: &ImageCache,
    scale: f32,
) -> egui::Rect {
    let Some(texture) = image_cache.get_or_load(ui.ctx(), path) else {
        return draw_image_placeholder(ui, alt, theme, available, scale);
    };
    let draw_rect = contain(texture.size_vec2(), available);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    ui.painter()
        .image(texture.id(), draw_rect, uv, Color32::WHITE);
    draw_rect
}

fn contain(tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    let scale = (available.width() / tex_size.x)
        .min(available.height() / tex_size.y)
        .min(1.0);
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}

pub fn draw_image_placeholder(
    ui: &egui::Ui,
    alt: &str,
    theme: &Theme,
    available: egui::Rect,
    scale: f32,
) -> egui::Rect {
    let height = (200.0 * scale).min(available.height());
    let rect = egui::Rect::from_min_size(
        available.left_top(),
        egui::vec2(available.width(), height),
    );
    let color = Theme::with_opacity(theme.foreground, 0.6);
    ui.painter()
        .rect_filled(rect, 8.0 * scale, theme.code_background);
    ui.painter().rect_stroke(
        rect,
        8.0 * scale,
        Stroke::new(1.0, color),
        egui::StrokeKind::Outside,
    );

    let label = if alt.is_empty() {
        "[Image]".to_string()
    } else {
        format!("[Image: {alt}]")
    };
    let galley = ui.painter().layout(
        label,
        FontId::proportional(theme.body_size * 0.8 * scale),
        color,
        available.width(),
    );
    let text_pos = Pos2::new(
        rect.center().x - galley.rect.width() / 2.0,
        rect.center().y - galley.rect.height() / 2.0,
    );
    ui.painter().galley(text_pos, galley, color);
    rect
}

/// Stack blocks top to bottom inside `rect`. Images share whatever height
/// the text leaves over. Returns the rect of every drawn block.
pub fn draw_blocks(
    ui: &egui::Ui,
    blocks: &[Block],
    theme: &Theme,
    rect: egui::Rect,
    image_cache: &ImageCache,
    scale: f32,
) -> Vec<egui::Rect> {
    let spacing = 20.0 * scale;
    let width = rect.width();
    let image_count = blocks
        .iter()
        .filter(|b| matches!(b, Block::Image { .. }))
        .count();
    let text_height: f32 = blocks
        .iter()
        .filter(|b| !matches!(b, Block::Image { .. }))
        .map(|b| measure_block(ui, b, theme, width, scale) + spacing)
        .sum();
    let image_height = if image_count == 0 {
        0.0
    } else {
        ((rect.height() - text_height) / image_count as f32 - spacing).max(120.0 * scale)
    };

    let mut rects = Vec::with_capacity(blocks.len());
    let mut y = rect.top();
    for block in blocks {
        let pos = Pos2::new(rect.left(), y);
        let drawn = match block {
            Block::Heading { level, text } => draw_heading(ui, text, *level, theme, pos, width, scale),
            Block::Paragraph(text) => draw_paragraph(ui, text, theme, pos, width, scale),
            Block::List(items) => draw_list(ui, items, theme, pos, width, scale),
            Block::Code(code) => draw_code_block(ui, code, theme, pos, width, scale),
            Block::Image { alt, path } => {
                let area = egui::Rect::from_min_size(pos, egui::vec2(width, image_height));
                let drawn = draw_image_in_area(ui, path, alt, theme, area, image_cache, scale);
                y = area.bottom() + spacing;
                rects.push(drawn);
                continue;
            }
        };
        y = drawn.bottom() + spacing;
        rects.push(drawn);
    }
    rects
}

fn measure_block(ui: &egui::Ui, block: &Block, theme: &Theme, width: f32, scale: f32) -> f32 {
    let measure = |text: &str, font: FontId, wrap: f32| {
        ui.painter()
            .layout(text.to_string(), font, Color32::WHITE, wrap)
            .rect
            .height()
    };
    match block {
        Block::Heading { level, text } => {
            measure(text, FontId::proportional(theme.heading_size(*level) * scale), width)
        }
        Block::Paragraph(text) => measure(text, FontId::proportional(theme.body_size * scale), width),
        Block::List(items) => items
            .iter()
            .map(|item| {
                measure(item, FontId::proportional(theme.body_size * scale), width - 45.0 * scale)
                    + 8.0 * scale
            })
            .sum(),
        Block::Code(code) => {
            let font = FontId::new(theme.code_size * scale, FontFamily::Monospace);
            measure(code, font, width - 32.0 * scale) + 32.0 * scale
        }
        Block::Image { .. } => 0.0,
    }
}
