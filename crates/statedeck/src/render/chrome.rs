//! Overlay widgets drawn over the slide: progress panel, nav buttons and the
//! note panel. Each draw call reports the clickable rects it produced.

use eframe::egui::{self, Color32, FontId, Pos2, Stroke};

use crate::engine::Direction;
use crate::engine::registry::SlideRegistry;
use crate::engine::render::Note;
use crate::engine::state::PresentationState;
use crate::input::pointer::ChromeTarget;
use crate::theme::Theme;

/// Clickable overlay rects from the last frame, topmost last.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    targets: Vec<(ChromeTarget, egui::Rect)>,
}

impl HitMap {
    pub fn push(&mut self, target: ChromeTarget, rect: egui::Rect) {
        self.targets.push((target, rect));
    }

    /// Topmost target under `pos`.
    pub fn hit(&self, pos: Pos2) -> Option<ChromeTarget> {
        self.targets
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(target, _)| *target)
    }

    pub fn over_nav_button(&self, pos: Pos2) -> bool {
        matches!(self.hit(pos), Some(ChromeTarget::NavButton(_)))
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

/// Bottom panel: title, label, `n / N`, one dot per slide and one per state.
pub fn draw_progress(
    ui: &egui::Ui,
    registry: &SlideRegistry,
    state: &PresentationState,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    hits: &mut HitMap,
) {
    let current = state.current_slide();
    let Ok(slide) = registry.slide(current) else {
        return;
    };
    let count = registry.slide_count();
    let padding = 16.0 * scale;
    let dot = 12.0 * scale;
    let dot_gap = 8.0 * scale;
    let font = FontId::proportional(theme.chrome_size * scale);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);

    let caption = format!(
        "{}  \u{00b7}  {}  \u{00b7}  {} / {}",
        slide.label,
        slide.title,
        current + 1,
        count
    );
    let galley = ui.painter().layout_no_wrap(caption, font, text_color);
    let caption_height = galley.rect.height();

    let dots_width = count as f32 * (dot + dot_gap) - dot_gap;
    let width = galley.rect.width().max(dots_width) + padding * 2.0;
    let state_row = if slide.is_stateful() { dot + dot_gap } else { 0.0 };
    let height = caption_height + dot + state_row + padding * 2.0 + dot_gap;
    let panel = egui::Rect::from_center_size(
        egui::pos2(rect.center().x, rect.bottom() - height / 2.0 - 24.0 * scale),
        egui::vec2(width, height),
    );
    ui.painter().rect_filled(
        panel,
        10.0 * scale,
        Theme::with_opacity(theme.code_background, 0.9),
    );
    ui.painter().galley(
        egui::pos2(panel.center().x - galley.rect.width() / 2.0, panel.top() + padding),
        galley,
        text_color,
    );

    let mut y = panel.top() + padding + caption_height + dot_gap;
    let mut x = panel.center().x - dots_width / 2.0;
    for index in 0..count {
        let dot_rect = egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(dot, dot));
        let color = if index == current {
            theme.accent
        } else {
            Theme::with_opacity(theme.foreground, 0.35)
        };
        ui.painter().circle_filled(dot_rect.center(), dot / 2.0, color);
        hits.push(ChromeTarget::ProgressDot(index), dot_rect.expand(dot_gap / 2.0));
        x += dot + dot_gap;
    }

    if slide.is_stateful() {
        y += dot + dot_gap;
        let small = dot * 0.6;
        let states_width = slide.max_states as f32 * (small + dot_gap) - dot_gap;
        let mut x = panel.center().x - states_width / 2.0;
        for s in 0..slide.max_states {
            let center = egui::pos2(x + small / 2.0, y + dot / 2.0);
            if s == state.current_state() {
                ui.painter().circle_filled(center, small / 2.0, theme.accent);
            } else {
                ui.painter().circle_stroke(
                    center,
                    small / 2.0,
                    Stroke::new(1.5 * scale, Theme::with_opacity(theme.foreground, 0.5)),
                );
            }
            x += small + dot_gap;
        }
    }
}

/// Previous/next buttons at the left and right edges.
pub fn draw_nav_buttons(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    hits: &mut HitMap,
) {
    let size = egui::vec2(56.0 * scale, 96.0 * scale);
    let margin = 20.0 * scale;
    let buttons = [
        (Direction::Back, rect.left() + margin + size.x / 2.0, "\u{2039}"),
        (Direction::Forward, rect.right() - margin - size.x / 2.0, "\u{203a}"),
    ];
    for (direction, center_x, glyph) in buttons {
        let button = egui::Rect::from_center_size(egui::pos2(center_x, rect.center().y), size);
        ui.painter().rect_filled(
            button,
            8.0 * scale,
            Theme::with_opacity(theme.code_background, 0.8),
        );
        let galley = ui.painter().layout_no_wrap(
            glyph.to_string(),
            FontId::proportional(64.0 * scale),
            theme.foreground,
        );
        let pos = button.center() - galley.rect.size() / 2.0;
        ui.painter().galley(pos, galley, theme.foreground);
        hits.push(ChromeTarget::NavButton(direction), button);
    }
}

/// Note card in the top-right corner with a close button.
pub fn draw_note(
    ui: &egui::Ui,
    note: &Note,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
    hits: &mut HitMap,
) {
    let padding = 20.0 * scale;
    let width = (rect.width() * 0.3).max(320.0 * scale);
    let inner = width - padding * 2.0;
    let text_color = theme.foreground;

    let heading = note.heading.as_ref().map(|h| {
        ui.painter().layout(
            h.clone(),
            FontId::proportional(theme.chrome_size * 1.2 * scale),
            theme.heading_color,
            inner - 24.0 * scale,
        )
    });
    let body = ui.painter().layout(
        note.lines.join("\n"),
        FontId::proportional(theme.chrome_size * scale),
        text_color,
        inner,
    );

    let heading_height = heading.as_ref().map_or(0.0, |g| g.rect.height() + 10.0 * scale);
    let height = heading_height + body.rect.height() + padding * 2.0;
    let panel = egui::Rect::from_min_size(
        egui::pos2(rect.right() - width - 24.0 * scale, rect.top() + 24.0 * scale),
        egui::vec2(width, height.max(48.0 * scale)),
    );
    ui.painter().rect_filled(
        panel,
        10.0 * scale,
        Theme::with_opacity(theme.code_background, 0.95),
    );
    ui.painter().rect_stroke(
        panel,
        10.0 * scale,
        Stroke::new(1.0, Theme::with_opacity(theme.accent, 0.6)),
        egui::StrokeKind::Inside,
    );
    hits.push(ChromeTarget::NotePanel, panel);

    let mut y = panel.top() + padding;
    if let Some(galley) = heading {
        let h = galley.rect.height();
        ui.painter()
            .galley(egui::pos2(panel.left() + padding, y), galley, theme.heading_color);
        y += h + 10.0 * scale;
    }
    ui.painter()
        .galley(egui::pos2(panel.left() + padding, y), body, text_color);

    let close = egui::Rect::from_center_size(
        egui::pos2(panel.right() - 18.0 * scale, panel.top() + 18.0 * scale),
        egui::vec2(24.0 * scale, 24.0 * scale),
    );
    let cross = Theme::with_opacity(text_color, 0.7);
    let stroke = Stroke::new(2.0 * scale, cross);
    let arm = 6.0 * scale;
    let c = close.center();
    ui.painter()
        .line_segment([c + egui::vec2(-arm, -arm), c + egui::vec2(arm, arm)], stroke);
    ui.painter()
        .line_segment([c + egui::vec2(-arm, arm), c + egui::vec2(arm, -arm)], stroke);
    hits.push(ChromeTarget::NoteClose, close);
}

/// Small marker in the corner while auto-play runs.
pub fn draw_autoplay_badge(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    let color = Theme::with_opacity(theme.foreground, 0.4);
    let galley = ui.painter().layout_no_wrap(
        "\u{25b6} auto".to_string(),
        FontId::monospace(14.0 * scale),
        color,
    );
    let pos = egui::pos2(rect.left() + 16.0 * scale, rect.top() + 10.0 * scale);
    ui.painter().galley(pos, galley, Color32::TRANSPARENT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
    }

    #[test]
    fn test_hit_prefers_topmost() {
        let mut hits = HitMap::default();
        hits.push(ChromeTarget::NotePanel, rect(0.0, 0.0, 100.0, 100.0));
        hits.push(ChromeTarget::NoteClose, rect(80.0, 0.0, 20.0, 20.0));
        assert_eq!(hits.hit(egui::pos2(90.0, 10.0)), Some(ChromeTarget::NoteClose));
        assert_eq!(hits.hit(egui::pos2(10.0, 50.0)), Some(ChromeTarget::NotePanel));
        assert_eq!(hits.hit(egui::pos2(500.0, 500.0)), None);
    }

    #[test]
    fn test_over_nav_button() {
        let mut hits = HitMap::default();
        hits.push(ChromeTarget::NavButton(Direction::Back), rect(0.0, 0.0, 50.0, 50.0));
        hits.push(ChromeTarget::ProgressDot(2), rect(100.0, 0.0, 10.0, 10.0));
        assert!(hits.over_nav_button(egui::pos2(25.0, 25.0)));
        assert!(!hits.over_nav_button(egui::pos2(105.0, 5.0)));
        hits.clear();
        assert!(!hits.over_nav_button(egui::pos2(25.0, 25.0)));
    }
}
