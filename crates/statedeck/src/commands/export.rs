use std::path::{Path, PathBuf};

use colored::Colorize;
use eframe::egui;

use crate::deck::Deck;
use crate::engine::Presenter;
use crate::engine::render::{AssetLoader, RenderDispatcher};
use crate::engine::store::{KeyValueStore, MemoryStore, PersistenceStore};
use crate::render;
use crate::render::image_cache::ImageCache;
use crate::theme::Theme;

struct ExportApp {
    presenter: Presenter<MemoryStore, ImageCache>,
    theme: Theme,
    output_dir: PathBuf,
    counter: usize,
    screenshot_requested: bool,
    done: bool,
}

impl ExportApp {
    fn new(presenter: Presenter<MemoryStore, ImageCache>, theme: Theme, output_dir: PathBuf) -> Self {
        Self {
            presenter,
            theme,
            output_dir,
            counter: 1,
            screenshot_requested: false,
            done: false,
        }
    }

    fn current_filename(&self) -> String {
        let max_states = self
            .presenter
            .slide()
            .map_or(1, |slide| slide.max_states);
        let title = self
            .presenter
            .slide()
            .map_or_else(String::new, |slide| slide.title.clone());
        shot_filename(self.counter, &title, self.presenter.current_state(), max_states)
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Check for screenshot result from previous frame
        let mut shot: Option<std::sync::Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    shot = Some(image.clone());
                }
            }
        });

        if let Some(image) = shot {
            let filename = self.current_filename();
            let path = self.output_dir.join(&filename);
            match save_color_image(&image, &path) {
                Ok(()) => eprintln!("  Saved {filename}"),
                Err(e) => eprintln!("  {} {filename}: {e}", "Failed".red()),
            }
            self.screenshot_requested = false;
            self.counter += 1;
            if !advance(&mut self.presenter) {
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        let bg = self.theme.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = render::compute_scale(rect);
                if let Some(frame) = self.presenter.frame() {
                    render::draw_frame(ui, frame, &self.theme, rect, self.presenter.assets(), scale);
                }
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

/// Step to the next (slide, state) pair in deck order. Returns `false` once
/// the last state of the last slide has been shown.
fn advance<S: KeyValueStore, A: AssetLoader>(presenter: &mut Presenter<S, A>) -> bool {
    let slide = presenter.current_slide();
    if presenter.current_state() + 1 < presenter.registry().max_states(slide) {
        return presenter.cycle_state();
    }
    presenter.go_to_slide(slide + 1)
}

/// `slide_007_Parts_state2.png`; the state suffix only appears on slides
/// with more than one state.
fn shot_filename(counter: usize, title: &str, state: usize, max_states: usize) -> String {
    let name: String = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let name = if name.is_empty() { "slide".to_string() } else { name };
    if max_states > 1 {
        format!("slide_{counter:03}_{name}_state{}.png", state + 1)
    } else {
        format!("slide_{counter:03}_{name}.png")
    }
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> image::ImageResult<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
}

pub fn run(file: PathBuf, output_dir: PathBuf, width: u32, height: u32) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;
    let registry = deck.registry()?;
    let shots: usize = registry.iter().map(|s| s.max_states).sum();

    std::fs::create_dir_all(&output_dir)?;

    eprintln!(
        "Exporting {} slides ({} images) to {} ({}x{})",
        registry.slide_count(),
        shots,
        output_dir.display(),
        width,
        height,
    );

    let theme = Theme::from_name(deck.meta.theme.as_deref().unwrap_or("dark"));
    let slide_images = (0..deck.slides.len()).map(|i| deck.image_paths(i)).collect();
    let images = ImageCache::new(deck.base_dir.clone(), slide_images);
    let presenter = Presenter::new(
        registry,
        RenderDispatcher::new(deck.providers()),
        PersistenceStore::new(MemoryStore::new()),
        images,
    );

    let title = format!("{} export", deck.title());
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let output_dir_clone = output_dir.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ExportApp::new(presenter, theme, output_dir_clone)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("{}", "Export complete.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing;

    #[test]
    fn test_advance_visits_every_state_once() {
        let mut p = testing::presenter(&[1, 2, 3, 1]);
        let mut visited = vec![(p.current_slide(), p.current_state())];
        while advance(&mut p) {
            visited.push((p.current_slide(), p.current_state()));
        }
        assert_eq!(
            visited,
            vec![(0, 0), (1, 0), (1, 1), (2, 0), (2, 1), (2, 2), (3, 0)]
        );
    }

    #[test]
    fn test_shot_filename() {
        assert_eq!(shot_filename(1, "Intro", 0, 1), "slide_001_Intro.png");
        assert_eq!(shot_filename(7, "Parts", 1, 2), "slide_007_Parts_state2.png");
        assert_eq!(shot_filename(12, "Part 1: Basics", 0, 1), "slide_012_Part_1_Basics.png");
        assert_eq!(shot_filename(3, "???", 0, 1), "slide_003_slide.png");
    }
}
