use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::Config;
use crate::deck::Deck;
use crate::engine::Presenter;
use crate::engine::feedback::Widget;
use crate::engine::render::RenderDispatcher;
use crate::engine::store::{FileStore, PersistenceStore};
use crate::input::gamepad::{GamepadSource, GilrsSource};
use crate::input::pointer::{Click, ClickTarget};
use crate::input::{Command, Key};
use crate::render::chrome::{self, HitMap};
use crate::render::image_cache::ImageCache;
use crate::render::{self as draw, compute_scale};
use crate::session::{InputEvent, Session};
use crate::theme::Theme;

/// Frame interval while a gamepad is connected and must be polled.
const GAMEPAD_POLL: Duration = Duration::from_millis(16);

/// Options for a live presentation, from the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub windowed: bool,
    /// 1-indexed slide to open instead of the saved one.
    pub slide: Option<usize>,
    /// Forget saved progress before starting.
    pub fresh: bool,
    pub state_file: Option<PathBuf>,
}

struct PresentationApp {
    session: Session<FileStore, ImageCache>,
    theme: Theme,
    start: Instant,
    /// Slide area from the last frame; input is interpreted against it.
    last_rect: egui::Rect,
    hits: HitMap,
    content_rects: Vec<egui::Rect>,
    touch_active: bool,
    gamepad: Option<GilrsSource>,
}

impl PresentationApp {
    fn new(session: Session<FileStore, ImageCache>, theme: Theme, start: Instant) -> Self {
        let gamepad = match GilrsSource::new() {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };
        Self {
            session,
            theme,
            start,
            last_rect: egui::Rect::ZERO,
            hits: HitMap::default(),
            content_rects: Vec::new(),
            touch_active: false,
            gamepad,
        }
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn classify(&self, pos: egui::Pos2) -> ClickTarget {
        if let Some(target) = self.hits.hit(pos) {
            ClickTarget::Chrome(target)
        } else if self.content_rects.iter().any(|r| r.contains(pos)) {
            ClickTarget::Content
        } else {
            ClickTarget::Blank
        }
    }

    /// Translate this frame's raw egui events into session input.
    fn handle_input(&mut self, ctx: &egui::Context, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        let (events, fullscreen) = ctx.input(|i| (i.events.clone(), i.viewport().fullscreen));
        let screen = self.last_rect;
        let has_touch = events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));
        let viewport_width = screen.width();
        let now = self.now_ms();

        for event in events {
            match event {
                egui::Event::Key {
                    key: egui::Key::Q,
                    pressed: true,
                    ..
                } => viewport_cmds.push(egui::ViewportCommand::Close),
                egui::Event::Key {
                    key: egui::Key::F,
                    pressed: true,
                    repeat: false,
                    ..
                } => viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !fullscreen.unwrap_or(false),
                )),
                egui::Event::Key {
                    key,
                    pressed,
                    repeat,
                    ..
                } => {
                    let Some(key) = map_key(key) else {
                        continue;
                    };
                    if !pressed {
                        self.session.handle(InputEvent::KeyUp(key), now);
                    } else if !repeat {
                        self.session.handle(InputEvent::KeyDown(key), now);
                    }
                }
                egui::Event::WindowFocused(false) => {
                    // Key releases are lost while unfocused.
                    for key in [Key::ArrowLeft, Key::ArrowRight] {
                        self.session.handle(InputEvent::KeyUp(key), now);
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let x = pos.x - screen.left();
                    self.session
                        .handle(InputEvent::PointerMoved { x, viewport_width }, now);
                    let over = self.hits.over_nav_button(pos);
                    if over != self.session.nav_hovered() {
                        self.session.handle(InputEvent::NavHover(over), now);
                    }
                }
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    ..
                } if !has_touch && !self.touch_active => {
                    let click = Click {
                        x: pos.x - screen.left(),
                        viewport_width,
                        target: self.classify(pos),
                    };
                    self.session.handle(InputEvent::Click(click), now);
                }
                egui::Event::Touch { phase, pos, .. } => {
                    let x = pos.x - screen.left();
                    match phase {
                        egui::TouchPhase::Start => {
                            self.touch_active = true;
                            self.session.handle(InputEvent::TouchStart { x }, now);
                        }
                        egui::TouchPhase::End => {
                            self.touch_active = false;
                            self.session.handle(InputEvent::TouchEnd { x }, now);
                        }
                        egui::TouchPhase::Cancel => self.touch_active = false,
                        egui::TouchPhase::Move => {}
                    }
                }
                _ => {}
            }
        }
    }

    fn poll_gamepad(&mut self, now: u64) {
        let Some(source) = self.gamepad.as_mut() else {
            return;
        };
        for event in source.poll() {
            self.session.handle(InputEvent::Gamepad(event), now);
        }
    }

    fn draw(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        self.last_rect = rect;
        let scale = compute_scale(rect);
        let presenter = self.session.presenter();

        self.content_rects = match presenter.frame() {
            Some(frame) => draw::draw_frame(ui, frame, &self.theme, rect, presenter.assets(), scale),
            None => Vec::new(),
        };

        self.hits.clear();
        if self.session.is_visible(Widget::Progress) {
            chrome::draw_progress(
                ui,
                presenter.registry(),
                presenter.state(),
                &self.theme,
                rect,
                scale,
                &mut self.hits,
            );
        }
        if self.session.is_visible(Widget::NavButtons) {
            chrome::draw_nav_buttons(ui, &self.theme, rect, scale, &mut self.hits);
        }
        if self.session.is_visible(Widget::Note) {
            if let Some(note) = presenter.note() {
                chrome::draw_note(ui, note, &self.theme, rect, scale, &mut self.hits);
            }
        }
        if self.session.is_autoplaying() {
            chrome::draw_autoplay_badge(ui, &self.theme, rect, scale);
        }
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Collect viewport commands to send AFTER the input closure
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        self.handle_input(ctx, &mut viewport_cmds);
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        let now = self.now_ms();
        self.poll_gamepad(now);
        self.session.tick(now);

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                self.draw(ui, rect);
            });

        if let Some(due) = self.session.next_deadline() {
            ctx.request_repaint_after(Duration::from_millis(due.saturating_sub(now)));
        }
        if self.session.gamepad_connected() {
            ctx.request_repaint_after(GAMEPAD_POLL);
        }
    }
}

fn map_key(key: egui::Key) -> Option<Key> {
    use egui::Key as K;
    let key = match key {
        K::ArrowLeft => Key::ArrowLeft,
        K::ArrowRight => Key::ArrowRight,
        K::Space => Key::Space,
        K::Enter => Key::Enter,
        K::Escape => Key::Escape,
        K::Tab => Key::Tab,
        K::L => Key::Char('l'),
        K::N => Key::Char('n'),
        K::P => Key::Char('p'),
        K::R => Key::Char('r'),
        K::Num1 => Key::Char('1'),
        K::Num2 => Key::Char('2'),
        K::Num3 => Key::Char('3'),
        K::Num4 => Key::Char('4'),
        K::Num5 => Key::Char('5'),
        K::Num6 => Key::Char('6'),
        K::Num7 => Key::Char('7'),
        K::Num8 => Key::Char('8'),
        K::Num9 => Key::Char('9'),
        _ => return None,
    };
    Some(key)
}

/// Build the session for `file`: registry, content providers, saved
/// position and image preloading.
pub fn open_session(
    file: &std::path::Path,
    deck: &Deck,
    options: &LaunchOptions,
    config: &Config,
) -> anyhow::Result<Session<FileStore, ImageCache>> {
    let registry = deck.registry()?;
    let dispatcher = RenderDispatcher::new(deck.providers());

    let state_path = FileStore::resolve_path(file, options.state_file.clone())?;
    tracing::debug!(path = %state_path.display(), "state file");
    let mut store = PersistenceStore::new(FileStore::open(state_path));
    if options.fresh {
        store.clear_all();
    }

    let slide_images = (0..deck.slides.len()).map(|i| deck.image_paths(i)).collect();
    let images = ImageCache::new(deck.base_dir.clone(), slide_images);

    let presenter = Presenter::new(registry, dispatcher, store, images);
    let mut session = Session::new(presenter, config.settings(), 0);

    if let Some(n) = options.slide {
        let count = deck.slides.len();
        let index = match n.checked_sub(1) {
            Some(index) if index < count => index,
            _ => anyhow::bail!("Slide {n} is out of range (deck has {count} slides)"),
        };
        session.apply(Command::GoTo(index), 0);
    }
    Ok(session)
}

pub fn run(file: PathBuf, options: LaunchOptions) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;
    let config = Config::load_or_default();
    let session = open_session(&file, &deck, &options, &config)?;

    let theme_name = deck
        .meta
        .theme
        .as_deref()
        .or(config.theme())
        .unwrap_or("dark");
    let theme = Theme::from_name(theme_name);

    let title = format!(
        "{} \u{00b7} statedeck",
        deck.meta.title.clone().unwrap_or_else(|| file
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned())
    );
    tracing::info!(slides = deck.slides.len(), "presenting {}", file.display());

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let start = Instant::now();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(session, theme, start)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
