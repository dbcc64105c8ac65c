//! One running presentation: the presenter plus every input modality and
//! the timers that drive them.
//!
//! The host feeds raw events and the current time; the session turns them
//! into commands and applies them in arrival order, so the last command wins.

use crate::engine::feedback::{Feedback, Widget};
use crate::engine::render::AssetLoader;
use crate::engine::scheduler::{Scheduler, TimerTask};
use crate::engine::settings::EngineSettings;
use crate::engine::store::KeyValueStore;
use crate::engine::{Direction, Presenter};
use crate::input::autoplay::AutoPlay;
use crate::input::gamepad::{GamepadEvent, GamepadTracker};
use crate::input::keyboard::Keyboard;
use crate::input::pointer::{self, Click};
use crate::input::touch::Swipe;
use crate::input::{Command, Key};

#[cfg(test)]
mod tests;

/// Raw input, already stripped of backend types.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerMoved { x: f32, viewport_width: f32 },
    /// Pointer entered (`true`) or left (`false`) a nav button.
    NavHover(bool),
    Click(Click),
    TouchStart { x: f32 },
    TouchEnd { x: f32 },
    Gamepad(GamepadEvent),
}

pub struct Session<S, A> {
    presenter: Presenter<S, A>,
    settings: EngineSettings,
    timers: Scheduler<TimerTask>,
    feedback: Feedback,
    keyboard: Keyboard,
    swipe: Swipe,
    gamepad: GamepadTracker,
    autoplay: AutoPlay,
    nav_hovered: bool,
}

impl<S: KeyValueStore, A: AssetLoader> Session<S, A> {
    pub fn new(presenter: Presenter<S, A>, settings: EngineSettings, now_ms: u64) -> Self {
        let mut session = Self {
            presenter,
            settings,
            timers: Scheduler::new(),
            feedback: Feedback::new(),
            keyboard: Keyboard::new(),
            swipe: Swipe::new(),
            gamepad: GamepadTracker::new(),
            autoplay: AutoPlay::new(),
            nav_hovered: false,
        };
        session.sync_note(now_ms);
        session
    }

    /// Process one input event at `now_ms`. Timers that came due before the
    /// event fire first.
    pub fn handle(&mut self, event: InputEvent, now_ms: u64) {
        self.tick(now_ms);
        let input = &self.settings.input;
        match event {
            InputEvent::KeyDown(key) => {
                let timing = &self.settings.timing;
                if let Some(cmd) = self.keyboard.key_down(key, now_ms, timing, &mut self.timers) {
                    self.apply(cmd, now_ms);
                }
            }
            InputEvent::KeyUp(key) => self.keyboard.key_up(key, &mut self.timers),
            InputEvent::PointerMoved { x, viewport_width } => {
                if !self.nav_hovered && pointer::near_edge(x, viewport_width, input) {
                    let delay = Some(self.settings.timing.buttons_hide_ms);
                    self.feedback
                        .show_for(Widget::NavButtons, delay, now_ms, &mut self.timers);
                }
            }
            InputEvent::NavHover(true) => {
                self.nav_hovered = true;
                self.feedback.pin(Widget::NavButtons, &mut self.timers);
            }
            InputEvent::NavHover(false) => {
                self.nav_hovered = false;
                let delay = Some(self.settings.timing.buttons_leave_ms);
                self.feedback
                    .show_for(Widget::NavButtons, delay, now_ms, &mut self.timers);
            }
            InputEvent::Click(click) => {
                if let Some(cmd) = pointer::click(click, input) {
                    self.apply(cmd, now_ms);
                }
            }
            InputEvent::TouchStart { x } => self.swipe.start(x),
            InputEvent::TouchEnd { x } => {
                if let Some(cmd) = self.swipe.end(x, input.swipe_threshold) {
                    self.apply(cmd, now_ms);
                }
            }
            InputEvent::Gamepad(event) => {
                for cmd in self.gamepad.handle(event, input) {
                    self.apply(cmd, now_ms);
                }
            }
        }
    }

    /// Run a command against the presenter and refresh the indicators.
    pub fn apply(&mut self, command: Command, now_ms: u64) {
        tracing::trace!(?command, "apply");
        match command {
            Command::Navigate(direction) => {
                self.presenter.change_slide(direction.delta());
                self.after_navigation(now_ms);
            }
            Command::GoTo(index) => {
                if self.presenter.go_to_slide(index) {
                    self.after_navigation(now_ms);
                }
            }
            Command::First => {
                self.presenter.go_to_slide(0);
                self.after_navigation(now_ms);
            }
            Command::CycleState => {
                if self.presenter.cycle_state() {
                    self.sync_note(now_ms);
                }
            }
            Command::ToggleAutoPlay => {
                let interval = self.settings.timing.autoplay_ms;
                self.autoplay.toggle(now_ms, interval, &mut self.timers);
            }
            Command::ResetProgress => self.reset_progress(now_ms),
            Command::ToggleNote => {
                if self.feedback.is_visible(Widget::Note) {
                    self.feedback.hide(Widget::Note, &mut self.timers);
                } else {
                    self.sync_note(now_ms);
                }
            }
            Command::HideNote => self.feedback.hide(Widget::Note, &mut self.timers),
        }
    }

    /// Fire every timer due at `now_ms`, in due order.
    pub fn tick(&mut self, now_ms: u64) {
        while let Some(fired) = self.timers.pop_due(now_ms) {
            let at = fired.due_ms;
            match fired.task {
                TimerTask::KeyHold(_) => {
                    let timing = &self.settings.timing;
                    self.keyboard.on_hold(fired.id, at, timing, &mut self.timers);
                }
                TimerTask::KeyRepeat(_) => {
                    if let Some(cmd) = self.keyboard.on_repeat(fired.id) {
                        self.apply(cmd, at);
                    }
                }
                TimerTask::AutoPlay => {
                    if self.autoplay.owns(fired.id) {
                        self.apply(Command::Navigate(Direction::Forward), at);
                    }
                }
                TimerTask::Hide(widget) => self.feedback.expire(widget, fired.id),
            }
        }
    }

    /// When the host should call [`Session::tick`] next.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    fn after_navigation(&mut self, now_ms: u64) {
        let delay = Some(self.settings.timing.progress_hide_ms);
        self.feedback
            .show_for(Widget::Progress, delay, now_ms, &mut self.timers);
        self.sync_note(now_ms);
    }

    /// Show the note for the current (slide, state), or hide the panel when
    /// there is none.
    fn sync_note(&mut self, now_ms: u64) {
        if self.presenter.note().is_some() {
            let delay = self.settings.timing.note_hide_ms;
            self.feedback
                .show_for(Widget::Note, delay, now_ms, &mut self.timers);
        } else {
            self.feedback.hide(Widget::Note, &mut self.timers);
        }
    }

    /// Clear saved progress and start over, as a fresh launch would.
    fn reset_progress(&mut self, now_ms: u64) {
        self.timers.clear();
        self.keyboard = Keyboard::new();
        self.swipe.cancel();
        self.autoplay.forget();
        self.feedback = Feedback::new();
        if self.nav_hovered {
            self.feedback.pin(Widget::NavButtons, &mut self.timers);
        }
        self.presenter.reset_progress();
        self.sync_note(now_ms);
    }

    pub fn presenter(&self) -> &Presenter<S, A> {
        &self.presenter
    }

    pub fn is_visible(&self, widget: Widget) -> bool {
        self.feedback.is_visible(widget)
    }

    pub fn nav_hovered(&self) -> bool {
        self.nav_hovered
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    #[cfg(test)]
    pub fn gesture(&self) -> crate::input::keyboard::Gesture {
        self.keyboard.gesture()
    }

    pub fn gamepad_connected(&self) -> bool {
        self.gamepad.is_connected()
    }
}
