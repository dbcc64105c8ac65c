//! Debounced show/auto-hide for transient widgets.

use super::scheduler::{Scheduler, TimerId, TimerTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    Progress,
    NavButtons,
    Note,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    visible: bool,
    hide_timer: Option<TimerId>,
}

/// Visibility of every transient widget plus its pending hide timer.
#[derive(Debug, Clone, Default)]
pub struct Feedback {
    progress: Slot,
    nav_buttons: Slot,
    note: Slot,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, widget: Widget) -> &mut Slot {
        match widget {
            Widget::Progress => &mut self.progress,
            Widget::NavButtons => &mut self.nav_buttons,
            Widget::Note => &mut self.note,
        }
    }

    /// Make `widget` visible and restart its hide countdown. `None` keeps it
    /// up until [`Feedback::hide`].
    pub fn show_for(
        &mut self,
        widget: Widget,
        delay_ms: Option<u64>,
        now_ms: u64,
        timers: &mut Scheduler<TimerTask>,
    ) {
        let slot = self.slot(widget);
        if let Some(id) = slot.hide_timer.take() {
            timers.cancel(id);
        }
        slot.visible = true;
        slot.hide_timer = delay_ms.map(|d| timers.once(now_ms, d, TimerTask::Hide(widget)));
    }

    /// Visible with no countdown, e.g. while hovered.
    pub fn pin(&mut self, widget: Widget, timers: &mut Scheduler<TimerTask>) {
        self.show_for(widget, None, 0, timers);
    }

    pub fn hide(&mut self, widget: Widget, timers: &mut Scheduler<TimerTask>) {
        let slot = self.slot(widget);
        if let Some(id) = slot.hide_timer.take() {
            timers.cancel(id);
        }
        slot.visible = false;
    }

    /// Called when a hide timer fires. Stale timers are ignored.
    pub fn expire(&mut self, widget: Widget, id: TimerId) {
        let slot = self.slot(widget);
        if slot.hide_timer == Some(id) {
            slot.hide_timer = None;
            slot.visible = false;
        }
    }

    pub fn is_visible(&self, widget: Widget) -> bool {
        match widget {
            Widget::Progress => self.progress.visible,
            Widget::NavButtons => self.nav_buttons.visible,
            Widget::Note => self.note.visible,
        }
    }
}
