use crate::engine::scheduler::{Scheduler, TimerId, TimerTask};

/// Fixed-interval advance, toggled on and off.
#[derive(Debug, Clone, Default)]
pub struct AutoPlay {
    timer: Option<TimerId>,
}

impl AutoPlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Returns whether auto-play is running afterwards.
    pub fn toggle(
        &mut self,
        now_ms: u64,
        interval_ms: u64,
        timers: &mut Scheduler<TimerTask>,
    ) -> bool {
        match self.timer.take() {
            Some(id) => {
                timers.cancel(id);
                tracing::info!("auto-play stopped");
                false
            }
            None => {
                self.timer = Some(timers.repeating(now_ms, interval_ms, TimerTask::AutoPlay));
                tracing::info!(interval_ms, "auto-play started");
                true
            }
        }
    }

    /// Whether a fired timer is the live auto-play tick.
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Drop the handle after the scheduler was cleared elsewhere.
    pub fn forget(&mut self) {
        self.timer = None;
    }
}
