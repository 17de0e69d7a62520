//! Transient notifications.
//!
//! At most one toast is on screen. A new toast replaces the current one, and
//! timers belonging to a replaced toast are ignored.

use std::time::Duration;

use crate::config::{Timings, ms};
use crate::constants::FRAME_MS;
use crate::host::{Host, ToastKind, View};
use crate::message::Timer;

/// Toast lifecycle driver.
#[derive(Debug)]
pub struct ToastManager {
    current: Option<u64>,
    next_id: u64,
    visible: Duration,
    exit: Duration,
}

impl ToastManager {
    /// Create a manager with the configured display times.
    pub fn new(timings: &Timings) -> Self {
        Self {
            current: None,
            next_id: 0,
            visible: ms(timings.toast_visible_ms),
            exit: ms(timings.toast_exit_ms),
        }
    }

    /// Show a toast, replacing any existing one.
    pub fn show(&mut self, kind: ToastKind, text: &str, host: &mut Host<'_>) {
        self.next_id += 1;
        let id = self.next_id;
        self.current = Some(id);

        host.view.create_toast(kind, text);
        // A frame later, so the off-screen start position has been laid out
        host.after(ms(FRAME_MS), Timer::ToastEnter(id));
        host.after(self.visible, Timer::ToastLeave(id));
        log::debug!("Toast {} ({}): {}", id, kind.name(), text);
    }

    /// Slide toast `id` in.
    pub fn enter(&mut self, id: u64, view: &mut dyn View) {
        if self.current == Some(id) {
            view.slide_toast(true);
        }
    }

    /// Slide toast `id` out and schedule its removal.
    pub fn leave(&mut self, id: u64, host: &mut Host<'_>) {
        if self.current == Some(id) {
            host.view.slide_toast(false);
            host.after(self.exit, Timer::ToastRemove(id));
        }
    }

    /// Remove toast `id`.
    pub fn remove(&mut self, id: u64, view: &mut dyn View) {
        if self.current == Some(id) {
            view.remove_toast();
            self.current = None;
        }
    }

    /// Id of the toast on screen.
    pub fn current(&self) -> Option<u64> {
        self.current
    }
}
