//! Custom cursor with an easing follower.
//!
//! Desktop only. Instead of an open-ended animation-frame loop, the cursor
//! runs as a fixed-interval scheduled tick with explicit start and stop. Each
//! start bumps the run id so ticks left over from an earlier run die out.

use std::time::Duration;

use crate::config::Timings;
use crate::constants::{CURSOR_TICK_MS, class};
use crate::host::{Hook, Host, View};
use crate::message::Timer;

/// A point in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

impl Position {
    /// Move `factor` of the way toward `target`.
    fn ease_toward(&mut self, target: Position, factor: f64) {
        self.x += (target.x - self.x) * factor;
        self.y += (target.y - self.y) * factor;
    }
}

/// Cursor dot and follower ring.
#[derive(Debug)]
pub struct CustomCursor {
    available: bool,
    running: bool,
    run: u64,
    pointer: Position,
    cursor: Position,
    follower: Position,
    ease: f64,
    follower_ease: f64,
    min_width: f64,
}

impl CustomCursor {
    /// Create a stopped cursor.
    pub fn new(timings: &Timings) -> Self {
        Self {
            available: false,
            running: false,
            run: 0,
            pointer: Position::default(),
            cursor: Position::default(),
            follower: Position::default(),
            ease: timings.cursor_ease,
            follower_ease: timings.follower_ease,
            min_width: timings.cursor_min_width_px,
        }
    }

    /// Start on wide viewports when both cursor elements exist.
    pub fn init(&mut self, host: &mut Host<'_>) {
        self.available =
            host.view.exists(Hook::Cursor) && host.view.exists(Hook::CursorFollower);
        if self.available && host.view.viewport().width >= self.min_width {
            self.start(host);
        }
    }

    /// Begin ticking.
    pub fn start(&mut self, host: &mut Host<'_>) {
        if self.running || !self.available {
            return;
        }
        self.running = true;
        self.run += 1;
        host.after(Duration::from_millis(CURSOR_TICK_MS), Timer::CursorTick(self.run));
        log::debug!("Custom cursor started");
    }

    /// Stop ticking. The pending tick of this run is ignored.
    pub fn stop(&mut self, view: &mut dyn View) {
        if !self.running {
            return;
        }
        self.running = false;
        view.set_class(Hook::Cursor, class::HOVER, false);
        view.set_class(Hook::CursorFollower, class::HOVER, false);
        log::debug!("Custom cursor stopped");
    }

    /// Follow the viewport across the width threshold.
    pub fn on_resize(&mut self, host: &mut Host<'_>) {
        if !self.available {
            return;
        }
        if host.view.viewport().width >= self.min_width {
            self.start(host);
        } else {
            self.stop(host.view);
        }
    }

    /// Record the pointer position.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Position { x, y };
    }

    /// Pointer entered or left an interactive element.
    pub fn hover(&mut self, hovering: bool, view: &mut dyn View) {
        if !self.running {
            return;
        }
        view.set_class(Hook::Cursor, class::HOVER, hovering);
        view.set_class(Hook::CursorFollower, class::HOVER, hovering);
    }

    /// One easing frame.
    pub fn tick(&mut self, run: u64, host: &mut Host<'_>) {
        if !self.running || run != self.run {
            return;
        }

        self.cursor.ease_toward(self.pointer, self.ease);
        self.follower.ease_toward(self.pointer, self.follower_ease);

        place(Hook::Cursor, self.cursor, host.view);
        place(Hook::CursorFollower, self.follower, host.view);

        host.after(Duration::from_millis(CURSOR_TICK_MS), Timer::CursorTick(run));
    }

    /// Whether the tick loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current dot and follower positions.
    pub fn positions(&self) -> (Position, Position) {
        (self.cursor, self.follower)
    }
}

fn place(hook: Hook, position: Position, view: &mut dyn View) {
    view.set_style(hook, "left", &format!("{}px", position.x));
    view.set_style(hook, "top", &format!("{}px", position.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualScheduler, MemorySession, RecordingView};

    fn cursor_view(width: f64) -> RecordingView {
        RecordingView::new()
            .with(Hook::Cursor)
            .with(Hook::CursorFollower)
            .with_viewport(width, 900.0)
    }

    #[test]
    fn test_eases_toward_pointer() {
        let mut view = cursor_view(1440.0);
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut cursor = CustomCursor::new(&Timings::default());

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        cursor.init(&mut host);
        assert!(cursor.is_running());

        cursor.pointer_moved(100.0, 200.0);
        cursor.tick(1, &mut host);
        let (dot, follower) = cursor.positions();
        assert_eq!(dot, Position { x: 50.0, y: 100.0 });
        assert!((follower.x - 15.0).abs() < 1e-9);
        assert!((follower.y - 30.0).abs() < 1e-9);

        assert_eq!(view.style(Hook::Cursor, "left"), Some("50px"));
        assert_eq!(view.style(Hook::Cursor, "top"), Some("100px"));
    }

    #[test]
    fn test_narrow_viewport_never_starts() {
        let mut view = cursor_view(800.0);
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut cursor = CustomCursor::new(&Timings::default());

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        cursor.init(&mut host);
        assert!(!cursor.is_running());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_resize_stops_and_restarts_with_new_run() {
        let mut view = cursor_view(1440.0);
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut cursor = CustomCursor::new(&Timings::default());

        {
            let mut host = Host::new(&mut view, &mut timers, &mut session);
            cursor.init(&mut host);
        }
        view.set_viewport(600.0, 900.0);
        {
            let mut host = Host::new(&mut view, &mut timers, &mut session);
            cursor.on_resize(&mut host);
            assert!(!cursor.is_running());
            cursor.tick(1, &mut host);
        }
        assert_eq!(view.style(Hook::Cursor, "left"), None);

        view.set_viewport(1440.0, 900.0);
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        cursor.on_resize(&mut host);
        assert!(cursor.is_running());

        // Tick from the first run is stale
        cursor.tick(1, &mut host);
        assert_eq!(view.style(Hook::Cursor, "left"), None);
        assert_eq!(timers.pending_matching(|t| t == Timer::CursorTick(2)), 1);
    }
}
