//! One-time promotional popup.
//!
//! The popup appears at most once per browsing session, shortly after the
//! visitor first scrolls. The session flag is written synchronously on the
//! transition to [`PopupState::Shown`], before anything else happens, so a
//! second trigger can never open it twice.

use std::time::Duration;

use crate::config::{Timings, ms};
use crate::constants::{POPUP_SESSION_KEY, POPUP_SESSION_VALUE, class};
use crate::host::{Hook, Host, View};
use crate::message::{Key, Timer};
use crate::page_lock::{LockHolder, PageLock};

/// Popup lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    /// No popup in the page
    Inactive,
    /// Already shown earlier this session
    Suppressed,
    /// Waiting for the first scroll
    Armed,
    /// First scroll seen, opening after the delay
    Scheduled,
    /// Visible
    Shown,
    /// Closed; never shown again this session
    Dismissed,
}

/// Session popup state machine.
#[derive(Debug)]
pub struct SessionPopup {
    state: PopupState,
    muted_retry: bool,
    delay: Duration,
    play_delay: Duration,
    volume: f64,
}

impl SessionPopup {
    /// Create an inactive popup.
    pub fn new(timings: &Timings) -> Self {
        Self {
            state: PopupState::Inactive,
            muted_retry: false,
            delay: ms(timings.popup_delay_ms),
            play_delay: ms(timings.popup_play_ms),
            volume: timings.popup_volume,
        }
    }

    /// Arm the popup unless it was already shown this session.
    pub fn init(&mut self, host: &mut Host<'_>) {
        if !host.view.exists(Hook::Popup) {
            self.state = PopupState::Inactive;
            return;
        }

        if host.session.get(POPUP_SESSION_KEY).as_deref() == Some(POPUP_SESSION_VALUE) {
            log::debug!("Popup already shown this session");
            self.state = PopupState::Suppressed;
            return;
        }

        self.state = PopupState::Armed;
    }

    /// Page scrolled. Only the first scroll while armed counts.
    pub fn on_scroll(&mut self, host: &mut Host<'_>) {
        if self.state != PopupState::Armed {
            return;
        }
        self.state = PopupState::Scheduled;
        host.after(self.delay, Timer::PopupOpen);
    }

    /// Show the popup. Only possible once, from `Armed` or `Scheduled`.
    pub fn open(&mut self, host: &mut Host<'_>, lock: &mut PageLock) {
        if !matches!(self.state, PopupState::Armed | PopupState::Scheduled) {
            return;
        }

        if let Err(e) = host.session.set(POPUP_SESSION_KEY, POPUP_SESSION_VALUE) {
            log::warn!("Could not remember popup for this session: {}", e);
        }
        self.state = PopupState::Shown;
        log::info!("Showing session popup");

        host.view.set_class(Hook::Popup, class::ACTIVE, true);
        lock.acquire(LockHolder::Popup, host.view);

        if host.view.exists(Hook::PopupVideo) {
            host.view.set_muted(Hook::PopupVideo, false);
            host.view.set_volume(Hook::PopupVideo, self.volume);
            host.view.rewind(Hook::PopupVideo);
            host.after(self.play_delay, Timer::PopupPlay);
        }
    }

    /// Start the video with sound.
    pub fn play(&mut self, view: &mut dyn View) {
        if self.state != PopupState::Shown || !view.exists(Hook::PopupVideo) {
            return;
        }
        self.muted_retry = false;
        view.play(Hook::PopupVideo);
    }

    /// The browser refused playback: retry muted once.
    pub fn playback_rejected(&mut self, view: &mut dyn View) {
        if self.state != PopupState::Shown {
            return;
        }
        if self.muted_retry {
            log::debug!("Muted popup playback blocked too, giving up");
            return;
        }
        log::debug!("Popup autoplay with sound blocked, retrying muted");
        self.muted_retry = true;
        view.set_muted(Hook::PopupVideo, true);
        view.play(Hook::PopupVideo);
    }

    /// Hide the popup and stop its video.
    pub fn close(&mut self, host: &mut Host<'_>, lock: &mut PageLock) {
        if self.state != PopupState::Shown {
            return;
        }
        self.state = PopupState::Dismissed;

        host.view.set_class(Hook::Popup, class::ACTIVE, false);
        lock.release(LockHolder::Popup, host.view);
        host.view.pause(Hook::PopupVideo);
        host.view.rewind(Hook::PopupVideo);
        log::debug!("Session popup dismissed");
    }

    /// Escape closes the popup while shown.
    pub fn handle_key(&mut self, key: Key, host: &mut Host<'_>, lock: &mut PageLock) {
        if key == Key::Escape {
            self.close(host, lock);
        }
    }

    /// Current state.
    pub fn state(&self) -> PopupState {
        self.state
    }
}
