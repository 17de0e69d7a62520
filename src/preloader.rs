//! Loading screen.
//!
//! The preloader keeps the page locked while the critical assets load. Every
//! settled asset counts toward progress whether it loaded or failed, and a
//! fallback timer forces completion if loads stall. Completion happens exactly
//! once: the first of "all assets settled" and "fallback fired" wins and later
//! triggers are no-ops.

use std::time::Duration;

use crate::config::{Timings, ms};
use crate::constants::class;
use crate::host::{Hook, Host, View};
use crate::message::Timer;
use crate::page_lock::{LockHolder, PageLock};

/// Progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadState {
    /// Assets that settled (loaded or failed)
    pub loaded_count: usize,
    /// Assets requested
    pub total_count: usize,
    /// Whether completion has started
    pub is_complete: bool,
}

/// Lifecycle of the loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadPhase {
    /// Not started
    Idle,
    /// Waiting for assets
    Loading,
    /// Complete, fading out
    Finishing,
    /// Hidden, page unlocked
    Done,
}

/// Loading screen state machine.
#[derive(Debug)]
pub struct Preloader {
    assets: Vec<String>,
    settled: Vec<bool>,
    state: PreloadState,
    progress: f64,
    phase: PreloadPhase,
    fallback: Duration,
    finish: Duration,
    initial_reveal: Duration,
}

impl Preloader {
    /// Create a preloader for the given critical assets.
    pub fn new(assets: Vec<String>, timings: &Timings) -> Self {
        Self {
            settled: vec![false; assets.len()],
            state: PreloadState {
                total_count: assets.len(),
                ..PreloadState::default()
            },
            assets,
            progress: 0.0,
            phase: PreloadPhase::Idle,
            fallback: ms(timings.preload_fallback_ms),
            finish: ms(timings.preload_finish_ms),
            initial_reveal: ms(timings.initial_reveal_ms),
        }
    }

    /// Lock the page and start loading.
    ///
    /// Returns `true` if the page unlocked right away because there is no
    /// loading screen in the markup.
    pub fn init(&mut self, host: &mut Host<'_>, lock: &mut PageLock) -> bool {
        if !host.view.exists(Hook::Preloader) {
            log::debug!("No preloader in page, unlocking immediately");
            self.state.is_complete = true;
            self.progress = 100.0;
            self.unlock(host, lock);
            return true;
        }

        lock.acquire(LockHolder::Preloader, host.view);
        self.phase = PreloadPhase::Loading;
        self.preload_assets(host);
        false
    }

    /// Request every asset and arm the fallback timer.
    fn preload_assets(&mut self, host: &mut Host<'_>) {
        log::info!("Preloading {} critical assets", self.assets.len());

        for (index, uri) in self.assets.iter().enumerate() {
            host.view.preload(index, uri);
        }

        host.after(self.fallback, Timer::PreloadFallback);

        if self.assets.is_empty() {
            self.complete(host);
        }
    }

    /// Record a settled asset. Failures count the same as successes.
    pub fn asset_settled(&mut self, asset: usize, loaded: bool, host: &mut Host<'_>) {
        match self.settled.get_mut(asset) {
            Some(settled) if !*settled => *settled = true,
            _ => {
                log::trace!("Ignoring duplicate or unknown asset report {}", asset);
                return;
            }
        }

        self.state.loaded_count += 1;
        if loaded {
            log::debug!("Asset loaded: {}", self.assets[asset]);
        } else {
            log::warn!("Asset failed to load: {}", self.assets[asset]);
        }

        if self.state.is_complete {
            return;
        }

        let percent = self.state.loaded_count as f64 / self.state.total_count as f64 * 100.0;
        self.set_progress(percent, host.view);

        if self.state.loaded_count == self.state.total_count {
            self.complete(host);
        }
    }

    /// The fallback timer fired.
    pub fn fallback_fired(&mut self, host: &mut Host<'_>) {
        if !self.state.is_complete {
            log::warn!(
                "Preload fallback after {:?} ({}/{} assets settled)",
                self.fallback,
                self.state.loaded_count,
                self.state.total_count
            );
        }
        self.complete(host);
    }

    /// Finish preloading. Only the first call has an effect.
    pub fn complete(&mut self, host: &mut Host<'_>) {
        if self.state.is_complete {
            return;
        }
        self.state.is_complete = true;
        self.phase = PreloadPhase::Finishing;

        self.set_progress(100.0, host.view);
        host.after(self.finish, Timer::PreloadFinished);
    }

    /// The fade-out finished.
    ///
    /// Returns `true` if this unlocked the page.
    pub fn finished(&mut self, host: &mut Host<'_>, lock: &mut PageLock) -> bool {
        if self.phase != PreloadPhase::Finishing {
            return false;
        }
        self.unlock(host, lock);
        true
    }

    fn unlock(&mut self, host: &mut Host<'_>, lock: &mut PageLock) {
        host.view.set_class(Hook::Preloader, class::HIDDEN, true);
        lock.release(LockHolder::Preloader, host.view);
        self.phase = PreloadPhase::Done;
        host.after(self.initial_reveal, Timer::InitialReveal);
        log::info!("Page ready");
    }

    fn set_progress(&mut self, value: f64, view: &mut dyn View) {
        self.progress = value.min(100.0);
        view.set_style(Hook::PreloaderBar, "width", &format!("{}%", self.progress));
        view.set_text(
            Hook::PreloaderPercent,
            &format!("{}%", self.progress.round() as u32),
        );
    }

    /// Progress counters.
    pub fn state(&self) -> PreloadState {
        self.state
    }

    /// Progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> PreloadPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualScheduler, MemorySession, RecordingView};

    fn preloader(assets: &[&str]) -> Preloader {
        Preloader::new(
            assets.iter().map(|s| s.to_string()).collect(),
            &Timings::default(),
        )
    }

    fn page_view() -> RecordingView {
        RecordingView::new()
            .with(Hook::Preloader)
            .with(Hook::PreloaderBar)
            .with(Hook::PreloaderPercent)
    }

    #[test]
    fn test_progress_counts_failures() {
        let mut view = page_view();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        let mut lock = PageLock::new();
        let mut preloader = preloader(&["a.png", "b.jpg"]);

        assert!(!preloader.init(&mut host, &mut lock));
        assert!(lock.is_held_by(LockHolder::Preloader));
        assert_eq!(preloader.phase(), PreloadPhase::Loading);

        preloader.asset_settled(0, false, &mut host);
        assert_eq!(preloader.state().loaded_count, 1);
        assert_eq!(preloader.progress(), 50.0);
        assert!(!preloader.state().is_complete);

        preloader.asset_settled(1, true, &mut host);
        assert!(preloader.state().is_complete);
        assert_eq!(preloader.phase(), PreloadPhase::Finishing);

        assert_eq!(view.text(Hook::PreloaderPercent), Some("100%"));
        assert_eq!(view.style(Hook::PreloaderBar, "width"), Some("100%"));
        assert_eq!(view.preloads().len(), 2);
    }

    #[test]
    fn test_duplicate_reports_do_not_exceed_total() {
        let mut view = page_view();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        let mut lock = PageLock::new();
        let mut preloader = preloader(&["a.png", "b.jpg"]);

        preloader.init(&mut host, &mut lock);
        preloader.asset_settled(0, true, &mut host);
        preloader.asset_settled(0, true, &mut host);
        preloader.asset_settled(7, true, &mut host);

        let state = preloader.state();
        assert_eq!(state.loaded_count, 1);
        assert!(state.loaded_count <= state.total_count);
        assert!(!state.is_complete);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut view = page_view();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut lock = PageLock::new();
        let mut preloader = preloader(&["a.png"]);

        {
            let mut host = Host::new(&mut view, &mut timers, &mut session);
            preloader.init(&mut host, &mut lock);
            preloader.complete(&mut host);
            preloader.complete(&mut host);
        }
        assert_eq!(timers.pending_matching(|t| t == Timer::PreloadFinished), 1);

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        assert!(preloader.finished(&mut host, &mut lock));
        assert!(!preloader.finished(&mut host, &mut lock));
        assert_eq!(preloader.progress(), 100.0);
        assert!(!lock.is_locked());
        assert_eq!(view.class_changes(Hook::Body, class::LOCKED), 2);
    }

    #[test]
    fn test_fallback_completes_without_any_asset() {
        let mut view = page_view();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        let mut lock = PageLock::new();
        let mut preloader = preloader(&["a.png", "b.jpg"]);

        preloader.init(&mut host, &mut lock);
        preloader.fallback_fired(&mut host);
        assert!(preloader.state().is_complete);
        assert_eq!(preloader.state().loaded_count, 0);

        // Late arrivals neither regress progress nor restart completion
        preloader.asset_settled(0, true, &mut host);
        assert_eq!(preloader.progress(), 100.0);
        assert_eq!(preloader.phase(), PreloadPhase::Finishing);
    }

    #[test]
    fn test_missing_markup_unlocks_immediately() {
        let mut view = RecordingView::new();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        let mut lock = PageLock::new();
        let mut preloader = preloader(&["a.png"]);

        assert!(preloader.init(&mut host, &mut lock));
        assert_eq!(preloader.phase(), PreloadPhase::Done);
        assert!(!lock.is_locked());
        assert!(view.preloads().is_empty());
    }

    #[test]
    fn test_empty_asset_list_completes() {
        let mut view = page_view();
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut host = Host::new(&mut view, &mut timers, &mut session);
        let mut lock = PageLock::new();
        let mut preloader = preloader(&[]);

        preloader.init(&mut host, &mut lock);
        assert!(preloader.state().is_complete);
        assert_eq!(preloader.phase(), PreloadPhase::Finishing);
    }
}
