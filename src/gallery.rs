//! Gallery modal with image navigation and the event recap video.
//!
//! The modal is a two-state machine (`Closed`, `Open`) holding an index into a
//! fixed [`MediaCatalog`]. Navigation wraps in both directions. Swapping the
//! main image fades it out, changes the source after a short delay and fades
//! it back in; only the most recent swap is applied when navigation outpaces
//! the fade.
//!
//! The recap video sits behind a poster. Playing it hides the poster and
//! starts the video with sound, falling back to muted playback once if the
//! browser refuses. Closing the modal always puts the poster back.

use std::time::Duration;

use crate::config::{Timings, ms};
use crate::constants::class;
use crate::host::{Group, Hook, Host, View};
use crate::media::MediaCatalog;
use crate::message::{Key, Timer};
use crate::page_lock::{LockHolder, PageLock};

/// Errors from gallery navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryError {
    /// Requested index is outside the catalog
    #[error("Gallery index {index} out of range (total {total})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Catalog size
        total: usize,
    },
}

/// Navigational state of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryState {
    /// Whether the modal is open
    pub is_open: bool,
    /// Index of the displayed item; valid whenever the modal is open
    pub current_index: usize,
    /// Catalog size
    pub total: usize,
}

/// Recap video sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecapState {
    /// Poster visible, video hidden and rewound
    Poster,
    /// Video visible and playing
    Playing {
        /// Whether the muted fallback was already tried
        muted_retry: bool,
    },
}

/// Gallery modal state machine.
#[derive(Debug)]
pub struct GalleryModal {
    catalog: MediaCatalog,
    state: GalleryState,
    recap: RecapState,
    swap_generation: u64,
    fade: Duration,
    video_scroll: Duration,
    video_play: Duration,
}

impl GalleryModal {
    /// Create a closed gallery over `catalog`.
    pub fn new(catalog: MediaCatalog, timings: &Timings) -> Self {
        Self {
            state: GalleryState {
                is_open: false,
                current_index: 0,
                total: catalog.len(),
            },
            catalog,
            recap: RecapState::Poster,
            swap_generation: 0,
            fade: ms(timings.gallery_fade_ms),
            video_scroll: ms(timings.gallery_video_scroll_ms),
            video_play: ms(timings.gallery_video_play_ms),
        }
    }

    /// Open the modal at `index`. Indices from markup are wrapped into range.
    pub fn open(&mut self, index: usize, host: &mut Host<'_>, lock: &mut PageLock) {
        if self.catalog.is_empty() {
            log::warn!("Gallery has no media, not opening");
            return;
        }

        let index = if index < self.state.total {
            index
        } else {
            log::warn!(
                "Gallery index {} out of range, wrapping (total {})",
                index,
                self.state.total
            );
            index % self.state.total
        };

        self.state.is_open = true;
        host.view.set_class(Hook::GalleryModal, class::ACTIVE, true);
        lock.acquire(LockHolder::Gallery, host.view);
        log::debug!("Gallery opened at {}", index);

        self.show(index, host);
    }

    /// Close the modal and put the recap video back behind its poster.
    pub fn close(&mut self, host: &mut Host<'_>, lock: &mut PageLock) {
        if !self.state.is_open {
            return;
        }
        self.state.is_open = false;
        host.view.set_class(Hook::GalleryModal, class::ACTIVE, false);
        lock.release(LockHolder::Gallery, host.view);
        self.reset_video(host.view);
        log::debug!("Gallery closed");
    }

    /// Show item `index`.
    pub fn go_to(&mut self, index: usize, host: &mut Host<'_>) -> Result<(), GalleryError> {
        if index >= self.state.total {
            return Err(GalleryError::IndexOutOfRange {
                index,
                total: self.state.total,
            });
        }
        self.show(index, host);
        Ok(())
    }

    /// Fade to item `index`, which must be in range.
    fn show(&mut self, index: usize, host: &mut Host<'_>) {
        self.state.current_index = index;

        if host.view.exists(Hook::GalleryMainImage) {
            host.view.set_style(Hook::GalleryMainImage, "opacity", "0");
            self.swap_generation += 1;
            host.after(
                self.fade,
                Timer::GallerySwap {
                    index,
                    generation: self.swap_generation,
                },
            );
        }

        for thumb in 0..host.view.count(Group::GalleryThumb) {
            host.view.set_class(Hook::GalleryThumb(thumb), class::ACTIVE, thumb == index);
        }

        host.view.set_text(Hook::GalleryCounter, &(index + 1).to_string());
    }

    /// Show the previous item, wrapping to the last.
    pub fn prev(&mut self, host: &mut Host<'_>) {
        if self.state.total == 0 {
            return;
        }
        let index = match self.state.current_index {
            0 => self.state.total - 1,
            i => i - 1,
        };
        self.show(index, host);
    }

    /// Show the next item, wrapping to the first.
    pub fn next(&mut self, host: &mut Host<'_>) {
        if self.state.total == 0 {
            return;
        }
        let index = (self.state.current_index + 1) % self.state.total;
        self.show(index, host);
    }

    /// Keyboard navigation. Ignored while closed.
    pub fn handle_key(&mut self, key: Key, host: &mut Host<'_>, lock: &mut PageLock) {
        if !self.state.is_open {
            return;
        }
        match key {
            Key::Escape => self.close(host, lock),
            Key::ArrowLeft => self.prev(host),
            Key::ArrowRight => self.next(host),
            Key::Other => {}
        }
    }

    /// Second half of the fade: swap the source and fade back in.
    pub fn swap(&mut self, index: usize, generation: u64, view: &mut dyn View) {
        if generation != self.swap_generation {
            log::trace!("Dropping stale gallery swap to {}", index);
            return;
        }
        let Some(item) = self.catalog.get(index) else {
            return;
        };
        view.set_source(Hook::GalleryMainImage, &item.uri);
        view.set_style(Hook::GalleryMainImage, "opacity", "1");
    }

    /// "Play video" button: open, scroll to the recap, then play it.
    pub fn open_for_video(&mut self, host: &mut Host<'_>, lock: &mut PageLock) {
        self.open(0, host, lock);
        if self.state.is_open {
            host.after(self.video_scroll, Timer::GalleryScrollToVideo);
        }
    }

    /// Scroll the recap section into view and schedule playback.
    pub fn scroll_to_video(&mut self, host: &mut Host<'_>) {
        if !self.state.is_open || !host.view.exists(Hook::GalleryVideoSection) {
            return;
        }
        host.view.scroll_into_view(Hook::GalleryVideoSection);
        host.after(self.video_play, Timer::GalleryAutoplay);
    }

    /// Scheduled playback after the scroll.
    pub fn autoplay(&mut self, host: &mut Host<'_>) {
        if self.state.is_open {
            self.play_recap(host.view);
        }
    }

    /// Swap the poster for the live video and start it with sound.
    pub fn play_recap(&mut self, view: &mut dyn View) {
        if !view.exists(Hook::VideoPoster) || !view.exists(Hook::GalleryVideo) {
            return;
        }
        view.set_class(Hook::VideoPoster, class::HIDDEN, true);
        view.set_style(Hook::GalleryVideo, "display", "block");
        view.set_class(Hook::GalleryVideo, class::ACTIVE, true);
        view.set_muted(Hook::GalleryVideo, false);
        view.play(Hook::GalleryVideo);
        self.recap = RecapState::Playing { muted_retry: false };
        log::debug!("Recap video started");
    }

    /// The browser refused playback: retry muted once.
    pub fn playback_rejected(&mut self, view: &mut dyn View) {
        match self.recap {
            RecapState::Playing { muted_retry: false } => {
                log::debug!("Recap autoplay blocked, retrying muted");
                self.recap = RecapState::Playing { muted_retry: true };
                view.set_muted(Hook::GalleryVideo, true);
                view.play(Hook::GalleryVideo);
            }
            RecapState::Playing { muted_retry: true } => {
                log::debug!("Muted recap playback blocked too, giving up");
            }
            RecapState::Poster => {}
        }
    }

    /// Pause, rewind and hide the recap video behind its poster.
    pub fn reset_video(&mut self, view: &mut dyn View) {
        self.recap = RecapState::Poster;
        if !view.exists(Hook::VideoPoster) || !view.exists(Hook::GalleryVideo) {
            return;
        }
        view.set_class(Hook::VideoPoster, class::HIDDEN, false);
        view.set_style(Hook::GalleryVideo, "display", "none");
        view.set_class(Hook::GalleryVideo, class::ACTIVE, false);
        view.pause(Hook::GalleryVideo);
        view.rewind(Hook::GalleryVideo);
    }

    /// Navigational state.
    pub fn state(&self) -> GalleryState {
        self.state
    }

    /// Recap video state.
    pub fn recap(&self) -> RecapState {
        self.recap
    }

    /// Whether the modal is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualScheduler, MediaOp, MemorySession, RecordingView};

    struct Fixture {
        view: RecordingView,
        timers: ManualScheduler,
        session: MemorySession,
        lock: PageLock,
        gallery: GalleryModal,
    }

    impl Fixture {
        fn new(uris: &[&str]) -> Self {
            let view = RecordingView::new()
                .with(Hook::GalleryModal)
                .with(Hook::GalleryMainImage)
                .with(Hook::GalleryCounter)
                .with(Hook::GalleryVideoSection)
                .with(Hook::VideoPoster)
                .with(Hook::GalleryVideo)
                .with_group(Group::GalleryThumb, uris.len());
            Self {
                view,
                timers: ManualScheduler::new(),
                session: MemorySession::new(),
                lock: PageLock::new(),
                gallery: GalleryModal::new(
                    MediaCatalog::new(uris.iter().copied()),
                    &Timings::default(),
                ),
            }
        }

        fn with<R>(
            &mut self,
            f: impl FnOnce(&mut GalleryModal, &mut Host<'_>, &mut PageLock) -> R,
        ) -> R {
            let mut host = Host::new(&mut self.view, &mut self.timers, &mut self.session);
            f(&mut self.gallery, &mut host, &mut self.lock)
        }

        /// Let pending fades complete.
        fn settle(&mut self) {
            while let Some(timer) = self.timers.pop_due(Duration::from_secs(1)) {
                if let Timer::GallerySwap { index, generation } = timer {
                    self.gallery.swap(index, generation, &mut self.view);
                }
            }
        }

        fn shown(&self) -> Option<&str> {
            self.view.source(Hook::GalleryMainImage)
        }

        fn counter(&self) -> Option<&str> {
            self.view.text(Hook::GalleryCounter)
        }
    }

    #[test]
    fn test_open_next_wraps_and_close_resets_video() {
        let mut fx = Fixture::new(&["a", "b", "c", "d"]);

        fx.with(|g, h, l| g.open(2, h, l));
        fx.settle();
        assert_eq!(fx.shown(), Some("c"));
        assert_eq!(fx.counter(), Some("3"));
        assert!(fx.lock.is_held_by(LockHolder::Gallery));

        fx.with(|g, h, _| g.next(h));
        fx.settle();
        assert_eq!(fx.shown(), Some("d"));
        assert_eq!(fx.counter(), Some("4"));

        fx.with(|g, h, _| g.next(h));
        fx.settle();
        assert_eq!(fx.shown(), Some("a"));
        assert_eq!(fx.counter(), Some("1"));

        fx.with(|g, h, _| g.play_recap(h.view));
        fx.with(|g, h, l| g.close(h, l));
        assert!(!fx.gallery.is_open());
        assert!(!fx.lock.is_locked());
        assert_eq!(fx.gallery.recap(), RecapState::Poster);

        let ops = fx.view.media_ops(Hook::GalleryVideo);
        assert_eq!(&ops[ops.len() - 2..], &[MediaOp::Pause, MediaOp::Rewind]);
        assert!(!fx.view.has_class(Hook::VideoPoster, class::HIDDEN));
        assert_eq!(fx.view.style(Hook::GalleryVideo, "display"), Some("none"));
    }

    #[test]
    fn test_next_total_times_is_identity() {
        let mut fx = Fixture::new(&["a", "b", "c", "d", "e"]);
        for start in 0..5 {
            fx.with(|g, h, l| g.open(start, h, l));
            for _ in 0..5 {
                fx.with(|g, h, _| g.next(h));
            }
            assert_eq!(fx.gallery.state().current_index, start);
        }
    }

    #[test]
    fn test_prev_and_next_wrap_at_edges() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.with(|g, h, l| g.open(0, h, l));
        fx.with(|g, h, _| g.prev(h));
        assert_eq!(fx.gallery.state().current_index, 2);
        fx.with(|g, h, _| g.next(h));
        assert_eq!(fx.gallery.state().current_index, 0);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut fx = Fixture::new(&["a", "b"]);
        let err = fx.with(|g, h, _| g.go_to(5, h)).unwrap_err();
        assert_eq!(err, GalleryError::IndexOutOfRange { index: 5, total: 2 });
        assert_eq!(fx.gallery.state().current_index, 0);
    }

    #[test]
    fn test_rejected_go_to_leaves_view_alone() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.with(|g, h, l| g.open(1, h, l));
        fx.settle();

        assert!(fx.with(|g, h, _| g.go_to(3, h)).is_err());
        assert_eq!(fx.gallery.state().current_index, 1);
        assert_eq!(fx.counter(), Some("2"));
        assert_eq!(fx.timers.pending_count(), 0);
        assert!(fx.view.has_class(Hook::GalleryThumb(1), class::ACTIVE));
    }

    #[test]
    fn test_open_wraps_markup_index() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.with(|g, h, l| g.open(4, h, l));
        assert_eq!(fx.gallery.state().current_index, 1);
    }

    #[test]
    fn test_only_latest_swap_applies() {
        let mut fx = Fixture::new(&["a", "b", "c", "d"]);
        fx.with(|g, h, l| g.open(0, h, l));
        fx.with(|g, h, _| g.next(h));
        fx.with(|g, h, _| g.next(h));
        fx.settle();
        assert_eq!(fx.shown(), Some("c"));
        assert_eq!(fx.view.source_changes(Hook::GalleryMainImage), 1);
        assert_eq!(fx.view.style(Hook::GalleryMainImage, "opacity"), Some("1"));
    }

    #[test]
    fn test_thumbnails_follow_index() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.with(|g, h, l| g.open(1, h, l));
        assert!(!fx.view.has_class(Hook::GalleryThumb(0), class::ACTIVE));
        assert!(fx.view.has_class(Hook::GalleryThumb(1), class::ACTIVE));
        fx.with(|g, h, _| g.next(h));
        assert!(!fx.view.has_class(Hook::GalleryThumb(1), class::ACTIVE));
        assert!(fx.view.has_class(Hook::GalleryThumb(2), class::ACTIVE));
    }

    #[test]
    fn test_keys_only_while_open() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.with(|g, h, l| g.handle_key(Key::ArrowRight, h, l));
        assert_eq!(fx.gallery.state().current_index, 0);
        assert!(fx.view.text(Hook::GalleryCounter).is_none());

        fx.with(|g, h, l| g.open(0, h, l));
        fx.with(|g, h, l| g.handle_key(Key::ArrowLeft, h, l));
        assert_eq!(fx.gallery.state().current_index, 2);
        fx.with(|g, h, l| g.handle_key(Key::ArrowRight, h, l));
        assert_eq!(fx.gallery.state().current_index, 0);
        fx.with(|g, h, l| g.handle_key(Key::Escape, h, l));
        assert!(!fx.gallery.is_open());
    }

    #[test]
    fn test_recap_falls_back_to_muted_once() {
        let mut fx = Fixture::new(&["a"]);
        fx.with(|g, h, l| g.open(0, h, l));
        fx.with(|g, h, _| g.play_recap(h.view));
        assert!(fx.view.has_class(Hook::VideoPoster, class::HIDDEN));
        assert_eq!(fx.view.style(Hook::GalleryVideo, "display"), Some("block"));

        fx.gallery.playback_rejected(&mut fx.view);
        fx.gallery.playback_rejected(&mut fx.view);

        let plays = fx
            .view
            .media_ops(Hook::GalleryVideo)
            .iter()
            .filter(|op| **op == MediaOp::Play)
            .count();
        assert_eq!(plays, 2);
        assert!(fx.view.is_muted(Hook::GalleryVideo));
    }

    #[test]
    fn test_rejection_after_reset_is_ignored() {
        let mut fx = Fixture::new(&["a"]);
        fx.with(|g, h, l| g.open(0, h, l));
        fx.with(|g, h, _| g.play_recap(h.view));
        fx.with(|g, h, l| g.close(h, l));
        fx.gallery.playback_rejected(&mut fx.view);
        assert_eq!(
            fx.view.media_ops(Hook::GalleryVideo).last(),
            Some(&MediaOp::Rewind)
        );
    }

    #[test]
    fn test_play_video_button_scrolls_then_plays() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.with(|g, h, l| g.open_for_video(h, l));
        assert!(fx.gallery.is_open());

        assert_eq!(
            fx.timers.pop_due(Duration::from_millis(300)),
            Some(Timer::GallerySwap {
                index: 0,
                generation: 1
            })
        );
        assert_eq!(
            fx.timers.pop_due(Duration::from_millis(300)),
            Some(Timer::GalleryScrollToVideo)
        );
        fx.with(|g, h, _| g.scroll_to_video(h));
        assert_eq!(fx.view.scrolled_into_view(), &[Hook::GalleryVideoSection]);

        assert_eq!(
            fx.timers.pop_due(Duration::from_millis(800)),
            Some(Timer::GalleryAutoplay)
        );
        fx.with(|g, h, _| g.autoplay(h));
        assert!(matches!(fx.gallery.recap(), RecapState::Playing { .. }));
    }

    #[test]
    fn test_empty_catalog_never_opens() {
        let mut fx = Fixture::new(&[]);
        fx.with(|g, h, l| g.open(0, h, l));
        assert!(!fx.gallery.is_open());
        assert!(!fx.lock.is_locked());
    }
}
