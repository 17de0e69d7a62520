//! Videos that start only once they approach the viewport.

use crate::host::{Group, Hook, View};

/// Lazily started videos.
#[derive(Debug, Default)]
pub struct LazyMedia {
    started: Vec<bool>,
}

impl LazyMedia {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause every lazy video and start watching for it.
    ///
    /// Without visibility observation the videos are left to their markup.
    pub fn init(&mut self, view: &mut dyn View) {
        if !view.supports_visibility() {
            log::debug!("Visibility observation unsupported, lazy videos left as is");
            return;
        }

        let count = view.count(Group::LazyVideo);
        self.started = vec![false; count];
        for index in 0..count {
            let hook = Hook::LazyVideo(index);
            view.pause(hook);
            view.observe_visibility(hook);
        }
    }

    /// Video `index` neared the viewport: play it once.
    pub fn on_visible(&mut self, index: usize, view: &mut dyn View) {
        let Some(started) = self.started.get_mut(index) else {
            return;
        };
        if *started {
            return;
        }
        *started = true;

        let hook = Hook::LazyVideo(index);
        view.play(hook);
        view.unobserve_visibility(hook);
        log::trace!("Lazy video {} started", index);
    }

    /// Whether video `index` has been started.
    pub fn is_started(&self, index: usize) -> bool {
        self.started.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MediaOp, RecordingView};

    #[test]
    fn test_videos_play_once_when_visible() {
        let mut view = RecordingView::new().with_group(Group::LazyVideo, 2);
        let mut lazy = LazyMedia::new();
        lazy.init(&mut view);

        assert_eq!(view.media_ops(Hook::LazyVideo(0)), &[MediaOp::Pause]);
        assert!(view.is_observed(Hook::LazyVideo(1)));

        lazy.on_visible(1, &mut view);
        lazy.on_visible(1, &mut view);
        lazy.on_visible(9, &mut view);

        assert!(lazy.is_started(1));
        assert!(!lazy.is_started(0));
        assert_eq!(
            view.media_ops(Hook::LazyVideo(1)),
            &[MediaOp::Pause, MediaOp::Play]
        );
        assert!(!view.is_observed(Hook::LazyVideo(1)));
        assert!(view.is_observed(Hook::LazyVideo(0)));
    }

    #[test]
    fn test_unsupported_platform_leaves_videos() {
        let mut view = RecordingView::new()
            .with_group(Group::LazyVideo, 1)
            .without_visibility();
        let mut lazy = LazyMedia::new();
        lazy.init(&mut view);
        lazy.on_visible(0, &mut view);

        assert!(view.media_ops(Hook::LazyVideo(0)).is_empty());
    }
}
