//! Boundary between the page components and the platform.
//!
//! Components never touch the DOM directly. They go through three capability
//! traits: [`View`] for markup, geometry and media, [`Scheduler`] for timers
//! and [`SessionStore`] for session-scoped storage. The browser implements
//! them with `web-sys` (see the `dom` module); tests and the native walkthrough
//! use the in-memory versions from [`crate::sim`].

use std::time::Duration;
use web_time::Instant;

use crate::message::Timer;

/// Markup hook points the runtime talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    /// The document body (carries the page lock class)
    Body,
    /// Preloader container
    Preloader,
    /// Preloader progress bar
    PreloaderBar,
    /// Preloader percentage label
    PreloaderPercent,
    /// Site header
    Header,
    /// Mobile menu toggle button
    NavToggle,
    /// Mobile menu panel
    MobileMenu,
    /// Every nav link (desktop and mobile) pointing at section `i`
    SectionLinks(usize),
    /// Section `i` of the page
    Section(usize),
    /// Scroll-reveal element `i`
    Reveal(usize),
    /// Hero-block reveal element `i`
    Hero(usize),
    /// Gallery modal
    GalleryModal,
    /// Gallery main image
    GalleryMainImage,
    /// Gallery position counter
    GalleryCounter,
    /// Gallery thumbnail `i`
    GalleryThumb(usize),
    /// Section of the gallery holding the recap video
    GalleryVideoSection,
    /// Recap video poster
    VideoPoster,
    /// Recap video
    GalleryVideo,
    /// Promotional popup overlay
    Popup,
    /// Popup video
    PopupVideo,
    /// Newsletter email input
    NewsletterInput,
    /// Wrapper around the newsletter input (carries the border)
    NewsletterField,
    /// Custom cursor dot
    Cursor,
    /// Custom cursor follower ring
    CursorFollower,
    /// Lazily started video `i`
    LazyVideo(usize),
}

/// Indexed families of hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// [`Hook::Section`]
    Section,
    /// [`Hook::Reveal`]
    Reveal,
    /// [`Hook::Hero`]
    Hero,
    /// [`Hook::GalleryThumb`]
    GalleryThumb,
    /// [`Hook::LazyVideo`]
    LazyVideo,
}

/// Vertical extent of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Top edge in pixels
    pub top: f64,
    /// Height in pixels
    pub height: f64,
}

impl Bounds {
    /// Create bounds from a top edge and a height.
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Whether `y` lies within `[top, top + height)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Viewport metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Inner width in pixels
    pub width: f64,
    /// Inner height in pixels
    pub height: f64,
    /// Vertical scroll offset in pixels
    pub scroll_y: f64,
}

/// Flavour of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Green confirmation
    Success,
    /// Red error
    Error,
}

impl ToastKind {
    /// CSS modifier used in `toast-{name}`.
    pub fn name(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// Markup, geometry and media capabilities of the page.
pub trait View {
    /// Whether the hook is present in the page.
    fn exists(&self, hook: Hook) -> bool;

    /// Number of elements in an indexed family.
    fn count(&self, group: Group) -> usize;

    /// Add or remove a class.
    fn set_class(&mut self, hook: Hook, class: &str, enabled: bool);

    /// Whether the element carries a class.
    fn has_class(&self, hook: Hook, class: &str) -> bool;

    /// Set an inline style property. An empty value removes it.
    fn set_style(&mut self, hook: Hook, property: &str, value: &str);

    /// Replace the element's text.
    fn set_text(&mut self, hook: Hook, text: &str);

    /// Point an image or media element at a new source.
    fn set_source(&mut self, hook: Hook, uri: &str);

    /// Current value of an input.
    fn input_value(&self, hook: Hook) -> String;

    /// Replace the value of an input.
    fn set_input_value(&mut self, hook: Hook, value: &str);

    /// Viewport-relative bounds of an element.
    fn bounds(&self, hook: Hook) -> Option<Bounds>;

    /// Document-relative bounds of an element.
    fn offset(&self, hook: Hook) -> Option<Bounds>;

    /// Viewport metrics.
    fn viewport(&self) -> Viewport;

    /// Smooth scroll the window to a document offset.
    fn scroll_to(&mut self, top: f64);

    /// Smooth scroll an element into view.
    fn scroll_into_view(&mut self, hook: Hook);

    /// Start loading an asset. Completion comes back as
    /// [`crate::Message::AssetSettled`] carrying `asset`.
    fn preload(&mut self, asset: usize, uri: &str);

    /// Start media playback. A rejection comes back as
    /// [`crate::Message::PlaybackRejected`].
    fn play(&mut self, hook: Hook);

    /// Pause media playback.
    fn pause(&mut self, hook: Hook);

    /// Rewind media to the start.
    fn rewind(&mut self, hook: Hook);

    /// Mute or unmute media.
    fn set_muted(&mut self, hook: Hook, muted: bool);

    /// Set media volume in `0.0..=1.0`.
    fn set_volume(&mut self, hook: Hook, volume: f64);

    /// Whether viewport visibility can be observed.
    fn supports_visibility(&self) -> bool;

    /// Report [`crate::Message::VideoVisible`] when a lazy video nears the viewport.
    fn observe_visibility(&mut self, hook: Hook);

    /// Stop observing an element.
    fn unobserve_visibility(&mut self, hook: Hook);

    /// Create the toast, replacing any existing one. It starts off-screen.
    fn create_toast(&mut self, kind: ToastKind, text: &str);

    /// Slide the toast on or off screen.
    fn slide_toast(&mut self, visible: bool);

    /// Remove the toast from the page.
    fn remove_toast(&mut self);
}

/// Deferred work. Expired timers come back as [`crate::Message::Timer`].
pub trait Scheduler {
    /// Current time.
    fn now(&self) -> Instant;

    /// Deliver `timer` after `delay`.
    fn schedule(&mut self, delay: Duration, timer: Timer);
}

/// Errors from session storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or missing
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the key failed (quota, privacy mode)
    #[error("Failed to write '{key}': {message}")]
    WriteFailed {
        /// Key being written
        key: String,
        /// Platform error description
        message: String,
    },
}

/// Key-value storage scoped to the browsing session.
pub trait SessionStore {
    /// Read a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Platform capabilities handed to components for one update.
pub struct Host<'a> {
    /// Page markup
    pub view: &'a mut dyn View,
    /// Timers
    pub timers: &'a mut dyn Scheduler,
    /// Session storage
    pub session: &'a mut dyn SessionStore,
}

impl<'a> Host<'a> {
    /// Bundle the capabilities.
    pub fn new(
        view: &'a mut dyn View,
        timers: &'a mut dyn Scheduler,
        session: &'a mut dyn SessionStore,
    ) -> Self {
        Self {
            view,
            timers,
            session,
        }
    }

    /// Schedule a timer.
    pub fn after(&mut self, delay: Duration, timer: Timer) {
        self.timers.schedule(delay, timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_is_half_open() {
        let bounds = Bounds::new(100.0, 50.0);
        assert!(bounds.contains(100.0));
        assert!(bounds.contains(149.9));
        assert!(!bounds.contains(150.0));
        assert!(!bounds.contains(99.0));
    }

    #[test]
    fn test_toast_kind_names() {
        assert_eq!(ToastKind::Success.name(), "success");
        assert_eq!(ToastKind::Error.name(), "error");
    }
}
