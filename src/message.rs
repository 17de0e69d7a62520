//! Page message types.
//!
//! Every DOM event, timer expiry and platform callback reaches the page as a
//! message, in the Elm architecture style.

use crate::host::Hook;

/// Keys the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Escape
    Escape,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Anything else
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Clickable controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    // Gallery
    /// Gallery thumbnail opener in the events section
    OpenGallery,
    /// "See the gallery" button
    OpenGalleryButton,
    /// "Play the video" button: opens the gallery and starts the recap
    PlayVideoButton,
    /// Preview item carrying a `data-index`
    PreviewItem(usize),
    /// Gallery close button
    CloseGallery,
    /// Gallery backdrop
    GalleryBackdrop,
    /// Previous image
    GalleryPrev,
    /// Next image
    GalleryNext,
    /// Thumbnail inside the modal
    GalleryThumb(usize),
    /// Recap video poster or its play button
    PlayRecap,

    // Popup
    /// Popup close button
    PopupClose,
    /// Popup call-to-action
    PopupCta,
    /// Bare overlay around the popup content
    PopupOverlay,

    // Navigation
    /// Mobile menu toggle
    NavToggle,
    /// Link inside the mobile menu
    MobileNavLink,
    /// In-page anchor whose target sits at `target_top` in the document
    Anchor {
        /// Document offset of the anchor target
        target_top: f64,
    },
}

/// Deferred work scheduled by components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Preloader gave up waiting for assets
    PreloadFallback,
    /// Preloader fade-out finished
    PreloadFinished,
    /// First reveal pass after unlock
    InitialReveal,
    /// Trailing reveal pass of a throttled burst
    RevealTrailing,
    /// Hero element `i` reveals
    HeroStep(usize),
    /// Gallery fade reached its midpoint, swap to image `index`
    GallerySwap {
        /// Image to show
        index: usize,
        /// Swap generation; older swaps are dropped
        generation: u64,
    },
    /// Scroll the gallery video section into view
    GalleryScrollToVideo,
    /// Start the recap video after the scroll
    GalleryAutoplay,
    /// First-scroll delay elapsed, show the popup
    PopupOpen,
    /// Popup visible, start its video
    PopupPlay,
    /// Reset the newsletter field styling
    FieldReset {
        /// Reset generation; older resets are dropped
        generation: u64,
        /// Also clear the input
        clear_input: bool,
    },
    /// Slide toast `id` in
    ToastEnter(u64),
    /// Slide toast `id` out
    ToastLeave(u64),
    /// Remove toast `id`
    ToastRemove(u64),
    /// Cursor easing frame of run `run`
    CursorTick(u64),
}

/// Messages that update page state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// Window scrolled
    Scroll,
    /// Window resized
    Resize,
    /// Key pressed
    Key(Key),
    /// Control clicked
    Click(Control),
    /// Newsletter form submitted
    Submit,
    /// Pointer moved to client coordinates
    PointerMoved {
        /// Client x
        x: f64,
        /// Client y
        y: f64,
    },
    /// Pointer entered (true) or left (false) an interactive element
    PointerHover(bool),
    /// A preloaded asset finished, successfully or not
    AssetSettled {
        /// Index in the critical asset list
        asset: usize,
        /// Whether it loaded
        loaded: bool,
    },
    /// The platform refused to start playback
    PlaybackRejected(Hook),
    /// Lazy video `i` neared the viewport
    VideoVisible(usize),
    /// A scheduled timer expired
    Timer(Timer),
}
