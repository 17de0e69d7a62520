//! Global constants for the Le Sayour page runtime

/// CSS class names shared with the stylesheet.
pub mod class {
    /// Body class that blocks background scrolling.
    pub const LOCKED: &str = "locked";
    /// Hides the preloader and the gallery video poster.
    pub const HIDDEN: &str = "hidden";
    /// Marks a revealed scroll-animation element.
    pub const REVEALED: &str = "aos-animate";
    /// Open overlays, the active thumbnail, the active nav link, the open mobile menu.
    pub const ACTIVE: &str = "active";
    /// Header state once the page has scrolled past the hero.
    pub const SCROLLED: &str = "scrolled";
    /// Cursor state while hovering an interactive element.
    pub const HOVER: &str = "hover";
}

/// Session storage key for the one-time popup.
pub const POPUP_SESSION_KEY: &str = "popupShown";

/// Value stored under [`POPUP_SESSION_KEY`] once the popup has been shown.
pub const POPUP_SESSION_VALUE: &str = "true";

/// One frame at 60 Hz.
pub const FRAME_MS: u64 = 16;

/// Interval of the cursor easing loop.
pub const CURSOR_TICK_MS: u64 = FRAME_MS;

/// Margin around the viewport at which lazy videos start playing.
pub const LAZY_VIDEO_ROOT_MARGIN: &str = "100px";

/// Border applied to the newsletter field after a successful signup.
pub const FIELD_BORDER_SUCCESS: &str = "1px solid #27ae60";

/// Border applied to the newsletter field after a rejected address.
pub const FIELD_BORDER_ERROR: &str = "1px solid #c0392b";

/// Default critical assets preloaded before the page unlocks.
pub const DEFAULT_CRITICAL_ASSETS: &[&str] = &[
    "assets/logo.png",
    "assets/Un goût de mer qui fait voyager.jpg",
];

/// Default gallery media, in display order.
pub const DEFAULT_GALLERY_MEDIA: &[&str] = &[
    "assets/events/recent events/prestation de la star ibrahim farhat/event details/ibrahim farhat pose.jpg",
    "assets/events/recent events/prestation de la star ibrahim farhat/event details/galery 1.jpg",
    "assets/events/recent events/prestation de la star ibrahim farhat/event details/galery 2.jpg",
    "assets/events/recent events/prestation de la star ibrahim farhat/event details/galery 3.jpg",
];
