//! Sayour - interactive layer of the Le Sayour restaurant site
//!
//! Loading screen, scroll reveals, navigation, media gallery, session popup,
//! newsletter form and custom cursor, written against small platform traits so
//! the same logic runs in the browser (wasm) and natively under test.

pub mod config;
pub mod constants;
pub mod cursor;
pub mod gallery;
pub mod host;
pub mod lazy_media;
pub mod media;
pub mod message;
pub mod navigation;
pub mod newsletter;
pub mod page;
pub mod page_lock;
pub mod popup;
pub mod preloader;
pub mod reveal;
pub mod sim;
pub mod throttle;
pub mod toast;

pub use config::{ConfigError, LogLevel, SiteConfig, Timings};
pub use host::{Hook, Host, Scheduler, SessionStore, View};
pub use message::{Control, Key, Message, Timer};
pub use page::Page;

// Browser adapter and entry point
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
