//! Browser implementations of the platform traits.

mod events;
mod platform;
mod view;

pub use events::wire;
pub use platform::{BrowserScheduler, BrowserSession};
pub use view::DomView;

use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

/// Errors from the browser boundary.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("No global window")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("{context}: {message}")]
    Js { context: &'static str, message: String },
}

impl DomError {
    pub fn js(context: &'static str, err: JsValue) -> Self {
        DomError::Js {
            context,
            message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
        }
    }
}

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::NoDocument)
}
