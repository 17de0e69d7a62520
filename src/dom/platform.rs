use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;
use web_time::Instant;

use crate::host::{Scheduler, SessionStore, StorageError};
use crate::message::{Message, Timer};
use crate::wasm::dispatch;

/// Timers on `setTimeout`. Each expiry is dispatched as a [`Message::Timer`].
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        let callback = Closure::once_into_js(move || dispatch(Message::Timer(timer)));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            log::warn!("Failed to schedule {:?}: {:?}", timer, e);
        }
    }
}

/// `sessionStorage`, which may be missing or refuse writes.
pub struct BrowserSession {
    window: Window,
}

impl BrowserSession {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        match self.window.session_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StorageError::Unavailable("no sessionStorage".to_string())),
            Err(e) => Err(StorageError::Unavailable(format!("{:?}", e))),
        }
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}
