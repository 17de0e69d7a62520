use std::cell::RefCell;
use std::collections::VecDeque;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::SiteConfig;
use crate::dom::{self, BrowserScheduler, BrowserSession, DomError, DomView};
use crate::host::Host;
use crate::message::Message;
use crate::page::Page;

/// The running page with its browser platform.
struct App {
    page: Page,
    view: DomView,
    timers: BrowserScheduler,
    session: BrowserSession,
}

impl App {
    fn update(&mut self, message: Message) {
        let mut host = Host::new(&mut self.view, &mut self.timers, &mut self.session);
        self.page.update(message, &mut host);
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static QUEUE: RefCell<VecDeque<Message>> = const { RefCell::new(VecDeque::new()) };
}

/// Deliver a message to the page.
///
/// Messages raised while the page is already handling one are queued and
/// handled by the outer call, in order.
pub(crate) fn dispatch(message: Message) {
    QUEUE.with(|queue| queue.borrow_mut().push_back(message));
    drain();
}

fn drain() {
    APP.with(|app| {
        let Ok(mut app) = app.try_borrow_mut() else {
            return;
        };
        let Some(app) = app.as_mut() else {
            return;
        };
        while let Some(message) = QUEUE.with(|queue| queue.borrow_mut().pop_front()) {
            app.update(message);
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = schedule_boot() {
        web_sys::console::error_1(&format!("Failed to start page: {}", e).into());
    }
}

/// Boot now if the document is parsed, otherwise on `DOMContentLoaded`.
fn schedule_boot() -> Result<(), DomError> {
    let document = dom::document()?;
    let loading = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .is_some_and(|state| state == "loading");

    if !loading {
        return boot();
    }

    let on_ready = Closure::once_into_js(|| {
        if let Err(e) = boot() {
            log::error!("Failed to start page: {}", e);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(|e| DomError::js("addEventListener", e))
}

fn boot() -> Result<(), DomError> {
    let window = dom::window()?;
    let document = dom::document()?;

    // The inline config block is only guaranteed to exist once parsing is done
    let config = SiteConfig::load_from_page(&document);
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger init failed: {}", e).into());
    }

    let mut app = App {
        page: Page::new(&config),
        view: DomView::new(window.clone(), document.clone())?,
        timers: BrowserScheduler::new(window.clone()),
        session: BrowserSession::new(window.clone()),
    };
    {
        let mut host = Host::new(&mut app.view, &mut app.timers, &mut app.session);
        app.page.init(&mut host);
    }
    APP.with(|slot| *slot.borrow_mut() = Some(app));

    dom::wire(&window, &document)?;

    // Anything raised during init
    drain();
    Ok(())
}
