//! DOM event listeners. Each one translates an event into a [`Message`].

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent,
    MouseEvent, Window,
};

use super::DomError;
use crate::message::{Control, Key, Message};
use crate::wasm::dispatch;

fn listen(
    target: &EventTarget,
    kind: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), DomError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| DomError::js("addEventListener", e))?;
    closure.forget(); // Listeners live as long as the page
    Ok(())
}

fn elements(document: &Document, selector: &str) -> Result<Vec<Element>, DomError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| DomError::js("querySelectorAll", e))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Click on every match of `selector` sends `control`.
fn on_click(
    document: &Document,
    selector: &str,
    prevent_default: bool,
    control: Control,
) -> Result<(), DomError> {
    for element in elements(document, selector)? {
        listen(&element, "click", false, move |event| {
            if prevent_default {
                event.prevent_default();
            }
            dispatch(Message::Click(control));
        })?;
    }
    Ok(())
}

/// Attach every listener the page reacts to.
pub fn wire(window: &Window, document: &Document) -> Result<(), DomError> {
    listen(window, "scroll", true, |_| dispatch(Message::Scroll))?;
    listen(window, "resize", true, |_| dispatch(Message::Resize))?;

    listen(document, "keydown", false, |event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            dispatch(Message::Key(Key::from_name(&event.key())));
        }
    })?;
    listen(document, "mousemove", true, |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            dispatch(Message::PointerMoved {
                x: event.client_x() as f64,
                y: event.client_y() as f64,
            });
        }
    })?;
    for element in elements(document, "a, button, .btn, input, .gallery-item")? {
        listen(&element, "mouseenter", true, |_| {
            dispatch(Message::PointerHover(true))
        })?;
        listen(&element, "mouseleave", true, |_| {
            dispatch(Message::PointerHover(false))
        })?;
    }

    wire_navigation(document)?;
    wire_gallery(document)?;
    wire_popup(document)?;

    if let Some(form) = document.get_element_by_id("newsletter-form") {
        listen(&form, "submit", false, |event| {
            event.prevent_default();
            dispatch(Message::Submit);
        })?;
    }

    log::debug!("Event listeners attached");
    Ok(())
}

fn wire_navigation(document: &Document) -> Result<(), DomError> {
    on_click(document, "#nav-toggle", false, Control::NavToggle)?;
    on_click(document, ".mobile-nav-link", false, Control::MobileNavLink)?;

    for anchor in elements(document, "a[href^=\"#\"]")? {
        let document = document.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        listen(&anchor, "click", false, move |event| {
            // Bare "#" is not a valid selector
            let Ok(Some(target)) = document.query_selector(&href) else {
                return;
            };
            let Some(target) = target.dyn_ref::<HtmlElement>() else {
                return;
            };
            event.prevent_default();
            dispatch(Message::Click(Control::Anchor {
                target_top: target.offset_top() as f64,
            }));
        })?;
    }
    Ok(())
}

fn wire_gallery(document: &Document) -> Result<(), DomError> {
    on_click(document, "#open-gallery", true, Control::OpenGallery)?;
    on_click(document, "#open-gallery-btn", true, Control::OpenGalleryButton)?;
    on_click(document, "#play-video-btn", true, Control::PlayVideoButton)?;
    on_click(document, "#close-gallery", false, Control::CloseGallery)?;
    on_click(
        document,
        "#gallery-modal .gallery-modal-backdrop",
        false,
        Control::GalleryBackdrop,
    )?;
    on_click(document, "#gallery-prev", false, Control::GalleryPrev)?;
    on_click(document, "#gallery-next", false, Control::GalleryNext)?;
    on_click(document, "#video-poster", false, Control::PlayRecap)?;

    for item in elements(document, ".gallery-preview-item")? {
        let index = item
            .get_attribute("data-index")
            .and_then(|value| value.trim().parse::<usize>().ok());
        let Some(index) = index else {
            log::warn!("Gallery preview item without a usable data-index");
            continue;
        };
        listen(&item, "click", false, move |_| {
            dispatch(Message::Click(Control::PreviewItem(index)))
        })?;
    }

    for (index, thumb) in elements(document, ".gallery-thumb")?.iter().enumerate() {
        listen(thumb, "click", false, move |_| {
            dispatch(Message::Click(Control::GalleryThumb(index)))
        })?;
    }

    if let Some(button) = document.get_element_by_id("play-recap-btn") {
        listen(&button, "click", false, |event| {
            // The poster underneath would start playback a second time
            event.stop_propagation();
            dispatch(Message::Click(Control::PlayRecap));
        })?;
    }
    Ok(())
}

fn wire_popup(document: &Document) -> Result<(), DomError> {
    on_click(document, "#popup-close", false, Control::PopupClose)?;
    on_click(document, "#popup-cta", false, Control::PopupCta)?;

    if let Some(popup) = document.get_element_by_id("popup") {
        let overlay = popup.clone();
        listen(&popup, "click", false, move |event| {
            let on_overlay = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|target| target == overlay);
            if on_overlay {
                dispatch(Message::Click(Control::PopupOverlay));
            }
        })?;
    }
    Ok(())
}
