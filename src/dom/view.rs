use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlMediaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior,
    ScrollIntoViewOptions, ScrollToOptions, Window,
};

use super::DomError;
use crate::constants::LAZY_VIDEO_ROOT_MARGIN;
use crate::host::{Bounds, Group, Hook, ToastKind, View, Viewport};
use crate::message::Message;
use crate::wasm::dispatch;

const TOAST_STYLE: &str = "position: fixed; bottom: 30px; left: 50%; \
    transform: translateX(-50%) translateY(100px); padding: 16px 32px; color: white; \
    font-size: 0.875rem; font-weight: 500; z-index: 9999; \
    transition: transform 0.4s cubic-bezier(0.19, 1, 0.22, 1);";
const TOAST_SHOWN: &str = "translateX(-50%) translateY(0)";
const TOAST_HIDDEN: &str = "translateX(-50%) translateY(100px)";

fn toast_background(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "#27ae60",
        ToastKind::Error => "#c0392b",
    }
}

/// [`View`] over the live document. Hook points are resolved once at boot.
pub struct DomView {
    window: Window,
    document: Document,
    elements: HashMap<Hook, Vec<HtmlElement>>,
    groups: HashMap<Group, usize>,
    toast: Option<HtmlElement>,
    observer: Option<IntersectionObserver>,
    /// Closure stored to prevent deallocation
    _on_visible: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

fn select_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, DomError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| DomError::js("querySelectorAll", e))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn select(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, DomError> {
    Ok(document
        .query_selector(selector)
        .map_err(|e| DomError::js("querySelector", e))?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .into_iter()
        .collect())
}

impl DomView {
    pub fn new(window: Window, document: Document) -> Result<Self, DomError> {
        let mut view = Self {
            window,
            document,
            elements: HashMap::new(),
            groups: HashMap::new(),
            toast: None,
            observer: None,
            _on_visible: None,
        };
        view.resolve()?;
        view.create_observer();
        Ok(view)
    }

    fn resolve(&mut self) -> Result<(), DomError> {
        let singles = [
            (Hook::Preloader, "#preloader"),
            (Hook::PreloaderBar, ".preloader-bar"),
            (Hook::PreloaderPercent, ".preloader-percent"),
            (Hook::Header, "#header"),
            (Hook::NavToggle, "#nav-toggle"),
            (Hook::MobileMenu, "#mobile-menu"),
            (Hook::GalleryModal, "#gallery-modal"),
            (Hook::GalleryMainImage, "#gallery-main-img"),
            (Hook::GalleryCounter, "#gallery-current"),
            (Hook::GalleryVideoSection, ".gallery-video-section"),
            (Hook::VideoPoster, "#video-poster"),
            (Hook::GalleryVideo, "#gallery-video"),
            (Hook::Popup, "#popup"),
            (Hook::PopupVideo, "#popup-video"),
            (Hook::NewsletterInput, "#newsletter-form input[type=\"email\"]"),
            (Hook::Cursor, ".cursor"),
            (Hook::CursorFollower, ".cursor-follower"),
        ];
        for (hook, selector) in singles {
            self.insert(hook, select(&self.document, selector)?);
        }

        if let Some(body) = self.document.body() {
            self.insert(Hook::Body, vec![body]);
        }

        let field = self
            .first(Hook::NewsletterInput)
            .and_then(|input| input.parent_element())
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok());
        self.insert(Hook::NewsletterField, field.into_iter().collect());

        let sections = select_all(&self.document, "section[id]")?;
        for (index, section) in sections.iter().enumerate() {
            let id = section.id();
            let links = select_all(
                &self.document,
                &format!(".nav-link[href=\"#{id}\"], .mobile-nav-link[href=\"#{id}\"]"),
            )?;
            self.insert(Hook::SectionLinks(index), links);
        }
        self.insert_group(Group::Section, sections);

        let groups = [
            (Group::Reveal, "[data-aos]"),
            (Group::Hero, ".hero-content [data-aos]"),
            (Group::GalleryThumb, ".gallery-thumb"),
            (Group::LazyVideo, "video[data-lazy]"),
        ];
        for (group, selector) in groups {
            let members = select_all(&self.document, selector)?;
            self.insert_group(group, members);
        }

        log::debug!("Resolved {} hook points", self.elements.len());
        Ok(())
    }

    fn insert(&mut self, hook: Hook, elements: Vec<HtmlElement>) {
        if !elements.is_empty() {
            self.elements.insert(hook, elements);
        }
    }

    fn insert_group(&mut self, group: Group, members: Vec<HtmlElement>) {
        self.groups.insert(group, members.len());
        for (index, element) in members.into_iter().enumerate() {
            self.insert(member(group, index), vec![element]);
        }
    }

    fn create_observer(&mut self) {
        let supported =
            js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver"))
                .unwrap_or(false);
        if !supported {
            return;
        }

        let videos: Vec<Element> = (0..self.count(Group::LazyVideo))
            .filter_map(|i| self.first(Hook::LazyVideo(i)))
            .map(|el| el.unchecked_into::<Element>())
            .collect();

        let on_visible = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(index) = videos.iter().position(|video| *video == target) {
                    dispatch(Message::VideoVisible(index));
                }
            }
        }) as Box<dyn FnMut(js_sys::Array)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(LAZY_VIDEO_ROOT_MARGIN);
        match IntersectionObserver::new_with_options(on_visible.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                self.observer = Some(observer);
                self._on_visible = Some(on_visible);
            }
            Err(e) => log::warn!("IntersectionObserver unavailable: {:?}", e),
        }
    }

    fn each(&self, hook: Hook) -> impl Iterator<Item = &HtmlElement> {
        self.elements.get(&hook).into_iter().flatten()
    }

    fn first(&self, hook: Hook) -> Option<&HtmlElement> {
        self.elements.get(&hook)?.first()
    }

    fn media(&self, hook: Hook) -> Option<&HtmlMediaElement> {
        self.first(hook)?.dyn_ref::<HtmlMediaElement>()
    }
}

fn member(group: Group, index: usize) -> Hook {
    match group {
        Group::Section => Hook::Section(index),
        Group::Reveal => Hook::Reveal(index),
        Group::Hero => Hook::Hero(index),
        Group::GalleryThumb => Hook::GalleryThumb(index),
        Group::LazyVideo => Hook::LazyVideo(index),
    }
}

impl View for DomView {
    fn exists(&self, hook: Hook) -> bool {
        self.elements.contains_key(&hook)
    }

    fn count(&self, group: Group) -> usize {
        self.groups.get(&group).copied().unwrap_or(0)
    }

    fn set_class(&mut self, hook: Hook, class: &str, enabled: bool) {
        for element in self.each(hook) {
            if let Err(e) = element.class_list().toggle_with_force(class, enabled) {
                log::warn!("Failed to toggle '{}' on {:?}: {:?}", class, hook, e);
            }
        }
    }

    fn has_class(&self, hook: Hook, class: &str) -> bool {
        self.first(hook)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_style(&mut self, hook: Hook, property: &str, value: &str) {
        for element in self.each(hook) {
            let style = element.style();
            let result = if value.is_empty() {
                style.remove_property(property).map(|_| ())
            } else {
                style.set_property(property, value)
            };
            if let Err(e) = result {
                log::warn!("Failed to set {} on {:?}: {:?}", property, hook, e);
            }
        }
    }

    fn set_text(&mut self, hook: Hook, text: &str) {
        for element in self.each(hook) {
            element.set_text_content(Some(text));
        }
    }

    fn set_source(&mut self, hook: Hook, uri: &str) {
        for element in self.each(hook) {
            match element.dyn_ref::<HtmlImageElement>() {
                Some(image) => image.set_src(uri),
                None => {
                    if let Err(e) = element.set_attribute("src", uri) {
                        log::warn!("Failed to set source on {:?}: {:?}", hook, e);
                    }
                }
            }
        }
    }

    fn input_value(&self, hook: Hook) -> String {
        self.first(hook)
            .and_then(|el| el.dyn_ref::<HtmlInputElement>())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, hook: Hook, value: &str) {
        if let Some(input) = self
            .first(hook)
            .and_then(|el| el.dyn_ref::<HtmlInputElement>())
        {
            input.set_value(value);
        }
    }

    fn bounds(&self, hook: Hook) -> Option<Bounds> {
        let rect = self.first(hook)?.get_bounding_client_rect();
        Some(Bounds::new(rect.top(), rect.height()))
    }

    fn offset(&self, hook: Hook) -> Option<Bounds> {
        let element = self.first(hook)?;
        Some(Bounds::new(
            element.offset_top() as f64,
            element.offset_height() as f64,
        ))
    }

    fn viewport(&self) -> Viewport {
        let metric = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport {
            width: metric(self.window.inner_width()),
            height: metric(self.window.inner_height()),
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
        }
    }

    fn scroll_to(&mut self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_into_view(&mut self, hook: Hook) {
        if let Some(element) = self.first(hook) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn preload(&mut self, asset: usize, uri: &str) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Cannot preload {}: {:?}", uri, e);
                dispatch(Message::AssetSettled {
                    asset,
                    loaded: false,
                });
                return;
            }
        };

        let onload = Closure::once_into_js(move || {
            dispatch(Message::AssetSettled {
                asset,
                loaded: true,
            })
        });
        let onerror = Closure::once_into_js(move || {
            dispatch(Message::AssetSettled {
                asset,
                loaded: false,
            })
        });
        image.set_onload(Some(onload.unchecked_ref()));
        image.set_onerror(Some(onerror.unchecked_ref()));
        image.set_src(uri);
    }

    fn play(&mut self, hook: Hook) {
        let Some(media) = self.media(hook) else {
            return;
        };
        match media.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if JsFuture::from(promise).await.is_err() {
                    dispatch(Message::PlaybackRejected(hook));
                }
            }),
            Err(_) => dispatch(Message::PlaybackRejected(hook)),
        }
    }

    fn pause(&mut self, hook: Hook) {
        if let Some(Err(e)) = self.media(hook).map(|media| media.pause()) {
            log::debug!("Pause failed on {:?}: {:?}", hook, e);
        }
    }

    fn rewind(&mut self, hook: Hook) {
        if let Some(media) = self.media(hook) {
            media.set_current_time(0.0);
        }
    }

    fn set_muted(&mut self, hook: Hook, muted: bool) {
        if let Some(media) = self.media(hook) {
            media.set_muted(muted);
        }
    }

    fn set_volume(&mut self, hook: Hook, volume: f64) {
        if let Some(media) = self.media(hook) {
            media.set_volume(volume);
        }
    }

    fn supports_visibility(&self) -> bool {
        self.observer.is_some()
    }

    fn observe_visibility(&mut self, hook: Hook) {
        if let (Some(observer), Some(element)) = (&self.observer, self.first(hook)) {
            observer.observe(element);
        }
    }

    fn unobserve_visibility(&mut self, hook: Hook) {
        if let (Some(observer), Some(element)) = (&self.observer, self.first(hook)) {
            observer.unobserve(element);
        }
    }

    fn create_toast(&mut self, kind: ToastKind, text: &str) {
        self.remove_toast();

        let toast = match self
            .document
            .create_element("div")
            .map(|el| el.unchecked_into::<HtmlElement>())
        {
            Ok(toast) => toast,
            Err(e) => {
                log::warn!("Failed to create toast: {:?}", e);
                return;
            }
        };
        toast.set_class_name(&format!("toast toast-{}", kind.name()));
        toast.set_text_content(Some(text));
        if let Err(e) = toast.set_attribute("style", TOAST_STYLE) {
            log::warn!("Failed to style toast: {:?}", e);
        }
        if let Err(e) = toast
            .style()
            .set_property("background", toast_background(kind))
        {
            log::warn!("Failed to color toast: {:?}", e);
        }

        if let Some(body) = self.document.body() {
            if let Err(e) = body.append_child(&toast) {
                log::warn!("Failed to attach toast: {:?}", e);
                return;
            }
        }
        self.toast = Some(toast);
    }

    fn slide_toast(&mut self, visible: bool) {
        if let Some(toast) = &self.toast {
            let transform = if visible { TOAST_SHOWN } else { TOAST_HIDDEN };
            if let Err(e) = toast.style().set_property("transform", transform) {
                log::warn!("Failed to move toast: {:?}", e);
            }
        }
    }

    fn remove_toast(&mut self) {
        if let Some(toast) = self.toast.take() {
            toast.remove();
        }
    }
}
