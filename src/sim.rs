//! In-memory platform used by the tests and the native walkthrough.
//!
//! [`RecordingView`] keeps the markup state the components write and records
//! media calls. [`ManualScheduler`] holds timers until they are popped, with a
//! virtual clock. [`Harness`] wires both to a [`Page`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;
use web_time::Instant;

use crate::config::SiteConfig;
use crate::host::{
    Bounds, Group, Hook, Host, Scheduler, SessionStore, StorageError, ToastKind, View, Viewport,
};
use crate::message::{Message, Timer};
use crate::page::Page;

/// Playback call recorded on a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOp {
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `currentTime = 0`
    Rewind,
}

/// The toast currently in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastRecord {
    pub kind: ToastKind,
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Default)]
struct Element {
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    source: Option<String>,
    source_changes: usize,
    value: String,
    bounds: Option<Bounds>,
    offset: Option<Bounds>,
    media: Vec<MediaOp>,
    muted: bool,
    volume: Option<f64>,
    observed: bool,
}

/// Markup double that records what the page does to it.
#[derive(Debug)]
pub struct RecordingView {
    elements: HashMap<Hook, Element>,
    groups: HashMap<Group, usize>,
    class_changes: HashMap<(Hook, String), usize>,
    viewport: Viewport,
    visibility_supported: bool,
    preloads: Vec<(usize, String)>,
    scrolled_to: Vec<f64>,
    scrolled_into_view: Vec<Hook>,
    toast: Option<ToastRecord>,
    toasts_created: usize,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingView {
    /// A page with only a body, in a 1280x800 viewport.
    pub fn new() -> Self {
        let mut view = Self {
            elements: HashMap::new(),
            groups: HashMap::new(),
            class_changes: HashMap::new(),
            viewport: Viewport {
                width: 1280.0,
                height: 800.0,
                scroll_y: 0.0,
            },
            visibility_supported: true,
            preloads: Vec::new(),
            scrolled_to: Vec::new(),
            scrolled_into_view: Vec::new(),
            toast: None,
            toasts_created: 0,
        };
        view.insert(Hook::Body);
        view
    }

    /// Add an element.
    pub fn with(mut self, hook: Hook) -> Self {
        self.insert(hook);
        self
    }

    /// Add `count` members of `group`.
    pub fn with_group(mut self, group: Group, count: usize) -> Self {
        self.groups.insert(group, count);
        for index in 0..count {
            self.insert(member(group, index));
        }
        self
    }

    /// Resize the viewport.
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.set_viewport(width, height);
        self
    }

    /// Pretend the platform cannot observe visibility.
    pub fn without_visibility(mut self) -> Self {
        self.visibility_supported = false;
        self
    }

    /// Add an element in place.
    pub fn insert(&mut self, hook: Hook) {
        self.elements.entry(hook).or_default();
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    /// Viewport-relative bounds of `hook`.
    pub fn set_bounds(&mut self, hook: Hook, bounds: Bounds) {
        if let Some(element) = self.elements.get_mut(&hook) {
            element.bounds = Some(bounds);
        }
    }

    /// Document-relative bounds of `hook`.
    pub fn set_offset(&mut self, hook: Hook, bounds: Bounds) {
        if let Some(element) = self.elements.get_mut(&hook) {
            element.offset = Some(bounds);
        }
    }

    pub fn text(&self, hook: Hook) -> Option<&str> {
        self.elements.get(&hook)?.text.as_deref()
    }

    pub fn style(&self, hook: Hook, property: &str) -> Option<&str> {
        self.elements
            .get(&hook)?
            .styles
            .get(property)
            .map(String::as_str)
    }

    pub fn source(&self, hook: Hook) -> Option<&str> {
        self.elements.get(&hook)?.source.as_deref()
    }

    pub fn source_changes(&self, hook: Hook) -> usize {
        self.elements.get(&hook).map_or(0, |e| e.source_changes)
    }

    /// Number of `set_class` calls for `class` on `hook`, either direction.
    pub fn class_changes(&self, hook: Hook, class: &str) -> usize {
        self.class_changes
            .get(&(hook, class.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn preloads(&self) -> &[(usize, String)] {
        &self.preloads
    }

    pub fn media_ops(&self, hook: Hook) -> &[MediaOp] {
        self.elements
            .get(&hook)
            .map_or(&[][..], |e| e.media.as_slice())
    }

    pub fn is_muted(&self, hook: Hook) -> bool {
        self.elements.get(&hook).is_some_and(|e| e.muted)
    }

    pub fn volume(&self, hook: Hook) -> Option<f64> {
        self.elements.get(&hook)?.volume
    }

    pub fn is_observed(&self, hook: Hook) -> bool {
        self.elements.get(&hook).is_some_and(|e| e.observed)
    }

    pub fn scrolled_to(&self) -> &[f64] {
        &self.scrolled_to
    }

    pub fn scrolled_into_view(&self) -> &[Hook] {
        &self.scrolled_into_view
    }

    pub fn toast(&self) -> Option<&ToastRecord> {
        self.toast.as_ref()
    }

    pub fn toasts_created(&self) -> usize {
        self.toasts_created
    }

    fn element_mut(&mut self, hook: Hook) -> Option<&mut Element> {
        self.elements.get_mut(&hook)
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

impl View for RecordingView {
    fn exists(&self, hook: Hook) -> bool {
        self.elements.contains_key(&hook)
    }

    fn count(&self, group: Group) -> usize {
        self.groups.get(&group).copied().unwrap_or(0)
    }

    fn set_class(&mut self, hook: Hook, class: &str, enabled: bool) {
        let Some(element) = self.elements.get_mut(&hook) else {
            return;
        };
        if enabled {
            element.classes.insert(class.to_string());
        } else {
            element.classes.remove(class);
        }
        *self
            .class_changes
            .entry((hook, class.to_string()))
            .or_default() += 1;
    }

    fn has_class(&self, hook: Hook, class: &str) -> bool {
        self.elements
            .get(&hook)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn set_style(&mut self, hook: Hook, property: &str, value: &str) {
        if let Some(element) = self.element_mut(hook) {
            if value.is_empty() {
                element.styles.remove(property);
            } else {
                element.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn set_text(&mut self, hook: Hook, text: &str) {
        if let Some(element) = self.element_mut(hook) {
            element.text = Some(text.to_string());
        }
    }

    fn set_source(&mut self, hook: Hook, uri: &str) {
        if let Some(element) = self.element_mut(hook) {
            element.source = Some(uri.to_string());
            element.source_changes += 1;
        }
    }

    fn input_value(&self, hook: Hook) -> String {
        self.elements
            .get(&hook)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, hook: Hook, value: &str) {
        if let Some(element) = self.element_mut(hook) {
            element.value = value.to_string();
        }
    }

    fn bounds(&self, hook: Hook) -> Option<Bounds> {
        self.elements.get(&hook)?.bounds
    }

    fn offset(&self, hook: Hook) -> Option<Bounds> {
        self.elements.get(&hook)?.offset
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, top: f64) {
        self.scrolled_to.push(top);
        self.viewport.scroll_y = top.max(0.0);
    }

    fn scroll_into_view(&mut self, hook: Hook) {
        if self.exists(hook) {
            self.scrolled_into_view.push(hook);
        }
    }

    fn preload(&mut self, asset: usize, uri: &str) {
        self.preloads.push((asset, uri.to_string()));
    }

    fn play(&mut self, hook: Hook) {
        if let Some(element) = self.element_mut(hook) {
            element.media.push(MediaOp::Play);
        }
    }

    fn pause(&mut self, hook: Hook) {
        if let Some(element) = self.element_mut(hook) {
            element.media.push(MediaOp::Pause);
        }
    }

    fn rewind(&mut self, hook: Hook) {
        if let Some(element) = self.element_mut(hook) {
            element.media.push(MediaOp::Rewind);
        }
    }

    fn set_muted(&mut self, hook: Hook, muted: bool) {
        if let Some(element) = self.element_mut(hook) {
            element.muted = muted;
        }
    }

    fn set_volume(&mut self, hook: Hook, volume: f64) {
        if let Some(element) = self.element_mut(hook) {
            element.volume = Some(volume);
        }
    }

    fn supports_visibility(&self) -> bool {
        self.visibility_supported
    }

    fn observe_visibility(&mut self, hook: Hook) {
        if let Some(element) = self.element_mut(hook) {
            element.observed = true;
        }
    }

    fn unobserve_visibility(&mut self, hook: Hook) {
        if let Some(element) = self.element_mut(hook) {
            element.observed = false;
        }
    }

    fn create_toast(&mut self, kind: ToastKind, text: &str) {
        self.toasts_created += 1;
        self.toast = Some(ToastRecord {
            kind,
            text: text.to_string(),
            visible: false,
        });
    }

    fn slide_toast(&mut self, visible: bool) {
        if let Some(toast) = self.toast.as_mut() {
            toast.visible = visible;
        }
    }

    fn remove_toast(&mut self) {
        self.toast = None;
    }
}

#[derive(Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    timer: Timer,
}

/// Scheduler on a virtual clock that only moves when timers are popped.
#[derive(Debug)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    /// Virtual time since creation.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Pop the earliest timer due within `window` of now, moving the clock to it.
    pub fn pop_due(&mut self, window: Duration) -> Option<Timer> {
        self.pop_until(self.elapsed + window)
    }

    /// Pop the earliest timer due at or before `deadline`.
    fn pop_until(&mut self, deadline: Duration) -> Option<Timer> {
        let (position, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.seq))?;
        let pending = self.pending.remove(position);
        self.elapsed = self.elapsed.max(pending.due);
        Some(pending.timer)
    }

    /// Move the clock forward without firing anything.
    fn advance_to(&mut self, deadline: Duration) {
        self.elapsed = self.elapsed.max(deadline);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_matching(&self, pred: impl Fn(Timer) -> bool) -> usize {
        self.pending.iter().filter(|p| pred(p.timer)).count()
    }

    /// Remaining delay of every matching timer, in scheduling order.
    pub fn delays_of(&self, pred: impl Fn(Timer) -> bool) -> Vec<Duration> {
        self.pending
            .iter()
            .filter(|p| pred(p.timer))
            .map(|p| p.due.saturating_sub(self.elapsed))
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.elapsed + delay,
            seq: self.next_seq,
            timer,
        });
    }
}

/// Session storage kept in a map.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
    failing: bool,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write, like a browser in strict privacy mode.
    pub fn failing() -> Self {
        Self {
            values: HashMap::new(),
            failing: true,
        }
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A [`Page`] running against the in-memory platform.
pub struct Harness {
    pub page: Page,
    pub view: RecordingView,
    pub timers: ManualScheduler,
    pub session: MemorySession,
}

impl Harness {
    pub fn new(config: &SiteConfig, view: RecordingView) -> Self {
        Self {
            page: Page::new(config),
            view,
            timers: ManualScheduler::new(),
            session: MemorySession::new(),
        }
    }

    /// Reuse storage from an earlier visit in the same tab.
    pub fn with_session(mut self, session: MemorySession) -> Self {
        self.session = session;
        self
    }

    pub fn into_session(self) -> MemorySession {
        self.session
    }

    pub fn init(&mut self) {
        let mut host = Host::new(&mut self.view, &mut self.timers, &mut self.session);
        self.page.init(&mut host);
    }

    pub fn send(&mut self, message: Message) {
        let mut host = Host::new(&mut self.view, &mut self.timers, &mut self.session);
        self.page.update(message, &mut host);
    }

    /// Let `duration` of virtual time pass, firing timers in due order.
    ///
    /// Timers scheduled while advancing fire too if they fall inside the window.
    pub fn advance(&mut self, duration: Duration) {
        let deadline = self.timers.elapsed() + duration;
        while let Some(timer) = self.timers.pop_until(deadline) {
            self.send(Message::Timer(timer));
        }
        self.timers.advance_to(deadline);
    }

    /// Scroll the window to `scroll_y` and report it.
    pub fn scroll(&mut self, scroll_y: f64) {
        self.view.set_scroll(scroll_y);
        self.send(Message::Scroll);
    }
}
