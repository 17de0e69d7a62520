//! The page: every component plus the message dispatch between them.

use crate::config::SiteConfig;
use crate::cursor::CustomCursor;
use crate::gallery::GalleryModal;
use crate::host::{Hook, Host};
use crate::lazy_media::LazyMedia;
use crate::media::MediaCatalog;
use crate::message::{Control, Key, Message, Timer};
use crate::navigation::Navigation;
use crate::newsletter::NewsletterForm;
use crate::page_lock::PageLock;
use crate::popup::SessionPopup;
use crate::preloader::Preloader;
use crate::reveal::{HeroSequence, RevealAnimator};
use crate::toast::ToastManager;

/// All interactive behaviour of the site.
#[derive(Debug)]
pub struct Page {
    lock: PageLock,
    preloader: Preloader,
    hero: HeroSequence,
    reveal: RevealAnimator,
    navigation: Navigation,
    gallery: GalleryModal,
    popup: SessionPopup,
    newsletter: NewsletterForm,
    toasts: ToastManager,
    lazy_media: LazyMedia,
    cursor: CustomCursor,
}

impl Page {
    /// Build every component from the site configuration.
    pub fn new(config: &SiteConfig) -> Self {
        let timings = &config.timings;
        Self {
            lock: PageLock::new(),
            preloader: Preloader::new(config.critical_assets.clone(), timings),
            hero: HeroSequence::new(timings),
            reveal: RevealAnimator::new(timings),
            navigation: Navigation::new(timings),
            gallery: GalleryModal::new(MediaCatalog::new(config.gallery_media.iter()), timings),
            popup: SessionPopup::new(timings),
            newsletter: NewsletterForm::new(config.newsletter.clone(), timings),
            toasts: ToastManager::new(timings),
            lazy_media: LazyMedia::new(),
            cursor: CustomCursor::new(timings),
        }
    }

    /// Start every component against the loaded markup.
    pub fn init(&mut self, host: &mut Host<'_>) {
        log::info!("Initializing page");

        if self.preloader.init(host, &mut self.lock) {
            self.hero.start(host);
        }
        self.cursor.init(host);
        self.navigation.init(host.view);
        self.reveal.init(host.view);
        self.lazy_media.init(host.view);
        self.popup.init(host);
    }

    /// Handle one input to completion.
    pub fn update(&mut self, message: Message, host: &mut Host<'_>) {
        match message {
            Message::Scroll => self.handle_scroll(host),
            Message::Resize => {
                self.reveal.on_scroll(host);
                self.cursor.on_resize(host);
            }
            Message::Key(key) => self.handle_key(key, host),
            Message::Click(control) => self.handle_click(control, host),
            Message::Submit => {
                self.newsletter.submit(host, &mut self.toasts);
            }
            Message::PointerMoved { x, y } => self.cursor.pointer_moved(x, y),
            Message::PointerHover(hovering) => self.cursor.hover(hovering, host.view),
            Message::AssetSettled { asset, loaded } => {
                self.preloader.asset_settled(asset, loaded, host)
            }
            Message::PlaybackRejected(hook) => self.handle_playback_rejected(hook, host),
            Message::VideoVisible(index) => self.lazy_media.on_visible(index, host.view),
            Message::Timer(timer) => self.handle_timer(timer, host),
        }
    }

    fn handle_scroll(&mut self, host: &mut Host<'_>) {
        self.navigation.on_scroll(host.view);
        self.reveal.on_scroll(host);
        self.popup.on_scroll(host);
    }

    fn handle_key(&mut self, key: Key, host: &mut Host<'_>) {
        self.gallery.handle_key(key, host, &mut self.lock);
        self.popup.handle_key(key, host, &mut self.lock);
    }

    fn handle_click(&mut self, control: Control, host: &mut Host<'_>) {
        log::trace!("Click: {:?}", control);
        let lock = &mut self.lock;
        match control {
            Control::OpenGallery | Control::OpenGalleryButton => self.gallery.open(0, host, lock),
            Control::PreviewItem(index) => self.gallery.open(index, host, lock),
            Control::PlayVideoButton => self.gallery.open_for_video(host, lock),
            Control::CloseGallery | Control::GalleryBackdrop => self.gallery.close(host, lock),
            Control::GalleryPrev => self.gallery.prev(host),
            Control::GalleryNext => self.gallery.next(host),
            Control::GalleryThumb(index) => {
                if let Err(e) = self.gallery.go_to(index, host) {
                    log::warn!("Ignoring thumbnail click: {}", e);
                }
            }
            Control::PlayRecap => self.gallery.play_recap(host.view),
            Control::PopupClose | Control::PopupCta | Control::PopupOverlay => {
                self.popup.close(host, lock)
            }
            Control::NavToggle => self.navigation.toggle_menu(host.view, lock),
            Control::MobileNavLink => self.navigation.close_menu(host.view, lock),
            Control::Anchor { target_top } => {
                self.navigation.follow_anchor(target_top, host.view, lock)
            }
        }
    }

    fn handle_playback_rejected(&mut self, hook: Hook, host: &mut Host<'_>) {
        match hook {
            Hook::PopupVideo => self.popup.playback_rejected(host.view),
            Hook::GalleryVideo => self.gallery.playback_rejected(host.view),
            _ => log::debug!("Playback blocked on {:?}", hook),
        }
    }

    fn handle_timer(&mut self, timer: Timer, host: &mut Host<'_>) {
        match timer {
            Timer::PreloadFallback => self.preloader.fallback_fired(host),
            Timer::PreloadFinished => {
                if self.preloader.finished(host, &mut self.lock) {
                    self.hero.start(host);
                }
            }
            Timer::InitialReveal => self.reveal.check(host.view),
            Timer::RevealTrailing => self.reveal.trailing(host),
            Timer::HeroStep(index) => self.hero.step(index, host.view),
            Timer::GallerySwap { index, generation } => {
                self.gallery.swap(index, generation, host.view)
            }
            Timer::GalleryScrollToVideo => self.gallery.scroll_to_video(host),
            Timer::GalleryAutoplay => self.gallery.autoplay(host),
            Timer::PopupOpen => self.popup.open(host, &mut self.lock),
            Timer::PopupPlay => self.popup.play(host.view),
            Timer::FieldReset {
                generation,
                clear_input,
            } => self.newsletter.field_reset(generation, clear_input, host.view),
            Timer::ToastEnter(id) => self.toasts.enter(id, host.view),
            Timer::ToastLeave(id) => self.toasts.leave(id, host),
            Timer::ToastRemove(id) => self.toasts.remove(id, host.view),
            Timer::CursorTick(run) => self.cursor.tick(run, host),
        }
    }

    /// Scroll lock shared by the overlays.
    pub fn lock(&self) -> &PageLock {
        &self.lock
    }

    /// Loading screen state.
    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    /// Scroll reveal state.
    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    /// Header and menu state.
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Gallery modal state.
    pub fn gallery(&self) -> &GalleryModal {
        &self.gallery
    }

    /// Session popup state.
    pub fn popup(&self) -> &SessionPopup {
        &self.popup
    }

    /// Toast on screen, if any.
    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    /// Lazy video playback state.
    pub fn lazy_media(&self) -> &LazyMedia {
        &self.lazy_media
    }

    /// Custom cursor state.
    pub fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }
}
