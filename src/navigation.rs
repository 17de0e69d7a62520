//! Header, mobile menu and in-page navigation.

use crate::config::Timings;
use crate::constants::class;
use crate::host::{Group, Hook, View};
use crate::page_lock::{LockHolder, PageLock};

/// Navigation state.
#[derive(Debug)]
pub struct Navigation {
    enabled: bool,
    menu_open: bool,
    active_section: Option<usize>,
    scrolled_px: f64,
    section_offset_px: f64,
}

impl Navigation {
    /// Create navigation with the configured thresholds.
    pub fn new(timings: &Timings) -> Self {
        Self {
            enabled: false,
            menu_open: false,
            active_section: None,
            scrolled_px: timings.header_scrolled_px,
            section_offset_px: timings.active_section_offset_px,
        }
    }

    /// Enable navigation when the page has a header.
    pub fn init(&mut self, view: &dyn View) {
        self.enabled = view.exists(Hook::Header);
    }

    /// Update the header state and the active section link.
    pub fn on_scroll(&mut self, view: &mut dyn View) {
        if !self.enabled {
            return;
        }
        let scroll_y = view.viewport().scroll_y;
        view.set_class(Hook::Header, class::SCROLLED, scroll_y > self.scrolled_px);
        self.update_active_link(scroll_y, view);
    }

    fn update_active_link(&mut self, scroll_y: f64, view: &mut dyn View) {
        let probe = scroll_y + self.section_offset_px;
        let sections = view.count(Group::Section);

        // Nested sections: the last match wins
        let Some(active) = (0..sections).rev().find(|&i| {
            view.offset(Hook::Section(i))
                .is_some_and(|bounds| bounds.contains(probe))
        }) else {
            return;
        };

        if self.active_section == Some(active) {
            return;
        }
        self.active_section = Some(active);
        for section in 0..sections {
            view.set_class(Hook::SectionLinks(section), class::ACTIVE, section == active);
        }
    }

    /// Open or close the mobile menu.
    pub fn toggle_menu(&mut self, view: &mut dyn View, lock: &mut PageLock) {
        if !view.exists(Hook::NavToggle) || !view.exists(Hook::MobileMenu) {
            return;
        }
        if self.menu_open {
            self.close_menu(view, lock);
        } else {
            self.menu_open = true;
            view.set_class(Hook::NavToggle, class::ACTIVE, true);
            view.set_class(Hook::MobileMenu, class::ACTIVE, true);
            lock.acquire(LockHolder::MobileMenu, view);
        }
    }

    /// Close the mobile menu.
    pub fn close_menu(&mut self, view: &mut dyn View, lock: &mut PageLock) {
        self.menu_open = false;
        view.set_class(Hook::NavToggle, class::ACTIVE, false);
        view.set_class(Hook::MobileMenu, class::ACTIVE, false);
        lock.release(LockHolder::MobileMenu, view);
    }

    /// Scroll to an anchor target, leaving room for the fixed header.
    ///
    /// Works without a header too, with no offset.
    pub fn follow_anchor(&mut self, target_top: f64, view: &mut dyn View, lock: &mut PageLock) {
        self.close_menu(view, lock);
        let header = view.offset(Hook::Header).map_or(0.0, |b| b.height);
        view.scroll_to(target_top - header);
    }

    /// Whether the mobile menu is open.
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Section whose links are highlighted.
    pub fn active_section(&self) -> Option<usize> {
        self.active_section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Bounds;
    use crate::sim::RecordingView;

    fn nav_view() -> RecordingView {
        let mut view = RecordingView::new()
            .with(Hook::Header)
            .with(Hook::NavToggle)
            .with(Hook::MobileMenu)
            .with_group(Group::Section, 3);
        for i in 0..3 {
            view.insert(Hook::SectionLinks(i));
            view.set_offset(Hook::Section(i), Bounds::new(i as f64 * 800.0, 800.0));
        }
        view.set_offset(Hook::Header, Bounds::new(0.0, 80.0));
        view
    }

    #[test]
    fn test_header_scrolled_threshold() {
        let mut view = nav_view();
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        view.set_scroll(100.0);
        nav.on_scroll(&mut view);
        assert!(!view.has_class(Hook::Header, class::SCROLLED));

        view.set_scroll(101.0);
        nav.on_scroll(&mut view);
        assert!(view.has_class(Hook::Header, class::SCROLLED));

        view.set_scroll(0.0);
        nav.on_scroll(&mut view);
        assert!(!view.has_class(Hook::Header, class::SCROLLED));
    }

    #[test]
    fn test_active_section_uses_offset_probe() {
        let mut view = nav_view();
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        view.set_scroll(649.0);
        nav.on_scroll(&mut view);
        assert_eq!(nav.active_section(), Some(0));

        view.set_scroll(650.0);
        nav.on_scroll(&mut view);
        assert_eq!(nav.active_section(), Some(1));
        assert!(view.has_class(Hook::SectionLinks(1), class::ACTIVE));
        assert!(!view.has_class(Hook::SectionLinks(0), class::ACTIVE));

        // Past the last section nothing changes
        view.set_scroll(5000.0);
        nav.on_scroll(&mut view);
        assert_eq!(nav.active_section(), Some(1));
    }

    #[test]
    fn test_menu_toggle_holds_lock() {
        let mut view = nav_view();
        let mut lock = PageLock::new();
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        nav.toggle_menu(&mut view, &mut lock);
        assert!(nav.is_menu_open());
        assert!(view.has_class(Hook::MobileMenu, class::ACTIVE));
        assert!(lock.is_held_by(LockHolder::MobileMenu));

        nav.toggle_menu(&mut view, &mut lock);
        assert!(!nav.is_menu_open());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_anchor_closes_menu_and_offsets_header() {
        let mut view = nav_view();
        let mut lock = PageLock::new();
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        nav.toggle_menu(&mut view, &mut lock);
        nav.follow_anchor(1600.0, &mut view, &mut lock);
        assert!(!nav.is_menu_open());
        assert!(!lock.is_locked());
        assert_eq!(view.scrolled_to(), &[1520.0]);
    }

    #[test]
    fn test_without_header_scroll_is_ignored() {
        let mut view = RecordingView::new().with_group(Group::Section, 1);
        view.insert(Hook::SectionLinks(0));
        view.set_offset(Hook::Section(0), Bounds::new(0.0, 800.0));
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        view.set_scroll(500.0);
        nav.on_scroll(&mut view);
        assert_eq!(nav.active_section(), None);
        assert!(!view.has_class(Hook::SectionLinks(0), class::ACTIVE));
    }

    #[test]
    fn test_anchor_without_header_scrolls_to_target() {
        let mut view = RecordingView::new();
        let mut lock = PageLock::new();
        let mut nav = Navigation::new(&Timings::default());
        nav.init(&view);

        nav.follow_anchor(640.0, &mut view, &mut lock);
        assert_eq!(view.scrolled_to(), &[640.0]);
        assert!(!lock.is_locked());
    }
}
