//! Scroll lock shared by every overlay.
//!
//! Each overlay acquires the lock under its own [`LockHolder`]. The body keeps
//! the `locked` class as long as at least one holder remains, so closing the
//! gallery cannot unlock the page while the popup is still up.

use std::collections::BTreeSet;

use crate::constants::class;
use crate::host::{Hook, View};

/// Components that can hold the page lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LockHolder {
    /// Loading screen
    Preloader,
    /// Gallery modal
    Gallery,
    /// Promotional popup
    Popup,
    /// Mobile navigation menu
    MobileMenu,
}

/// Holder-counted page lock.
#[derive(Debug, Default)]
pub struct PageLock {
    holders: BTreeSet<LockHolder>,
}

impl PageLock {
    /// Create an unlocked page lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `holder`. Taking it twice is a no-op.
    pub fn acquire(&mut self, holder: LockHolder, view: &mut dyn View) {
        let was_locked = self.is_locked();
        if self.holders.insert(holder) {
            log::trace!("Page lock acquired by {:?}", holder);
        }
        if !was_locked {
            view.set_class(Hook::Body, class::LOCKED, true);
        }
    }

    /// Drop `holder`'s claim. Releasing without holding is a no-op.
    pub fn release(&mut self, holder: LockHolder, view: &mut dyn View) {
        if !self.holders.remove(&holder) {
            return;
        }
        log::trace!("Page lock released by {:?}", holder);
        if !self.is_locked() {
            view.set_class(Hook::Body, class::LOCKED, false);
        }
    }

    /// Whether any holder remains.
    pub fn is_locked(&self) -> bool {
        !self.holders.is_empty()
    }

    /// Whether `holder` currently holds the lock.
    pub fn is_held_by(&self, holder: LockHolder) -> bool {
        self.holders.contains(&holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingView;

    #[test]
    fn test_lock_survives_until_last_holder() {
        let mut view = RecordingView::new();
        let mut lock = PageLock::new();

        lock.acquire(LockHolder::Gallery, &mut view);
        lock.acquire(LockHolder::Popup, &mut view);
        assert!(view.has_class(Hook::Body, class::LOCKED));

        lock.release(LockHolder::Gallery, &mut view);
        assert!(lock.is_locked());
        assert!(view.has_class(Hook::Body, class::LOCKED));

        lock.release(LockHolder::Popup, &mut view);
        assert!(!lock.is_locked());
        assert!(!view.has_class(Hook::Body, class::LOCKED));
    }

    #[test]
    fn test_double_acquire_needs_single_release() {
        let mut view = RecordingView::new();
        let mut lock = PageLock::new();

        lock.acquire(LockHolder::Preloader, &mut view);
        lock.acquire(LockHolder::Preloader, &mut view);
        lock.release(LockHolder::Preloader, &mut view);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_release_without_holding_keeps_others() {
        let mut view = RecordingView::new();
        let mut lock = PageLock::new();

        lock.acquire(LockHolder::Popup, &mut view);
        lock.release(LockHolder::Gallery, &mut view);
        assert!(lock.is_held_by(LockHolder::Popup));
        assert!(view.has_class(Hook::Body, class::LOCKED));
    }
}
