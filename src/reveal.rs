//! Scroll-triggered reveal animations.
//!
//! Elements flagged for reveal get the `aos-animate` class once their top edge
//! rises above a fraction of the viewport height. Reveal is one-way: an element
//! that scrolls back out keeps its class.

use std::time::Duration;

use crate::config::{Timings, ms};
use crate::constants::class;
use crate::host::{Group, Hook, Host, View};
use crate::message::Timer;
use crate::throttle::{Gate, Throttle};

/// Tracks which reveal elements have entered the viewport.
#[derive(Debug)]
pub struct RevealAnimator {
    revealed: Vec<bool>,
    trigger_ratio: f64,
    throttle: Throttle,
}

impl RevealAnimator {
    /// Create an animator with the configured trigger line and throttle.
    pub fn new(timings: &Timings) -> Self {
        Self {
            revealed: Vec::new(),
            trigger_ratio: timings.reveal_trigger_ratio,
            throttle: Throttle::new(ms(timings.reveal_throttle_ms)),
        }
    }

    /// Collect the reveal elements present in the page.
    pub fn init(&mut self, view: &dyn View) {
        self.revealed = vec![false; view.count(Group::Reveal)];
        log::debug!("Tracking {} reveal elements", self.revealed.len());
    }

    /// Scroll or resize happened.
    pub fn on_scroll(&mut self, host: &mut Host<'_>) {
        if self.revealed.is_empty() {
            return;
        }
        match self.throttle.offer(host.timers.now()) {
            Gate::Run => self.check(host.view),
            Gate::Defer(delay) => host.after(delay, Timer::RevealTrailing),
            Gate::Pending => {}
        }
    }

    /// Trailing pass of a throttled burst.
    pub fn trailing(&mut self, host: &mut Host<'_>) {
        self.throttle.trailing_fired(host.timers.now());
        self.check(host.view);
    }

    /// Reveal every element whose top edge is above the trigger line.
    pub fn check(&mut self, view: &mut dyn View) {
        let trigger = view.viewport().height * self.trigger_ratio;

        for (index, revealed) in self.revealed.iter_mut().enumerate() {
            if *revealed {
                continue;
            }
            let hook = Hook::Reveal(index);
            let Some(bounds) = view.bounds(hook) else {
                continue;
            };
            if bounds.top < trigger {
                *revealed = true;
                view.set_class(hook, class::REVEALED, true);
            }
        }
    }

    /// Whether element `index` has been revealed.
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Number of revealed elements.
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }
}

/// Staggered reveal of the hero block once the page unlocks.
#[derive(Debug)]
pub struct HeroSequence {
    stagger: Duration,
}

impl HeroSequence {
    /// Create the sequence with the configured stagger.
    pub fn new(timings: &Timings) -> Self {
        Self {
            stagger: ms(timings.hero_stagger_ms),
        }
    }

    /// Schedule one step per hero element.
    pub fn start(&self, host: &mut Host<'_>) {
        let count = host.view.count(Group::Hero);
        for index in 0..count {
            host.after(self.stagger * index as u32, Timer::HeroStep(index));
        }
    }

    /// Reveal hero element `index`.
    pub fn step(&self, index: usize, view: &mut dyn View) {
        view.set_class(Hook::Hero(index), class::REVEALED, true);
    }
}
