//! Newsletter signup form.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::{NewsletterText, Timings, ms};
use crate::constants::{FIELD_BORDER_ERROR, FIELD_BORDER_SUCCESS};
use crate::host::{Hook, Host, ToastKind, View};
use crate::message::Timer;
use crate::toast::ToastManager;

/// Something, an `@`, something, a dot, something; no whitespace and a single `@`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile")
});

/// Whether `email` looks like an email address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Result of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Address accepted, the form will reset
    Accepted,
    /// Address rejected, the input stays editable
    Rejected,
}

/// Newsletter form behaviour.
#[derive(Debug)]
pub struct NewsletterForm {
    text: NewsletterText,
    reset_delay: Duration,
    reset_generation: u64,
}

impl NewsletterForm {
    /// Create the form with its notification texts.
    pub fn new(text: NewsletterText, timings: &Timings) -> Self {
        Self {
            text,
            reset_delay: ms(timings.field_reset_ms),
            reset_generation: 0,
        }
    }

    /// Validate the entered address and report the outcome.
    pub fn submit(&mut self, host: &mut Host<'_>, toasts: &mut ToastManager) -> SubmitOutcome {
        let email = host.view.input_value(Hook::NewsletterInput);
        let accepted = validate_email(email.trim());

        let (border, kind, message) = if accepted {
            (FIELD_BORDER_SUCCESS, ToastKind::Success, &self.text.success)
        } else {
            (FIELD_BORDER_ERROR, ToastKind::Error, &self.text.invalid)
        };

        host.view.set_style(Hook::NewsletterField, "border", border);
        self.reset_generation += 1;
        host.after(
            self.reset_delay,
            Timer::FieldReset {
                generation: self.reset_generation,
                clear_input: accepted,
            },
        );
        toasts.show(kind, message, host);

        if accepted {
            log::info!("Newsletter signup accepted");
            SubmitOutcome::Accepted
        } else {
            log::debug!("Newsletter address rejected");
            SubmitOutcome::Rejected
        }
    }

    /// Return the field to neutral, clearing the input after a signup.
    pub fn field_reset(&mut self, generation: u64, clear_input: bool, view: &mut dyn View) {
        if generation != self.reset_generation {
            return;
        }
        if clear_input {
            view.set_input_value(Hook::NewsletterInput, "");
        }
        view.set_style(Hook::NewsletterField, "border", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualScheduler, MemorySession, RecordingView};

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("chef.sayour@restaurant.tn"));
        assert!(!validate_email("user@@example"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("user example@site.com"));
        assert!(!validate_email("@site.com"));
        assert!(!validate_email(""));
    }

    fn form_view(value: &str) -> RecordingView {
        let mut view = RecordingView::new()
            .with(Hook::NewsletterInput)
            .with(Hook::NewsletterField);
        view.set_input_value(Hook::NewsletterInput, value);
        view
    }

    #[test]
    fn test_invalid_address_flags_field_then_reverts() {
        let mut view = form_view("user@@example");
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut toasts = ToastManager::new(&Timings::default());
        let mut form = NewsletterForm::new(NewsletterText::default(), &Timings::default());

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        assert_eq!(form.submit(&mut host, &mut toasts), SubmitOutcome::Rejected);
        assert_eq!(
            view.style(Hook::NewsletterField, "border"),
            Some(FIELD_BORDER_ERROR)
        );
        let toast = view.toast().cloned().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.text, NewsletterText::default().invalid);

        let reset = Timer::FieldReset {
            generation: 1,
            clear_input: false,
        };
        assert_eq!(timers.pending_matching(|t| t == reset), 1);
        assert_eq!(
            timers.delays_of(|t| matches!(t, Timer::FieldReset { .. })),
            vec![Duration::from_millis(2000)]
        );

        form.field_reset(1, false, &mut view);
        assert_eq!(view.style(Hook::NewsletterField, "border"), None);
        assert_eq!(view.input_value(Hook::NewsletterInput), "user@@example");
    }

    #[test]
    fn test_valid_address_resets_form() {
        let mut view = form_view("user@example.com");
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut toasts = ToastManager::new(&Timings::default());
        let mut form = NewsletterForm::new(NewsletterText::default(), &Timings::default());

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        assert_eq!(form.submit(&mut host, &mut toasts), SubmitOutcome::Accepted);
        assert_eq!(
            view.style(Hook::NewsletterField, "border"),
            Some(FIELD_BORDER_SUCCESS)
        );
        assert_eq!(view.toast().map(|t| t.kind), Some(ToastKind::Success));

        form.field_reset(1, true, &mut view);
        assert_eq!(view.input_value(Hook::NewsletterInput), "");
        assert_eq!(view.style(Hook::NewsletterField, "border"), None);
    }

    #[test]
    fn test_stale_reset_is_ignored() {
        let mut view = form_view("nope");
        let mut timers = ManualScheduler::new();
        let mut session = MemorySession::new();
        let mut toasts = ToastManager::new(&Timings::default());
        let mut form = NewsletterForm::new(NewsletterText::default(), &Timings::default());

        let mut host = Host::new(&mut view, &mut timers, &mut session);
        form.submit(&mut host, &mut toasts);
        form.submit(&mut host, &mut toasts);

        form.field_reset(1, false, &mut view);
        assert_eq!(
            view.style(Hook::NewsletterField, "border"),
            Some(FIELD_BORDER_ERROR)
        );
        form.field_reset(2, false, &mut view);
        assert_eq!(view.style(Hook::NewsletterField, "border"), None);
    }
}
