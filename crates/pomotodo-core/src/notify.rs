//! Outbound user notifications.
//!
//! The core only ever asks for a title and a body to be shown. Delivery
//! failures and missing permission are logged and swallowed.

use crate::error::NotifyError;
use crate::events::Event;

/// Anything that can surface a short message to the user.
pub trait NotificationPort {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

impl<N: NotificationPort + ?Sized> NotificationPort for std::rc::Rc<N> {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        (**self).notify(title, body)
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl NotificationPort for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Title and body for the events the user is told about.
pub fn message_for(event: &Event) -> Option<(String, String)> {
    match event {
        Event::WorkPhaseComplete {
            completed_pomodoro_count,
            ..
        } => Some((
            "Work session complete".to_string(),
            format!("Pomodoro #{completed_pomodoro_count} done. Time for a break."),
        )),
        Event::BreakPhaseComplete { .. } => Some((
            "Break over".to_string(),
            "Ready for the next focus session.".to_string(),
        )),
        _ => None,
    }
}

/// Deliver the message for `event`, if it has one. Never fails.
pub fn deliver<N: NotificationPort + ?Sized>(notifier: &N, event: &Event) {
    let Some((title, body)) = message_for(event) else {
        return;
    };
    if let Err(e) = notifier.notify(&title, &body) {
        tracing::debug!(error = %e, "notification not delivered");
    }
}
