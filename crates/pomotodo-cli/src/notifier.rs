use std::io::Write;

use pomotodo_core::{NotificationPort, NotifyError};

/// Rings the terminal bell and prints the message to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl NotificationPort for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "\x07{title}: {body}").map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}
