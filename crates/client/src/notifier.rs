use crate::view::{Document, Element};
use gridbot_protocol::targets;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_millis(4000);
pub const SUCCESS_MESSAGE: &str = "Task successfully completed!";

/// Drives the message region: errors clear themselves after `timeout`, success stays.
///
/// The pending clear is a deadline rather than a spawned timer; the controller loop
/// sleeps until [`Notifier::deadline`] and then calls [`Notifier::expire`].
#[derive(Debug)]
pub struct Notifier {
    timeout: Duration,
    pending_clear: Option<Instant>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TIMEOUT)
    }
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending_clear: None,
        }
    }

    /// Shows `text` as an error. An empty `text` hides the region without scheduling a clear.
    pub fn show_error(&mut self, doc: &mut Document, text: &str) {
        self.pending_clear = None;
        let Some(region) = doc.get_mut(targets::MESSAGE) else {
            return;
        };
        if text.is_empty() {
            hide(region);
            return;
        }
        region.set_text(text);
        region.set_class_name("message show");
        self.pending_clear = Some(Instant::now() + self.timeout);
    }

    pub fn clear(&mut self, doc: &mut Document) {
        self.show_error(doc, "");
    }

    pub fn show_success(&mut self, doc: &mut Document) {
        self.pending_clear = None;
        let Some(region) = doc.get_mut(targets::MESSAGE) else {
            return;
        };
        region.set_text(SUCCESS_MESSAGE);
        region.set_class_name("message show success");
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending_clear
    }

    /// Hides the region if the pending clear is due at `now`. Returns whether it did.
    pub fn expire(&mut self, doc: &mut Document, now: Instant) -> bool {
        match self.pending_clear {
            Some(deadline) if deadline <= now => {
                self.pending_clear = None;
                if let Some(region) = doc.get_mut(targets::MESSAGE) {
                    hide(region);
                }
                true
            }
            _ => false,
        }
    }
}

fn hide(region: &mut Element) {
    region.set_class_name("message");
    region.set_text("");
}
