//! Toast-style user notifications.
//!
//! The session only ever pushes notifications; whatever renders them sits on
//! the receiving side of the channel.

use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub title: String,
}

/// Fire-and-forget sender side of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    pub fn notify(&self, level: Level, message: impl Into<String>, title: impl Into<String>) {
        // A closed sink just means nobody is displaying toasts any more.
        let _ = self.sender.send(Notification {
            level,
            message: message.into(),
            title: title.into(),
        });
    }

    pub fn success(&self, message: impl Into<String>, title: impl Into<String>) {
        self.notify(Level::Success, message, title);
    }

    pub fn info(&self, message: impl Into<String>, title: impl Into<String>) {
        self.notify(Level::Info, message, title);
    }

    pub fn warning(&self, message: impl Into<String>, title: impl Into<String>) {
        self.notify(Level::Warning, message, title);
    }

    pub fn error(&self, message: impl Into<String>, title: impl Into<String>) {
        self.notify(Level::Error, message, title);
    }
}

/// Sink that writes every notification to the log.
pub struct NotificationLog {
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationLog {
    pub fn new() -> (Self, Notifier) {
        let (notifier, receiver) = Notifier::channel();
        (Self { receiver }, notifier)
    }

    #[instrument(name = "notification_log", skip(self))]
    pub async fn run(mut self) {
        while let Some(n) = self.receiver.recv().await {
            match n.level {
                Level::Success | Level::Info => {
                    info!(level = ?n.level, title = %n.title, "{}", n.message)
                }
                Level::Warning => warn!(title = %n.title, "{}", n.message),
                Level::Error => error!(title = %n.title, "{}", n.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_are_delivered_in_order() {
        let (notifier, mut receiver) = Notifier::channel();
        notifier.success("Saved", "Success");
        notifier.warning("Form not valid", "Warning");

        let first = receiver.try_recv().unwrap();
        assert_eq!(first.level, Level::Success);
        assert_eq!(first.message, "Saved");
        assert_eq!(receiver.try_recv().unwrap().level, Level::Warning);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_notify_after_sink_dropped_is_silent() {
        let (notifier, receiver) = Notifier::channel();
        drop(receiver);
        notifier.error("Message", "Title");
    }
}
