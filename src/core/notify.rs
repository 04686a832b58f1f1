//! Fire-and-forget notifications from the engine to the UI layer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// Commands the built-in commands plugin asks the host to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostCommand {
    Exit,
    Reload,
    EditConfigFile,
    OpenSettings,
    RefreshIndexes,
    ClearCaches,
}

impl HostCommand {
    pub const ALL: [HostCommand; 6] = [
        HostCommand::Exit,
        HostCommand::Reload,
        HostCommand::EditConfigFile,
        HostCommand::OpenSettings,
        HostCommand::RefreshIndexes,
        HostCommand::ClearCaches,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HostCommand::Exit => "exit",
            HostCommand::Reload => "reload",
            HostCommand::EditConfigFile => "edit-config-file",
            HostCommand::OpenSettings => "open-settings",
            HostCommand::RefreshIndexes => "refresh-indexes",
            HostCommand::ClearCaches => "clear-caches",
        }
    }
}

impl std::str::FromStr for HostCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostCommand::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("Unknown host command: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Notification {
    IndexRefreshStarted,
    IndexRefreshCompleted,
    Message { severity: Severity, message: String },
    CommandRequested { command: HostCommand },
}

/// Sending half handed to every component that reports to the UI.
///
/// Sending never blocks and never fails loudly: a UI that stopped listening
/// simply misses notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<UnboundedSender<Notification>>,
}

impl Notifier {
    /// Create a notifier and the receiver the UI layer listens on.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that drops everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, notification: Notification) {
        if let Some(tx) = &self.tx {
            if tx.send(notification).is_err() {
                log::debug!("Notification receiver dropped");
            }
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Notification::Message {
            severity: Severity::Info,
            message: message.into(),
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Notification::Message {
            severity: Severity::Error,
            message: message.into(),
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.send(Notification::IndexRefreshStarted);
        notifier.info("done");

        assert_eq!(rx.try_recv().unwrap(), Notification::IndexRefreshStarted);
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::Message {
                severity: Severity::Info,
                message: "done".to_string()
            }
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.error("nobody listens");
    }
}
