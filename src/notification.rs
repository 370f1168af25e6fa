#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// Receives user-facing messages. Delivery is fire-and-forget.
pub trait NotificationSink {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Writes notifications to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Error => tracing::warn!(?kind, "{message}"),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(?kind, "{message}")
            }
        }
    }
}

/// Shows notifications on the desktop notification daemon.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        send(kind, message);
    }
}

pub fn send(kind: NotificationKind, body: impl Into<String>) {
    let body = body.into();
    let summary = match kind {
        NotificationKind::Success | NotificationKind::Info => "Photo Editor",
        NotificationKind::Error => "Photo Editor error",
    };
    if let Err(err) = notify_rust::Notification::new()
        .appname("photo-editor")
        .summary(summary)
        .body(&body)
        .show()
    {
        tracing::warn!("system notification failed: {err}");
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn notify(&self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}
