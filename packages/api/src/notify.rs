//! Notification seam between the client core and whatever shows toasts.

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// Receives transient messages meant for the user.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NoticeKind);
}

/// Writes notices to the log. Default sink when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Info | NoticeKind::Success => tracing::info!(kind = kind.as_str(), "{}", message),
            NoticeKind::Warning => tracing::warn!("{}", message),
            NoticeKind::Error => tracing::error!("{}", message),
        }
    }
}
