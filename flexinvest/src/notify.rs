//! Toast notifications.
//!
//! Page controllers report the outcome of every submission through a
//! [`Notifier`]. The terminal client prints them; tests collect them.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A single user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ToastKind::Success => write!(f, "[ok] {}", self.message),
            ToastKind::Error => write!(f, "[error] {}", self.message),
        }
    }
}

/// Sink for toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Toast::error(message));
    }
}

/// Notifier that keeps every toast until drained.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn toasts(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Remove and return everything collected so far.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts())
    }

    /// Copy of everything collected so far
    pub fn all(&self) -> Vec<Toast> {
        self.toasts().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts().last().cloned()
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts().iter().map(|t| t.message.clone()).collect()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => log::info!("toast: {}", toast.message),
            ToastKind::Error => log::info!("toast (error): {}", toast.message),
        }
        self.toasts().push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_log_collects_in_order() {
        let log = ToastLog::new();
        log.success("Deposit approved!");
        log.error("Action failed");

        assert_eq!(log.messages(), vec!["Deposit approved!", "Action failed"]);
        assert!(log.last().unwrap().is_error());
    }

    #[test]
    fn test_drain_empties_log() {
        let log = ToastLog::new();
        log.success("done");
        assert_eq!(log.drain().len(), 1);
        assert!(log.all().is_empty());
    }

    #[test]
    fn test_display_marks_kind() {
        assert_eq!(Toast::success("ok").to_string(), "[ok] ok");
        assert_eq!(Toast::error("bad").to_string(), "[error] bad");
    }
}
