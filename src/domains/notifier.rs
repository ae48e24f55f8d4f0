use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Error,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Info => write!(f, "info"),
            ToastKind::Error => write!(f, "error"),
        }
    }
}

/// A short message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// User-facing notification port. Never fails and never blocks the caller.
pub trait UserNotifier: Send + Sync + 'static {
    fn notify(&self, toast: Toast);

    fn info(&self, msg: &str) {
        self.notify(Toast::info(msg));
    }

    fn error(&self, msg: &str) {
        self.notify(Toast::error(msg));
    }
}

pub type DynNotifier = Arc<dyn UserNotifier>;
