use crate::domains::notifier::{Toast, ToastKind, UserNotifier};
use std::sync::Arc;

/// Writes toasts to the `tracing` subscriber under the `sitac::toast` target.
struct TracingBridge;

impl UserNotifier for TracingBridge {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Info => tracing::info!(target: "sitac::toast", "{}", toast.message),
            ToastKind::Error => tracing::error!(target: "sitac::toast", "{}", toast.message),
        }
    }
}

pub fn init_tracing_notifier() -> Arc<dyn UserNotifier> {
    Arc::new(TracingBridge {})
}
