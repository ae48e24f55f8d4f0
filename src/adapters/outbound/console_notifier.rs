use crate::domains::notifier::{Toast, ToastKind, UserNotifier};
use std::sync::Arc;

struct ConsoleBridge;

impl UserNotifier for ConsoleBridge {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Info => println!("{}", toast.message),
            ToastKind::Error => eprintln!("ERROR: {}", toast.message),
        }
    }
}

/// Console-backed notifier, the fallback when no UI is attached.
pub fn init_console_notifier() -> Arc<dyn UserNotifier> {
    Arc::new(ConsoleBridge {})
}
