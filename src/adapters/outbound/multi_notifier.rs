use crate::domains::notifier::{Toast, UserNotifier};
use std::sync::Arc;

/// Forwards every toast to a primary notifier and, when present, a secondary one.
pub struct MultiNotifier {
    primary: Arc<dyn UserNotifier>,
    secondary: Option<Arc<dyn UserNotifier>>,
}

impl MultiNotifier {
    pub fn new(primary: Arc<dyn UserNotifier>, secondary: Option<Arc<dyn UserNotifier>>) -> Self {
        Self { primary, secondary }
    }
}

impl UserNotifier for MultiNotifier {
    fn notify(&self, toast: Toast) {
        if let Some(sec) = &self.secondary {
            sec.notify(toast.clone());
        }
        self.primary.notify(toast);
    }
}

/// Console toasts mirrored into the tracing log.
pub fn init_combined_notifier() -> Arc<dyn UserNotifier> {
    let console = super::init_console_notifier();
    let tracing = super::init_tracing_notifier();
    Arc::new(MultiNotifier::new(console, Some(tracing)))
}
