use crate::domains::notifier::{Toast, UserNotifier};
use std::sync::Arc;

struct NoOp;

impl UserNotifier for NoOp {
    fn notify(&self, _toast: Toast) {}
}

/// No-op notifier useful as default in unit tests
pub fn init_noop_notifier() -> Arc<dyn UserNotifier> {
    Arc::new(NoOp {})
}
