use crate::domains::notifier::{Toast, UserNotifier};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Non-blocking buffered notifier. Toasts are forwarded to `bridge` from a
/// background task; when the buffer of `capacity` toasts is full new ones are
/// dropped. Must be called from within a tokio runtime.
pub fn init_buffered_notifier(bridge: Arc<dyn UserNotifier>, capacity: usize) -> Arc<dyn UserNotifier> {
    let (tx, mut rx) = mpsc::channel::<Toast>(capacity);

    tokio::spawn(async move {
        while let Some(toast) = rx.recv().await {
            bridge.notify(toast);
        }
    });

    struct BufferedNotifier {
        sender: mpsc::Sender<Toast>,
    }

    impl UserNotifier for BufferedNotifier {
        fn notify(&self, toast: Toast) {
            // drop on full
            let _ = self.sender.try_send(toast);
        }
    }

    Arc::new(BufferedNotifier { sender: tx })
}
