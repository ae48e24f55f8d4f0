use super::aggregate::MobileStore;
use super::events::{ConfigNotification, EventType, StoreNotification};
use tokio::sync::mpsc;

type MobilesCallback = Box<dyn FnMut(EventType, &MobileStore) + Send>;
type ConfigCallback = Box<dyn FnMut(&ConfigNotification, &MobileStore) + Send>;

/// Ordered fan-out of store notifications.
///
/// Callbacks run synchronously in registration order and see the store as it
/// is right after the envelope was applied. Channel subscribers receive a copy
/// of every notification; closed channels are dropped on the next send.
#[derive(Default)]
pub struct SubscriptionRegistry {
    mobiles: Vec<MobilesCallback>,
    config: Vec<ConfigCallback>,
    channels: Vec<mpsc::UnboundedSender<StoreNotification>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mobiles<F>(&mut self, callback: F)
    where
        F: FnMut(EventType, &MobileStore) + Send + 'static,
    {
        self.mobiles.push(Box::new(callback));
    }

    pub fn on_config<F>(&mut self, callback: F)
    where
        F: FnMut(&ConfigNotification, &MobileStore) + Send + 'static,
    {
        self.config.push(Box::new(callback));
    }

    pub fn subscribe_channel(&mut self) -> mpsc::UnboundedReceiver<StoreNotification> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.channels.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.mobiles.len() + self.config.len() + self.channels.len()
    }

    pub fn notify(&mut self, notification: &StoreNotification, store: &MobileStore) {
        match notification {
            StoreNotification::Mobiles(kind) => {
                for callback in self.mobiles.iter_mut() {
                    callback(*kind, store);
                }
            }
            StoreNotification::Config(config) => {
                for callback in self.config.iter_mut() {
                    callback(config, store);
                }
            }
        }
        self.channels
            .retain(|sender| sender.send(notification.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SubscriptionRegistry::new();
        let first = calls.clone();
        registry.on_mobiles(move |kind, _| first.lock().unwrap().push(format!("a:{}", kind)));
        let second = calls.clone();
        registry.on_mobiles(move |kind, _| second.lock().unwrap().push(format!("b:{}", kind)));
        let config_calls = calls.clone();
        registry.on_config(move |_, store| config_calls.lock().unwrap().push(format!("c:{}", store.len())));

        let store = MobileStore::new();
        registry.notify(&StoreNotification::Mobiles(EventType::MobilesDeleted), &store);
        registry.notify(&StoreNotification::Config(ConfigNotification::Refresh), &store);

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["a:MOBILES_DELETED", "b:MOBILES_DELETED", "c:0"]
        );
    }

    #[test]
    fn test_closed_channels_are_dropped() {
        let mut registry = SubscriptionRegistry::new();
        let mut open = registry.subscribe_channel();
        let closed = registry.subscribe_channel();
        drop(closed);

        let store = MobileStore::new();
        registry.notify(&StoreNotification::Config(ConfigNotification::Refresh), &store);

        assert_eq!(registry.subscriber_count(), 1);
        assert_eq!(
            open.try_recv().unwrap(),
            StoreNotification::Config(ConfigNotification::Refresh)
        );
    }
}
