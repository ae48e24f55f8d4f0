use crate::common::{DomainEvent, DomainResult};

pub trait AggregateRoot {
    type Event: DomainEvent;
    type Notification;

    fn aggregate_id(&self) -> &str;
    fn version(&self) -> u64;

    /// Apply an event to the aggregate state, all or nothing, and return the
    /// notifications subscribers must receive, in emission order.
    fn apply(&mut self, event: &Self::Event) -> DomainResult<Vec<Self::Notification>>;
}

/// Replay a sequence of events, stopping at the first one that fails.
pub fn replay<T: AggregateRoot>(
    aggregate: &mut T,
    events: impl IntoIterator<Item = T::Event>,
) -> DomainResult<Vec<T::Notification>> {
    let mut notifications = Vec::new();
    for event in events {
        notifications.extend(aggregate.apply(&event)?);
    }
    Ok(notifications)
}
