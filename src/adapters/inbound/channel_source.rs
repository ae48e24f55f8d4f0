use crate::common::{Envelope, EnvelopeSource};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// In-process event channel. The stream ends when every sender is dropped.
pub struct ChannelEnvelopeSource {
    receiver: mpsc::Receiver<Envelope>,
}

impl ChannelEnvelopeSource {
    pub fn new(capacity: usize) -> (mpsc::Sender<Envelope>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (sender, Self { receiver })
    }

    pub fn from_receiver(receiver: mpsc::Receiver<Envelope>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl EnvelopeSource for ChannelEnvelopeSource {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, String> {
        Ok(self.receiver.recv().await)
    }
}
