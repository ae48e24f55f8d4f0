use crate::common::{Envelope, EnvelopeSource};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

/// Live event channel: one JSON envelope per text frame.
pub struct WebSocketEnvelopeSource {
    url: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketEnvelopeSource {
    pub async fn connect(url: &str) -> Result<Self, String> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| format!("Failed to connect to {}: {}", url, e))?;
        info!("Connected to event channel {}", url);
        Ok(Self {
            url: url.to_string(),
            stream,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EnvelopeSource for WebSocketEnvelopeSource {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, String> {
        while let Some(message) = self.stream.next().await {
            let message = message.map_err(|e| format!("Event channel error on {}: {}", self.url, e))?;
            match message {
                Message::Text(text) => {
                    let envelope = Envelope::from_json(&text)
                        .map_err(|e| format!("Failed to decode envelope: {}", e))?;
                    return Ok(Some(envelope));
                }
                Message::Close(frame) => {
                    info!("Event channel {} closed: {:?}", self.url, frame);
                    return Ok(None);
                }
                other => debug!("Ignoring non-text frame ({} bytes)", other.len()),
            }
        }
        Ok(None)
    }
}
