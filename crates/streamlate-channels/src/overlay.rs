//! Overlay webhook sink — a secondary, send-only reply surface with a
//! much tighter length budget than chat.

use async_trait::async_trait;
use streamlate_core::{
    config::OverlayConfig, error::StreamlateError, message::ChatCommand, traits::Channel,
};
use tokio::sync::mpsc;

/// Overlay message length ceiling.
const OVERLAY_MAX_LEN: usize = 200;

/// Send-only webhook sink for a stream overlay.
pub struct OverlaySink {
    config: OverlayConfig,
    client: reqwest::Client,
}

impl OverlaySink {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Channel for OverlaySink {
    fn name(&self) -> &str {
        "overlay"
    }

    fn max_message_len(&self) -> usize {
        OVERLAY_MAX_LEN
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChatCommand>, StreamlateError> {
        // Send-only: hand back a receiver that yields nothing.
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, text: &str) -> Result<(), StreamlateError> {
        let body = serde_json::json!({ "text": text });
        let resp = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreamlateError::Channel(format!("overlay send failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(StreamlateError::Channel(format!(
                "overlay send failed ({status}): {error_text}"
            )));
        }
        Ok(())
    }
}
