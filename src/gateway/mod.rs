//! Gateway — the event loop connecting chat channels, the store, and
//! the completion backend.
//!
//! Every command invocation is one sequential unit of work; concurrent
//! invocations only meet at the store, which guards the quota counters
//! with conditional updates.

mod pipeline;
mod prompt;
mod quota;
mod respond;
mod segment;


use crate::commands::{self, Command};
use std::collections::HashMap;
use std::sync::Arc;
use streamlate_core::{
    error::StreamlateError,
    message::ChatCommand,
    traits::{Channel, Completion, UserDirectory},
};
use streamlate_store::Store;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Fixed fallback when even the template catalog is unreachable.
const GENERIC_ERROR: &str = "Sorry, a translation error occurred.";

/// The central gateway that routes chat commands through the pipeline.
pub struct Gateway {
    pub(crate) store: Store,
    pub(crate) provider: Arc<dyn Completion>,
    pub(crate) channels: HashMap<String, Arc<dyn Channel>>,
    pub(crate) directory: Option<Arc<dyn UserDirectory>>,
    pub(crate) base_command: String,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        store: Store,
        provider: Arc<dyn Completion>,
        channels: HashMap<String, Arc<dyn Channel>>,
        directory: Option<Arc<dyn UserDirectory>>,
        base_command: String,
    ) -> Self {
        Self {
            store,
            provider,
            channels,
            directory,
            base_command,
        }
    }

    /// Run the main event loop until ctrl-c.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "streamlate gateway running | provider: {} | channels: {}",
            self.provider.name(),
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<ChatCommand>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(cmd) = channel_rx.recv().await {
                    if tx.send(cmd).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                error!("failed to stop channel {name}: {e}");
            }
        }

        Ok(())
    }

    /// Handle one message end to end. No failure escapes: errors are
    /// logged with their request context and become a generic reply
    /// (admin flows stay silent).
    pub(crate) async fn dispatch(&self, cmd: ChatCommand) {
        match self.handle_command(&cmd).await {
            Ok(Some(reply)) => self.deliver(&cmd.channel, &reply).await,
            Ok(None) => {}
            Err(e) => {
                error!(
                    "command failed: channel={} sender={} input={:?} err={e}",
                    cmd.channel, cmd.sender_id, cmd.text
                );
                let is_admin = Command::parse(&cmd.text, &self.base_command)
                    .map(|c| c.requires_moderator())
                    .unwrap_or(false);
                if !is_admin {
                    self.deliver(&cmd.channel, GENERIC_ERROR).await;
                }
            }
        }
    }

    /// Route one chat message. Non-command text is ignored, and admin
    /// commands from non-moderators are dropped silently.
    pub(crate) async fn handle_command(
        &self,
        cmd: &ChatCommand,
    ) -> Result<Option<String>, StreamlateError> {
        let Some(command) = Command::parse(&cmd.text, &self.base_command) else {
            return Ok(None);
        };
        if command.requires_moderator() && !cmd.is_moderator {
            return Ok(None);
        }
        match command {
            Command::Translate { force_strong, body } => {
                self.run_translation(cmd, &body, force_strong).await
            }
            other => commands::handle(other, self, cmd).await,
        }
    }

    /// Send a reply to the originating channel, mirroring it to any
    /// send-only surfaces.
    async fn deliver(&self, origin: &str, text: &str) {
        for (name, channel) in &self.channels {
            if name != origin && name != "overlay" {
                continue;
            }
            if let Err(e) = respond::send_chunked(channel.as_ref(), text).await {
                error!("failed to send reply via {name}: {e}");
            }
        }
    }
}
