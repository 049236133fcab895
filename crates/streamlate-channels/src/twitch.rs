//! Twitch chat channel over IRC.
//!
//! Connects to `irc.chat.twitch.tv`, requests the tags capability so
//! messages carry stable user ids and moderator badges, and turns
//! PRIVMSG lines into [`ChatCommand`]s. Docs:
//! <https://dev.twitch.tv/docs/chat/irc/>

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use streamlate_core::{
    config::TwitchConfig,
    error::StreamlateError,
    message::ChatCommand,
    traits::Channel,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

const IRC_ADDR: &str = "irc.chat.twitch.tv:6667";

/// Twitch chat message length ceiling.
const TWITCH_MAX_LEN: usize = 500;

/// Twitch IRC channel.
pub struct TwitchChannel {
    config: TwitchConfig,
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
}

impl TwitchChannel {
    /// Create a new Twitch channel from config.
    pub fn new(config: TwitchConfig) -> Self {
        Self {
            config,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    async fn write_line(&self, line: &str) -> Result<(), StreamlateError> {
        let mut guard = self.writer.lock().await;
        let writer = guard
            .as_mut()
            .ok_or_else(|| StreamlateError::Channel("twitch: not connected".to_string()))?;
        writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .map_err(|e| StreamlateError::Channel(format!("twitch write failed: {e}")))
    }
}

#[async_trait]
impl Channel for TwitchChannel {
    fn name(&self) -> &str {
        "twitch"
    }

    fn max_message_len(&self) -> usize {
        TWITCH_MAX_LEN
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChatCommand>, StreamlateError> {
        let stream = TcpStream::connect(IRC_ADDR)
            .await
            .map_err(|e| StreamlateError::Channel(format!("twitch connect failed: {e}")))?;
        let (read_half, mut write_half) = stream.into_split();

        let token = self
            .config
            .oauth_token
            .strip_prefix("oauth:")
            .unwrap_or(&self.config.oauth_token);
        let login = [
            format!("PASS oauth:{token}"),
            format!("NICK {}", self.config.nick),
            "CAP REQ :twitch.tv/tags twitch.tv/commands".to_string(),
            format!("JOIN #{}", self.config.channel),
        ];
        for line in login {
            write_half
                .write_all(format!("{line}\r\n").as_bytes())
                .await
                .map_err(|e| StreamlateError::Channel(format!("twitch login failed: {e}")))?;
        }

        *self.writer.lock().await = Some(write_half);

        let (tx, rx) = mpsc::channel(64);
        let writer = self.writer.clone();
        let joined = self.config.channel.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.starts_with("PING") {
                            let mut guard = writer.lock().await;
                            if let Some(w) = guard.as_mut() {
                                if let Err(e) =
                                    w.write_all(b"PONG :tmi.twitch.tv\r\n").await
                                {
                                    warn!("twitch: pong failed: {e}");
                                }
                            }
                            continue;
                        }
                        if let Some(cmd) = parse_privmsg(&line) {
                            if tx.send(cmd).await.is_err() {
                                info!("twitch: receiver dropped, stopping read loop");
                                break;
                            }
                        }
                    }
                    Ok(None) => {
                        warn!("twitch: connection closed by server");
                        break;
                    }
                    Err(e) => {
                        warn!("twitch: read failed: {e}");
                        break;
                    }
                }
            }
        });

        info!("twitch: joined #{joined}");
        Ok(rx)
    }

    async fn send(&self, text: &str) -> Result<(), StreamlateError> {
        self.write_line(&format!("PRIVMSG #{} :{text}", self.config.channel))
            .await
    }

    async fn stop(&self) -> Result<(), StreamlateError> {
        // Dropping the write half closes the connection.
        self.writer.lock().await.take();
        Ok(())
    }
}

/// Parse an IRC PRIVMSG line (with tags) into a [`ChatCommand`].
/// Lines without tags or without a stable user id are ignored.
fn parse_privmsg(line: &str) -> Option<ChatCommand> {
    let rest = line.strip_prefix('@')?;
    let (raw_tags, rest) = rest.split_once(' ')?;

    let marker = " PRIVMSG #";
    let privmsg_at = rest.find(marker)?;
    let after = &rest[privmsg_at + marker.len()..];
    let text = after.split_once(" :").map(|(_, t)| t)?.trim();
    if text.is_empty() {
        return None;
    }

    let tags: HashMap<&str, &str> = raw_tags
        .split(';')
        .filter_map(|kv| kv.split_once('='))
        .collect();

    let user_id = tags.get("user-id").filter(|v| !v.is_empty())?;
    let login = rest
        .strip_prefix(':')
        .and_then(|p| p.split('!').next())
        .unwrap_or("");
    let display_name = tags
        .get("display-name")
        .filter(|v| !v.is_empty())
        .copied()
        .unwrap_or(login);

    let badges = tags.get("badges").copied().unwrap_or("");
    let is_moderator =
        tags.get("mod") == Some(&"1") || badges.contains("broadcaster/");

    let mut cmd = ChatCommand::new("twitch", user_id, display_name, text);
    cmd.is_moderator = is_moderator;
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "@badge-info=;badges=moderator/1;color=#FF69B4;display-name=Ana;\
mod=1;room-id=1337;user-id=42 :ana!ana@ana.tmi.twitch.tv PRIVMSG #somestream :!translate hola";

    #[test]
    fn test_parse_privmsg_extracts_fields() {
        let cmd = parse_privmsg(LINE).unwrap();
        assert_eq!(cmd.channel, "twitch");
        assert_eq!(cmd.sender_id, "42");
        assert_eq!(cmd.sender_name, "Ana");
        assert_eq!(cmd.text, "!translate hola");
        assert!(cmd.is_moderator);
    }

    #[test]
    fn test_parse_privmsg_broadcaster_badge_counts_as_moderator() {
        let line = "@badges=broadcaster/1;display-name=Streamer;mod=0;user-id=7 \
:streamer!streamer@streamer.tmi.twitch.tv PRIVMSG #somestream :hello";
        let cmd = parse_privmsg(line).unwrap();
        assert!(cmd.is_moderator);
    }

    #[test]
    fn test_parse_privmsg_falls_back_to_login_name() {
        let line = "@badges=;display-name=;mod=0;user-id=9 \
:viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #somestream :hey";
        let cmd = parse_privmsg(line).unwrap();
        assert_eq!(cmd.sender_name, "viewer");
        assert!(!cmd.is_moderator);
    }

    #[test]
    fn test_parse_privmsg_ignores_non_privmsg_lines() {
        assert!(parse_privmsg("PING :tmi.twitch.tv").is_none());
        assert!(parse_privmsg(":tmi.twitch.tv 001 bot :Welcome, GLHF!").is_none());
        // Tagged but no user id.
        let line = "@badges=;display-name=Ghost;user-id= \
:ghost!ghost@ghost.tmi.twitch.tv PRIVMSG #somestream :boo";
        assert!(parse_privmsg(line).is_none());
    }

    #[test]
    fn test_parse_privmsg_keeps_colons_in_text() {
        let line = "@badges=;display-name=Ana;user-id=42 \
:ana!ana@ana.tmi.twitch.tv PRIVMSG #somestream :note: this has colons";
        let cmd = parse_privmsg(line).unwrap();
        assert_eq!(cmd.text, "note: this has colons");
    }
}
