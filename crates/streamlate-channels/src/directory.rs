//! Twitch Helix user lookup.
//!
//! Used only as a fallback when the local profile store has no
//! reverse-index match for a typed username.

use async_trait::async_trait;
use serde::Deserialize;
use streamlate_core::{
    error::StreamlateError,
    traits::{DirectoryUser, UserDirectory},
};
use tracing::debug;

const HELIX_USERS_URL: &str = "https://api.twitch.tv/helix/users";

/// Helix-backed user directory.
pub struct HelixDirectory {
    client: reqwest::Client,
    client_id: String,
    token: String,
}

impl HelixDirectory {
    pub fn new(client_id: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_string(),
            token: token.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct UsersResponse {
    data: Vec<HelixUser>,
}

#[derive(Deserialize)]
struct HelixUser {
    id: String,
    display_name: String,
}

#[async_trait]
impl UserDirectory for HelixDirectory {
    async fn lookup(&self, login: &str) -> Result<Option<DirectoryUser>, StreamlateError> {
        debug!("helix: looking up user '{login}'");
        let resp = self
            .client
            .get(HELIX_USERS_URL)
            .query(&[("login", login)])
            .header("Client-Id", &self.client_id)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| StreamlateError::Channel(format!("helix request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(StreamlateError::Channel(format!(
                "helix returned {status}"
            )));
        }

        let parsed: UsersResponse = resp
            .json()
            .await
            .map_err(|e| StreamlateError::Channel(format!("helix parse failed: {e}")))?;

        Ok(parsed.data.into_iter().next().map(|u| DirectoryUser {
            id: u.id,
            display_name: u.display_name,
        }))
    }
}
