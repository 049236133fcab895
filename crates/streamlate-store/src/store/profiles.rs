//! User profiles: proactive upsert on sighting and the username reverse index.

use super::Store;
use streamlate_core::config::Persona;
use streamlate_core::error::StreamlateError;
use streamlate_core::profile::UserProfile;

type ProfileRow = (String, String, String, String, String, Option<String>);

fn row_to_profile(row: ProfileRow) -> UserProfile {
    let (user_id, username, target_lang, speaking_lang, style, pronouns) = row;
    UserProfile {
        user_id,
        username,
        target_lang,
        speaking_lang,
        style,
        pronouns,
    }
}

impl Store {
    /// Load a profile, creating the persona default the first time this
    /// user id is seen and refreshing the stored username whenever the
    /// platform reports a different display name.
    pub async fn ensure_profile(
        &self,
        user_id: &str,
        username: &str,
        persona: &Persona,
    ) -> Result<UserProfile, StreamlateError> {
        match self.get_profile(user_id).await? {
            Some(mut profile) => {
                if profile.username != username {
                    profile.username = username.to_string();
                    self.save_profile(&profile).await?;
                }
                Ok(profile)
            }
            None => {
                let profile = UserProfile::from_persona(user_id, username, persona);
                self.save_profile(&profile).await?;
                Ok(profile)
            }
        }
    }

    /// Get a profile by user id.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StreamlateError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT user_id, username, target_lang, speaking_lang, style, pronouns \
             FROM profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("profile query failed: {e}")))?;

        Ok(row.map(row_to_profile))
    }

    /// Upsert a whole profile.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), StreamlateError> {
        sqlx::query(
            "INSERT INTO profiles (user_id, username, target_lang, speaking_lang, style, pronouns) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
                username = excluded.username, \
                target_lang = excluded.target_lang, \
                speaking_lang = excluded.speaking_lang, \
                style = excluded.style, \
                pronouns = excluded.pronouns, \
                updated_at = datetime('now')",
        )
        .bind(&profile.user_id)
        .bind(&profile.username)
        .bind(&profile.target_lang)
        .bind(&profile.speaking_lang)
        .bind(&profile.style)
        .bind(&profile.pronouns)
        .execute(&self.pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("profile upsert failed: {e}")))?;

        Ok(())
    }

    /// Reverse lookup: username → profile, case-insensitive.
    pub async fn find_profile_by_name(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, StreamlateError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT user_id, username, target_lang, speaking_lang, style, pronouns \
             FROM profiles WHERE username = ? COLLATE NOCASE",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("profile name query failed: {e}")))?;

        Ok(row.map(row_to_profile))
    }
}
