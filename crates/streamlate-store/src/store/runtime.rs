//! Whole-document load/save for runtime configuration and templates.
//!
//! Both documents are read fresh at the start of every command
//! invocation and written back whole by admin toggles. A missing or
//! unparseable document is a `Config` error — fatal for the invocation.

use super::Store;
use serde::{de::DeserializeOwned, Serialize};
use streamlate_core::config::RuntimeConfig;
use streamlate_core::error::StreamlateError;
use streamlate_l10n::TemplateCatalog;
use tracing::info;

const RUNTIME_KEY: &str = "runtime_config";
const TEMPLATES_KEY: &str = "templates";

impl Store {
    /// Seed runtime configuration and templates on first run.
    /// Existing documents are left untouched. Returns `true` if anything
    /// was written.
    pub async fn seed_defaults(
        &self,
        config: &RuntimeConfig,
        catalog: &TemplateCatalog,
    ) -> Result<bool, StreamlateError> {
        let wrote_config = self.insert_doc_if_missing(RUNTIME_KEY, config).await?;
        let wrote_templates = self.insert_doc_if_missing(TEMPLATES_KEY, catalog).await?;
        if wrote_config || wrote_templates {
            info!("seeded default runtime documents");
        }
        Ok(wrote_config || wrote_templates)
    }

    pub async fn load_runtime(&self) -> Result<RuntimeConfig, StreamlateError> {
        self.load_doc(RUNTIME_KEY).await
    }

    pub async fn save_runtime(&self, config: &RuntimeConfig) -> Result<(), StreamlateError> {
        self.save_doc(RUNTIME_KEY, config).await
    }

    pub async fn load_templates(&self) -> Result<TemplateCatalog, StreamlateError> {
        self.load_doc(TEMPLATES_KEY).await
    }

    pub async fn save_templates(&self, catalog: &TemplateCatalog) -> Result<(), StreamlateError> {
        self.save_doc(TEMPLATES_KEY, catalog).await
    }

    async fn load_doc<T: DeserializeOwned>(&self, key: &str) -> Result<T, StreamlateError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StreamlateError::Store(format!("load {key} failed: {e}")))?;

        let (raw,) = row.ok_or_else(|| StreamlateError::Config(format!("{key} not found")))?;
        serde_json::from_str(&raw)
            .map_err(|e| StreamlateError::Config(format!("{key} is unreadable: {e}")))
    }

    async fn save_doc<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StreamlateError> {
        let raw = serde_json::to_string(value)?;
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("save {key} failed: {e}")))?;
        Ok(())
    }

    async fn insert_doc_if_missing<T: Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<bool, StreamlateError> {
        let raw = serde_json::to_string(value)?;
        let result = sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(&raw)
            .execute(&self.pool)
            .await
            .map_err(|e| StreamlateError::Store(format!("seed {key} failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}
