//! Quota counters with conditional atomic increments.
//!
//! The committing path must never let a stored count exceed its limit,
//! even when two invocations race. Both window updates run inside one
//! transaction guarded by `count + n <= limit`, so the reservation is
//! all-or-nothing.

use super::Store;
use streamlate_core::error::StreamlateError;

const KIND_DAY: &str = "day";
const KIND_MINUTE: &str = "minute";

/// Current counts for one tier's day and minute windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub day: i64,
    pub minute: i64,
}

impl Store {
    /// Read current counts for a tier (absent rows read as 0).
    pub async fn quota_totals(
        &self,
        tier: &str,
        day_id: &str,
        minute_id: &str,
    ) -> Result<QuotaSnapshot, StreamlateError> {
        let day = self.read_count(tier, KIND_DAY, day_id).await?;
        let minute = self.read_count(tier, KIND_MINUTE, minute_id).await?;
        Ok(QuotaSnapshot { day, minute })
    }

    /// Atomically add `n` to both windows, but only if neither limit
    /// would be exceeded. Returns the new counts, or `None` if the
    /// reservation was rejected (counts untouched).
    #[allow(clippy::too_many_arguments)]
    pub async fn quota_reserve(
        &self,
        tier: &str,
        day_id: &str,
        day_limit: i64,
        minute_id: &str,
        minute_limit: i64,
        n: i64,
    ) -> Result<Option<QuotaSnapshot>, StreamlateError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StreamlateError::Store(format!("quota tx begin failed: {e}")))?;

        for (kind, window_id, limit) in [
            (KIND_DAY, day_id, day_limit),
            (KIND_MINUTE, minute_id, minute_limit),
        ] {
            sqlx::query(
                "INSERT OR IGNORE INTO quota_counters (tier, kind, window_id, count) \
                 VALUES (?, ?, ?, 0)",
            )
            .bind(tier)
            .bind(kind)
            .bind(window_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StreamlateError::Store(format!("quota insert failed: {e}")))?;

            let updated = sqlx::query(
                "UPDATE quota_counters SET count = count + ?1 \
                 WHERE tier = ?2 AND kind = ?3 AND window_id = ?4 AND count + ?1 <= ?5",
            )
            .bind(n)
            .bind(tier)
            .bind(kind)
            .bind(window_id)
            .bind(limit)
            .execute(&mut *tx)
            .await
            .map_err(|e| StreamlateError::Store(format!("quota update failed: {e}")))?;

            if updated.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| StreamlateError::Store(format!("quota rollback failed: {e}")))?;
                return Ok(None);
            }
        }

        let day: (i64,) = sqlx::query_as(
            "SELECT count FROM quota_counters WHERE tier = ? AND kind = ? AND window_id = ?",
        )
        .bind(tier)
        .bind(KIND_DAY)
        .bind(day_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StreamlateError::Store(format!("quota readback failed: {e}")))?;

        let minute: (i64,) = sqlx::query_as(
            "SELECT count FROM quota_counters WHERE tier = ? AND kind = ? AND window_id = ?",
        )
        .bind(tier)
        .bind(KIND_MINUTE)
        .bind(minute_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StreamlateError::Store(format!("quota readback failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| StreamlateError::Store(format!("quota commit failed: {e}")))?;

        Ok(Some(QuotaSnapshot {
            day: day.0,
            minute: minute.0,
        }))
    }

    /// Drop minute-window rows older than the current window id.
    /// Window ids sort lexicographically, so `<` is chronological.
    pub async fn quota_purge_minutes(&self, current_minute_id: &str) -> Result<u64, StreamlateError> {
        let result =
            sqlx::query("DELETE FROM quota_counters WHERE kind = ? AND window_id < ?")
                .bind(KIND_MINUTE)
                .bind(current_minute_id)
                .execute(&self.pool)
                .await
                .map_err(|e| StreamlateError::Store(format!("quota purge failed: {e}")))?;
        Ok(result.rows_affected())
    }

    async fn read_count(
        &self,
        tier: &str,
        kind: &str,
        window_id: &str,
    ) -> Result<i64, StreamlateError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT count FROM quota_counters WHERE tier = ? AND kind = ? AND window_id = ?",
        )
        .bind(tier)
        .bind(kind)
        .bind(window_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("quota query failed: {e}")))?;
        Ok(row.map(|(c,)| c).unwrap_or(0))
    }
}
