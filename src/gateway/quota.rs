//! Quota tracking over calendar day and minute windows.
//!
//! Two-phase contract: callers run a cheap non-committing pre-check
//! before expensive detection work, and a committing check right before
//! the translation calls — so quota is never charged for requests that
//! abort for other reasons.

use chrono::Utc;
use chrono_tz::Tz;
use streamlate_core::config::{ModelTier, RuntimeConfig};
use streamlate_core::error::StreamlateError;
use streamlate_store::Store;
use tracing::{info, warn};

/// Why a reservation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaReason {
    DailyLimit,
    RateLimit,
}

/// Result of a quota check.
#[derive(Debug, Clone, Copy)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub reason: Option<QuotaReason>,
    pub day_total: i64,
    pub minute_total: i64,
}

/// Tracks request counts per model tier in a fixed reference timezone.
pub struct QuotaTracker {
    store: Store,
    tz: Tz,
}

impl QuotaTracker {
    /// Resolve the reference timezone from the configured candidate
    /// list, falling back to UTC when none parse.
    pub fn new(store: Store, cfg: &RuntimeConfig) -> Self {
        let tz = cfg
            .timezones
            .iter()
            .find_map(|name| name.parse::<Tz>().ok())
            .unwrap_or(chrono_tz::UTC);
        Self { store, tz }
    }

    fn window_ids(&self) -> (String, String) {
        let now = Utc::now().with_timezone(&self.tz);
        (
            now.format("%Y-%m-%d").to_string(),
            now.format("%Y-%m-%dT%H:%M").to_string(),
        )
    }

    /// Check `n` requests against the tier's windows; mutate only when
    /// `commit` is set. Committing is atomic: a lost race rejects
    /// instead of overshooting a limit.
    pub async fn check_and_reserve(
        &self,
        cfg: &RuntimeConfig,
        tier: ModelTier,
        n: i64,
        commit: bool,
    ) -> Result<QuotaDecision, StreamlateError> {
        let limits = cfg.models.tier(tier);
        let (day_id, minute_id) = self.window_ids();

        let totals = self
            .store
            .quota_totals(tier.as_str(), &day_id, &minute_id)
            .await?;
        let day_total = totals.day + n;
        let minute_total = totals.minute + n;

        if day_total > limits.per_day {
            return Ok(QuotaDecision {
                allowed: false,
                reason: Some(QuotaReason::DailyLimit),
                day_total,
                minute_total,
            });
        }
        if minute_total > limits.per_minute {
            return Ok(QuotaDecision {
                allowed: false,
                reason: Some(QuotaReason::RateLimit),
                day_total,
                minute_total,
            });
        }

        if !commit {
            return Ok(QuotaDecision {
                allowed: true,
                reason: None,
                day_total,
                minute_total,
            });
        }

        match self
            .store
            .quota_reserve(
                tier.as_str(),
                &day_id,
                limits.per_day,
                &minute_id,
                limits.per_minute,
                n,
            )
            .await?
        {
            Some(snapshot) => {
                info!(
                    "quota: reserved {n} on {} ({}/{} day, {}/{} minute)",
                    tier.as_str(),
                    snapshot.day,
                    limits.per_day,
                    snapshot.minute,
                    limits.per_minute
                );
                // Stale minute windows are dead weight once a fresh one commits.
                if let Err(e) = self.store.quota_purge_minutes(&minute_id).await {
                    warn!("quota: minute purge failed: {e}");
                }
                Ok(QuotaDecision {
                    allowed: true,
                    reason: None,
                    day_total: snapshot.day,
                    minute_total: snapshot.minute,
                })
            }
            None => {
                // Lost a race after the pre-compare passed; re-derive the
                // reason from a fresh read, day window first.
                let now = self
                    .store
                    .quota_totals(tier.as_str(), &day_id, &minute_id)
                    .await?;
                let reason = if now.day + n > limits.per_day {
                    QuotaReason::DailyLimit
                } else {
                    QuotaReason::RateLimit
                };
                Ok(QuotaDecision {
                    allowed: false,
                    reason: Some(reason),
                    day_total: now.day + n,
                    minute_total: now.minute + n,
                })
            }
        }
    }
}
