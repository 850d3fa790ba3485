//! Template materialization: the queue-driven batch job that expands
//! recurring templates into concrete per-date availability rows.
//!
//! Each run claims a bounded batch of pending sync requests and, per venue,
//! rewrites the whole materialized window `[today, today + horizon]` from
//! the venue's enabled templates. The full overwrite makes the job
//! idempotent and convergent regardless of how many times the template
//! changed since the last run; a storage failure marks the entry failed for
//! retry and never leaves a half-written window (the swap is one atomic
//! storage operation).

use chrono::Days;
use tracing::{info, warn};

use crate::api::VenueSyncReport;
use crate::db::repository::FullRepository;
use crate::error::EngineResult;
use crate::models::{AvailabilityBlock, BlockSource, Clock, RecurringTemplate};

/// Process up to `limit` pending sync queue entries, materializing
/// `horizon_days` days ahead for each claimed venue.
///
/// Per-venue failures are recorded on the queue entry and do not abort the
/// batch; the report lists successfully refreshed venues only.
pub async fn process_sync_queue(
    repo: &dyn FullRepository,
    clock: &dyn Clock,
    limit: usize,
    horizon_days: i64,
) -> EngineResult<Vec<VenueSyncReport>> {
    let entries = repo.claim_pending_entries(limit).await?;
    if entries.is_empty() {
        return Ok(vec![]);
    }

    let today = clock.today();
    let until = today
        .checked_add_days(Days::new(horizon_days.max(0) as u64))
        .unwrap_or(today);

    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
        let result = async {
            let templates = repo.find_recurring_templates(entry.venue_id).await?;
            let rows = materialize_window(&templates, today, until);
            repo.replace_materialized_window(entry.venue_id, today, until, rows)
                .await
        }
        .await;

        // A failed status write leaves the entry `Processing` and the venue
        // blocked; the rest of the batch still runs.
        match result {
            Ok(refreshed_rows) => {
                if let Err(err) = repo.mark_done(entry.id).await {
                    warn!(
                        venue = entry.venue_id.value(),
                        error = %err,
                        "failed to mark sync entry done"
                    );
                }
                info!(
                    venue = entry.venue_id.value(),
                    refreshed_rows, "materialized template window"
                );
                reports.push(VenueSyncReport {
                    venue_id: entry.venue_id,
                    refreshed_rows,
                });
            }
            Err(err) => {
                warn!(
                    venue = entry.venue_id.value(),
                    error = %err,
                    "materialization failed; entry left for retry"
                );
                if let Err(mark_err) = repo.mark_failed(entry.id, &err.to_string()).await {
                    warn!(
                        venue = entry.venue_id.value(),
                        error = %mark_err,
                        "failed to record sync failure"
                    );
                }
            }
        }
    }

    Ok(reports)
}

/// Expand enabled templates into concrete rows for every matching date in
/// `[from, until]`, ordered by (date, start time).
fn materialize_window(
    templates: &[RecurringTemplate],
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> Vec<AvailabilityBlock> {
    let mut rows = Vec::new();
    let mut date = from;
    while date <= until {
        for template in templates.iter().filter(|t| t.enabled) {
            if template.matches_date(date) {
                rows.push(AvailabilityBlock {
                    venue_id: template.venue_id,
                    date,
                    start_time: template.start_time,
                    end_time: template.end_time,
                    is_available: true,
                    source: BlockSource::Template,
                });
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    rows.sort_by_key(|r| (r.date, r.start_time));
    rows
}
