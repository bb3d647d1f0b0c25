use chrono::{DateTime, Utc};

use crate::parsing::remaining_days;
use crate::types::{HostCheckResult, NotificationTarget};

/// Select the hosts whose certificates expire in strictly fewer than
/// `threshold_days` days, preserving input order.
///
/// Results without a known expiry were already reported by the prober and are
/// skipped here. Already-expired certificates have negative remaining days and
/// are always selected. `now` is read once by the caller, so repeating the
/// call over the same inputs yields the same selection.
pub fn select_targets(
    results: &[HostCheckResult],
    threshold_days: i64,
    now: DateTime<Utc>,
) -> Vec<NotificationTarget> {
    results
        .iter()
        .filter_map(|result| {
            let expiry = result.expiry_timestamp?;
            let remaining = remaining_days(expiry, now);
            if remaining < threshold_days {
                Some(NotificationTarget {
                    hostname: result.hostname.clone(),
                    expiry_timestamp: expiry,
                    remaining_days: remaining,
                })
            } else {
                None
            }
        })
        .collect()
}
