use chrono::{DateTime, NaiveDateTime, Utc};

/// Wire format of the X.509 notAfter field as surfaced by a TLS peer
/// certificate, e.g. `Jan 02 15:04:05 2030 GMT`.
const NOT_AFTER_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parse a textual notAfter value into an absolute instant.
///
/// The day may be zero-padded (`Jan 02`) or space-padded (`Jan  2`, the
/// OpenSSL rendering); both are accepted. The trailing zone name is required
/// to be GMT, which is the only zone the wire format ever carries.
pub fn parse_not_after(raw: &str) -> Option<DateTime<Utc>> {
    let normalized: Vec<&str> = raw.split_whitespace().collect();
    let (zone, rest) = normalized.split_last()?;
    if *zone != "GMT" && *zone != "UTC" {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&rest.join(" "), NOT_AFTER_FORMAT).ok()?;
    Some(naive.and_utc())
}

/// Format an expiry instant as the `YYYY-MM-DD` date shown in notifications.
pub fn format_expiry_date(expiry: DateTime<Utc>) -> String {
    expiry.format("%Y-%m-%d").to_string()
}

/// Whole days from `now` until `expiry`, floored (euclidean division of whole
/// seconds), so an expiry two hours in the past yields -1, not 0.
pub fn remaining_days(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_seconds().div_euclid(86_400)
}
