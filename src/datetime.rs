//! Date/time utilities for Filebay.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a filesystem modification time as an RFC 3339 UTC timestamp.
pub fn to_rfc3339(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
