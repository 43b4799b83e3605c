use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Timezone used for every timestamp printed on reports.
pub const REPORT_TZ: Tz = chrono_tz::America::Sao_Paulo;

/// Converts a UTC instant to wall-clock time in the given timezone.
pub fn local_datetime_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Current wall-clock time in [`REPORT_TZ`].
pub fn now_in_report_tz() -> NaiveDateTime {
    local_datetime_from_utc(Utc::now(), REPORT_TZ)
}

/// `d/m/Y H:i:s`, e.g. `05/03/2025 14:07:09`.
pub fn format_report_timestamp(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}
