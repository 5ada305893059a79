use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use caldelta_types::DateOrDateTime;

use crate::error::{TzError, TzResult};
use crate::resolver::TimezoneResolver;

/// Normalize a date or date-time to a UTC instant.
///
/// - UTC values are returned unchanged; a TZID alongside them is ignored.
/// - Local values with a TZID are resolved through `resolver`.
/// - Floating values and dates are read as UTC wall-clock time (dates at
///   midnight), so two floating values compare by their text.
pub fn to_utc(
    value: &DateOrDateTime,
    tzid: Option<&str>,
    resolver: &dyn TimezoneResolver,
) -> TzResult<DateTime<Utc>> {
    match (value, tzid) {
        (DateOrDateTime::Utc(utc), _) => Ok(*utc),
        (DateOrDateTime::Date(date), _) => Ok(date.and_time(NaiveTime::MIN).and_utc()),
        (DateOrDateTime::Local(local), None) => Ok(local.and_utc()),
        (DateOrDateTime::Local(local), Some(tzid)) => {
            let zone = resolver
                .resolve(tzid)
                .ok_or_else(|| TzError::UnknownTimezone(tzid.to_string()))?;
            let nonexistent = || TzError::NonexistentLocalTime {
                tzid: tzid.to_string(),
                local: *local,
            };
            let offset = zone.offset_for_local(local).ok_or_else(nonexistent)?;
            offset
                .from_local_datetime(local)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(nonexistent)
        }
    }
}
