use std::collections::HashMap;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use tracing::trace;

/// A UTC-offset function for one zone.
pub trait ZoneOffsets: Send + Sync {
    /// The offset in effect at `local` wall-clock time, or `None` if that
    /// local time does not exist in the zone. Ambiguous times resolve to
    /// the earlier instant.
    fn offset_for_local(&self, local: &NaiveDateTime) -> Option<FixedOffset>;
}

/// Maps a timezone identifier to its offset function.
pub trait TimezoneResolver: Send + Sync {
    /// `None` when the identifier is unknown.
    fn resolve(&self, tzid: &str) -> Option<Arc<dyn ZoneOffsets>>;
}

impl ZoneOffsets for Tz {
    fn offset_for_local(&self, local: &NaiveDateTime) -> Option<FixedOffset> {
        self.offset_from_local_datetime(local)
            .earliest()
            .map(|offset| offset.fix())
    }
}

impl ZoneOffsets for FixedOffset {
    fn offset_for_local(&self, _local: &NaiveDateTime) -> Option<FixedOffset> {
        Some(*self)
    }
}

// ---------------------------------------------------------------------------
// IANA database
// ---------------------------------------------------------------------------

/// Resolves IANA identifiers such as `Europe/Paris`.
///
/// Identifiers with a vendor prefix (`/example.org/20240101_1/Europe/Paris`)
/// are retried with the trailing `Area/Location` part.
#[derive(Debug, Default, Clone, Copy)]
pub struct IanaTimezones;

impl IanaTimezones {
    fn parse(tzid: &str) -> Option<Tz> {
        if let Ok(tz) = tzid.parse::<Tz>() {
            return Some(tz);
        }

        let mut parts = tzid.rsplit('/');
        let location = parts.next()?;
        let area = parts.next()?;
        format!("{area}/{location}").parse::<Tz>().ok()
    }
}

impl TimezoneResolver for IanaTimezones {
    fn resolve(&self, tzid: &str) -> Option<Arc<dyn ZoneOffsets>> {
        let tz = Self::parse(tzid);
        if tz.is_none() {
            trace!(tzid, "IANA lookup failed");
        }
        tz.map(|tz| Arc::new(tz) as Arc<dyn ZoneOffsets>)
    }
}

// ---------------------------------------------------------------------------
// Fixed offsets
// ---------------------------------------------------------------------------

/// Resolves identifiers from an explicit table of fixed offsets.
///
/// Useful for tests and for calendars whose VTIMEZONE definitions have
/// already been reduced to a single offset.
#[derive(Debug, Default, Clone)]
pub struct FixedTimezones {
    zones: HashMap<String, FixedOffset>,
}

impl FixedTimezones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_zone(mut self, tzid: impl Into<String>, offset: FixedOffset) -> Self {
        self.insert(tzid, offset);
        self
    }

    pub fn insert(&mut self, tzid: impl Into<String>, offset: FixedOffset) {
        self.zones.insert(tzid.into(), offset);
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl TimezoneResolver for FixedTimezones {
    fn resolve(&self, tzid: &str) -> Option<Arc<dyn ZoneOffsets>> {
        self.zones
            .get(tzid)
            .map(|offset| Arc::new(*offset) as Arc<dyn ZoneOffsets>)
    }
}
