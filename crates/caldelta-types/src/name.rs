use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Namespace of every standard iCalendar entity name (xCal, RFC 6321).
pub const ICAL_NS: &str = "urn:ietf:params:xml:ns:icalendar-2.0";

/// A namespace-qualified entity name.
///
/// Ordering: `namespace` → `local` (total order). The textual form is Clark
/// notation, `{namespace}local`. Parsing a bare `local` places it in
/// [`ICAL_NS`] and lower-cases it, so `"DTSTART"` and
/// `"{urn:ietf:params:xml:ns:icalendar-2.0}dtstart"` name the same entity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace: Cow<'static, str>,
    local: Cow<'static, str>,
}

impl QName {
    /// Create a name from owned or borrowed parts.
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Cow::Owned(namespace.into()),
            local: Cow::Owned(local.into()),
        }
    }

    /// Create a name from static parts, usable in `const` items.
    pub const fn from_static(namespace: &'static str, local: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            local: Cow::Borrowed(local),
        }
    }

    /// A name in the iCalendar namespace.
    pub const fn ical(local: &'static str) -> Self {
        Self::from_static(ICAL_NS, local)
    }

    /// The namespace URI (may be empty).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local part.
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Debug for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == ICAL_NS {
            write!(f, "QName({})", self.local)
        } else {
            write!(f, "QName({self})")
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl FromStr for QName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let Some(rest) = s.strip_prefix('{') else {
            if s.is_empty() || s.contains('}') {
                return Err(TypeError::InvalidName(s.to_string()));
            }
            return Ok(Self::new(ICAL_NS, s.to_ascii_lowercase()));
        };

        let (namespace, local) = rest
            .split_once('}')
            .ok_or_else(|| TypeError::InvalidName(s.to_string()))?;
        if local.is_empty() {
            return Err(TypeError::InvalidName(s.to_string()));
        }

        Ok(Self::new(namespace, local))
    }
}

impl Serialize for QName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Well-known entity names.
pub mod names {
    use super::QName;

    // Components
    pub const VCALENDAR: QName = QName::ical("vcalendar");
    pub const VEVENT: QName = QName::ical("vevent");
    pub const VTODO: QName = QName::ical("vtodo");
    pub const VJOURNAL: QName = QName::ical("vjournal");
    pub const VFREEBUSY: QName = QName::ical("vfreebusy");
    pub const VALARM: QName = QName::ical("valarm");
    pub const VTIMEZONE: QName = QName::ical("vtimezone");
    pub const STANDARD: QName = QName::ical("standard");
    pub const DAYLIGHT: QName = QName::ical("daylight");

    // Properties
    pub const ACTION: QName = QName::ical("action");
    pub const ATTACH: QName = QName::ical("attach");
    pub const ATTENDEE: QName = QName::ical("attendee");
    pub const CALSCALE: QName = QName::ical("calscale");
    pub const CATEGORIES: QName = QName::ical("categories");
    pub const CLASS: QName = QName::ical("class");
    pub const CREATED: QName = QName::ical("created");
    pub const DESCRIPTION: QName = QName::ical("description");
    pub const DTEND: QName = QName::ical("dtend");
    pub const DTSTAMP: QName = QName::ical("dtstamp");
    pub const DTSTART: QName = QName::ical("dtstart");
    pub const DUE: QName = QName::ical("due");
    pub const DURATION: QName = QName::ical("duration");
    pub const EXDATE: QName = QName::ical("exdate");
    pub const FREEBUSY: QName = QName::ical("freebusy");
    pub const GEO: QName = QName::ical("geo");
    pub const LAST_MODIFIED: QName = QName::ical("last-modified");
    pub const LOCATION: QName = QName::ical("location");
    pub const ORGANIZER: QName = QName::ical("organizer");
    pub const PRODID: QName = QName::ical("prodid");
    pub const RECURRENCE_ID: QName = QName::ical("recurrence-id");
    pub const REQUEST_STATUS: QName = QName::ical("request-status");
    pub const RESOURCES: QName = QName::ical("resources");
    pub const RRULE: QName = QName::ical("rrule");
    pub const SEQUENCE: QName = QName::ical("sequence");
    pub const STATUS: QName = QName::ical("status");
    pub const SUMMARY: QName = QName::ical("summary");
    pub const TRANSP: QName = QName::ical("transp");
    pub const TRIGGER: QName = QName::ical("trigger");
    pub const TZOFFSETFROM: QName = QName::ical("tzoffsetfrom");
    pub const TZOFFSETTO: QName = QName::ical("tzoffsetto");
    pub const UID: QName = QName::ical("uid");
    pub const URL: QName = QName::ical("url");
    pub const VERSION: QName = QName::ical("version");

    /// `tzid` is both the VTIMEZONE property and the date-time parameter.
    pub const TZID: QName = QName::ical("tzid");

    // Parameters
    pub const CN: QName = QName::ical("cn");
    pub const FBTYPE: QName = QName::ical("fbtype");
    pub const LANGUAGE: QName = QName::ical("language");
    pub const PARTSTAT: QName = QName::ical("partstat");
    pub const RANGE: QName = QName::ical("range");
    pub const ROLE: QName = QName::ical("role");
    pub const RSVP: QName = QName::ical("rsvp");

    // Vendor extensions
    pub const X_BEDEWORK_UID: QName = QName::ical("x-bedework-uid");
    pub const X_BEDEWORK_EXSYNCH_ORGANIZER: QName = QName::ical("x-bedework-exsynch-organizer");
    pub const X_BEDEWORK_WRAPPER: QName = QName::ical("x-bedework-wrapper");
    pub const X_BEDEWORK_WRAPPED_NAME: QName = QName::ical("x-bedework-wrapped-name");
}
