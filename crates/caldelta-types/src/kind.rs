use std::fmt;
use std::iter;

use serde::{Deserialize, Serialize};

use crate::name::{names, QName};
use crate::value::EnumKind;

/// The concrete kind of a [`Value`](crate::Value).
///
/// Kinds form a shallow generalization hierarchy: a converter registered for
/// a general kind also serves its more specific kinds unless they have a
/// converter of their own.
///
/// ```text
/// Categories     -> TextList
/// Enumerated(_)  -> EnumeratedText -> Text
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Text,
    TextList,
    Categories,
    Integer,
    Uri,
    CalAddress,
    CalAddressList,
    UtcOffset,
    Boolean,
    Duration,
    DateTime,
    UtcDateTime,
    DateOrDateTime,
    Recur,
    Geo,
    Attach,
    FreeBusy,
    RequestStatus,
    Trigger,
    Enumerated(EnumKind),
    /// Shared parent of every enumerated kind. No value carries it directly.
    EnumeratedText,
    Extension(String),
}

impl ValueKind {
    /// The next more generic kind, if any.
    pub fn generalization(&self) -> Option<ValueKind> {
        match self {
            Self::Categories => Some(Self::TextList),
            Self::Enumerated(_) => Some(Self::EnumeratedText),
            Self::EnumeratedText => Some(Self::Text),
            _ => None,
        }
    }

    /// This kind followed by its generalizations, most specific first.
    pub fn chain(&self) -> impl Iterator<Item = ValueKind> {
        iter::successors(Some(self.clone()), ValueKind::generalization)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::TextList => f.write_str("text-list"),
            Self::Categories => f.write_str("categories"),
            Self::Integer => f.write_str("integer"),
            Self::Uri => f.write_str("uri"),
            Self::CalAddress => f.write_str("cal-address"),
            Self::CalAddressList => f.write_str("cal-address-list"),
            Self::UtcOffset => f.write_str("utc-offset"),
            Self::Boolean => f.write_str("boolean"),
            Self::Duration => f.write_str("duration"),
            Self::DateTime => f.write_str("date-time"),
            Self::UtcDateTime => f.write_str("utc-date-time"),
            Self::DateOrDateTime => f.write_str("date-or-date-time"),
            Self::Recur => f.write_str("recur"),
            Self::Geo => f.write_str("geo"),
            Self::Attach => f.write_str("attach"),
            Self::FreeBusy => f.write_str("free-busy"),
            Self::RequestStatus => f.write_str("request-status"),
            Self::Trigger => f.write_str("trigger"),
            Self::Enumerated(kind) => write!(f, "enumerated-{}", kind.as_str()),
            Self::EnumeratedText => f.write_str("enumerated-text"),
            Self::Extension(name) => write!(f, "extension-{name}"),
        }
    }
}

/// How a component is identified across two versions of a calendar.
///
/// Variant order is the sort order of components with the same name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Not a standard component; identified by name only.
    Unknown,
    /// The outer `vcalendar` container.
    Outer,
    /// `vevent`, `vtodo`, `vjournal`: UID plus optional RECURRENCE-ID.
    Recurring,
    /// `vfreebusy`: UID only.
    UidOnly,
    /// `valarm`: ACTION only.
    Alarm,
    /// `vtimezone`.
    Timezone,
    /// `daylight` observance.
    Daylight,
    /// `standard` observance.
    Standard,
}

impl ComponentKind {
    /// Classify a component by its name.
    pub fn of(name: &QName) -> Self {
        if *name == names::VCALENDAR {
            Self::Outer
        } else if *name == names::VEVENT || *name == names::VTODO || *name == names::VJOURNAL {
            Self::Recurring
        } else if *name == names::VFREEBUSY {
            Self::UidOnly
        } else if *name == names::VALARM {
            Self::Alarm
        } else if *name == names::VTIMEZONE {
            Self::Timezone
        } else if *name == names::DAYLIGHT {
            Self::Daylight
        } else if *name == names::STANDARD {
            Self::Standard
        } else {
            Self::Unknown
        }
    }
}
