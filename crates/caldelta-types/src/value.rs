//! Calendar value payloads.
//!
//! [`Value`] is a closed union: every value a codec can place on a property
//! or parameter is one of its variants. The diff engine never looks inside a
//! value directly; it asks the converter registered for the value's
//! [`ValueKind`](crate::ValueKind).

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::kind::ValueKind;

const ICAL_DATE: &str = "%Y%m%d";
const ICAL_LOCAL: &str = "%Y%m%dT%H%M%S";
const ICAL_UTC: &str = "%Y%m%dT%H%M%SZ";

/// Format a UTC instant as an iCalendar `DATE-TIME` with the `Z` suffix.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format(ICAL_UTC).to_string()
}

/// A value that may be a date, a local (floating or zoned) date-time, or a
/// UTC date-time.
///
/// Whether a `Local` value is floating or zoned is decided by the presence
/// of a TZID parameter on the owning property, not by the value itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum DateOrDateTime {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Utc(DateTime<Utc>),
}

impl DateOrDateTime {
    /// Parse the iCalendar textual form: `yyyymmdd`, `yyyymmddThhmmss` or
    /// `yyyymmddThhmmssZ`.
    pub fn parse_ical(s: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidDateTime(s.to_string());

        match s.len() {
            8 => NaiveDate::parse_from_str(s, ICAL_DATE)
                .map(Self::Date)
                .map_err(|_| invalid()),
            15 => NaiveDateTime::parse_from_str(s, ICAL_LOCAL)
                .map(Self::Local)
                .map_err(|_| invalid()),
            16 if s.ends_with('Z') => NaiveDateTime::parse_from_str(&s[..15], ICAL_LOCAL)
                .map(|naive| Self::Utc(naive.and_utc()))
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// The iCalendar textual form.
    pub fn to_ical_string(&self) -> String {
        match self {
            Self::Date(d) => d.format(ICAL_DATE).to_string(),
            Self::Local(dt) => dt.format(ICAL_LOCAL).to_string(),
            Self::Utc(dt) => format_utc(dt),
        }
    }

    /// Returns `true` for a date-only value.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl fmt::Display for DateOrDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ical_string())
    }
}

/// RRULE frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        };
        f.write_str(s)
    }
}

/// Day of the week as used by BYDAY and WKST.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mo => "MO",
            Self::Tu => "TU",
            Self::We => "WE",
            Self::Th => "TH",
            Self::Fr => "FR",
            Self::Sa => "SA",
            Self::Su => "SU",
        };
        f.write_str(s)
    }
}

/// A BYDAY entry, e.g. `MO`, `1MO` or `-1SU`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdayNum {
    pub ordinal: Option<i8>,
    pub weekday: Weekday,
}

impl WeekdayNum {
    pub fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    pub fn nth(ordinal: i8, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{n}{}", self.weekday),
            None => write!(f, "{}", self.weekday),
        }
    }
}

/// A recurrence rule (RRULE / EXRULE value).
///
/// Optional parts are `None` or empty when the rule does not state them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recur {
    pub freq: Frequency,
    #[serde(default)]
    pub until: Option<DateOrDateTime>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub interval: Option<u32>,
    #[serde(default)]
    pub by_second: Vec<u8>,
    #[serde(default)]
    pub by_minute: Vec<u8>,
    #[serde(default)]
    pub by_hour: Vec<u8>,
    #[serde(default)]
    pub by_day: Vec<WeekdayNum>,
    #[serde(default)]
    pub by_month_day: Vec<i8>,
    #[serde(default)]
    pub by_year_day: Vec<i16>,
    #[serde(default)]
    pub by_week_no: Vec<i8>,
    #[serde(default)]
    pub by_month: Vec<u8>,
    #[serde(default)]
    pub by_set_pos: Vec<i16>,
    #[serde(default)]
    pub wkst: Option<Weekday>,
}

impl Recur {
    /// A rule with only a frequency.
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            until: None,
            count: None,
            interval: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            wkst: None,
        }
    }
}

/// GEO latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

/// ATTACH value: inline base64 data or a reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attachment {
    Uri(String),
    Binary(String),
}

/// End of a period: an explicit instant or a duration from the start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodEnd {
    End(DateTime<Utc>),
    Duration(String),
}

/// A FREEBUSY period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: PeriodEnd,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            PeriodEnd::End(end) => write!(f, "{}/{}", format_utc(&self.start), format_utc(end)),
            PeriodEnd::Duration(d) => write!(f, "{}/{d}", format_utc(&self.start)),
        }
    }
}

/// REQUEST-STATUS value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatus {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extdata: Option<String>,
}

/// TRIGGER value: a duration relative to the start/end, or an absolute instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    Duration(String),
    DateTime(DateTime<Utc>),
}

/// Properties and parameters whose text value is drawn from an enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumKind {
    // Properties
    Status,
    Class,
    Transp,
    CalScale,
    Action,
    // Parameters
    Cutype,
    Encoding,
    Fbtype,
    Partstat,
    Range,
    Related,
    Reltype,
    Role,
    ScheduleAgent,
    ScheduleForceSend,
}

impl EnumKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Class => "class",
            Self::Transp => "transp",
            Self::CalScale => "calscale",
            Self::Action => "action",
            Self::Cutype => "cutype",
            Self::Encoding => "encoding",
            Self::Fbtype => "fbtype",
            Self::Partstat => "partstat",
            Self::Range => "range",
            Self::Related => "related",
            Self::Reltype => "reltype",
            Self::Role => "role",
            Self::ScheduleAgent => "schedule-agent",
            Self::ScheduleForceSend => "schedule-force-send",
        }
    }
}

/// The payload of a property or parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Value {
    Text(String),
    TextList(Vec<String>),
    /// CATEGORIES: a text list whose elements are compared independently.
    Categories(Vec<String>),
    Integer(i64),
    Uri(String),
    CalAddress(String),
    CalAddressList(Vec<String>),
    UtcOffset(String),
    Boolean(bool),
    Duration(String),
    /// A floating date-time.
    DateTime(NaiveDateTime),
    UtcDateTime(DateTime<Utc>),
    /// A date or date-time whose zone is carried by a TZID parameter.
    DateOrDateTime(DateOrDateTime),
    Recur(Recur),
    Geo(Geo),
    Attach(Attachment),
    FreeBusy(Vec<Period>),
    RequestStatus(RequestStatus),
    Trigger(Trigger),
    Enumerated { kind: EnumKind, text: String },
    /// A value of a caller-defined kind, compared by a caller-registered
    /// converter.
    Extension { kind: String, text: String },
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn enumerated(kind: EnumKind, text: impl Into<String>) -> Self {
        Self::Enumerated {
            kind,
            text: text.into(),
        }
    }

    /// Parse an iCalendar date/date-time into a [`Value::DateOrDateTime`].
    pub fn date_or_date_time(s: &str) -> Result<Self, TypeError> {
        DateOrDateTime::parse_ical(s).map(Self::DateOrDateTime)
    }

    /// The concrete kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::TextList(_) => ValueKind::TextList,
            Self::Categories(_) => ValueKind::Categories,
            Self::Integer(_) => ValueKind::Integer,
            Self::Uri(_) => ValueKind::Uri,
            Self::CalAddress(_) => ValueKind::CalAddress,
            Self::CalAddressList(_) => ValueKind::CalAddressList,
            Self::UtcOffset(_) => ValueKind::UtcOffset,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Duration(_) => ValueKind::Duration,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::UtcDateTime(_) => ValueKind::UtcDateTime,
            Self::DateOrDateTime(_) => ValueKind::DateOrDateTime,
            Self::Recur(_) => ValueKind::Recur,
            Self::Geo(_) => ValueKind::Geo,
            Self::Attach(_) => ValueKind::Attach,
            Self::FreeBusy(_) => ValueKind::FreeBusy,
            Self::RequestStatus(_) => ValueKind::RequestStatus,
            Self::Trigger(_) => ValueKind::Trigger,
            Self::Enumerated { kind, .. } => ValueKind::Enumerated(*kind),
            Self::Extension { kind, .. } => ValueKind::Extension(kind.clone()),
        }
    }

    /// The text of a single-text value, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enumerated { text: s, .. } | Self::Extension { text: s, .. } => {
                Some(s.as_str())
            }
            _ => None,
        }
    }
}
