use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag naming the role of one element of a [`ValueComparator`].
///
/// Variant order is part of the comparator ordering: two comparators whose
/// strings agree still differ if they carry different tags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueTag {
    Text,
    Integer,
    Uri,
    CalAddress,
    UtcOffset,
    Boolean,
    Duration,
    Date,
    DateTime,
    UtcDateTime,
    Period,
    Binary,
    Latitude,
    Longitude,
    Code,
    Description,
    ExtData,
    // Recurrence rule parts
    Freq,
    Until,
    Count,
    Interval,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    Wkst,
    /// Tag used by caller-defined converters.
    Custom(String),
}

/// The comparable form of a value.
///
/// Equal iff the sequences are equal; ordered lexicographically over the
/// `(tag, text)` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueComparator(Vec<(ValueTag, String)>);

impl ValueComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A comparator holding one element.
    pub fn single(tag: ValueTag, text: impl Into<String>) -> Self {
        Self(vec![(tag, text.into())])
    }

    /// Append an element.
    pub fn push(&mut self, tag: ValueTag, text: impl Into<String>) {
        self.0.push((tag, text.into()));
    }

    /// Append an element if `text` is present.
    pub fn push_opt(&mut self, tag: ValueTag, text: Option<impl Into<String>>) {
        if let Some(text) = text {
            self.push(tag, text);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ValueTag, String)> {
        self.0.iter()
    }
}

impl FromIterator<(ValueTag, String)> for ValueComparator {
    fn from_iter<I: IntoIterator<Item = (ValueTag, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ValueComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (tag, text)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{tag:?}={text}")?;
        }
        Ok(())
    }
}
