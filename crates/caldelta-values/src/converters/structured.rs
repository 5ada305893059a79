use caldelta_types::value::format_utc;
use caldelta_types::{Attachment, PeriodEnd, Trigger, Value};

use crate::comparator::{ValueComparator, ValueTag};
use crate::converter::ValueConverter;
use crate::error::{ValueError, ValueResult};

// ---------------------------------------------------------------------------
// Geo
// ---------------------------------------------------------------------------

/// Compares GEO by latitude, then longitude.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoConverter;

impl ValueConverter for GeoConverter {
    fn name(&self) -> &'static str {
        "geo"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let Value::Geo(geo) = value else {
            return Err(ValueError::mismatch(self.name(), value));
        };
        let mut vc = ValueComparator::single(ValueTag::Latitude, geo.latitude.to_string());
        vc.push(ValueTag::Longitude, geo.longitude.to_string());
        Ok(vc)
    }
}

// ---------------------------------------------------------------------------
// Attach
// ---------------------------------------------------------------------------

/// Compares ATTACH by inline data or by reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttachConverter;

impl ValueConverter for AttachConverter {
    fn name(&self) -> &'static str {
        "attach"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        match value {
            Value::Attach(Attachment::Binary(data)) => {
                Ok(ValueComparator::single(ValueTag::Binary, data.clone()))
            }
            Value::Attach(Attachment::Uri(uri)) => {
                Ok(ValueComparator::single(ValueTag::Uri, uri.clone()))
            }
            _ => Err(ValueError::mismatch(self.name(), value)),
        }
    }
}

// ---------------------------------------------------------------------------
// Request status
// ---------------------------------------------------------------------------

/// Compares REQUEST-STATUS by code, then description and extra data when
/// present.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestStatusConverter;

impl ValueConverter for RequestStatusConverter {
    fn name(&self) -> &'static str {
        "request-status"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let Value::RequestStatus(status) = value else {
            return Err(ValueError::mismatch(self.name(), value));
        };
        let mut vc = ValueComparator::single(ValueTag::Code, status.code.clone());
        vc.push_opt(ValueTag::Description, status.description.clone());
        vc.push_opt(ValueTag::ExtData, status.extdata.clone());
        Ok(vc)
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Compares TRIGGER by its relative duration or absolute instant.
#[derive(Debug, Default, Clone, Copy)]
pub struct TriggerConverter;

impl ValueConverter for TriggerConverter {
    fn name(&self) -> &'static str {
        "trigger"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        match value {
            Value::Trigger(Trigger::Duration(d)) => {
                Ok(ValueComparator::single(ValueTag::Duration, d.clone()))
            }
            Value::Trigger(Trigger::DateTime(dt)) => {
                Ok(ValueComparator::single(ValueTag::UtcDateTime, format_utc(dt)))
            }
            _ => Err(ValueError::mismatch(self.name(), value)),
        }
    }
}

// ---------------------------------------------------------------------------
// Free/busy
// ---------------------------------------------------------------------------

/// Compares FREEBUSY period lists; normalizes to one period per unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreeBusyConverter;

impl ValueConverter for FreeBusyConverter {
    fn name(&self) -> &'static str {
        "free-busy"
    }

    fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        let Value::FreeBusy(periods) = value else {
            return Err(ValueError::mismatch(self.name(), value));
        };
        Ok(periods
            .iter()
            .map(|p| {
                let end = match &p.end {
                    PeriodEnd::End(end) => format_utc(end),
                    PeriodEnd::Duration(d) => d.clone(),
                };
                (ValueTag::Period, format!("{}\t{end}", format_utc(&p.start)))
            })
            .collect())
    }

    fn normalize(&self, value: &Value) -> ValueResult<Vec<Value>> {
        let Value::FreeBusy(periods) = value else {
            return Err(ValueError::mismatch(self.name(), value));
        };
        if periods.len() < 2 {
            return Ok(vec![value.clone()]);
        }
        Ok(periods
            .iter()
            .map(|p| Value::FreeBusy(vec![p.clone()]))
            .collect())
    }
}
