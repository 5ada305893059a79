use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use caldelta_types::{EnumKind, Value, ValueKind};
use tracing::trace;

use crate::comparator::ValueComparator;
use crate::converter::ValueConverter;
use crate::converters::{
    AttachConverter, DateTimeConverter, FreeBusyConverter, GeoConverter, ListConverter,
    RecurConverter, RequestStatusConverter, ScalarConverter, TextConverter, TriggerConverter,
};
use crate::error::{ValueError, ValueResult};

/// Maps value kinds to converters.
///
/// A registry may be layered over a shared base with [`overlay`]: lookups
/// consult this layer first, then the base, and registrations never touch
/// the base. Within a layer, the value's exact kind is tried first, then
/// each generalization in turn.
///
/// [`overlay`]: ConverterRegistry::overlay
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<ValueKind, Arc<dyn ValueConverter>>,
    base: Option<Arc<ConverterRegistry>>,
}

impl ConverterRegistry {
    /// A registry with no converters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in converter table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        register_defaults(&mut registry);
        registry
    }

    /// An empty layer whose lookups fall through to `base`.
    pub fn overlay(base: Arc<ConverterRegistry>) -> Self {
        Self {
            converters: HashMap::new(),
            base: Some(base),
        }
    }

    /// Add or replace the converter for `kind` in this layer.
    pub fn register<C>(&mut self, kind: ValueKind, converter: C) -> &mut Self
    where
        C: ValueConverter + 'static,
    {
        self.register_shared(kind, Arc::new(converter))
    }

    /// Add or replace the converter for `kind` with a shared instance.
    pub fn register_shared(
        &mut self,
        kind: ValueKind,
        converter: Arc<dyn ValueConverter>,
    ) -> &mut Self {
        self.converters.insert(kind, converter);
        self
    }

    /// Find the converter serving `kind`.
    pub fn resolve(&self, kind: &ValueKind) -> ValueResult<&dyn ValueConverter> {
        self.lookup(kind)
            .ok_or_else(|| ValueError::UnknownValueKind { kind: kind.clone() })
    }

    /// Find the converter serving `value`'s kind.
    pub fn resolve_value(&self, value: &Value) -> ValueResult<&dyn ValueConverter> {
        self.resolve(&value.kind())
    }

    /// Shorthand for resolving and converting `value` to its comparator.
    pub fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
        self.resolve_value(value)?.comparator(value)
    }

    /// Returns `true` if a converter serves `kind` in any layer.
    pub fn contains(&self, kind: &ValueKind) -> bool {
        self.lookup(kind).is_some()
    }

    /// Number of converters registered in this layer.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn lookup(&self, kind: &ValueKind) -> Option<&dyn ValueConverter> {
        for candidate in kind.chain() {
            if let Some(converter) = self.converters.get(&candidate) {
                if candidate != *kind {
                    trace!(%kind, via = %candidate, "converter resolved by generalization");
                }
                return Some(converter.as_ref());
            }
        }
        self.base.as_deref().and_then(|base| base.lookup(kind))
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self
            .converters
            .iter()
            .map(|(kind, c)| format!("{kind}={}", c.name()))
            .collect();
        kinds.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &kinds)
            .field("base", &self.base)
            .finish()
    }
}

/// Populate `registry` with the built-in converter table.
///
/// Enumerated kinds are not listed individually: they reach the text
/// converter through [`ValueKind::EnumeratedText`].
pub fn register_defaults(registry: &mut ConverterRegistry) {
    let text: Arc<dyn ValueConverter> = Arc::new(TextConverter);
    let scalar: Arc<dyn ValueConverter> = Arc::new(ScalarConverter);
    let temporal: Arc<dyn ValueConverter> = Arc::new(DateTimeConverter);

    registry
        .register_shared(ValueKind::Text, text.clone())
        .register_shared(ValueKind::EnumeratedText, text)
        .register(ValueKind::TextList, ListConverter::whole())
        .register(ValueKind::Categories, ListConverter::splitting())
        .register(ValueKind::CalAddressList, ListConverter::whole());

    for kind in [
        ValueKind::Integer,
        ValueKind::Uri,
        ValueKind::CalAddress,
        ValueKind::UtcOffset,
        ValueKind::Boolean,
        ValueKind::Duration,
    ] {
        registry.register_shared(kind, scalar.clone());
    }

    for kind in [
        ValueKind::DateTime,
        ValueKind::UtcDateTime,
        ValueKind::DateOrDateTime,
    ] {
        registry.register_shared(kind, temporal.clone());
    }

    registry
        .register(ValueKind::Recur, RecurConverter)
        .register(ValueKind::Geo, GeoConverter)
        .register(ValueKind::Attach, AttachConverter)
        .register(ValueKind::FreeBusy, FreeBusyConverter)
        .register(ValueKind::RequestStatus, RequestStatusConverter)
        .register(ValueKind::Trigger, TriggerConverter);
}

/// Every enumerated kind, for callers that want to override them one by one.
pub const ENUM_KINDS: [EnumKind; 15] = [
    EnumKind::Status,
    EnumKind::Class,
    EnumKind::Transp,
    EnumKind::CalScale,
    EnumKind::Action,
    EnumKind::Cutype,
    EnumKind::Encoding,
    EnumKind::Fbtype,
    EnumKind::Partstat,
    EnumKind::Range,
    EnumKind::Related,
    EnumKind::Reltype,
    EnumKind::Role,
    EnumKind::ScheduleAgent,
    EnumKind::ScheduleForceSend,
];
