use std::fmt;
use std::sync::Arc;

use caldelta_tz::{IanaTimezones, TimezoneResolver};
use caldelta_types::{names, Component, QName, ValueKind};
use caldelta_values::{ConverterRegistry, ValueConverter};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::merge::Entity;
use crate::selection::ComponentSelection;
use crate::sibling::Canonicalizer;

/// Name reported when a calendar list is empty.
const ICALENDAR: QName = QName::ical("icalendar");

/// Computes structural diffs between calendar trees.
///
/// An engine holds only immutable, shared state, so one instance can serve
/// any number of threads. Every call canonicalizes both trees afresh; no
/// state is carried between calls.
#[derive(Clone)]
pub struct DiffEngine {
    config: Arc<DiffConfig>,
    registry: Arc<ConverterRegistry>,
    timezones: Arc<dyn TimezoneResolver>,
}

impl DiffEngine {
    /// Create an engine from explicit parts.
    pub fn new(
        config: DiffConfig,
        registry: Arc<ConverterRegistry>,
        timezones: Arc<dyn TimezoneResolver>,
    ) -> DiffResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            registry,
            timezones,
        })
    }

    /// Default configuration, the built-in converters and the IANA database.
    pub fn with_defaults() -> Self {
        Self {
            config: Arc::new(DiffConfig::default()),
            registry: Arc::new(ConverterRegistry::with_defaults()),
            timezones: Arc::new(IanaTimezones),
        }
    }

    pub fn builder() -> DiffEngineBuilder {
        DiffEngineBuilder::default()
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// A canonicalizer borrowing this engine's state.
    pub fn canonicalizer(&self) -> Canonicalizer<'_> {
        Canonicalizer::new(&self.config, &self.registry, self.timezones.as_ref())
    }

    // ---- Diff operations ----

    /// Diff two trees rooted at the same outer component.
    ///
    /// Returns `None` when the trees are equivalent under the configured
    /// skip set, otherwise the changes that turn `old` into `new`.
    pub fn diff(&self, new: &Component, old: &Component) -> DiffResult<Option<ComponentSelection>> {
        let cx = self.canonicalizer();
        let new_node = cx.component(new)?;
        let old_node = cx.component(old)?;
        let selection = new_node.diff(&old_node)?;

        match &selection {
            Some(sel) => debug!(
                component = %new.name,
                additions = sel.additions(),
                removals = sel.removals(),
                modifications = sel.modifications(),
                "diff complete"
            ),
            None => debug!(component = %new.name, "no differences"),
        }
        Ok(selection)
    }

    /// Diff the first calendar of each list.
    pub fn diff_calendars(
        &self,
        new: &[Component],
        old: &[Component],
    ) -> DiffResult<Option<ComponentSelection>> {
        let (Some(new), Some(old)) = (new.first(), old.first()) else {
            return Err(DiffError::ambiguous(&ICALENDAR, &names::VCALENDAR));
        };
        self.diff(new, old)
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for DiffEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`DiffEngine`].
///
/// Converters added with [`converter`](Self::converter) go into an overlay
/// on top of the base registry; the base itself is never modified and may
/// be shared with other engines.
pub struct DiffEngineBuilder {
    config: DiffConfig,
    base: Option<Arc<ConverterRegistry>>,
    overrides: Vec<(ValueKind, Arc<dyn ValueConverter>)>,
    timezones: Arc<dyn TimezoneResolver>,
}

impl Default for DiffEngineBuilder {
    fn default() -> Self {
        Self {
            config: DiffConfig::default(),
            base: None,
            overrides: Vec::new(),
            timezones: Arc::new(IanaTimezones),
        }
    }
}

impl DiffEngineBuilder {
    pub fn config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    /// Exclude a property name from comparison.
    pub fn skip_property(mut self, name: QName) -> Self {
        self.config.skip.properties.insert(name);
        self
    }

    /// Match and order `from` under the name `to`.
    pub fn map_name(mut self, from: QName, to: QName) -> Self {
        self.config.mapped_names.insert(from, to);
        self
    }

    /// Base registry; defaults to the built-in table.
    pub fn registry(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.base = Some(registry);
        self
    }

    /// Override the converter for `kind` for this engine only.
    pub fn converter<C>(mut self, kind: ValueKind, converter: C) -> Self
    where
        C: ValueConverter + 'static,
    {
        self.overrides.push((kind, Arc::new(converter)));
        self
    }

    pub fn timezones<R>(mut self, timezones: R) -> Self
    where
        R: TimezoneResolver + 'static,
    {
        self.timezones = Arc::new(timezones);
        self
    }

    pub fn build(self) -> DiffResult<DiffEngine> {
        let base = self
            .base
            .unwrap_or_else(|| Arc::new(ConverterRegistry::with_defaults()));

        let registry = if self.overrides.is_empty() {
            base
        } else {
            let mut layer = ConverterRegistry::overlay(base);
            for (kind, converter) in self.overrides {
                layer.register_shared(kind, converter);
            }
            Arc::new(layer)
        };

        DiffEngine::new(self.config, registry, self.timezones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caldelta_tz::FixedTimezones;
    use caldelta_types::{EnumKind, Parameter, Property, Trigger, Value};
    use caldelta_values::{ValueComparator, ValueError, ValueResult, ValueTag};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn calendar(children: Vec<Component>) -> Component {
        let mut cal = Component::new(names::VCALENDAR)
            .with_property(Property::new(names::PRODID, Value::text("-//caldelta//test//EN")))
            .with_property(Property::new(names::VERSION, Value::text("2.0")));
        cal.components = children;
        cal
    }

    fn event(uid: &str) -> Component {
        Component::new(names::VEVENT)
            .with_property(Property::new(names::UID, Value::text(uid)))
            .with_property(Property::new(
                names::DTSTAMP,
                Value::UtcDateTime(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
            ))
    }

    fn summary(text: &str) -> Property {
        Property::new(names::SUMMARY, Value::text(text))
    }

    fn categories(items: &[&str]) -> Property {
        Property::new(
            names::CATEGORIES,
            Value::Categories(items.iter().map(|s| s.to_string()).collect()),
        )
    }

    fn attendee(partstat: &str) -> Property {
        Property::new(names::ATTENDEE, Value::CalAddress("mailto:a@example.com".into()))
            .with_parameter(Parameter::text(names::CN, "Alice"))
            .with_parameter(Parameter::new(
                names::PARTSTAT,
                Value::enumerated(EnumKind::Partstat, partstat),
            ))
    }

    fn alarm(trigger: &str) -> Component {
        Component::new(names::VALARM)
            .with_property(Property::new(
                names::ACTION,
                Value::enumerated(EnumKind::Action, "AUDIO"),
            ))
            .with_property(Property::new(
                names::TRIGGER,
                Value::Trigger(Trigger::Duration(trigger.into())),
            ))
    }

    fn instance(uid: &str, rid: &str, tzid: &str) -> Component {
        event(uid).with_property(
            Property::new(names::RECURRENCE_ID, Value::date_or_date_time(rid).unwrap())
                .with_parameter(Parameter::text(names::TZID, tzid)),
        )
    }

    /// The single event change beneath a calendar selection.
    fn event_change(sel: &ComponentSelection) -> &ComponentSelection {
        let comps = sel.components.as_ref().unwrap();
        assert_eq!(comps.changed.len(), 1);
        &comps.changed[0]
    }

    #[test]
    fn identical_trees_have_no_diff() {
        let cal = calendar(vec![event("u1")
            .with_property(summary("Standup"))
            .with_property(categories(&["work", "daily"]))
            .with_property(attendee("ACCEPTED"))
            .with_component(alarm("-PT15M"))]);
        let engine = DiffEngine::with_defaults();
        assert!(engine.diff(&cal, &cal).unwrap().is_none());
        assert!(engine.diff(&cal, &cal.clone()).unwrap().is_none());
    }

    #[test]
    fn skipped_properties_do_not_register() {
        let old = calendar(vec![event("u1").with_property(summary("Standup"))]);
        let mut restamped = event("u1").with_property(summary("Standup"));
        restamped.properties[1].value =
            Value::UtcDateTime(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        let new = calendar(vec![restamped]);

        assert!(DiffEngine::with_defaults().diff(&new, &old).unwrap().is_none());

        let exhaustive = DiffEngine::builder()
            .config(DiffConfig::exhaustive())
            .build()
            .unwrap();
        let sel = exhaustive.diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.modifications(), 1);
    }

    #[test]
    fn added_category_is_a_single_add() {
        let old = calendar(vec![event("u1").with_property(categories(&["a", "b"]))]);
        let new = calendar(vec![event("u1").with_property(categories(&["a", "b", "c"]))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions(), 1);
        assert_eq!(sel.removals() + sel.modifications(), 0);

        let props = event_change(&sel).properties.as_ref().unwrap();
        assert_eq!(props.add, vec![categories(&["c"])]);
    }

    #[test]
    fn removed_category_is_a_single_remove() {
        let old = calendar(vec![event("u1").with_property(categories(&["a", "b", "c"]))]);
        let new = calendar(vec![event("u1").with_property(categories(&["a", "c"]))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.removals(), 1);
        assert_eq!(sel.additions() + sel.modifications(), 0);

        let props = event_change(&sel).properties.as_ref().unwrap();
        assert_eq!(props.remove, vec![categories(&["b"])]);
    }

    #[test]
    fn parameter_change_is_not_a_value_change() {
        let old = calendar(vec![event("u1").with_property(attendee("NEEDS-ACTION"))]);
        let new = calendar(vec![event("u1").with_property(attendee("ACCEPTED"))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        let props = event_change(&sel).properties.as_ref().unwrap();
        assert_eq!(props.changed.len(), 1);

        let prop = &props.changed[0];
        assert_eq!(prop.property, attendee("NEEDS-ACTION"));
        assert!(prop.change.is_none());
        let params = prop.parameters.as_ref().unwrap();
        assert_eq!(params.changed.len(), 1);
        assert_eq!(params.changed[0].parameter.name, names::PARTSTAT);
        assert_eq!(
            params.changed[0].change.as_ref().unwrap().value,
            Value::enumerated(EnumKind::Partstat, "ACCEPTED")
        );
    }

    #[test]
    fn value_change_references_the_component() {
        let old = calendar(vec![event("u1").with_property(summary("Lunch"))]);
        let new = calendar(vec![event("u1").with_property(summary("Dinner"))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert!(sel.component.properties.is_empty());

        let change = event_change(&sel);
        assert_eq!(
            change.component,
            Component::new(names::VEVENT).with_property(Property::new(names::UID, Value::text("u1")))
        );
        let props = change.properties.as_ref().unwrap();
        assert_eq!(props.changed[0].property, summary("Lunch"));
        assert_eq!(props.changed[0].change, Some(summary("Dinner")));
    }

    #[test]
    fn recurrence_instances_match_across_timezones() {
        let old = calendar(vec![
            event("u1").with_property(summary("Standup")),
            instance("u1", "20240601T080000", "America/New_York").with_property(summary("Moved")),
        ]);
        let new = calendar(vec![
            event("u1").with_property(summary("Standup")),
            instance("u1", "20240601T140000", "Europe/Paris").with_property(summary("Cancelled")),
        ]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions() + sel.removals(), 0);

        let change = event_change(&sel);
        let rid = change.component.property(&names::RECURRENCE_ID).unwrap();
        assert_eq!(rid.text_parameter(&names::TZID), Some("Europe/Paris"));

        // The re-zoned RECURRENCE-ID and the new SUMMARY are both reported.
        let props = change.properties.as_ref().unwrap();
        let changed: Vec<_> = props.changed.iter().map(|p| p.property.name.clone()).collect();
        assert_eq!(changed, vec![names::RECURRENCE_ID, names::SUMMARY]);
        assert_eq!(sel.modifications(), 3);
    }

    #[test]
    fn rezoned_recurrence_id_is_a_value_and_tzid_change() {
        let old = calendar(vec![instance("u1", "20240601T140000", "Europe/Paris")]);
        let new = calendar(vec![instance("u1", "20240601T080000", "America/New_York")]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions() + sel.removals(), 0);

        let props = event_change(&sel).properties.as_ref().unwrap();
        assert_eq!(props.changed.len(), 1);
        let rid = &props.changed[0];
        assert_eq!(rid.property.text_parameter(&names::TZID), Some("Europe/Paris"));
        assert_eq!(
            rid.change.as_ref().unwrap().value,
            Value::date_or_date_time("20240601T080000").unwrap()
        );
        let params = rid.parameters.as_ref().unwrap();
        assert_eq!(params.changed.len(), 1);
        assert_eq!(
            params.changed[0].change,
            Some(Parameter::text(names::TZID, "America/New_York"))
        );
    }

    #[test]
    fn range_added_to_recurrence_id_is_reported() {
        let old = calendar(vec![instance("u1", "20240601T140000", "Europe/Paris")]);
        let mut extended = instance("u1", "20240601T140000", "Europe/Paris");
        let range = Parameter::new(
            names::RANGE,
            Value::enumerated(EnumKind::Range, "THISANDFUTURE"),
        );
        extended.properties[2].parameters.push(range.clone());
        let new = calendar(vec![extended]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions(), 1);
        assert_eq!(sel.removals() + sel.modifications(), 0);

        let props = event_change(&sel).properties.as_ref().unwrap();
        let rid = &props.changed[0];
        assert!(rid.change.is_none());
        assert_eq!(rid.parameters.as_ref().unwrap().add, vec![range]);
    }

    #[test]
    fn different_events_are_added_and_removed() {
        let old = calendar(vec![event("u1").with_property(summary("Lunch"))]);
        let new = calendar(vec![event("u2").with_property(summary("Lunch"))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        let comps = sel.components.as_ref().unwrap();
        assert_eq!(comps.add.len(), 1);
        assert_eq!(comps.remove.len(), 1);
        assert!(comps.changed.is_empty());
        assert_eq!(comps.add[0].property(&names::UID).unwrap().value, Value::text("u2"));
    }

    #[test]
    fn alarm_trigger_change_is_a_single_change() {
        let old = calendar(vec![event("u1").with_component(alarm("-PT15M"))]);
        let new = calendar(vec![event("u1").with_component(alarm("-PT5M"))]);

        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.modifications(), 1);
        assert_eq!(sel.additions() + sel.removals(), 0);

        let alarms = event_change(&sel).components.as_ref().unwrap();
        assert_eq!(alarms.changed.len(), 1);
        let alarm_change = &alarms.changed[0];
        assert_eq!(alarm_change.component.properties[0].name, names::ACTION);
        let props = alarm_change.properties.as_ref().unwrap();
        assert_eq!(props.changed[0].property.name, names::TRIGGER);
    }

    #[test]
    fn unknown_value_kind_aborts_the_call() {
        let odd = calendar(vec![event("u1").with_property(Property::new(
            QName::ical("x-color"),
            Value::Extension {
                kind: "x-color".into(),
                text: "red".into(),
            },
        ))]);
        let plain = calendar(vec![event("u1")]);

        let err = DiffEngine::with_defaults().diff(&odd, &plain).unwrap_err();
        assert_eq!(
            err,
            DiffError::Value(ValueError::UnknownValueKind {
                kind: ValueKind::Extension("x-color".into())
            })
        );
    }

    #[test]
    fn missing_uid_aborts_the_call() {
        let cal = calendar(vec![Component::new(names::VEVENT).with_property(summary("?"))]);
        let err = DiffEngine::with_defaults().diff(&cal, &cal).unwrap_err();
        assert_eq!(err, DiffError::ambiguous(&names::VEVENT, &names::UID));
    }

    #[test]
    fn toml_configured_engine() {
        let config = DiffConfig::from_toml_str(
            r#"
            [skip]
            properties = ["sequence"]
            "#,
        )
        .unwrap();
        let engine = DiffEngine::builder().config(config).build().unwrap();

        let base = event("u1").with_property(Property::new(names::SEQUENCE, Value::Integer(0)));
        let bumped = event("u1").with_property(Property::new(names::SEQUENCE, Value::Integer(1)));
        assert!(engine
            .diff(&calendar(vec![bumped]), &calendar(vec![base.clone()]))
            .unwrap()
            .is_none());

        // DTSTAMP is no longer in the skip set.
        let mut restamped = base.clone();
        restamped.properties[1].value =
            Value::UtcDateTime(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        assert!(engine
            .diff(&calendar(vec![restamped]), &calendar(vec![base]))
            .unwrap()
            .is_some());
    }

    /// Compares text case-insensitively.
    struct CaseInsensitive;

    impl ValueConverter for CaseInsensitive {
        fn name(&self) -> &'static str {
            "case-insensitive"
        }

        fn comparator(&self, value: &Value) -> ValueResult<ValueComparator> {
            value
                .as_text()
                .map(|t| ValueComparator::single(ValueTag::Text, t.to_lowercase()))
                .ok_or_else(|| ValueError::mismatch(self.name(), value))
        }
    }

    #[test]
    fn converter_override_is_local_to_the_engine() {
        let status = |text: &str| {
            calendar(vec![event("u1").with_property(Property::new(
                names::STATUS,
                Value::enumerated(EnumKind::Status, text),
            ))])
        };
        let shared = Arc::new(ConverterRegistry::with_defaults());
        let lenient = DiffEngine::builder()
            .registry(shared.clone())
            .converter(ValueKind::Enumerated(EnumKind::Status), CaseInsensitive)
            .build()
            .unwrap();
        let strict = DiffEngine::builder().registry(shared).build().unwrap();

        assert!(lenient.diff(&status("confirmed"), &status("CONFIRMED")).unwrap().is_none());
        assert!(strict.diff(&status("confirmed"), &status("CONFIRMED")).unwrap().is_some());
    }

    #[test]
    fn builder_mapping_and_timezones() {
        let engine = DiffEngine::builder()
            .map_name(QName::ical("x-owner"), names::ORGANIZER)
            .skip_property(names::SEQUENCE)
            .timezones(
                FixedTimezones::new().with_zone("Office", FixedOffset::east_opt(3600).unwrap()),
            )
            .build()
            .unwrap();
        assert!(engine.config().skip.skips_property(&names::SEQUENCE));
        assert!(engine.config().skip.skips_property(&names::DTSTAMP));
        assert_eq!(
            engine.config().mapped_name(&QName::ical("x-owner")),
            &names::ORGANIZER
        );

        // Same instant written two ways: one instance, its value changed.
        let old = calendar(vec![instance("u1", "20240601T110000Z", "Office")]);
        let new = calendar(vec![instance("u1", "20240601T120000", "Office")]);
        let sel = engine.diff(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions() + sel.removals(), 0);
        assert_eq!(sel.modifications(), 1);

        let unknown = calendar(vec![instance("u1", "20240601T120000", "Elsewhere")]);
        assert!(matches!(
            engine.diff(&unknown, &old),
            Err(DiffError::TimezoneResolutionFailure { .. })
        ));
    }

    #[test]
    fn builder_rejects_chained_mapping() {
        let err = DiffEngine::builder()
            .map_name(QName::ical("x-a"), QName::ical("x-b"))
            .map_name(QName::ical("x-b"), names::SUMMARY)
            .build()
            .unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn diff_calendars_uses_first_calendar() {
        let engine = DiffEngine::with_defaults();
        let old = vec![calendar(vec![event("u1")]), calendar(vec![])];
        let new = vec![calendar(vec![event("u1").with_property(summary("x"))])];

        let sel = engine.diff_calendars(&new, &old).unwrap().unwrap();
        assert_eq!(sel.additions(), 1);

        let err = engine.diff_calendars(&[], &old).unwrap_err();
        assert!(matches!(err, DiffError::AmbiguousIdentity { .. }));
    }

    #[test]
    fn selection_serializes_to_json() {
        let old = calendar(vec![event("u1").with_property(summary("Lunch"))]);
        let new = calendar(vec![event("u1").with_property(summary("Dinner"))]);
        let sel = DiffEngine::with_defaults().diff(&new, &old).unwrap().unwrap();

        let json = serde_json::to_value(&sel).unwrap();
        assert!(json.get("properties").is_none());
        let event = &json["components"]["changed"][0];
        assert_eq!(event["properties"]["changed"][0]["change"]["value"]["value"], "Dinner");

        let back: ComponentSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, sel);
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiffEngine>();
    }
}
