//! Canonical sibling sequences.
//!
//! Raw children of a node are turned into a strictly ordered, duplicate-free
//! sequence of wrappers before the merge sees them: skipped names are
//! dropped, multi-valued properties are split into units, every unit is
//! wrapped (recursively canonicalizing its own children) and the results
//! are collected through a `BTreeSet`, so order-equal units collapse.

use std::collections::BTreeSet;

use caldelta_tz::TimezoneResolver;
use caldelta_types::{Component, Parameter, Property};
use caldelta_values::ConverterRegistry;
use tracing::debug;

use crate::config::DiffConfig;
use crate::entity::{CompNode, ParamNode, PropNode};
use crate::error::DiffResult;

/// Everything needed to canonicalize one tree for one diff call.
#[derive(Clone, Copy)]
pub struct Canonicalizer<'c> {
    config: &'c DiffConfig,
    registry: &'c ConverterRegistry,
    timezones: &'c dyn TimezoneResolver,
}

impl<'c> Canonicalizer<'c> {
    pub fn new(
        config: &'c DiffConfig,
        registry: &'c ConverterRegistry,
        timezones: &'c dyn TimezoneResolver,
    ) -> Self {
        Self {
            config,
            registry,
            timezones,
        }
    }

    pub fn config(&self) -> &'c DiffConfig {
        self.config
    }

    pub fn registry(&self) -> &'c ConverterRegistry {
        self.registry
    }

    pub fn timezones(&self) -> &'c dyn TimezoneResolver {
        self.timezones
    }

    /// Wrap `component` with canonical children.
    ///
    /// The component itself is never skipped here: skipping applies to
    /// children only.
    pub fn component<'t>(&self, component: &'t Component) -> DiffResult<CompNode<'t>> {
        let props = self.properties(&component.properties)?;
        let comps = self.components(&component.components)?;
        CompNode::new(component, props, comps)
    }

    /// Canonical sequence of sub-components.
    pub fn components<'t>(&self, components: &'t [Component]) -> DiffResult<Vec<CompNode<'t>>> {
        let mut set = BTreeSet::new();
        for component in components {
            if self.config.skip.skips_component(&component.name) {
                debug!(name = %component.name, "skipping component");
                continue;
            }
            set.insert(self.component(component)?);
        }
        Ok(set.into_iter().collect())
    }

    /// Canonical sequence of properties.
    ///
    /// Each normalized unit becomes its own node carrying a copy of the raw
    /// property's parameters.
    pub fn properties(&self, properties: &[Property]) -> DiffResult<Vec<PropNode>> {
        let mut set = BTreeSet::new();
        for property in properties {
            if self.config.skip.skips_property(&property.name) {
                debug!(name = %property.name, "skipping property");
                continue;
            }
            let converter = self.registry.resolve_value(&property.value)?;
            for unit in converter.normalize(&property.value)? {
                let unit = Property {
                    name: property.name.clone(),
                    parameters: property.parameters.clone(),
                    value: unit,
                };
                set.insert(PropNode::new(unit, converter, self)?);
            }
        }
        Ok(set.into_iter().collect())
    }

    /// Canonical sequence of parameters.
    pub fn parameters(&self, parameters: &[Parameter]) -> DiffResult<Vec<ParamNode>> {
        let mut set = BTreeSet::new();
        for parameter in parameters {
            if self.config.skip.skips_parameter(&parameter.name) {
                debug!(name = %parameter.name, "skipping parameter");
                continue;
            }
            let converter = self.registry.resolve_value(&parameter.value)?;
            let mapped = self.config.mapped_name(&parameter.name).clone();
            for unit in converter.normalize(&parameter.value)? {
                let unit = Parameter::new(parameter.name.clone(), unit);
                set.insert(ParamNode::new(unit, mapped.clone(), converter)?);
            }
        }
        Ok(set.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use caldelta_tz::IanaTimezones;
    use caldelta_types::{names, EnumKind, QName, Trigger, Value};
    use proptest::prelude::*;

    use crate::error::DiffError;
    use crate::merge::Entity;

    fn canonical_props(properties: &[Property]) -> DiffResult<Vec<PropNode>> {
        let config = DiffConfig::default();
        let registry = ConverterRegistry::with_defaults();
        Canonicalizer::new(&config, &registry, &IanaTimezones).properties(properties)
    }

    fn is_strictly_sorted<T: Ord>(items: &[T]) -> bool {
        items.windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn categories_split_into_units() {
        let props = canonical_props(&[Property::new(
            names::CATEGORIES,
            Value::Categories(vec!["work".into(), "home".into(), "work".into()]),
        )])
        .unwrap();

        let values: Vec<_> = props.iter().map(|p| p.property().value.clone()).collect();
        assert_eq!(
            values,
            vec![
                Value::Categories(vec!["home".into()]),
                Value::Categories(vec!["work".into()]),
            ]
        );
    }

    #[test]
    fn split_units_keep_parameters() {
        let props = canonical_props(&[Property::new(
            names::CATEGORIES,
            Value::Categories(vec!["a".into(), "b".into()]),
        )
        .with_parameter(Parameter::text(names::LANGUAGE, "en"))])
        .unwrap();

        assert_eq!(props.len(), 2);
        assert!(props.iter().all(|p| p.parameters().len() == 1));
    }

    #[test]
    fn skipped_properties_are_dropped() {
        let props = canonical_props(&[
            Property::new(names::DTSTAMP, Value::text("20240101T000000Z")),
            Property::new(names::SUMMARY, Value::text("Lunch")),
        ])
        .unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].property().name, names::SUMMARY);
    }

    #[test]
    fn skipped_components_are_dropped() {
        let config = DiffConfig::from_toml_str("[skip]\ncomponents = [\"valarm\"]").unwrap();
        let registry = ConverterRegistry::with_defaults();
        let cx = Canonicalizer::new(&config, &registry, &IanaTimezones);
        let event = Component::new(names::VEVENT)
            .with_property(Property::new(names::UID, Value::text("u1")))
            .with_component(Component::new(names::VALARM));

        let node = cx.component(&event).unwrap();
        assert!(node.components().is_empty());
    }

    #[test]
    fn unknown_value_kind_aborts() {
        let err = canonical_props(&[Property::new(
            QName::ical("x-color"),
            Value::Extension {
                kind: "x-color".into(),
                text: "red".into(),
            },
        )])
        .unwrap_err();
        assert!(matches!(err, DiffError::Value(_)));
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let raw = vec![
            Property::new(names::SUMMARY, Value::text("Lunch")),
            Property::new(names::ATTENDEE, Value::CalAddress("mailto:b@example.com".into())),
            Property::new(names::ATTENDEE, Value::CalAddress("mailto:a@example.com".into())),
            Property::new(names::STATUS, Value::enumerated(EnumKind::Status, "CONFIRMED")),
        ];
        let mut reversed = raw.clone();
        reversed.reverse();

        let forward = canonical_props(&raw).unwrap();
        let backward = canonical_props(&reversed).unwrap();
        assert!(is_strictly_sorted(&forward));
        assert_eq!(forward, backward);
    }

    // -----------------------------------------------------------------------
    // Ordering totality
    // -----------------------------------------------------------------------

    fn arb_name() -> impl Strategy<Value = QName> {
        prop_oneof![
            Just(names::SUMMARY),
            Just(names::ATTENDEE),
            Just(names::CATEGORIES),
            Just(names::ORGANIZER),
            Just(names::X_BEDEWORK_EXSYNCH_ORGANIZER),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[a-c]{0,2}".prop_map(Value::Text),
            "[a-c]{0,2}".prop_map(|s| Value::enumerated(EnumKind::Status, s)),
            "[a-c]{1,2}".prop_map(Value::CalAddress),
            (0i64..3).prop_map(Value::Integer),
        ]
    }

    fn arb_parameter() -> impl Strategy<Value = Parameter> {
        (
            prop_oneof![Just(names::CN), Just(names::ROLE), Just(names::LANGUAGE)],
            arb_value(),
        )
            .prop_map(|(name, value)| Parameter::new(name, value))
    }

    /// RECURRENCE-IDs over hours and zones chosen so that distinct
    /// renditions of the same instant occur (14:00 Paris is 08:00 New York).
    fn arb_recurrence_id() -> impl Strategy<Value = Property> {
        (
            prop::sample::select(vec![2u32, 8, 14]),
            prop::option::of(prop::sample::select(vec!["Europe/Paris", "America/New_York"])),
            any::<bool>(),
        )
            .prop_map(|(hour, zone, range)| {
                let text = match zone {
                    Some(_) => format!("20240601T{hour:02}0000"),
                    None => format!("20240601T{hour:02}0000Z"),
                };
                let mut prop =
                    Property::new(names::RECURRENCE_ID, Value::date_or_date_time(&text).unwrap());
                if let Some(zone) = zone {
                    prop = prop.with_parameter(Parameter::text(names::TZID, zone));
                }
                if range {
                    prop = prop.with_parameter(Parameter::new(
                        names::RANGE,
                        Value::enumerated(EnumKind::Range, "THISANDFUTURE"),
                    ));
                }
                prop
            })
    }

    fn arb_wrapper() -> impl Strategy<Value = Property> {
        (
            prop::option::of(prop::sample::select(vec!["x-alpha", "x-beta"])),
            "[a-c]{1,2}",
        )
            .prop_map(|(wrapped, text)| {
                let mut prop = Property::new(names::X_BEDEWORK_WRAPPER, Value::Text(text));
                if let Some(wrapped) = wrapped {
                    prop = prop
                        .with_parameter(Parameter::text(names::X_BEDEWORK_WRAPPED_NAME, wrapped));
                }
                prop
            })
    }

    fn arb_property() -> impl Strategy<Value = Property> {
        let plain = (arb_name(), arb_value(), prop::collection::vec(arb_parameter(), 0..3))
            .prop_map(|(name, value, parameters)| Property {
                name,
                parameters,
                value,
            });
        prop_oneof![
            4 => plain,
            1 => arb_recurrence_id(),
            1 => arb_wrapper(),
        ]
    }

    fn arb_alarm() -> impl Strategy<Value = Component> {
        (
            prop::sample::select(vec!["AUDIO", "DISPLAY"]),
            prop::sample::select(vec!["-PT5M", "-PT15M"]),
        )
            .prop_map(|(action, trigger)| {
                Component::new(names::VALARM)
                    .with_property(Property::new(
                        names::ACTION,
                        Value::enumerated(EnumKind::Action, action),
                    ))
                    .with_property(Property::new(
                        names::TRIGGER,
                        Value::Trigger(Trigger::Duration(trigger.into())),
                    ))
            })
    }

    fn arb_event() -> impl Strategy<Value = Component> {
        (
            prop::sample::select(vec!["u1", "u2"]),
            prop::option::of(arb_recurrence_id()),
            prop::option::of("[a-c]{1,2}"),
            prop::collection::vec(arb_alarm(), 0..2),
        )
            .prop_map(|(uid, rid, summary, alarms)| {
                let mut event = Component::new(names::VEVENT)
                    .with_property(Property::new(names::UID, Value::text(uid)));
                if let Some(rid) = rid {
                    event = event.with_property(rid);
                }
                if let Some(summary) = summary {
                    event = event.with_property(Property::new(names::SUMMARY, Value::Text(summary)));
                }
                event.components = alarms;
                event
            })
    }

    fn arb_timezone() -> impl Strategy<Value = Component> {
        prop::sample::select(vec!["Europe/Paris", "America/New_York"]).prop_map(|tzid| {
            Component::new(names::VTIMEZONE).with_property(Property::new(names::TZID, Value::text(tzid)))
        })
    }

    fn arb_component() -> impl Strategy<Value = Component> {
        prop_oneof![
            3 => arb_event(),
            1 => arb_alarm(),
            1 => arb_timezone(),
        ]
    }

    fn check_total_order<T: Ord>(a: &T, b: &T, c: &T) {
        assert_eq!(a.cmp(b), b.cmp(a).reverse());
        assert_eq!(a == b, a.cmp(b) == Ordering::Equal);
        if a <= b && b <= c {
            assert!(a <= c);
        }
    }

    fn check_all_triples<T: Ord>(nodes: &[T]) {
        for a in nodes {
            for b in nodes {
                for c in nodes {
                    check_total_order(a, b, c);
                }
            }
        }
    }

    #[test]
    fn recurrence_ids_sort_chronologically_across_zones() {
        let props = canonical_props(&[
            Property::new(names::RECURRENCE_ID, Value::date_or_date_time("20240601T090000").unwrap())
                .with_parameter(Parameter::text(names::TZID, "America/New_York")),
            Property::new(names::RECURRENCE_ID, Value::date_or_date_time("20240601T140000").unwrap())
                .with_parameter(Parameter::text(names::TZID, "Europe/Paris")),
        ])
        .unwrap();

        // 14:00 Paris (12:00Z) precedes 09:00 New York (13:00Z).
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].property().text_parameter(&names::TZID), Some("Europe/Paris"));
    }

    proptest! {
        #[test]
        fn property_order_is_total(raw in prop::collection::vec(arb_property(), 3..6)) {
            let nodes = canonical_props(&raw).unwrap();
            check_all_triples(&nodes);
            prop_assert!(is_strictly_sorted(&nodes));
        }

        #[test]
        fn parameter_order_is_total(raw in prop::collection::vec(arb_parameter(), 1..6)) {
            let config = DiffConfig::default();
            let registry = ConverterRegistry::with_defaults();
            let cx = Canonicalizer::new(&config, &registry, &IanaTimezones);
            let nodes = cx.parameters(&raw).unwrap();
            check_all_triples(&nodes);
            for a in &nodes {
                prop_assert_eq!(a.compare_names(a), Ordering::Equal);
            }
            prop_assert!(is_strictly_sorted(&nodes));
        }

        #[test]
        fn component_order_is_total(raw in prop::collection::vec(arb_component(), 1..6)) {
            let config = DiffConfig::default();
            let registry = ConverterRegistry::with_defaults();
            let cx = Canonicalizer::new(&config, &registry, &IanaTimezones);
            let nodes = cx.components(&raw).unwrap();
            check_all_triples(&nodes);
            for node in &nodes {
                check_all_triples(node.components());
                prop_assert!(is_strictly_sorted(node.properties()));
            }
            prop_assert!(is_strictly_sorted(&nodes));
        }

        #[test]
        fn canonical_form_ignores_input_order(raw in prop::collection::vec(arb_property(), 0..5)) {
            let mut shuffled = raw.clone();
            shuffled.reverse();
            prop_assert_eq!(canonical_props(&raw).unwrap(), canonical_props(&shuffled).unwrap());
        }

        #[test]
        fn component_canonical_form_ignores_input_order(
            raw in prop::collection::vec(arb_component(), 0..5)
        ) {
            let config = DiffConfig::default();
            let registry = ConverterRegistry::with_defaults();
            let cx = Canonicalizer::new(&config, &registry, &IanaTimezones);
            let mut shuffled = raw.clone();
            shuffled.reverse();
            prop_assert_eq!(cx.components(&raw).unwrap(), cx.components(&shuffled).unwrap());
        }
    }
}
