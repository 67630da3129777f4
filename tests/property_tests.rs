//! Integration property tests for expose-core.
//!
//! These tests validate projection invariants across selectors, member rules
//! and flattening using property-based testing.

mod common;

use common::{arb_person, arb_person_fields, Person, PERSON_FIELDS};
use expose_core::{
    project, ExposeErrorKind, FlatValue, Mode, Selector, ShapeBuilder, Slot, Typed,
};
use proptest::prelude::*;

// Strategy: Generate a selector over Person mixing fields and chains
fn arb_selector() -> impl Strategy<Value = Selector> {
    let leaf = prop_oneof![
        prop::sample::select(PERSON_FIELDS.to_vec()).prop_map(Selector::field),
        prop::sample::select(vec!["city", "zip"])
            .prop_map(|name| Selector::field("address").then(name)),
        prop::sample::select(vec!["sku", "quantity", "cost_price"])
            .prop_map(|name| Selector::field("orders").then("items").then(name)),
    ];
    prop::collection::vec(leaf, 0..6).prop_map(Selector::tuple)
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Expose), Just(Mode::Hide)]
}

proptest! {
    /// Property: Expose(S) and Hide(complement of S) agree on keys and values
    #[test]
    fn proptest_allow_deny_complementarity(
        person in arb_person(),
        exposed in arb_person_fields(),
    ) {
        let hidden: Vec<&str> = PERSON_FIELDS
            .iter()
            .copied()
            .filter(|name| !exposed.contains(name))
            .collect();

        let by_expose = project(&person, Mode::Expose, &Selector::fields(exposed)).unwrap();
        let by_hide = project(&person, Mode::Hide, &Selector::fields(hidden)).unwrap();

        prop_assert_eq!(
            by_expose.keys().collect::<Vec<_>>(),
            by_hide.keys().collect::<Vec<_>>()
        );
        prop_assert_eq!(by_expose.flatten(), by_hide.flatten());
    }

    /// Property: flattening an unchanged view twice gives equal trees
    #[test]
    fn proptest_flatten_is_idempotent(
        person in arb_person(),
        mode in arb_mode(),
        selected in arb_person_fields(),
    ) {
        let mut view = project(&person, mode, &Selector::fields(selected)).unwrap();
        view.hide_member(&Selector::field("orders"), &Selector::field("internal_note")).unwrap();

        let first = view.flatten();
        let second = view.flatten();
        prop_assert_eq!(first, second);
    }

    /// Property: exposing through a chain fails, hiding through it keeps the rest
    #[test]
    fn proptest_chained_selectors_never_expose_unselected_fields(
        person in arb_person(),
        selector in arb_selector(),
    ) {
        let selection = selector.resolve(Person::static_type_info()).unwrap();
        let reaches_related = selection
            .fields()
            .iter()
            .any(|field| field.declaring_type() != "Person");

        match project(&person, Mode::Expose, &selector) {
            Ok(view) => {
                let mut names: Vec<_> = selection.names().collect();
                names.sort_unstable();
                names.dedup();
                prop_assert!(!reaches_related);
                prop_assert_eq!(view.len(), names.len());
            }
            Err(err) => {
                prop_assert!(reaches_related);
                prop_assert_eq!(err.kind(), ExposeErrorKind::InvalidSelector);
            }
        }

        let hidden = project(&person, Mode::Hide, &selector).unwrap();
        for key in hidden.keys() {
            prop_assert!(!selection.names().any(|name| name == key));
        }
    }

    /// Property: resolving a selector is deterministic
    #[test]
    fn proptest_selector_resolution_is_deterministic(selector in arb_selector()) {
        let info = Person::static_type_info();
        let runs: Vec<_> = (0..3).map(|_| selector.resolve(info).unwrap()).collect();
        prop_assert_eq!(&runs[0], &runs[1]);
        prop_assert_eq!(&runs[1], &runs[2]);
    }

    /// Property: member rules on scalar fields leave the stored value unchanged
    #[test]
    fn proptest_scalar_member_rule_is_noop(
        person in arb_person(),
        member in prop::sample::select(vec!["name", "age"]),
        mode in arb_mode(),
    ) {
        let mut view = project(&person, Mode::Hide, &Selector::none()).unwrap();
        let before = view.get(member).cloned();
        let flat_before = view.flatten();

        view.apply_member(mode, &Selector::field(member), &Selector::field("city")).unwrap();

        prop_assert_eq!(view.get(member).cloned(), before);
        prop_assert_eq!(view.flatten(), flat_before);
    }

    /// Property: the second of two rules on one member determines the output
    #[test]
    fn proptest_last_member_rule_wins(
        person in arb_person(),
        first in prop::sample::select(vec!["city", "zip"]),
        second in prop::sample::select(vec!["city", "zip"]),
        first_mode in arb_mode(),
        second_mode in arb_mode(),
    ) {
        let mut view = project(&person, Mode::Expose, &Selector::field("address")).unwrap();
        view.apply_member(first_mode, &Selector::field("address"), &Selector::field(first))
            .unwrap()
            .apply_member(second_mode, &Selector::field("address"), &Selector::field(second))
            .unwrap();

        let mut only_second = project(&person, Mode::Expose, &Selector::field("address")).unwrap();
        only_second
            .apply_member(second_mode, &Selector::field("address"), &Selector::field(second))
            .unwrap();

        prop_assert_eq!(view.flatten(), only_second.flatten());
    }

    /// Property: member rules on collections keep one projected view per element
    #[test]
    fn proptest_collection_rule_preserves_length(
        person in arb_person(),
        mode in arb_mode(),
    ) {
        let mut view = project(&person, Mode::Expose, &Selector::field("orders")).unwrap();
        view.apply_member(mode, &Selector::field("orders"), &Selector::field("id")).unwrap();

        let views = view.get("orders").and_then(Slot::as_views).unwrap();
        prop_assert_eq!(views.len(), person.orders.len());

        let flat = view.flatten();
        let list = flat.get("orders").and_then(FlatValue::as_list).unwrap();
        prop_assert_eq!(list.len(), person.orders.len());
    }

    /// Property: a prebuilt shape equals the step-by-step projection
    #[test]
    fn proptest_shape_matches_manual_projection(
        person in arb_person(),
        hidden in arb_person_fields(),
    ) {
        let shape = ShapeBuilder::<Person>::hide(Selector::fields(hidden.clone()))
            .expose_member(Selector::field("address"), Selector::field("zip"))
            .build()
            .unwrap();

        let mut manual = project(&person, Mode::Hide, &Selector::fields(hidden)).unwrap();
        manual.expose_member(&Selector::field("address"), &Selector::field("zip")).unwrap();

        prop_assert_eq!(shape.flatten(&person), manual.flatten());
    }
}
