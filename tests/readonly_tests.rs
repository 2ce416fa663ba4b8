use form_builder::element::{
    element_model::{Element, ElementKind, ReadOnlyCondition, ReadOnlyState},
    readonly::{has_condition_data, process_read_only_attribute},
};
use serde_json::json;

fn condition(field: &str, condition_type: &str, value: &str) -> ReadOnlyCondition {
    ReadOnlyCondition {
        field: field.into(),
        condition_type: condition_type.into(),
        value: value.into(),
    }
}

fn text_element(read_only: Option<ReadOnlyState>, cond: Option<ReadOnlyCondition>) -> Element {
    let mut element = Element::new(ElementKind::Text { subtype: None });
    element.read_only = read_only;
    element.read_only_condition = cond;
    element
}

// =========================================================================
// has_condition_data
// =========================================================================

#[test]
fn condition_data_detection() {
    assert!(!has_condition_data(&ReadOnlyCondition::default()), "default shape is empty");
    assert!(!has_condition_data(&condition("", "", "")), "blank type counts as unset");
    assert!(has_condition_data(&condition("Status", "10", "")));
    assert!(has_condition_data(&condition("", "10", "Closed")));
    assert!(has_condition_data(&condition("", "20", "")), "non-default comparison");
}

// =========================================================================
// Decision table
// =========================================================================

#[test]
fn populated_condition_wins_over_toggle() {
    for toggle in [true, false] {
        let element = text_element(
            Some(ReadOnlyState::Flag(toggle)),
            Some(condition("X", "10", "")),
        );
        let out = process_read_only_attribute(element);
        assert_eq!(out.read_only, Some(ReadOnlyState::Flag(false)), "toggle={toggle}");
        assert_eq!(out.read_only_condition.unwrap().field, "X");
    }
}

#[test]
fn plain_toggle_drops_condition_key() {
    let out = process_read_only_attribute(text_element(Some(ReadOnlyState::Flag(true)), None));
    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(true)));
    assert!(out.read_only_condition.is_none());
    assert!(!out.to_map().contains_key("readOnlyCondition"));

    let out = process_read_only_attribute(text_element(
        Some(ReadOnlyState::Flag(true)),
        Some(ReadOnlyCondition::default()),
    ));
    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(true)));
    assert!(out.read_only_condition.is_none(), "empty condition is removed");
}

#[test]
fn falsy_toggle_is_left_alone() {
    let element = text_element(Some(ReadOnlyState::Flag(false)), Some(condition("X", "10", "")));
    let out = process_read_only_attribute(element.clone());
    assert_eq!(out, element);

    let untouched = text_element(None, None);
    assert_eq!(process_read_only_attribute(untouched.clone()), untouched);
}

// =========================================================================
// Stored representations
// =========================================================================

#[test]
fn encoded_composite_is_decoded() {
    let encoded = json!({
        "readOnly": true,
        "readOnlyCondition": {"field": "Status", "type": "10", "value": "Closed"}
    })
    .to_string();
    let out = process_read_only_attribute(text_element(Some(ReadOnlyState::Encoded(encoded)), None));

    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(false)));
    assert_eq!(out.read_only_condition, Some(condition("Status", "10", "Closed")));
}

#[test]
fn encoded_plain_true_stays_read_only() {
    let out = process_read_only_attribute(text_element(
        Some(ReadOnlyState::Encoded(r#"{"readOnly":true}"#.into())),
        None,
    ));
    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(true)));
    assert!(out.read_only_condition.is_none());
}

#[test]
fn undecodable_string_defaults_to_false() {
    let out = process_read_only_attribute(text_element(
        Some(ReadOnlyState::Encoded("{not json".into())),
        None,
    ));
    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(false)));
    assert!(out.read_only_condition.is_none());
}

#[test]
fn object_form_uses_its_own_condition_first() {
    let element = Element::from_value(&json!({
        "type": "text",
        "readOnly": {"readOnly": true, "readOnlyCondition": {"field": "Owner"}},
        "readOnlyCondition": {"field": "Ignored"}
    }));
    let out = process_read_only_attribute(element);
    assert_eq!(out.read_only, Some(ReadOnlyState::Flag(false)));
    assert_eq!(out.read_only_condition, Some(condition("Owner", "10", "")));
}
