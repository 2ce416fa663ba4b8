mod common;

use common::{is_generated_name, obj};
use form_builder::element::{
    applicator::{apply_element_defaults, palette_key, process_form_data},
    defaults::{PALETTE_KEYS, defaults_for, palette_keys},
    element_model::{Element, ElementKind, ReadOnlyState},
    naming::{NameGenerator, normalize_type},
};
use serde_json::{Value, json};

// =========================================================================
// Defaults table
// =========================================================================

#[test]
fn every_palette_key_has_defaults() {
    for key in PALETTE_KEYS {
        assert!(defaults_for(key).is_some(), "missing defaults for {key}");
    }
    assert!(defaults_for("Signature").is_none());
}

#[test]
fn palette_lists_every_table_key() {
    let keys = palette_keys();
    assert_eq!(keys.len(), 14);
    assert!(keys.iter().all(|k| defaults_for(k).is_some()));
    assert!(keys.contains(&"AddressComponent"));
    assert!(keys.contains(&"SearchLookupComponent"));
}

#[test]
fn dropdown_is_born_with_three_options() {
    let dropdown = defaults_for("Dropdown").unwrap();
    assert_eq!(dropdown.element_type(), "select");
    let values = dropdown.kind.values().unwrap();
    assert_eq!(values.len(), 3);
    assert!(values[0].selected);
    assert!(!values[1].selected && !values[2].selected);
}

#[test]
fn paragraph_carries_placeholder_text() {
    let p = defaults_for("Paragraph").unwrap();
    assert_eq!(p.element_type(), "paragraph");
    assert_eq!(p.default_value.as_deref(), Some("Paragraph text content..."));
}

// =========================================================================
// Name generator
// =========================================================================

#[test]
fn name_counter_is_owned_by_the_generator() {
    let mut names = NameGenerator::new();
    assert_eq!(names.generate_at("radio-group", 1000), "radiogroup-1000-1");
    assert_eq!(names.generate_at("radio-group", 1000), "radiogroup-1000-2");
    assert_eq!(names.issued(), 2);

    let mut other = NameGenerator::new();
    assert_eq!(other.generate_at("text", 5), "text-5-1", "fresh generator starts over");

    let mut resumed = NameGenerator::starting_at(41);
    assert_eq!(resumed.generate_at("date", 7), "date-7-42");
}

#[test]
fn normalize_type_strips_punctuation() {
    assert_eq!(normalize_type("search-lookup"), "searchlookup");
    assert_eq!(normalize_type("Checkbox-Group"), "checkboxgroup");
    assert_eq!(normalize_type("--"), "field");
}

#[test]
fn generated_names_are_unique_within_a_session() {
    let mut names = NameGenerator::new();
    let a = names.generate("text");
    let b = names.generate("text");
    assert_ne!(a, b);
    assert!(is_generated_name(&a), "{a}");
}

// =========================================================================
// Defaults applicator
// =========================================================================

#[test]
fn defaulted_types_match_table_and_get_names() {
    let mut names = NameGenerator::new();
    for key in PALETTE_KEYS {
        let expected = defaults_for(key).unwrap();
        let element = apply_element_defaults(key, Some(&obj(json!({}))), &mut names);
        assert_eq!(element.element_type(), expected.element_type(), "type for {key}");

        if *key == "Paragraph" {
            assert!(element.name.is_none(), "paragraphs are never named");
        } else {
            let name = element.name.as_deref().unwrap();
            assert!(is_generated_name(name), "bad name {name} for {key}");
        }
    }
}

#[test]
fn existing_attributes_override_defaults() {
    let mut names = NameGenerator::new();
    let existing = obj(json!({
        "type": "select",
        "label": "Country",
        "values": [{"label": "NL", "value": "nl", "selected": false}],
        "required": true
    }));
    let element = apply_element_defaults("Dropdown", Some(&existing), &mut names);

    assert_eq!(element.label.as_deref(), Some("Country"));
    assert_eq!(element.required, Some(true));
    assert_eq!(element.kind.values().unwrap().len(), 1);
    // untouched defaults survive
    assert_eq!(element.class_name.as_deref(), Some("form-control"));
    assert_eq!(element.read_only, Some(ReadOnlyState::Flag(false)));
}

#[test]
fn existing_name_is_never_regenerated() {
    let mut names = NameGenerator::new();
    let first = apply_element_defaults("Dropdown", None, &mut names);
    let again = apply_element_defaults("Dropdown", Some(&first.to_map()), &mut names);

    assert_eq!(first, again, "re-applying defaults is idempotent, name included");
    assert_eq!(names.issued(), 1);
}

#[test]
fn unknown_key_falls_back_to_lowercased_type() {
    let mut names = NameGenerator::new();
    let existing = obj(json!({"label": "Sign here", "penColor": "blue"}));
    let element = apply_element_defaults("Signature", Some(&existing), &mut names);

    assert_eq!(element.kind, ElementKind::Unknown("signature".into()));
    assert_eq!(element.label.as_deref(), Some("Sign here"));
    assert_eq!(element.extra.get("penColor"), Some(&json!("blue")));
    assert!(element.name.as_deref().unwrap().starts_with("signature-"));
}

// =========================================================================
// process_form_data
// =========================================================================

#[test]
fn process_form_data_tolerates_non_arrays() {
    let mut names = NameGenerator::new();
    assert!(process_form_data(&json!("not an array"), &mut names).is_empty());
    assert!(process_form_data(&json!({"elements": []}), &mut names).is_empty());
    assert!(process_form_data(&Value::Null, &mut names).is_empty());
}

#[test]
fn process_form_data_resolves_component_aliases() {
    let mut names = NameGenerator::new();
    let raw = json!([
        {"type": "text", "key": "AddressComponent", "label": "Home"},
        {"type": "addresscomponent"},
        {"type": "text", "element": "SearchLookupComponent", "searchUrl": "/api/customers"},
        {"type": "select"},
        42
    ]);
    let elements = process_form_data(&raw, &mut names);

    assert_eq!(elements.len(), 5, "nothing is dropped");
    assert_eq!(elements[0].element_type(), "address");
    assert_eq!(elements[1].element_type(), "address");
    assert_eq!(elements[2].element_type(), "search-lookup");
    assert!(matches!(
        &elements[2].kind,
        ElementKind::SearchLookup { search_url: Some(url), .. } if url == "/api/customers"
    ));
    assert_eq!(elements[3].kind.values().map(<[_]>::len), Some(3));
    assert_eq!(elements[4].element_type(), "", "non-object item is defaulted, not dropped");
}

#[test]
fn palette_key_prefers_key_then_element_then_type() {
    assert_eq!(palette_key(&obj(json!({"type": "select"}))), "Dropdown");
    assert_eq!(palette_key(&obj(json!({"type": "text", "element": "address"}))), "AddressComponent");
    assert_eq!(palette_key(&obj(json!({"key": "Mystery", "type": "date"}))), "Date");
    assert_eq!(palette_key(&obj(json!({"type": "signature"}))), "signature");
}

// =========================================================================
// Lenient parsing
// =========================================================================

#[test]
fn parsing_coerces_loose_values() {
    let element = Element::from_value(&json!({
        "type": "radio-group",
        "required": "true",
        "maxlength": "40",
        "values": ["Yes", {"label": "No", "value": 0}],
        "validations": "oops",
        "readOnly": "{\"readOnly\":true}"
    }));

    assert_eq!(element.required, Some(true));
    assert_eq!(element.maxlength, Some(40));
    let values = element.kind.values().unwrap();
    assert_eq!(values[0].label, "Yes");
    assert_eq!(values[0].value, "Yes");
    assert_eq!(values[1].value, "0");
    assert_eq!(element.validations, Some(vec![]));
    assert!(matches!(element.read_only, Some(ReadOnlyState::Encoded(_))));
}

#[test]
fn serialization_round_trips_through_json() {
    let mut names = NameGenerator::new();
    let element = apply_element_defaults("AddressComponent", None, &mut names);
    let json = serde_json::to_string(&element).unwrap();
    let back: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(element, back);
}
