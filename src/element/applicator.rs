use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::element::{defaults::defaults_for, element_model::Element, naming::NameGenerator};

/// Types that are presentational only and never get a field name.
pub const UNNAMED_TYPES: &[&str] = &["paragraph"];

/// Build an element for `key`: table defaults first, then every attribute
/// present in `existing`, then a generated name if it still lacks one.
///
/// A name that is already set is kept, so re-applying defaults to a stored
/// element never changes its identity.
pub fn apply_element_defaults(
    key: &str,
    existing: Option<&Map<String, Value>>,
    names: &mut NameGenerator,
) -> Element {
    let mut merged = match defaults_for(key) {
        Some(defaults) => defaults.to_map(),
        None => {
            warn!(key, "no defaults registered for element type");
            let mut map = Map::new();
            map.insert("type".into(), Value::String(key.to_lowercase()));
            map
        }
    };

    if let Some(existing) = existing {
        for (k, v) in existing {
            merged.insert(k.clone(), v.clone());
        }
    }

    let mut element = Element::from_map(&merged);
    assign_name(&mut element, names);
    element
}

fn assign_name(element: &mut Element, names: &mut NameGenerator) {
    if UNNAMED_TYPES.contains(&element.element_type()) {
        return;
    }
    if element.name.as_deref().is_some_and(|n| !n.is_empty()) {
        return;
    }
    let name = names.generate(element.element_type());
    debug!(%name, element_type = element.element_type(), "assigned element name");
    element.name = Some(name);
}

/// Normalize the raw element list an editor hands over.
///
/// Anything other than a JSON array yields an empty list.
pub fn process_form_data(raw: &Value, names: &mut NameGenerator) -> Vec<Element> {
    let Some(items) = raw.as_array() else {
        warn!(value = %raw, "form data is not an array, ignoring it");
        return Vec::new();
    };

    let empty = Map::new();
    items
        .iter()
        .map(|item| {
            let map = match item.as_object() {
                Some(map) => map,
                None => {
                    warn!(value = %item, "element is not an object, defaulting it");
                    &empty
                }
            };
            let key = palette_key(map);
            apply_element_defaults(&key, Some(map), names)
        })
        .collect()
}

/// Resolve the palette key of a raw element from its `key`, `element` or `type`.
pub fn palette_key(map: &Map<String, Value>) -> String {
    let candidates = ["key", "element", "type"]
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str));

    let mut fallback = None;
    for name in candidates {
        if let Some(key) = palette_alias(name) {
            return key.to_string();
        }
        fallback.get_or_insert(name);
    }
    fallback.unwrap_or_default().to_string()
}

fn palette_alias(name: &str) -> Option<&'static str> {
    let key = match name {
        "Text" | "text" => "Text",
        "TextArea" | "textarea" => "TextArea",
        "Number" | "number" => "Number",
        "Date" | "date" => "Date",
        "Hidden" | "hidden" => "Hidden",
        "File" | "file" => "File",
        "Header" | "header" => "Header",
        "Paragraph" | "paragraph" => "Paragraph",
        "Dropdown" | "select" => "Dropdown",
        "RadioGroup" | "radio-group" => "RadioGroup",
        "CheckboxGroup" | "checkbox-group" => "CheckboxGroup",
        "Button" | "button" => "Button",
        "AddressComponent" | "address" | "addresscomponent" => "AddressComponent",
        "SearchLookupComponent" | "search-lookup" => "SearchLookupComponent",
        _ => return None,
    };
    Some(key)
}
