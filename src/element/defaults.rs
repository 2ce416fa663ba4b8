use crate::element::element_model::{Element, ElementKind, ReadOnlyCondition, ReadOnlyState, ValueOption};

/// Palette keys, in the order the builder offers them.
pub const PALETTE_KEYS: &[&str] = &[
    "Header",
    "Paragraph",
    "Text",
    "TextArea",
    "Number",
    "Date",
    "Dropdown",
    "RadioGroup",
    "CheckboxGroup",
    "File",
    "Hidden",
    "Button",
    "AddressComponent",
    "SearchLookupComponent",
];

pub fn palette_keys() -> &'static [&'static str] {
    PALETTE_KEYS
}

/// Canonical starting configuration for a palette key, or `None` if the key is not in the palette.
pub fn defaults_for(key: &str) -> Option<Element> {
    let kind = match key {
        "Text" => ElementKind::Text { subtype: Some("text".into()) },
        "TextArea" => ElementKind::Textarea {
            subtype: Some("textarea".into()),
            rows: Some(3),
            cols: None,
        },
        "Number" => ElementKind::Number,
        "Date" => ElementKind::Date,
        "Hidden" => ElementKind::Hidden,
        "File" => ElementKind::File,
        "Header" => ElementKind::Header {
            subtype: Some("h1".into()),
            level: Some(1),
        },
        "Paragraph" => ElementKind::Paragraph { subtype: Some("p".into()) },
        "Dropdown" => ElementKind::Select {
            multiple: Some(false),
            values: Some(placeholder_options()),
        },
        "RadioGroup" => ElementKind::RadioGroup {
            inline: Some(false),
            values: Some(placeholder_options()),
        },
        "CheckboxGroup" => ElementKind::CheckboxGroup {
            toggle: Some(false),
            inline: Some(false),
            values: Some(vec![ValueOption::new("Option 1", "option-1", false)]),
        },
        "Button" => ElementKind::Button {
            subtype: Some("button".into()),
            style: Some("default".into()),
        },
        "AddressComponent" => ElementKind::Address {
            include_country: Some(true),
            include_apartment: Some(true),
        },
        "SearchLookupComponent" => ElementKind::SearchLookup {
            search_url: Some(String::new()),
            search_parameters: Some(Vec::new()),
        },
        _ => return None,
    };

    let mut element = Element::new(kind);
    element.source_key = Some(key.to_string());
    element.label = Some(default_label(key).to_string());
    element.class_name = Some("form-control".into());
    element.description = Some(String::new());
    element.group_id = Some(String::new());
    element.condition = Some(String::new());
    element.validations = Some(Vec::new());
    element.events = Some(Vec::new());
    element.read_only = Some(ReadOnlyState::Flag(false));
    element.read_only_condition = Some(ReadOnlyCondition::default());

    match key {
        "Header" | "Paragraph" => {
            element.class_name = None;
            if key == "Paragraph" {
                element.default_value = Some("Paragraph text content...".into());
            }
        }
        "Button" => {
            element.class_name = Some("btn-default btn".into());
        }
        "Text" | "TextArea" | "Number" | "Date" | "AddressComponent" | "SearchLookupComponent" => {
            element.required = Some(false);
            element.placeholder = Some(String::new());
            element.default_value = Some(String::new());
        }
        _ => {
            element.required = Some(false);
        }
    }

    Some(element)
}

fn default_label(key: &str) -> &'static str {
    match key {
        "Text" => "Text Field",
        "TextArea" => "Text Area",
        "Number" => "Number",
        "Date" => "Date Field",
        "Hidden" => "Hidden Input",
        "File" => "File Upload",
        "Header" => "Header",
        "Paragraph" => "Paragraph",
        "Dropdown" => "Select",
        "RadioGroup" => "Radio Group",
        "CheckboxGroup" => "Checkbox Group",
        "Button" => "Button",
        "AddressComponent" => "Address",
        "SearchLookupComponent" => "Search Lookup",
        _ => "",
    }
}

fn placeholder_options() -> Vec<ValueOption> {
    vec![
        ValueOption::new("Option 1", "option-1", true),
        ValueOption::new("Option 2", "option-2", false),
        ValueOption::new("Option 3", "option-3", false),
    ]
}

