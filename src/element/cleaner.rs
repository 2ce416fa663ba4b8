use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::element::{
    applicator::process_form_data,
    element_model::{
        Element, ElementKind, EventBinding, ReadOnlyCondition, ReadOnlyState, ValidationRule,
        ValueOption,
    },
    naming::NameGenerator,
    readonly::process_read_only_attribute,
};

/// An element as posted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireElement {
    Field(WireField),
    /// Element of a type with no output rules, forwarded as stored.
    Passthrough(Map<String, Value>),
}

impl WireElement {
    pub fn element_type(&self) -> &str {
        match self {
            WireElement::Field(f) => &f.element_type,
            WireElement::Passthrough(map) => map.get("type").and_then(Value::as_str).unwrap_or(""),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Wire shape of a known element type. The core keys are always present;
/// the type-specific ones only for the types that own them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireField {
    #[serde(rename = "type")]
    pub element_type: String,
    pub required: bool,
    pub label: String,
    pub class_name: String,
    pub name: String,
    pub access: bool,
    pub read_only: bool,
    pub read_only_condition: ReadOnlyCondition,
    pub group_id: String,
    #[serde(rename = "Events")]
    pub events: Vec<EventBinding>,
    pub description: String,
    pub placeholder: String,
    pub default_value: String,
    #[serde(serialize_with = "empty_when_none")]
    pub maxlength: Option<u32>,
    pub other: bool,
    pub condition: String,
    pub validations: Vec<ValidationRule>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ValueOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_address_country: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_address_apartment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_parameters: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

fn empty_when_none<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_u32(*v),
        None => serializer.serialize_str(""),
    }
}

/// Produce the wire shape of one element.
pub fn clean_element_for_output(element: &Element) -> WireElement {
    if !element.kind.is_known() {
        return WireElement::Passthrough(element.to_map());
    }

    let element = process_read_only_attribute(element.clone());

    let mut field = WireField {
        element_type: element.element_type().to_string(),
        required: element.required.unwrap_or(false),
        label: element.label.clone().unwrap_or_default(),
        class_name: element.class_name.clone().unwrap_or_default(),
        name: element.name.clone().unwrap_or_default(),
        access: element.access.unwrap_or(false),
        read_only: matches!(element.read_only, Some(ReadOnlyState::Flag(true))),
        read_only_condition: element.read_only_condition.clone().unwrap_or_default(),
        group_id: element.group_id.clone().unwrap_or_default(),
        events: element.events.clone().unwrap_or_default(),
        description: element.description.clone().unwrap_or_default(),
        placeholder: element.placeholder.clone().unwrap_or_default(),
        default_value: element.default_value.clone().unwrap_or_default(),
        maxlength: element.maxlength,
        other: element.other.unwrap_or(false),
        condition: element.condition.clone().unwrap_or_default(),
        validations: element.validations.clone().unwrap_or_default(),
        subtype: None,
        multiple: None,
        toggle: None,
        inline: None,
        values: None,
        style: None,
        include_address_country: None,
        include_address_apartment: None,
        search_url: None,
        search_parameters: None,
        rows: None,
        cols: None,
        level: None,
    };

    match &element.kind {
        ElementKind::Select { multiple, values } => {
            field.multiple = Some(multiple.unwrap_or(false));
            field.values = Some(values.clone().unwrap_or_default());
        }
        ElementKind::RadioGroup { inline, values } => {
            field.inline = Some(inline.unwrap_or(false));
            field.values = Some(values.clone().unwrap_or_default());
        }
        ElementKind::CheckboxGroup { toggle, inline, values } => {
            field.toggle = Some(toggle.unwrap_or(false));
            field.inline = Some(inline.unwrap_or(false));
            field.values = Some(values.clone().unwrap_or_default());
        }
        ElementKind::Button { subtype, style } => {
            field.subtype = Some(subtype.clone().unwrap_or_else(|| "button".into()));
            field.style = Some(style.clone().unwrap_or_else(|| "default".into()));
        }
        ElementKind::Address { include_country, include_apartment } => {
            field.include_address_country = Some(include_country.unwrap_or(true));
            field.include_address_apartment = Some(include_apartment.unwrap_or(true));
        }
        ElementKind::SearchLookup { search_url, search_parameters } => {
            field.search_url = Some(search_url.clone().unwrap_or_default());
            field.search_parameters = Some(search_parameters.clone().unwrap_or_default());
        }
        ElementKind::Text { subtype } => {
            field.subtype = Some(subtype.clone().unwrap_or_else(|| "text".into()));
        }
        ElementKind::Textarea { subtype, rows, cols } => {
            field.subtype = Some(subtype.clone().unwrap_or_else(|| "textarea".into()));
            field.rows = *rows;
            field.cols = *cols;
        }
        ElementKind::Header { subtype, level } => {
            field.subtype = Some(subtype.clone().unwrap_or_else(|| "h1".into()));
            field.level = *level;
        }
        ElementKind::Paragraph { subtype } => {
            field.subtype = Some(subtype.clone().unwrap_or_else(|| "p".into()));
        }
        ElementKind::Number | ElementKind::Date | ElementKind::Hidden | ElementKind::File => {}
        ElementKind::Unknown(_) => {}
    }

    WireElement::Field(field)
}

/// Normalize a raw editor element list and clean every element for output.
pub fn enhance_form_data(raw: &Value, names: &mut NameGenerator) -> Vec<WireElement> {
    process_form_data(raw, names)
        .iter()
        .map(clean_element_for_output)
        .collect()
}
