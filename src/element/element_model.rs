use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Sentinel meaning "no comparison selected" for a read-only condition.
pub const DEFAULT_CONDITION_TYPE: &str = "10";

// ============================================================================
// Attribute records
// ============================================================================

/// One selectable option of a choice element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

impl ValueOption {
    pub fn new(label: &str, value: &str, selected: bool) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            selected,
        }
    }

    /// Accepts `{label, value, selected}` or a bare string used as both label and value.
    fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Object(map) => Some(Self {
                label: text(map, "label").unwrap_or_default(),
                value: text(map, "value").unwrap_or_default(),
                selected: flag(map, "selected").unwrap_or(false),
            }),
            Value::String(s) => Some(Self::new(s, s, false)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value: String,
    pub message: String,
}

impl ValidationRule {
    fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        Some(Self {
            rule_type: text(map, "type").unwrap_or_default(),
            value: text(map, "value").unwrap_or_default(),
            message: text(map, "message").unwrap_or_default(),
        })
    }
}

/// Client-side event hook attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventBinding {
    #[serde(rename = "Type")]
    pub event_type: String,
    pub on: String,
    pub url: String,
    pub parameters: Vec<Value>,
}

impl EventBinding {
    fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        let parameters = match map.get("Parameters") {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        };
        Some(Self {
            event_type: text(map, "Type").unwrap_or_default(),
            on: text(map, "On").unwrap_or_default(),
            url: text(map, "Url").unwrap_or_default(),
            parameters,
        })
    }
}

/// Rule that makes a field read-only depending on another field's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyCondition {
    pub field: String,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub value: String,
}

impl Default for ReadOnlyCondition {
    fn default() -> Self {
        Self {
            field: String::new(),
            condition_type: DEFAULT_CONDITION_TYPE.to_string(),
            value: String::new(),
        }
    }
}

impl ReadOnlyCondition {
    pub fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        Some(Self {
            field: text(map, "field").unwrap_or_default(),
            condition_type: text(map, "type")
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_CONDITION_TYPE.to_string()),
            value: text(map, "value").unwrap_or_default(),
        })
    }
}

/// Stored read-only toggle. Editors persist it in several shapes, all of
/// which are resolved by `element::readonly::process_read_only_attribute`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOnlyState {
    Flag(bool),
    /// JSON text not yet decoded, e.g. `{"readOnly":true,"readOnlyCondition":{...}}`
    Encoded(String),
    Composite {
        read_only: bool,
        condition: Option<ReadOnlyCondition>,
    },
}

impl ReadOnlyState {
    pub fn is_truthy(&self) -> bool {
        match self {
            ReadOnlyState::Flag(b) => *b,
            ReadOnlyState::Encoded(s) => !s.is_empty(),
            ReadOnlyState::Composite { .. } => true,
        }
    }

    pub fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::Null => None,
            Value::Bool(b) => Some(ReadOnlyState::Flag(*b)),
            Value::Number(n) => Some(ReadOnlyState::Flag(n.as_f64().is_some_and(|f| f != 0.0))),
            Value::String(s) => match s.trim() {
                "" | "false" => Some(ReadOnlyState::Flag(false)),
                "true" => Some(ReadOnlyState::Flag(true)),
                _ => Some(ReadOnlyState::Encoded(s.clone())),
            },
            Value::Object(map) => Some(ReadOnlyState::Composite {
                read_only: flag(map, "readOnly").unwrap_or(false),
                condition: map.get("readOnlyCondition").and_then(ReadOnlyCondition::from_value),
            }),
            Value::Array(_) => Some(ReadOnlyState::Flag(true)),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ReadOnlyState::Flag(b) => Value::Bool(*b),
            ReadOnlyState::Encoded(s) => Value::String(s.clone()),
            ReadOnlyState::Composite { read_only, condition } => {
                let mut map = Map::new();
                map.insert("readOnly".into(), Value::Bool(*read_only));
                if let Some(c) = condition {
                    map.insert("readOnlyCondition".into(), to_json(c));
                }
                Value::Object(map)
            }
        }
    }
}

// ============================================================================
// Element kinds
// ============================================================================

/// Per-type attributes, keyed on the resolved wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Text { subtype: Option<String> },
    Textarea { subtype: Option<String>, rows: Option<u32>, cols: Option<u32> },
    Number,
    Date,
    Hidden,
    File,
    Header { subtype: Option<String>, level: Option<u32> },
    Paragraph { subtype: Option<String> },
    Select { multiple: Option<bool>, values: Option<Vec<ValueOption>> },
    RadioGroup { inline: Option<bool>, values: Option<Vec<ValueOption>> },
    CheckboxGroup { toggle: Option<bool>, inline: Option<bool>, values: Option<Vec<ValueOption>> },
    Button { subtype: Option<String>, style: Option<String> },
    Address { include_country: Option<bool>, include_apartment: Option<bool> },
    SearchLookup { search_url: Option<String>, search_parameters: Option<Vec<Value>> },
    /// Type the pipeline has no rules for; emitted as-is.
    Unknown(String),
}

impl Default for ElementKind {
    fn default() -> Self {
        ElementKind::Unknown(String::new())
    }
}

impl ElementKind {
    pub fn type_name(&self) -> &str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Textarea { .. } => "textarea",
            ElementKind::Number => "number",
            ElementKind::Date => "date",
            ElementKind::Hidden => "hidden",
            ElementKind::File => "file",
            ElementKind::Header { .. } => "header",
            ElementKind::Paragraph { .. } => "paragraph",
            ElementKind::Select { .. } => "select",
            ElementKind::RadioGroup { .. } => "radio-group",
            ElementKind::CheckboxGroup { .. } => "checkbox-group",
            ElementKind::Button { .. } => "button",
            ElementKind::Address { .. } => "address",
            ElementKind::SearchLookup { .. } => "search-lookup",
            ElementKind::Unknown(t) => t,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Unknown(_))
    }

    /// Options of a choice element, if this kind has any.
    pub fn values(&self) -> Option<&[ValueOption]> {
        match self {
            ElementKind::Select { values, .. }
            | ElementKind::RadioGroup { values, .. }
            | ElementKind::CheckboxGroup { values, .. } => values.as_deref(),
            _ => None,
        }
    }

    fn parse(wire_type: &str, map: &Map<String, Value>) -> Self {
        match wire_type {
            "text" => ElementKind::Text { subtype: text(map, "subtype") },
            "textarea" => ElementKind::Textarea {
                subtype: text(map, "subtype"),
                rows: count(map, "rows"),
                cols: count(map, "cols"),
            },
            "number" => ElementKind::Number,
            "date" => ElementKind::Date,
            "hidden" => ElementKind::Hidden,
            "file" => ElementKind::File,
            "header" => ElementKind::Header {
                subtype: text(map, "subtype"),
                level: count(map, "level"),
            },
            "paragraph" => ElementKind::Paragraph { subtype: text(map, "subtype") },
            "select" => ElementKind::Select {
                multiple: flag(map, "multiple"),
                values: list(map, "values", ValueOption::from_value),
            },
            "radio-group" => ElementKind::RadioGroup {
                inline: flag(map, "inline"),
                values: list(map, "values", ValueOption::from_value),
            },
            "checkbox-group" => ElementKind::CheckboxGroup {
                toggle: flag(map, "toggle"),
                inline: flag(map, "inline"),
                values: list(map, "values", ValueOption::from_value),
            },
            "button" => ElementKind::Button {
                subtype: text(map, "subtype"),
                style: text(map, "style"),
            },
            "address" => ElementKind::Address {
                include_country: flag(map, "includeAddressCountry"),
                include_apartment: flag(map, "includeAddressApartment"),
            },
            "search-lookup" => ElementKind::SearchLookup {
                search_url: text(map, "searchUrl"),
                search_parameters: map.get("searchParameters").and_then(|v| match v {
                    Value::Array(items) => Some(items.clone()),
                    Value::Null => None,
                    other => Some(vec![other.clone()]),
                }),
            },
            other => ElementKind::Unknown(other.to_string()),
        }
    }

    fn attribute_keys(&self) -> &'static [&'static str] {
        match self {
            ElementKind::Text { .. } | ElementKind::Paragraph { .. } => &["subtype"],
            ElementKind::Textarea { .. } => &["subtype", "rows", "cols"],
            ElementKind::Header { .. } => &["subtype", "level"],
            ElementKind::Select { .. } => &["multiple", "values"],
            ElementKind::RadioGroup { .. } => &["inline", "values"],
            ElementKind::CheckboxGroup { .. } => &["toggle", "inline", "values"],
            ElementKind::Button { .. } => &["subtype", "style"],
            ElementKind::Address { .. } => &["includeAddressCountry", "includeAddressApartment"],
            ElementKind::SearchLookup { .. } => &["searchUrl", "searchParameters"],
            _ => &[],
        }
    }

    fn write_attributes(&self, map: &mut Map<String, Value>) {
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };
        match self {
            ElementKind::Text { subtype } | ElementKind::Paragraph { subtype } => {
                put("subtype", subtype.clone().map(Value::String));
            }
            ElementKind::Textarea { subtype, rows, cols } => {
                put("subtype", subtype.clone().map(Value::String));
                put("rows", rows.map(Value::from));
                put("cols", cols.map(Value::from));
            }
            ElementKind::Header { subtype, level } => {
                put("subtype", subtype.clone().map(Value::String));
                put("level", level.map(Value::from));
            }
            ElementKind::Select { multiple, values } => {
                put("multiple", multiple.map(Value::Bool));
                put("values", values.as_ref().map(to_json));
            }
            ElementKind::RadioGroup { inline, values } => {
                put("inline", inline.map(Value::Bool));
                put("values", values.as_ref().map(to_json));
            }
            ElementKind::CheckboxGroup { toggle, inline, values } => {
                put("toggle", toggle.map(Value::Bool));
                put("inline", inline.map(Value::Bool));
                put("values", values.as_ref().map(to_json));
            }
            ElementKind::Button { subtype, style } => {
                put("subtype", subtype.clone().map(Value::String));
                put("style", style.clone().map(Value::String));
            }
            ElementKind::Address { include_country, include_apartment } => {
                put("includeAddressCountry", include_country.map(Value::Bool));
                put("includeAddressApartment", include_apartment.map(Value::Bool));
            }
            ElementKind::SearchLookup { search_url, search_parameters } => {
                put("searchUrl", search_url.clone().map(Value::String));
                put("searchParameters", search_parameters.clone().map(Value::Array));
            }
            _ => {}
        }
    }
}

/// Maps palette/component aliases onto the wire type they are emitted as.
pub fn resolve_wire_type(declared: &str, source_key: Option<&str>) -> String {
    match source_key {
        Some("SearchLookupComponent") => return "search-lookup".to_string(),
        Some("AddressComponent" | "address" | "addresscomponent") => return "address".to_string(),
        _ => {}
    }
    match declared {
        "SearchLookupComponent" => "search-lookup".to_string(),
        "AddressComponent" | "addresscomponent" => "address".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Element
// ============================================================================

const COMMON_KEYS: &[&str] = &[
    "type",
    "key",
    "element",
    "name",
    "label",
    "placeholder",
    "description",
    "className",
    "required",
    "access",
    "defaultValue",
    "maxlength",
    "other",
    "condition",
    "validations",
    "Events",
    "groupId",
    "readOnly",
    "readOnlyCondition",
];

/// Configuration of one form field.
///
/// Every common attribute is optional: absence is meaningful to the
/// defaults merge and to the output cleaner, which fills in wire defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub kind: ElementKind,
    /// Palette component the element was created from (`key`/`element`). Never emitted on the wire.
    pub source_key: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub class_name: Option<String>,
    pub required: Option<bool>,
    pub access: Option<bool>,
    /// May embed `{entity.property}` tokens resolved by the backend.
    pub default_value: Option<String>,
    pub maxlength: Option<u32>,
    pub other: Option<bool>,
    pub condition: Option<String>,
    pub validations: Option<Vec<ValidationRule>>,
    pub events: Option<Vec<EventBinding>>,
    pub group_id: Option<String>,
    pub read_only: Option<ReadOnlyState>,
    pub read_only_condition: Option<ReadOnlyCondition>,
    /// Attributes with no typed home, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn element_type(&self) -> &str {
        self.kind.type_name()
    }

    /// Lenient parse: never fails, coerces what it can and keeps the rest in `extra`.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let source_key = text(map, "key").or_else(|| text(map, "element"));
        let declared = text(map, "type").unwrap_or_default();
        let kind = ElementKind::parse(&resolve_wire_type(&declared, source_key.as_deref()), map);

        let specific = kind.attribute_keys();
        let extra = map
            .iter()
            .filter(|(k, _)| !COMMON_KEYS.contains(&k.as_str()) && !specific.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            source_key,
            name: text(map, "name"),
            label: text(map, "label"),
            placeholder: text(map, "placeholder"),
            description: text(map, "description"),
            class_name: text(map, "className"),
            required: flag(map, "required"),
            access: flag(map, "access"),
            default_value: text(map, "defaultValue"),
            maxlength: count(map, "maxlength"),
            other: flag(map, "other"),
            condition: text(map, "condition"),
            validations: list(map, "validations", ValidationRule::from_value),
            events: list(map, "Events", EventBinding::from_value),
            group_id: text(map, "groupId"),
            read_only: map.get("readOnly").and_then(ReadOnlyState::from_value),
            read_only_condition: map
                .get("readOnlyCondition")
                .and_then(ReadOnlyCondition::from_value),
            extra,
            kind,
        }
    }

    pub fn from_value(raw: &Value) -> Self {
        match raw.as_object() {
            Some(map) => Self::from_map(map),
            None => {
                warn!(value = %raw, "element is not a JSON object, using an empty element");
                Self::default()
            }
        }
    }

    /// Internal JSON shape; the inverse of [`Element::from_map`].
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.element_type().to_string()));

        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };
        put("key", self.source_key.clone().map(Value::String));
        put("name", self.name.clone().map(Value::String));
        put("label", self.label.clone().map(Value::String));
        put("placeholder", self.placeholder.clone().map(Value::String));
        put("description", self.description.clone().map(Value::String));
        put("className", self.class_name.clone().map(Value::String));
        put("required", self.required.map(Value::Bool));
        put("access", self.access.map(Value::Bool));
        put("defaultValue", self.default_value.clone().map(Value::String));
        put("maxlength", self.maxlength.map(Value::from));
        put("other", self.other.map(Value::Bool));
        put("condition", self.condition.clone().map(Value::String));
        put("validations", self.validations.as_ref().map(to_json));
        put("Events", self.events.as_ref().map(to_json));
        put("groupId", self.group_id.clone().map(Value::String));
        put("readOnly", self.read_only.as_ref().map(ReadOnlyState::to_value));
        put("readOnlyCondition", self.read_only_condition.as_ref().map(to_json));

        self.kind.write_attributes(&mut map);
        for (k, v) in &self.extra {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        map
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Element::from_value(&raw))
    }
}

// ============================================================================
// Lenient field readers
// ============================================================================

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            warn!(key, value = %other, "expected a string attribute, ignoring");
            None
        }
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => {
                warn!(key, value = %s, "unrecognised boolean attribute, treating as false");
                Some(false)
            }
        },
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        _ => None,
    }
}

fn count(map: &Map<String, Value>, key: &str) -> Option<u32> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn list<T>(map: &Map<String, Value>, key: &str, parse: fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    match map.get(key)? {
        Value::Array(items) => Some(items.iter().filter_map(parse).collect()),
        Value::Null => None,
        other => {
            warn!(key, value = %other, "expected a list attribute, using an empty list");
            Some(Vec::new())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
