use serde::{Deserialize, Serialize};

use crate::element::{cleaner::WireElement, element_model::Element};

/// Form-level metadata edited in the configuration panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub form_key: String,

    #[serde(default)]
    pub company_id: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_title")]
    pub form_title: String,

    /// Builder affordances hidden from the user
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_action_buttons: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_attrs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_fields: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_key: String::new(),
            company_id: String::new(),
            version: default_version(),
            form_title: default_title(),
            disabled_action_buttons: Vec::new(),
            disabled_attrs: Vec::new(),
            disabled_fields: Vec::new(),
        }
    }
}

fn default_version() -> String { "1.0".to_string() }
fn default_title() -> String { "Untitled Form".to_string() }

/// An ordered group of elements; the form's top-level unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Section {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: None,
            elements: Vec::new(),
        }
    }
}

/// Shallow update of a section; `None` leaves the attribute as it is.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub icon: Option<Option<String>>,
    pub elements: Option<Vec<Element>>,
}

impl SectionPatch {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }
}

/// Action button rendered under the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormButton {
    #[serde(rename = "Type")]
    pub button_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub icon: String,
}

// ============================================================================
// Wire format
// ============================================================================

/// Submission/preview object. `E` is [`WireElement`] when produced locally
/// and raw JSON when read back from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData<E = WireElement> {
    pub key: String,
    pub version: String,
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub template: Template<E>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template<E = WireElement> {
    #[serde(default)]
    pub title: String,
    #[serde(default = "Vec::new")]
    pub sections: Vec<TemplateSection<E>>,
    #[serde(rename = "Buttons", default)]
    pub buttons: Vec<FormButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection<E = WireElement> {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "Vec::new")]
    pub elements: Vec<E>,
}
