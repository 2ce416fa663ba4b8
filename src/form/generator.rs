use serde::Serialize;
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::element::{
    cleaner::enhance_form_data, element_model::Element, naming::NameGenerator,
};
use crate::form::{
    error::FormError,
    form_model::{FormButton, FormConfig, FormData, Section, Template, TemplateSection},
    store::section_from_value,
};

/// Walk the sections and assemble the object posted to the backend.
pub fn generate_form_data(
    config: &FormConfig,
    sections: &[Section],
    buttons: &[FormButton],
    names: &mut NameGenerator,
) -> FormData {
    let sections = sections
        .iter()
        .map(|section| {
            let raw = Value::Array(
                section
                    .elements
                    .iter()
                    .map(|e| Value::Object(e.to_map()))
                    .collect(),
            );
            TemplateSection {
                title: section.title.clone(),
                icon: section.icon.clone(),
                elements: enhance_form_data(&raw, names),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        key = %config.form_key,
        sections = sections.len(),
        "generated form data"
    );

    FormData {
        key: config.form_key.clone(),
        version: config.version.clone(),
        company_id: config.company_id.clone(),
        template: Template {
            title: config.form_title.clone(),
            sections,
            buttons: buttons.to_vec(),
        },
    }
}

impl<E: Serialize> FormData<E> {
    /// SHA-1 of the serialized template; equal fingerprints mean no changes.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(&self.template).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Checks the backend needs before it accepts a submission.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.key.trim().is_empty() {
            return Err(FormError::MissingField("formKey"));
        }
        Ok(())
    }
}

/// A form read back from the backend, split into builder state.
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub config: FormConfig,
    pub sections: Vec<Section>,
    pub buttons: Vec<FormButton>,
}

/// Turn a loaded template back into editable sections. Elements pass through
/// the same defaulting path as newly added ones.
pub fn rehydrate(loaded: &FormData<Value>, names: &mut NameGenerator) -> LoadedForm {
    let sections = loaded
        .template
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let raw = serde_json::json!({
                "title": section.title,
                "icon": section.icon,
                "elements": section.elements,
            });
            section_from_value(&raw, i, names)
        })
        .collect();

    LoadedForm {
        config: FormConfig {
            form_key: loaded.key.clone(),
            company_id: loaded.company_id.clone(),
            version: loaded.version.clone(),
            form_title: loaded.template.title.clone(),
            ..FormConfig::default()
        },
        sections,
        buttons: loaded.template.buttons.clone(),
    }
}

/// Element names used anywhere in the sections, in order.
pub fn element_names(sections: &[Section]) -> Vec<&str> {
    sections
        .iter()
        .flat_map(|s| s.elements.iter())
        .filter_map(|e: &Element| e.name.as_deref())
        .collect()
}
