use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::element::{
    applicator::{apply_element_defaults, process_form_data},
    element_model::Element,
    naming::NameGenerator,
};
use crate::form::{
    debounce::{Debouncer, EDIT_DEBOUNCE},
    error::FormError,
    form_model::{FormButton, FormConfig, FormData, Section, SectionPatch},
    generator::generate_form_data,
};

/// A second "add section" within this window is treated as a double click.
pub const ADD_SECTION_GUARD: Duration = Duration::from_millis(100);

/// Address of one debounced field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditKey {
    pub section_id: String,
    pub element_name: String,
    pub field: String,
}

/// In-memory owner of the form being built: ordered sections, each with
/// ordered elements, plus the element-name sequence and pending edits.
///
/// Section operations take positional indices. Debounced edits are keyed by
/// section id so a removal in between cannot redirect them.
pub struct SectionStore {
    sections: Vec<Section>,
    names: NameGenerator,
    next_section: u64,
    last_add: Option<Instant>,
    edits: Debouncer<EditKey, Value>,
}

impl Default for SectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionStore {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            names: NameGenerator::new(),
            next_section: 0,
            last_add: None,
            edits: Debouncer::new(EDIT_DEBOUNCE),
        }
    }

    pub fn with_sections(sections: Vec<Section>) -> Self {
        let mut store = Self::new();
        store.replace_sections(sections);
        store
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn names_mut(&mut self) -> &mut NameGenerator {
        &mut self.names
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    pub fn add_section(&mut self) -> Option<&Section> {
        self.add_section_at(Instant::now())
    }

    /// Append an empty section, unless another was added less than
    /// [`ADD_SECTION_GUARD`] before `now`.
    pub fn add_section_at(&mut self, now: Instant) -> Option<&Section> {
        if let Some(last) = self.last_add {
            if now.saturating_duration_since(last) < ADD_SECTION_GUARD {
                debug!("suppressed duplicate add-section");
                return None;
            }
        }
        self.last_add = Some(now);

        let id = self.next_section_id();
        let title = format!("Section {}", self.sections.len() + 1);
        self.sections.push(Section::new(&id, &title));
        self.sections.last()
    }

    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        if index >= self.sections.len() {
            warn!(index, len = self.sections.len(), "remove_section: index out of range");
            return None;
        }
        let removed = self.sections.remove(index);
        let dropped = self.edits.discard_where(|k| k.section_id == removed.id);
        if dropped > 0 {
            debug!(section = %removed.id, dropped, "discarded pending edits of removed section");
        }
        Some(removed)
    }

    /// Shallow-merge `patch` into the section at `index`. The id never changes.
    /// Patched elements are defaulted and named before they are stored.
    pub fn update_section(&mut self, index: usize, patch: SectionPatch) -> Option<&Section> {
        if index >= self.sections.len() {
            warn!(index, len = self.sections.len(), "update_section: index out of range");
            return None;
        }
        let elements = patch
            .elements
            .map(|elements| normalize_elements(elements, &mut self.names));

        let section = &mut self.sections[index];
        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(icon) = patch.icon {
            section.icon = icon;
        }
        if let Some(elements) = elements {
            section.elements = elements;
        }
        Some(&*section)
    }

    pub fn update_section_by_id(&mut self, id: &str, patch: SectionPatch) -> Option<&Section> {
        let index = self.position_of(id)?;
        self.update_section(index, patch)
    }

    /// Move the section at `from` so that it ends up at `to`.
    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.sections, from, to, "reorder_sections")
    }

    /// Swap in a whole section list (import, load). Pending edits are dropped,
    /// missing or duplicate ids are regenerated and unnamed elements get a name.
    pub fn replace_sections(&mut self, sections: Vec<Section>) {
        let cancelled = self.edits.cancel();
        if cancelled > 0 {
            debug!(cancelled, "dropped pending edits on section replacement");
        }
        self.sections.clear();
        for mut section in sections {
            if section.id.is_empty() || self.position_of(&section.id).is_some() {
                section.id = self.next_section_id();
            }
            section.elements = normalize_elements(std::mem::take(&mut section.elements), &mut self.names);
            self.sections.push(section);
        }
    }

    fn next_section_id(&mut self) -> String {
        loop {
            self.next_section += 1;
            let id = format!("section-{}", self.next_section);
            if self.position_of(&id).is_none() {
                return id;
            }
        }
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Append a defaulted element of palette type `key` to a section.
    pub fn add_element(&mut self, section_index: usize, key: &str) -> Option<&Element> {
        if section_index >= self.sections.len() {
            warn!(section_index, "add_element: section index out of range");
            return None;
        }
        let element = apply_element_defaults(key, None, &mut self.names);
        let section = &mut self.sections[section_index];
        section.elements.push(element);
        section.elements.last()
    }

    pub fn remove_element(&mut self, section_index: usize, element_index: usize) -> Option<Element> {
        let section = self.sections.get_mut(section_index)?;
        if element_index >= section.elements.len() {
            warn!(section_index, element_index, "remove_element: index out of range");
            return None;
        }
        let removed = section.elements.remove(element_index);
        if let Some(name) = removed.name.clone() {
            let id = section.id.clone();
            self.edits
                .discard_where(|k| k.section_id == id && k.element_name == name);
        }
        Some(removed)
    }

    pub fn move_element(&mut self, section_index: usize, from: usize, to: usize) -> bool {
        match self.sections.get_mut(section_index) {
            Some(section) => move_item(&mut section.elements, from, to, "move_element"),
            None => false,
        }
    }

    pub fn element(&self, section_index: usize, name: &str) -> Option<&Element> {
        self.sections
            .get(section_index)?
            .elements
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Immediate field edit, for elements without a name (paragraphs).
    pub fn set_element_field(
        &mut self,
        section_index: usize,
        element_index: usize,
        field: &str,
        value: Value,
    ) -> bool {
        match self
            .sections
            .get_mut(section_index)
            .and_then(|s| s.elements.get_mut(element_index))
        {
            Some(element) => apply_field(element, field, value),
            None => {
                warn!(section_index, element_index, "set_element_field: no such element");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Debounced edits
    // ------------------------------------------------------------------

    /// Queue a field edit. Within the debounce window the latest value for
    /// the same field wins. Returns false for edits that can never apply.
    pub fn queue_edit(
        &mut self,
        section_id: &str,
        element_name: &str,
        field: &str,
        value: Value,
        now: Instant,
    ) -> bool {
        if field == "name" {
            warn!(element_name, "element names are fixed at creation, ignoring edit");
            return false;
        }
        let key = EditKey {
            section_id: section_id.to_string(),
            element_name: element_name.to_string(),
            field: field.to_string(),
        };
        self.edits.push(key, value, now);
        true
    }

    pub fn pending_edits(&self) -> usize {
        self.edits.len()
    }

    /// Apply every edit whose window has elapsed at `now`.
    pub fn flush_edits(&mut self, now: Instant) -> usize {
        let ready = self.edits.drain_due(now);
        self.apply_edits(ready)
    }

    pub fn flush_all(&mut self) -> usize {
        let ready = self.edits.drain_all();
        self.apply_edits(ready)
    }

    pub fn cancel_pending(&mut self) -> usize {
        self.edits.cancel()
    }

    fn apply_edits(&mut self, edits: Vec<(EditKey, Value)>) -> usize {
        let mut applied = 0;
        for (key, value) in edits {
            let target = self
                .sections
                .iter_mut()
                .find(|s| s.id == key.section_id)
                .and_then(|s| {
                    s.elements
                        .iter_mut()
                        .find(|e| e.name.as_deref() == Some(key.element_name.as_str()))
                });
            match target {
                Some(element) => {
                    if apply_field(element, &key.field, value) {
                        applied += 1;
                    }
                }
                None => warn!(
                    section = %key.section_id,
                    element = %key.element_name,
                    "dropping edit for an element that no longer exists"
                ),
            }
        }
        applied
    }

    // ------------------------------------------------------------------
    // Import / export / output
    // ------------------------------------------------------------------

    /// Replace all sections with the contents of a saved JSON file.
    /// On error the current sections are left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<usize, FormError> {
        let parsed: Value = serde_json::from_str(text)?;
        let Some(items) = parsed.as_array() else {
            return Err(FormError::InvalidJsonFile);
        };

        let mut sections = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            sections.push(section_from_value(item, i, &mut self.names));
        }
        let count = sections.len();
        self.replace_sections(sections);
        info!(sections = count, "imported sections");
        Ok(count)
    }

    pub fn export_json(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string_pretty(&self.sections)?)
    }

    /// Flush pending edits and build the submission object.
    pub fn form_data(&mut self, config: &FormConfig, buttons: &[FormButton]) -> FormData {
        self.flush_all();
        generate_form_data(config, &self.sections, buttons, &mut self.names)
    }
}

/// Rebuild a section from saved JSON, normalizing its elements.
pub fn section_from_value(raw: &Value, position: usize, names: &mut NameGenerator) -> Section {
    let empty = Map::new();
    let map = raw.as_object().unwrap_or(&empty);
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    let elements = match map.get("elements") {
        Some(list) => process_form_data(list, names),
        None => Vec::new(),
    };

    Section {
        id: text("id").unwrap_or_default(),
        title: text("title").unwrap_or_else(|| format!("Section {}", position + 1)),
        icon: text("icon"),
        elements,
    }
}

/// Run elements entering the store through the defaults path. Names that are
/// already set are kept.
fn normalize_elements(elements: Vec<Element>, names: &mut NameGenerator) -> Vec<Element> {
    let raw = Value::Array(elements.into_iter().map(|e| Value::Object(e.to_map())).collect());
    process_form_data(&raw, names)
}

fn apply_field(element: &mut Element, field: &str, value: Value) -> bool {
    if field == "name" {
        warn!("element names are fixed at creation, ignoring edit");
        return false;
    }
    let mut map = element.to_map();
    map.insert(field.to_string(), value);
    *element = Element::from_map(&map);
    true
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize, op: &str) -> bool {
    if from == to {
        return false;
    }
    if from >= items.len() || to >= items.len() {
        warn!(op, from, to, len = items.len(), "move: index out of range");
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
