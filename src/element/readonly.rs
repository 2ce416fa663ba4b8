use serde_json::Value;
use tracing::error;

use crate::element::element_model::{
    DEFAULT_CONDITION_TYPE, Element, ReadOnlyCondition, ReadOnlyState,
};

/// True when the condition names a field, a value, or a non-default comparison.
pub fn has_condition_data(condition: &ReadOnlyCondition) -> bool {
    !condition.field.is_empty()
        || !condition.value.is_empty()
        || (!condition.condition_type.is_empty() && condition.condition_type != DEFAULT_CONDITION_TYPE)
}

/// Collapse the stored toggle and condition into the wire representation.
///
/// | condition has data | toggle | `readOnly` | `readOnlyCondition` |
/// |--------------------|--------|------------|---------------------|
/// | yes                | any    | `false`    | kept                |
/// | no                 | true   | `true`     | removed             |
/// | no                 | false  | `false`    | removed             |
///
/// Elements whose toggle is falsy are returned untouched.
pub fn process_read_only_attribute(mut element: Element) -> Element {
    let state = match element.read_only.take() {
        Some(state) if state.is_truthy() => state,
        other => {
            element.read_only = other;
            return element;
        }
    };

    let stored_condition = element.read_only_condition.take();
    let (read_only, condition) = match state {
        ReadOnlyState::Flag(b) => (b, stored_condition),
        ReadOnlyState::Composite { read_only, condition } => (read_only, condition.or(stored_condition)),
        ReadOnlyState::Encoded(text) => match decode(&text) {
            Some((read_only, condition)) => (read_only, condition.or(stored_condition)),
            None => (false, stored_condition),
        },
    };

    match condition.filter(has_condition_data) {
        Some(condition) => {
            element.read_only = Some(ReadOnlyState::Flag(false));
            element.read_only_condition = Some(condition);
        }
        None => {
            element.read_only = Some(ReadOnlyState::Flag(read_only));
            element.read_only_condition = None;
        }
    }
    element
}

fn decode(text: &str) -> Option<(bool, Option<ReadOnlyCondition>)> {
    let decoded: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!(value = text, error = %e, "could not parse readOnly attribute, defaulting to false");
            return None;
        }
    };

    match ReadOnlyState::from_value(&decoded) {
        Some(ReadOnlyState::Flag(b)) => Some((b, None)),
        Some(ReadOnlyState::Composite { read_only, condition }) => Some((read_only, condition)),
        _ => {
            error!(value = text, "readOnly attribute decoded to an unsupported shape, defaulting to false");
            None
        }
    }
}
