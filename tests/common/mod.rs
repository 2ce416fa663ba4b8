#![allow(dead_code)]

use std::path::PathBuf;

use form_builder::element::cleaner::{WireElement, WireField};
use serde_json::{Map, Value};

pub fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("test fixture must be a JSON object")
}

/// `^[a-z0-9]+-\d+-\d+$`
pub fn is_generated_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    parts.len() == 3
        && !parts[0].is_empty()
        && parts[0].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && !parts[1].is_empty()
        && parts[1].chars().all(|c| c.is_ascii_digit())
        && !parts[2].is_empty()
        && parts[2].chars().all(|c| c.is_ascii_digit())
}

pub fn field(wire: &WireElement) -> &WireField {
    match wire {
        WireElement::Field(f) => f,
        WireElement::Passthrough(map) => panic!("expected a known element, got passthrough {:?}", map),
    }
}

/// Write `content` to a per-process temp file and return its path.
pub fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("form-builder-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).expect("write temp file");
    path
}
