use std::time::{SystemTime, UNIX_EPOCH};

/// Issues field names of the form `normalizedType-timestamp-counter`.
///
/// The counter belongs to the generator, so every builder session (and every
/// test) owns its own sequence.
#[derive(Debug, Default)]
pub struct NameGenerator {
    counter: u64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Continue an existing sequence, e.g. after reloading a saved form.
    pub fn starting_at(counter: u64) -> Self {
        Self { counter }
    }

    pub fn issued(&self) -> u64 {
        self.counter
    }

    pub fn generate(&mut self, element_type: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.generate_at(element_type, now)
    }

    pub fn generate_at(&mut self, element_type: &str, timestamp_ms: u128) -> String {
        self.counter += 1;
        format!("{}-{}-{}", normalize_type(element_type), timestamp_ms, self.counter)
    }
}

/// Lowercase and drop everything but ASCII letters and digits.
pub fn normalize_type(element_type: &str) -> String {
    let normalized: String = element_type
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if normalized.is_empty() {
        "field".to_string()
    } else {
        normalized
    }
}

