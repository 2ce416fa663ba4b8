use std::time::Instant;

use tracing::info;

use crate::api::{api_model::FormQuery, client::FormApi, enum_cache::EnumGroupCache};
use crate::cli::config::{AppConfig, build_form_config};
use crate::element::{applicator::apply_element_defaults, naming::NameGenerator};
use crate::form::{
    error::FormError,
    generator::{element_names, rehydrate},
    store::SectionStore,
};

// ============================================================================
// new-element subcommand
// ============================================================================

pub fn cmd_new_element(key: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut names = NameGenerator::new();
    let element = apply_element_defaults(key, None, &mut names);
    Ok(serde_json::to_string_pretty(&element)?)
}

// ============================================================================
// preview / import subcommands
// ============================================================================

/// Build the wire JSON for a sections file. Returns `(json, fingerprint)`.
pub fn cmd_preview(
    sections_path: &str,
    config: &AppConfig,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    let mut store = load_store(sections_path)?;
    let form_config = build_form_config(&config.form);
    let data = store.form_data(&form_config, &config.buttons);

    info!(
        sections = store.len(),
        fields = element_names(store.sections()).len(),
        "built preview"
    );
    Ok((serde_json::to_string_pretty(&data)?, data.fingerprint()))
}

/// Normalize a sections file: defaults applied, names assigned.
pub fn cmd_import(sections_path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let store = load_store(sections_path)?;
    Ok(store.export_json()?)
}

// ============================================================================
// submit subcommand
// ============================================================================

/// Submit a sections file; returns the fingerprint of what was sent.
pub fn cmd_submit(
    sections_path: &str,
    config: &AppConfig,
    api: &dyn FormApi,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut store = load_store(sections_path)?;
    let form_config = build_form_config(&config.form);
    let data = store.form_data(&form_config, &config.buttons);
    data.validate()?;

    api.submit_form(&data)?.into_result()?;
    info!(key = %data.key, version = %data.version, "form submitted");
    Ok(data.fingerprint())
}

// ============================================================================
// load subcommand
// ============================================================================

/// Fetch a form and return its sections as saved JSON.
pub fn cmd_load(
    key: Option<&str>,
    version: Option<&str>,
    config: &AppConfig,
    api: &dyn FormApi,
) -> Result<String, Box<dyn std::error::Error>> {
    let query = FormQuery {
        key: key.unwrap_or(config.form.key.as_str()).to_string(),
        version: version.unwrap_or(config.form.version.as_str()).to_string(),
        company_id: config.form.company_id.clone(),
    };
    if query.key.is_empty() {
        return Err(FormError::MissingField("formKey").into());
    }

    let loaded = api
        .load_form(&query)?
        .into_result()?
        .ok_or_else(|| format!("Form '{}' version {} not found", query.key, query.version))?;

    let mut store = SectionStore::new();
    let form = rehydrate(&loaded, store.names_mut());
    store.replace_sections(form.sections);
    info!(key = %form.config.form_key, sections = store.len(), "form loaded");

    Ok(store.export_json()?)
}

// ============================================================================
// groups subcommand
// ============================================================================

pub fn cmd_groups(
    language: Option<&str>,
    config: &AppConfig,
    api: &dyn FormApi,
    cache: &mut EnumGroupCache,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let language = language.unwrap_or(config.api.language.as_str());
    let groups = cache.get_or_fetch(api, &config.form.company_id, language, Instant::now())?;
    Ok(groups
        .iter()
        .map(|g| format!("{}\t{}", g.id, g.name))
        .collect())
}

// ============================================================================
// Helpers
// ============================================================================

pub fn read_file(path: &str) -> Result<String, FormError> {
    std::fs::read_to_string(path).map_err(|source| FormError::Io {
        path: path.to_string(),
        source,
    })
}

pub fn write_output(output: Option<&str>, content: &str) -> Result<(), FormError> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|source| FormError::Io {
            path: path.to_string(),
            source,
        }),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn load_store(sections_path: &str) -> Result<SectionStore, FormError> {
    let text = read_file(sections_path)?;
    let mut store = SectionStore::new();
    store.import_json(&text)?;
    Ok(store)
}
