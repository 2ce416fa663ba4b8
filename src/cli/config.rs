use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::form::form_model::{FormButton, FormConfig};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-builder",
    version,
    about = "Build, preview and publish multi-section form templates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Form API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to config file (default: form-builder.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the default configuration of a palette element
    NewElement {
        /// Palette key, e.g. Text, Dropdown, AddressComponent
        #[arg(long = "type")]
        element_type: String,
    },

    /// Print the wire representation of a saved section file
    Preview {
        /// Sections JSON file (as written by `load` or an editor export)
        #[arg(long)]
        sections: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Normalize a sections JSON file and write it back out
    Import {
        /// Sections JSON file to read
        #[arg(long)]
        sections: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Submit a saved section file to the backend
    Submit {
        /// Sections JSON file
        #[arg(long)]
        sections: String,
    },

    /// Load a form from the backend into a sections JSON file
    Load {
        /// Form key (default: form.key from config)
        #[arg(long)]
        key: Option<String>,

        /// Form version (default: form.version from config)
        #[arg(long)]
        version: Option<String>,

        /// Output file path
        #[arg(short, long, default_value = "sections.json")]
        output: String,
    },

    /// List the enum groups available for `groupId`
    Groups {
        /// Language code (default: api.language from config)
        #[arg(long)]
        language: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-builder.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub buttons: Vec<FormButton>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub company_id: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            key: String::new(),
            company_id: String::new(),
            version: default_version(),
            title: default_title(),
        }
    }
}

// Serde default helpers
fn default_base_url() -> String { "http://localhost:8080/api".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_version() -> String { "1.0".to_string() }
fn default_title() -> String { "Untitled Form".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-builder.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Form metadata from the config file.
pub fn build_form_config(settings: &FormSettings) -> FormConfig {
    FormConfig {
        form_key: settings.key.clone(),
        company_id: settings.company_id.clone(),
        version: settings.version.clone(),
        form_title: settings.title.clone(),
        ..FormConfig::default()
    }
}
