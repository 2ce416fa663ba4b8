use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{
    api_model::{ApiResponse, EnumGroup, FormQuery},
    error::ApiError,
};
use crate::form::form_model::FormData;

/// Backend operations the builder depends on.
pub trait FormApi {
    fn submit_form(&self, data: &FormData) -> Result<ApiResponse<Value>, ApiError>;

    fn load_form(&self, query: &FormQuery) -> Result<ApiResponse<FormData<Value>>, ApiError>;

    fn get_enum_groups(
        &self,
        company_id: &str,
        language: &str,
    ) -> Result<ApiResponse<Vec<EnumGroup>>, ApiError>;
}

// ============================================================================
// HTTP Backend
// ============================================================================

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFormApi {
    pub base_url: String,
    client: reqwest::blocking::Client,
}

impl Default for HttpFormApi {
    fn default() -> Self {
        Self::new("http://localhost:8080/api", DEFAULT_TIMEOUT)
    }
}

impl HttpFormApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn read<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        response.json().map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl FormApi for HttpFormApi {
    fn submit_form(&self, data: &FormData) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.endpoint("forms");
        info!(%url, key = %data.key, "submitting form");

        let response = self
            .client
            .post(&url)
            .json(data)
            .send()
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        self.read(&url, response)
    }

    fn load_form(&self, query: &FormQuery) -> Result<ApiResponse<FormData<Value>>, ApiError> {
        let url = self.endpoint("forms");
        info!(%url, key = %query.key, version = %query.version, "loading form");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", query.key.as_str()),
                ("version", query.version.as_str()),
                ("companyId", query.company_id.as_str()),
            ])
            .send()
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        self.read(&url, response)
    }

    fn get_enum_groups(
        &self,
        company_id: &str,
        language: &str,
    ) -> Result<ApiResponse<Vec<EnumGroup>>, ApiError> {
        let url = self.endpoint("enums/groups");
        debug!(%url, company_id, language, "fetching enum groups");

        let response = self
            .client
            .get(&url)
            .query(&[("companyId", company_id), ("language", language)])
            .send()
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        self.read(&url, response)
    }
}
