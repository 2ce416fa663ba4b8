use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

/// Envelope every backend endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }

    /// `success=false` becomes [`ApiError::Rejected`] carrying the backend's
    /// message, or a generic one when it sent none.
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            let message = self
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            Err(ApiError::Rejected(message))
        }
    }
}

/// Which stored form to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormQuery {
    pub key: String,
    pub version: String,
    pub company_id: String,
}

/// Entry of the externally managed group enumeration referenced by `groupId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
