mod common;

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use common::temp_file;
use form_builder::api::{
    api_model::{ApiResponse, EnumGroup, FormQuery, UNKNOWN_ERROR},
    client::{FormApi, HttpFormApi},
    enum_cache::{ENUM_GROUP_TTL, EnumGroupCache},
    error::ApiError,
};
use form_builder::cli::commands::{cmd_load, cmd_submit};
use form_builder::cli::config::AppConfig;
use form_builder::form::form_model::FormData;
use serde_json::{Value, json};

// ============================================================================
// Mock backend
// ============================================================================

#[derive(Default)]
struct MockApi {
    group_calls: Cell<usize>,
    fail_groups: Cell<bool>,
    submitted: RefCell<Option<Value>>,
    stored_form: RefCell<Option<FormData<Value>>>,
}

impl FormApi for MockApi {
    fn submit_form(&self, data: &FormData) -> Result<ApiResponse<Value>, ApiError> {
        *self.submitted.borrow_mut() = Some(serde_json::to_value(data).unwrap());
        Ok(ApiResponse::ok(json!({"id": 7})))
    }

    fn load_form(&self, query: &FormQuery) -> Result<ApiResponse<FormData<Value>>, ApiError> {
        match self.stored_form.borrow().clone() {
            Some(form) if form.key == query.key => Ok(ApiResponse::ok(form)),
            _ => Ok(ApiResponse::failed("Form not found")),
        }
    }

    fn get_enum_groups(
        &self,
        company_id: &str,
        language: &str,
    ) -> Result<ApiResponse<Vec<EnumGroup>>, ApiError> {
        self.group_calls.set(self.group_calls.get() + 1);
        if self.fail_groups.get() {
            return Ok(ApiResponse {
                success: false,
                data: None,
                error: None,
            });
        }
        Ok(ApiResponse::ok(vec![EnumGroup {
            id: format!("{company_id}-{language}"),
            name: "Billing".into(),
            description: None,
        }]))
    }
}

fn config_with_key(key: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.form.key = key.into();
    config.form.company_id = "acme".into();
    config
}

// ============================================================================
// Response envelope
// ============================================================================

#[test]
fn rejected_response_uses_backend_message_or_fallback() {
    let err = ApiResponse::<Value>::failed("Duplicate key").into_result().unwrap_err();
    assert_eq!(err.to_string(), "Duplicate key");

    let silent: ApiResponse<Value> = serde_json::from_value(json!({"success": false})).unwrap();
    assert_eq!(silent.into_result().unwrap_err().to_string(), UNKNOWN_ERROR);

    let ok: ApiResponse<Value> = serde_json::from_value(json!({"success": true, "data": 1})).unwrap();
    assert_eq!(ok.into_result().unwrap(), Some(json!(1)));
}

#[test]
fn http_endpoints_join_cleanly() {
    let api = HttpFormApi::new("http://forms.local/api/", Duration::from_secs(1));
    assert_eq!(api.endpoint("forms"), "http://forms.local/api/forms");
    assert_eq!(api.endpoint("/enums/groups"), "http://forms.local/api/enums/groups");
}

// ============================================================================
// Enum group cache
// ============================================================================

#[test]
fn cache_serves_fresh_entries_without_refetching() {
    let api = MockApi::default();
    let mut cache = EnumGroupCache::default();
    let t0 = Instant::now();

    let first = cache.get_or_fetch(&api, "acme", "en", t0).unwrap();
    let second = cache.get_or_fetch(&api, "acme", "en", t0 + Duration::from_secs(60)).unwrap();

    assert_eq!(first, second);
    assert_eq!(api.group_calls.get(), 1);
}

#[test]
fn cache_is_keyed_by_company_and_language() {
    let api = MockApi::default();
    let mut cache = EnumGroupCache::default();
    let t0 = Instant::now();

    let en = cache.get_or_fetch(&api, "acme", "en", t0).unwrap();
    let nl = cache.get_or_fetch(&api, "acme", "nl", t0).unwrap();
    let other = cache.get_or_fetch(&api, "globex", "en", t0).unwrap();

    assert_eq!(en[0].id, "acme-en");
    assert_eq!(nl[0].id, "acme-nl");
    assert_eq!(other[0].id, "globex-en");
    assert_eq!(api.group_calls.get(), 3);
    assert_eq!(cache.len(), 3);
}

#[test]
fn cache_entries_expire_after_ttl() {
    let api = MockApi::default();
    let mut cache = EnumGroupCache::default();
    let t0 = Instant::now();

    cache.get_or_fetch(&api, "acme", "en", t0).unwrap();
    assert!(cache.get("acme", "en", t0 + ENUM_GROUP_TTL).is_none());
    cache.get_or_fetch(&api, "acme", "en", t0 + ENUM_GROUP_TTL).unwrap();
    assert_eq!(api.group_calls.get(), 2);

    cache.invalidate("acme", "en");
    assert!(cache.is_empty());
}

#[test]
fn failed_fetches_are_not_cached() {
    let api = MockApi::default();
    api.fail_groups.set(true);
    let mut cache = EnumGroupCache::default();
    let t0 = Instant::now();

    let err = cache.get_or_fetch(&api, "acme", "en", t0).unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref m) if m == UNKNOWN_ERROR));
    assert!(cache.is_empty());

    api.fail_groups.set(false);
    assert!(cache.get_or_fetch(&api, "acme", "en", t0).is_ok());
    assert_eq!(api.group_calls.get(), 2);
}

// ============================================================================
// submit / load commands
// ============================================================================

#[test]
fn submit_posts_the_cleaned_template() {
    let path = temp_file(
        "submit.json",
        &json!([{"title": "Main", "elements": [{"type": "select", "label": "Plan"}]}]).to_string(),
    );
    let api = MockApi::default();

    let fingerprint = cmd_submit(path.to_str().unwrap(), &config_with_key("plans"), &api).unwrap();
    assert_eq!(fingerprint.len(), 40);

    let sent = api.submitted.borrow().clone().unwrap();
    assert_eq!(sent["key"], "plans");
    assert_eq!(sent["companyId"], "acme");
    let element = &sent["template"]["sections"][0]["elements"][0];
    assert_eq!(element["label"], "Plan");
    assert_eq!(element["values"].as_array().unwrap().len(), 3);
    assert!(element.get("key").is_none());
}

#[test]
fn submit_without_key_never_reaches_backend() {
    let path = temp_file("submit-nokey.json", "[]");
    let api = MockApi::default();

    let err = cmd_submit(path.to_str().unwrap(), &config_with_key(""), &api).unwrap_err();
    assert!(err.to_string().contains("formKey"));
    assert!(api.submitted.borrow().is_none());
}

#[test]
fn submit_reports_invalid_json_file() {
    let path = temp_file("submit-object.json", r#"{"foo": 1}"#);
    let api = MockApi::default();

    let err = cmd_submit(path.to_str().unwrap(), &config_with_key("plans"), &api).unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON file");
}

#[test]
fn load_writes_rehydrated_sections() {
    let api = MockApi::default();
    *api.stored_form.borrow_mut() = Some(
        serde_json::from_value(json!({
            "key": "plans",
            "version": "1.0",
            "companyId": "acme",
            "template": {
                "title": "Plans",
                "sections": [{"title": "Main", "elements": [{"type": "radio-group", "name": "radiogroup-1-1"}]}]
            }
        }))
        .unwrap(),
    );

    let json = cmd_load(None, None, &config_with_key("plans"), &api).unwrap();
    let sections: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(sections[0]["title"], "Main");
    assert_eq!(sections[0]["elements"][0]["name"], "radiogroup-1-1");
    assert_eq!(sections[0]["elements"][0]["values"].as_array().unwrap().len(), 3);

    let err = cmd_load(Some("missing"), None, &config_with_key("plans"), &api).unwrap_err();
    assert_eq!(err.to_string(), "Form not found");
}
