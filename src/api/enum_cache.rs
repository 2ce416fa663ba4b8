use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::api::{api_model::EnumGroup, client::FormApi, error::ApiError};

pub const ENUM_GROUP_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    fetched_at: Instant,
    groups: Vec<EnumGroup>,
}

/// Memoizes enum-group fetches per `(company_id, language)` for a fixed TTL.
/// Failed fetches are never cached.
pub struct EnumGroupCache {
    ttl: Duration,
    entries: HashMap<(String, String), CacheEntry>,
}

impl Default for EnumGroupCache {
    fn default() -> Self {
        Self::new(ENUM_GROUP_TTL)
    }
}

impl EnumGroupCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached groups if still fresh at `now`.
    pub fn get(&self, company_id: &str, language: &str, now: Instant) -> Option<&[EnumGroup]> {
        let entry = self
            .entries
            .get(&(company_id.to_string(), language.to_string()))?;
        if now.saturating_duration_since(entry.fetched_at) < self.ttl {
            Some(entry.groups.as_slice())
        } else {
            None
        }
    }

    pub fn get_or_fetch(
        &mut self,
        api: &dyn FormApi,
        company_id: &str,
        language: &str,
        now: Instant,
    ) -> Result<Vec<EnumGroup>, ApiError> {
        if let Some(groups) = self.get(company_id, language, now) {
            debug!(company_id, language, "enum groups served from cache");
            return Ok(groups.to_vec());
        }

        let groups = api
            .get_enum_groups(company_id, language)?
            .into_result()?
            .unwrap_or_default();

        self.entries.insert(
            (company_id.to_string(), language.to_string()),
            CacheEntry {
                fetched_at: now,
                groups: groups.clone(),
            },
        );
        Ok(groups)
    }

    pub fn invalidate(&mut self, company_id: &str, language: &str) {
        self.entries
            .remove(&(company_id.to_string(), language.to_string()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
