//! JSON blobs the host embeds in a page, keyed by element id.
use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, warn};

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script\b([^>]*)>(.*?)</script\s*>"#).expect("valid script regex")
});
// `data-id` and friends must not count as the element id.
static ID_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']+)["']"#).expect("valid id regex")
});

#[derive(Debug, Clone, Default)]
pub struct EmbeddedData {
    blobs: HashMap<String, Value>,
}

impl EmbeddedData {
    /// Collects every `<script id="...">` whose body parses as JSON. Other
    /// scripts are ignored.
    pub fn from_html(html: &str) -> Self {
        let mut blobs = HashMap::new();
        for caps in SCRIPT_BLOCK.captures_iter(html) {
            let Some(id) = ID_ATTR.captures(&caps[1]).map(|c| c[1].to_string()) else {
                continue;
            };
            match serde_json::from_str::<Value>(caps[2].trim()) {
                Ok(value) => {
                    blobs.insert(id, value);
                }
                Err(e) => warn!("Skipping script #{}: not JSON ({})", id, e),
            }
        }
        Self { blobs }
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            blobs: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blobs.contains_key(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.blobs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn raw(&self, id: &str) -> Result<&Value> {
        self.blobs
            .get(id)
            .ok_or_else(|| anyhow!("No embedded data with id '{}'", id))
    }

    pub fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        let value = self.raw(id)?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("Embedded data '{}' has an unexpected shape", id))
    }

    /// Same as [`array_of`] but reads `blob[key]` instead of the blob itself.
    pub fn array_field<T: DeserializeOwned>(&self, id: &str, key: &str) -> Option<Vec<T>> {
        match self.raw(id) {
            Ok(value) => array_of(value.get(key).unwrap_or(&Value::Null), key),
            Err(e) => {
                error!("{:#}", e);
                None
            }
        }
    }
}

/// Deserializes a JSON array item by item. A non-array logs and yields
/// `None`. Items that don't fit `T` are skipped.
pub fn array_of<T: DeserializeOwned>(value: &Value, what: &str) -> Option<Vec<T>> {
    let Some(items) = value.as_array() else {
        error!("Error fetching {}: {} is not an array", what, what);
        return None;
    };
    let parsed = items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Skipping malformed {} entry: {}", what, e);
                None
            }
        })
        .collect();
    Some(parsed)
}
