//! Shared helpers for model translation

use std::collections::BTreeMap;

/// `Some` only for a value with visible content
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

pub(crate) fn tags_of(tags: &Option<BTreeMap<String, String>>) -> BTreeMap<String, String> {
    tags.clone().unwrap_or_default()
}

/// Empty maps read back as absent
pub(crate) fn tags_model(tags: &BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.clone())
    }
}

pub(crate) fn list_model(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}
