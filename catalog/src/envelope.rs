//! Response envelope normalization.
//!
//! The backend wraps lists inconsistently. Every list read goes through
//! [`normalize_list`], which accepts:
//!
//! - a bare array: `[...]`
//! - `{"data": [...]}`
//! - `{"items": [...]}`
//! - `{"results": [...]}` (Django REST pagination)
//!
//! Anything else is [`Normalized::Malformed`].

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keys that may wrap a list, checked in order.
pub const ENVELOPE_KEYS: [&str; 3] = ["data", "items", "results"];

/// Outcome of envelope normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<T> {
    /// The envelope was recognized; elements in server order.
    Ok(Vec<T>),
    /// The body was not any recognized envelope.
    Malformed,
}

impl<T> Normalized<T> {
    /// Whether the envelope was recognized.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The items, or an empty list with a warning when malformed.
    #[must_use]
    pub fn into_items_or_empty(self, context: &str) -> Vec<T> {
        match self {
            Self::Ok(items) => items,
            Self::Malformed => {
                tracing::warn!(context, "Unrecognized response envelope, using empty list");
                Vec::new()
            },
        }
    }
}

/// Locate the list inside `body` and decode its elements.
///
/// Elements that fail to decode are skipped with a warning; the rest keep
/// their order.
#[must_use]
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> Normalized<T> {
    let Some(elements) = unwrap_envelope(body) else {
        return Normalized::Malformed;
    };

    let items = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(item) => Some(item),
            Err(error) => {
                tracing::warn!(index, %error, "Skipping undecodable list element");
                None
            },
        })
        .collect();

    Normalized::Ok(items)
}

fn unwrap_envelope(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(elements) => Some(elements),
        Value::Object(mut map) => ENVELOPE_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(elements)) => Some(elements),
            _ => None,
        }),
        _ => None,
    }
}
