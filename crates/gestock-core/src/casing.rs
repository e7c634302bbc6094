//! # Key Casing
//!
//! The backend answers with snake_case column names (`prix_vente`,
//! `date_vente`); the client model reads camelCase (`prixVente`,
//! `dateVente`). Every successful response body goes through
//! [`to_camel_case_keys`] before it is deserialized.
//!
//! ```text
//! {"prix_vente": 7500, "lignes": [{"produit_id": 1}]}
//!                      │
//!                      ▼  to_camel_case_keys
//! {"prixVente": 7500, "lignes": [{"produitId": 1}]}
//! ```
//!
//! Only `_` followed by a lowercase ASCII letter is rewritten; keys such as
//! `code_2` or `_id` keep their underscore before digits and uppercase.

use serde_json::{Map, Value};

/// Converts one snake_case key to camelCase.
///
/// ```rust
/// use gestock_core::casing::snake_to_camel;
///
/// assert_eq!(snake_to_camel("seuil_alerte"), "seuilAlerte");
/// assert_eq!(snake_to_camel("id"), "id");
/// assert_eq!(snake_to_camel("ligne_2"), "ligne_2");
/// ```
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }

    out
}

/// Rewrites every object key of `value` to camelCase, recursing into
/// arrays and nested objects. Scalars are returned unchanged.
pub fn to_camel_case_keys(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(to_camel_case_keys).collect()),
        Value::Object(fields) => {
            let converted: Map<String, Value> = fields
                .into_iter()
                .map(|(key, inner)| (snake_to_camel(&key), to_camel_case_keys(inner)))
                .collect();
            Value::Object(converted)
        }
        scalar => scalar,
    }
}
