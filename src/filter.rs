//! Unset-field removal.
//!
//! The generation service distinguishes "key absent" from "key present with a
//! falsy value", and the request digest must not depend on whether an unset
//! field happened to be emitted as `null`. Designs are therefore serialized
//! with unset fields as `null` and swept here before they go anywhere else.

use serde::Serialize;
use serde_json::Value;

/// Recursively drop object keys whose value is `null`.
///
/// `false`, `0`, and `""` are kept: they are meaningful values, not omissions.
/// Array elements are never removed (positions matter), but objects inside
/// arrays are swept too. Objects left empty by the sweep are kept.
pub fn strip_unset(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_unset(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_unset).collect()),
        other => other,
    }
}

/// Serialize `value` to JSON and sweep out unset fields.
pub fn to_filtered_value<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    Ok(strip_unset(serde_json::to_value(value)?))
}
