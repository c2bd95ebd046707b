//! Request fingerprinting.
//!
//! The digest decides whether the generation service gets called at all, so
//! it must depend only on what the request says, never on how it was built.
//! Requests are serialized to a canonical JSON form (object keys sorted
//! lexicographically at every level, no whitespace) and hashed with SHA-256.
//!
//! Key order is handled here explicitly rather than relying on the map type
//! `serde_json` happens to be compiled with.

use crate::request::CompiledRequest;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Serialize a JSON value with sorted object keys and no whitespace.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // Scalars have a single serialization already
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(&map[key], out);
    }
    out.push('}');
}

/// SHA-256 of a string, returned as a hex string.
pub fn hash_str(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Fingerprint of a compiled request.
///
/// Equal requests always produce equal digests, whatever order their keys
/// were inserted in.
pub fn request_digest(request: &CompiledRequest) -> String {
    let mut out = String::new();
    write_object(request.as_map(), &mut out);
    hash_str(&out)
}
