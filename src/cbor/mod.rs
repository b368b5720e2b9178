//! Thin seam over the generic CBOR codec.
//!
//! Raw decoding and encoding are delegated to `ciborium`; this module adds the
//! two properties the transaction wire contract needs on top of it: decoding
//! must consume the whole input, and encoding must be canonical. `ciborium`
//! already writes minimal-width integer heads and definite-length containers,
//! so canonicalization reduces to recursively sorting map entries by the bytes
//! of their encoded keys.

use crate::error::{ParseError, Result};
use ciborium::Value;
use std::io::Cursor;

/// Wire tag wrapping set-typed collections (CDDL `#6.258`).
pub const SET_TAG: u64 = 258;

/// Wire tag wrapping rational numbers, e.g. the pool margin (CDDL `#6.30`).
pub const RATIONAL_TAG: u64 = 30;

/// Wire tag wrapping byte strings that hold embedded CBOR, e.g. inline datums
/// and reference scripts (CDDL `#6.24`).
pub const ENCODED_CBOR_TAG: u64 = 24;

/// Decode a single CBOR value, requiring the input to be fully consumed.
///
/// Trailing bytes after the value are a parse failure with the caller's
/// reason, the same as malformed CBOR.
pub fn decode(bytes: &[u8], err: ParseError) -> Result<Value> {
    let mut cursor = Cursor::new(bytes);
    let value: Value = ciborium::from_reader(&mut cursor).map_err(|_| err)?;
    if cursor.position() != bytes.len() as u64 {
        return Err(err);
    }
    Ok(value)
}

/// Encode a value canonically: sorted map keys, minimal-width integers,
/// definite lengths.
pub fn encode_canonical(value: &Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail, and `Value` trees never hit the
    // serializer's unsupported cases.
    ciborium::into_writer(&canonicalize(value), &mut bytes)
        .expect("CBOR encoding into a Vec cannot fail");
    bytes
}

/// Recursively order every map in the tree by the encoded bytes of its keys.
///
/// Byte strings under CBOR encode their length into the head, so comparing
/// encoded keys yields the length-first ordering the canonical form requires.
/// Tag 24 contents are opaque byte strings and pass through untouched.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Tag(tag, inner) => Value::Tag(*tag, Box::new(canonicalize(inner))),
        Value::Map(entries) => {
            let mut keyed: Vec<(Vec<u8>, (Value, Value))> = entries
                .iter()
                .map(|(k, v)| {
                    let k = canonicalize(k);
                    let v = canonicalize(v);
                    let mut key_bytes = Vec::new();
                    ciborium::into_writer(&k, &mut key_bytes)
                        .expect("CBOR encoding into a Vec cannot fail");
                    (key_bytes, (k, v))
                })
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Map(keyed.into_iter().map(|(_, entry)| entry).collect())
        }
        other => other.clone(),
    }
}
