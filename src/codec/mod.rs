//! Typed parsing and serialization over the decoded wire value tree.
//!
//! Parsers narrow a `ciborium::Value` into a model type or fail with the
//! caller's specific reason; there is no partial success. Serializers mirror
//! each parser exactly. For set element types both directions are bound
//! together in an [`ItemCodec`], so the set uniqueness check always
//! serializes with the serializer matching the parser that produced the
//! items.

pub mod body;
pub mod certificates;
pub mod governance;
pub mod outputs;

use crate::cbor;
use crate::error::{ParseError, Result};
use crate::types::{CddlSet, MaxLenBytes, MaxLenString};
use ciborium::Value;
use std::collections::HashSet;

/// A matched parse/serialize pair for one element type.
pub struct ItemCodec<T> {
    pub parse: fn(&Value) -> Result<T>,
    pub serialize: fn(&T) -> Value,
}

impl<T> Clone for ItemCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemCodec<T> {}

// ---------------------------------------------------------------------------
// Primitive validators
// ---------------------------------------------------------------------------

/// Narrow to an unsigned 64-bit integer.
pub fn parse_uint(value: &Value, err: ParseError) -> Result<u64> {
    match value {
        Value::Integer(n) => u64::try_from(i128::from(*n)).map_err(|_| err),
        _ => Err(err),
    }
}

/// Narrow to a signed integer, admitting the full CBOR integer range.
pub fn parse_int(value: &Value, err: ParseError) -> Result<ciborium::value::Integer> {
    match value {
        Value::Integer(n) => Ok(*n),
        _ => Err(err),
    }
}

pub fn parse_bool(value: &Value, err: ParseError) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(err),
    }
}

pub fn parse_bytes(value: &Value, err: ParseError) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        _ => Err(err),
    }
}

/// Narrow to a byte string of exactly `N` bytes.
pub fn parse_fixed_len_bytes<const N: usize>(value: &Value, err: ParseError) -> Result<[u8; N]> {
    match value {
        Value::Bytes(bytes) => <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| err),
        _ => Err(err),
    }
}

/// Narrow to a byte string of at most `N` bytes.
pub fn parse_max_len_bytes<const N: usize>(
    value: &Value,
    err: ParseError,
) -> Result<MaxLenBytes<N>> {
    match value {
        Value::Bytes(bytes) => MaxLenBytes::new(bytes.clone()).ok_or(err),
        _ => Err(err),
    }
}

/// Narrow to a text string of at most `N` bytes.
pub fn parse_max_len_string<const N: usize>(
    value: &Value,
    err: ParseError,
) -> Result<MaxLenString<N>> {
    match value {
        Value::Text(text) => MaxLenString::new(text.clone()).ok_or(err),
        _ => Err(err),
    }
}

/// Narrow to a byte string holding embedded CBOR under tag 24.
pub fn parse_embedded_cbor(value: &Value, err: ParseError) -> Result<Vec<u8>> {
    match value {
        Value::Tag(tag, inner) if *tag == cbor::ENCODED_CBOR_TAG => parse_bytes(inner, err),
        _ => Err(err),
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

pub fn parse_array<'a>(value: &'a Value, err: ParseError) -> Result<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(err),
    }
}

/// Narrow to an array of exactly `N` elements.
pub fn parse_tuple<'a, const N: usize>(value: &'a Value, err: ParseError) -> Result<&'a [Value; N]> {
    let items = parse_array(value, err)?;
    items.try_into().map_err(|_| err)
}

/// Narrow to an array of at most `N` elements, surfacing missing trailing
/// slots as `None`. Used for envelopes whose arity varies by producer.
pub fn parse_tuple_with_undefined<'a, const N: usize>(
    value: &'a Value,
    err: ParseError,
) -> Result<[Option<&'a Value>; N]> {
    let items = parse_array(value, err)?;
    if items.len() > N {
        return Err(err);
    }
    let mut slots = [None; N];
    for (slot, item) in slots.iter_mut().zip(items) {
        *slot = Some(item);
    }
    Ok(slots)
}

/// Narrow to a non-empty array and split off its leading integer
/// discriminator. Every index-dispatched union in the schema goes through
/// this; an out-of-range discriminator is the caller's decode error, never a
/// default case.
pub fn split_discriminated<'a>(value: &'a Value, err: ParseError) -> Result<(u64, &'a [Value])> {
    let items = parse_array(value, err)?;
    let (kind, rest) = items.split_first().ok_or(err)?;
    Ok((parse_uint(kind, err)?, rest))
}

/// Require exactly `N` elements after a discriminator.
pub fn parse_rest<'a, const N: usize>(rest: &'a [Value], err: ParseError) -> Result<&'a [Value; N]> {
    rest.try_into().map_err(|_| err)
}

/// Narrow to a map, parse every entry, and reject duplicate keys by
/// canonical-bytes comparison. Entry order is preserved as decoded.
pub fn parse_map_entries<K, V>(
    value: &Value,
    err: ParseError,
    parse_key: impl Fn(&Value) -> Result<K>,
    parse_value: impl Fn(&Value) -> Result<V>,
) -> Result<Vec<(K, V)>> {
    let entries = match value {
        Value::Map(entries) => entries,
        _ => return Err(err),
    };
    let mut seen = HashSet::with_capacity(entries.len());
    let mut parsed = Vec::with_capacity(entries.len());
    for (key, val) in entries {
        if !seen.insert(cbor::encode_canonical(key)) {
            return Err(err);
        }
        parsed.push((parse_key(key)?, parse_value(val)?));
    }
    Ok(parsed)
}

/// Apply the parser only if the field was present in its container.
pub fn parse_optional<T>(
    value: Option<&Value>,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Option<T>> {
    value.map(parse).transpose()
}

/// Map wire `null` to `None`, anything else through the parser.
pub fn parse_nullable<T>(
    value: &Value,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Option<T>> {
    match value {
        Value::Null => Ok(None),
        other => parse(other).map(Some),
    }
}

/// Parse a CDDL set: an array, optionally wrapped in tag 258, whose elements
/// must be pairwise distinct under canonical serialization.
pub fn parse_set<T, Flavor>(
    value: &Value,
    codec: ItemCodec<T>,
    invalid: ParseError,
    not_unique: ParseError,
) -> Result<CddlSet<T, Flavor>> {
    let (elements_value, has_tag) = match value {
        Value::Tag(tag, inner) if *tag == cbor::SET_TAG => (inner.as_ref(), true),
        other => (other, false),
    };
    let elements = parse_array(elements_value, invalid)?;
    let mut seen = HashSet::with_capacity(elements.len());
    let mut items = Vec::with_capacity(elements.len());
    for element in elements {
        let item = (codec.parse)(element)?;
        if !seen.insert(cbor::encode_canonical(&(codec.serialize)(&item))) {
            return Err(not_unique);
        }
        items.push(item);
    }
    Ok(CddlSet::new(items, has_tag))
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

pub fn uint_value(n: u64) -> Value {
    Value::Integer(n.into())
}

pub fn bytes_value(bytes: &[u8]) -> Value {
    Value::Bytes(bytes.to_vec())
}

pub fn text_value(text: &str) -> Value {
    Value::Text(text.to_string())
}

pub fn nullable_value<T>(value: Option<&T>, serialize: impl FnOnce(&T) -> Value) -> Value {
    match value {
        Some(inner) => serialize(inner),
        None => Value::Null,
    }
}

pub fn embedded_cbor_value(bytes: &[u8]) -> Value {
    Value::Tag(cbor::ENCODED_CBOR_TAG, Box::new(bytes_value(bytes)))
}

/// Serialize a CDDL set, re-wrapping in tag 258 when the parsed form carried
/// it.
pub fn serialize_set<T, Flavor>(set: &CddlSet<T, Flavor>, codec: ItemCodec<T>) -> Value {
    let items = Value::Array(set.items.iter().map(codec.serialize).collect());
    if set.has_tag {
        Value::Tag(cbor::SET_TAG, Box::new(items))
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MaybeEmpty;

    fn uint(n: u64) -> Value {
        Value::Integer(n.into())
    }

    const UINT_CODEC: ItemCodec<u64> = ItemCodec {
        parse: |v| parse_uint(v, ParseError::InvalidInput),
        serialize: |n| uint_value(*n),
    };

    #[test]
    fn test_parse_uint_rejects_negative() {
        let value = Value::Integer((-1).into());
        assert_eq!(
            parse_uint(&value, ParseError::InvalidFee),
            Err(ParseError::InvalidFee)
        );
    }

    #[test]
    fn test_parse_int_admits_beyond_int64() {
        let value = Value::Integer(u64::MAX.into());
        let n = parse_int(&value, ParseError::InvalidMintAmount).unwrap();
        assert_eq!(i128::from(n), u64::MAX as i128);
    }

    #[test]
    fn test_parse_fixed_len_bytes_exact() {
        let value = Value::Bytes(vec![0; 28]);
        assert!(parse_fixed_len_bytes::<28>(&value, ParseError::InvalidPolicyId).is_ok());
        assert!(parse_fixed_len_bytes::<32>(&value, ParseError::InvalidTransactionId).is_err());
    }

    #[test]
    fn test_parse_tuple_arity() {
        let value = Value::Array(vec![uint(1), uint(2)]);
        assert!(parse_tuple::<2>(&value, ParseError::InvalidInput).is_ok());
        assert!(parse_tuple::<3>(&value, ParseError::InvalidInput).is_err());
    }

    #[test]
    fn test_parse_tuple_with_undefined_fills_missing() {
        let value = Value::Array(vec![uint(1)]);
        let slots = parse_tuple_with_undefined::<3>(&value, ParseError::InvalidTransaction).unwrap();
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
        assert!(slots[2].is_none());
    }

    #[test]
    fn test_split_discriminated() {
        let value = Value::Array(vec![uint(4), uint(9)]);
        let (kind, rest) = split_discriminated(&value, ParseError::InvalidCertificate).unwrap();
        assert_eq!(kind, 4);
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_split_discriminated_rejects_empty() {
        let value = Value::Array(vec![]);
        assert!(split_discriminated(&value, ParseError::InvalidCertificate).is_err());
    }

    #[test]
    fn test_parse_map_entries_rejects_duplicate_keys() {
        let value = Value::Map(vec![(uint(1), uint(10)), (uint(1), uint(20))]);
        let result = parse_map_entries(
            &value,
            ParseError::InvalidWithdrawals,
            |k| parse_uint(k, ParseError::InvalidWithdrawals),
            |v| parse_uint(v, ParseError::InvalidWithdrawals),
        );
        assert_eq!(result, Err(ParseError::InvalidWithdrawals));
    }

    #[test]
    fn test_parse_map_entries_accepts_empty_map() {
        let value = Value::Map(vec![]);
        let entries = parse_map_entries(
            &value,
            ParseError::InvalidWithdrawals,
            |k| parse_uint(k, ParseError::InvalidWithdrawals),
            |v| parse_uint(v, ParseError::InvalidWithdrawals),
        )
        .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_set_untagged_and_tagged() {
        let array = Value::Array(vec![uint(1), uint(2)]);
        let set: CddlSet<u64, MaybeEmpty> = parse_set(
            &array,
            UINT_CODEC,
            ParseError::InvalidInputs,
            ParseError::InputsNotUnique,
        )
        .unwrap();
        assert!(!set.has_tag);
        assert_eq!(set.items, vec![1, 2]);

        let tagged = Value::Tag(crate::cbor::SET_TAG, Box::new(array));
        let set: CddlSet<u64, MaybeEmpty> = parse_set(
            &tagged,
            UINT_CODEC,
            ParseError::InvalidInputs,
            ParseError::InputsNotUnique,
        )
        .unwrap();
        assert!(set.has_tag);
    }

    #[test]
    fn test_parse_set_rejects_duplicates() {
        let array = Value::Array(vec![uint(7), uint(7)]);
        let result: Result<CddlSet<u64, MaybeEmpty>> = parse_set(
            &array,
            UINT_CODEC,
            ParseError::InvalidInputs,
            ParseError::InputsNotUnique,
        );
        assert_eq!(result.err(), Some(ParseError::InputsNotUnique));
    }

    #[test]
    fn test_serialize_set_round_trips_tag() {
        let set: CddlSet<u64, MaybeEmpty> = CddlSet::new(vec![3], true);
        let value = serialize_set(&set, UINT_CODEC);
        let reparsed: CddlSet<u64, MaybeEmpty> = parse_set(
            &value,
            UINT_CODEC,
            ParseError::InvalidInputs,
            ParseError::InputsNotUnique,
        )
        .unwrap();
        assert_eq!(set, reparsed);
    }
}
