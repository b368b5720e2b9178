//! Parsing and serialization of transaction outputs, amounts and multiasset
//! maps.

use super::*;
use crate::error::{ParseError, Result};
use crate::types::{
    Amount, BabbageTransactionOutput, Coin, Datum, Int, LegacyTransactionOutput, Multiasset,
    MultiassetEntry, Token, TransactionOutput,
};
use ciborium::Value;

/// An output is tuple-shaped (legacy) or map-shaped (babbage); the wire
/// carries no discriminator, so the variant is inferred from the value shape.
pub fn parse_output(value: &Value) -> Result<TransactionOutput> {
    match value {
        Value::Array(_) => parse_legacy_output(value).map(TransactionOutput::Legacy),
        Value::Map(_) => parse_babbage_output(value).map(TransactionOutput::Babbage),
        _ => Err(ParseError::InvalidOutput),
    }
}

fn parse_legacy_output(value: &Value) -> Result<LegacyTransactionOutput> {
    let [address, amount, datum_hash] =
        parse_tuple_with_undefined::<3>(value, ParseError::InvalidOutput)?;
    Ok(LegacyTransactionOutput {
        address: parse_bytes(
            address.ok_or(ParseError::InvalidOutputAddress)?,
            ParseError::InvalidOutputAddress,
        )?,
        amount: parse_amount(amount.ok_or(ParseError::InvalidOutputAmount)?)?,
        datum_hash: parse_optional(datum_hash, |v| {
            parse_fixed_len_bytes(v, ParseError::InvalidOutputDatumHash)
        })?,
    })
}

mod output_key {
    pub const ADDRESS: u64 = 0;
    pub const AMOUNT: u64 = 1;
    pub const DATUM: u64 = 2;
    pub const REFERENCE_SCRIPT: u64 = 3;
}

fn parse_babbage_output(value: &Value) -> Result<BabbageTransactionOutput> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidOutput,
        |k| parse_uint(k, ParseError::InvalidOutput),
        |v| Ok(v.clone()),
    )?;
    let mut fields: [Option<Value>; 4] = [const { None }; 4];
    for (key, val) in entries {
        match key {
            output_key::ADDRESS
            | output_key::AMOUNT
            | output_key::DATUM
            | output_key::REFERENCE_SCRIPT => fields[key as usize] = Some(val),
            _ => return Err(ParseError::InvalidOutput),
        }
    }
    Ok(BabbageTransactionOutput {
        address: parse_bytes(
            fields[0].as_ref().ok_or(ParseError::InvalidOutputAddress)?,
            ParseError::InvalidOutputAddress,
        )?,
        amount: parse_amount(fields[1].as_ref().ok_or(ParseError::InvalidOutputAmount)?)?,
        datum: parse_optional(fields[2].as_ref(), parse_datum)?,
        reference_script: parse_optional(fields[3].as_ref(), |v| {
            parse_embedded_cbor(v, ParseError::InvalidOutputReferenceScript)
        })?,
    })
}

fn parse_datum(value: &Value) -> Result<Datum> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidOutputDatum)?;
    match kind {
        0 => {
            let [hash] = parse_rest::<1>(rest, ParseError::InvalidOutputDatum)?;
            parse_fixed_len_bytes(hash, ParseError::InvalidOutputDatumHash).map(Datum::Hash)
        }
        1 => {
            let [inline] = parse_rest::<1>(rest, ParseError::InvalidOutputDatum)?;
            parse_embedded_cbor(inline, ParseError::InvalidOutputDatum).map(Datum::Inline)
        }
        _ => Err(ParseError::InvalidOutputDatum),
    }
}

/// An amount is a bare unsigned integer (coin only) or a 2-tuple of coin and
/// multiasset map: shape dispatch, mirroring the wire's choice type.
pub fn parse_amount(value: &Value) -> Result<Amount> {
    match value {
        Value::Integer(_) => Ok(Amount::WithoutMultiasset {
            coin: parse_uint(value, ParseError::InvalidOutputAmount)?,
        }),
        _ => {
            let [coin, multiasset] = parse_tuple::<2>(value, ParseError::InvalidOutputAmount)?;
            Ok(Amount::WithMultiasset {
                coin: parse_uint(coin, ParseError::InvalidOutputAmount)?,
                multiasset: parse_multiasset(multiasset, |v| {
                    parse_uint(v, ParseError::InvalidTokenAmount)
                })?,
            })
        }
    }
}

/// Parse a multiasset map, generic over the token amount parser (unsigned
/// for outputs, signed for mint).
pub fn parse_multiasset<A>(
    value: &Value,
    parse_token_amount: fn(&Value) -> Result<A>,
) -> Result<Multiasset<A>> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidMultiasset,
        |k| parse_fixed_len_bytes(k, ParseError::InvalidPolicyId),
        |v| {
            parse_map_entries(
                v,
                ParseError::InvalidMultiasset,
                |k| parse_max_len_bytes(k, ParseError::InvalidAssetName),
                parse_token_amount,
            )
        },
    )?;
    Ok(entries
        .into_iter()
        .map(|(policy_id, tokens)| MultiassetEntry {
            policy_id,
            tokens: tokens
                .into_iter()
                .map(|(asset_name, amount)| Token { asset_name, amount })
                .collect(),
        })
        .collect())
}

pub fn parse_mint(value: &Value) -> Result<Multiasset<Int>> {
    parse_multiasset(value, |v| parse_int(v, ParseError::InvalidMintAmount))
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

pub fn serialize_output(output: &TransactionOutput) -> Value {
    match output {
        TransactionOutput::Legacy(output) => {
            let mut items = vec![
                bytes_value(&output.address),
                serialize_amount(&output.amount),
            ];
            if let Some(hash) = &output.datum_hash {
                items.push(bytes_value(hash));
            }
            Value::Array(items)
        }
        TransactionOutput::Babbage(output) => {
            let mut entries = vec![
                (uint_value(output_key::ADDRESS), bytes_value(&output.address)),
                (uint_value(output_key::AMOUNT), serialize_amount(&output.amount)),
            ];
            if let Some(datum) = &output.datum {
                entries.push((uint_value(output_key::DATUM), serialize_datum(datum)));
            }
            if let Some(script) = &output.reference_script {
                entries.push((
                    uint_value(output_key::REFERENCE_SCRIPT),
                    embedded_cbor_value(script),
                ));
            }
            Value::Map(entries)
        }
    }
}

fn serialize_datum(datum: &Datum) -> Value {
    match datum {
        Datum::Hash(hash) => Value::Array(vec![uint_value(0), bytes_value(hash)]),
        Datum::Inline(bytes) => Value::Array(vec![uint_value(1), embedded_cbor_value(bytes)]),
    }
}

pub fn serialize_amount(amount: &Amount) -> Value {
    match amount {
        Amount::WithoutMultiasset { coin } => uint_value(*coin),
        Amount::WithMultiasset { coin, multiasset } => Value::Array(vec![
            uint_value(*coin),
            serialize_multiasset(multiasset, |amount: &Coin| uint_value(*amount)),
        ]),
    }
}

/// Serialize a multiasset map, generic over the token amount serializer.
pub fn serialize_multiasset<A>(
    multiasset: &Multiasset<A>,
    token_amount_value: fn(&A) -> Value,
) -> Value {
    Value::Map(
        multiasset
            .iter()
            .map(|entry| {
                (
                    bytes_value(&entry.policy_id),
                    Value::Map(
                        entry
                            .tokens
                            .iter()
                            .map(|token| {
                                (
                                    bytes_value(token.asset_name.as_slice()),
                                    token_amount_value(&token.amount),
                                )
                            })
                            .collect(),
                    ),
                )
            })
            .collect(),
    )
}

pub fn serialize_mint(mint: &Multiasset<Int>) -> Value {
    serialize_multiasset(mint, |amount: &Int| Value::Integer(*amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(n: u64) -> Value {
        Value::Integer(n.into())
    }

    #[test]
    fn test_amount_shape_dispatch() {
        let bare = uint(5_000_000);
        assert_eq!(
            parse_amount(&bare).unwrap(),
            Amount::WithoutMultiasset { coin: 5_000_000 }
        );

        let tuple = Value::Array(vec![uint(2), Value::Map(vec![])]);
        assert_eq!(
            parse_amount(&tuple).unwrap(),
            Amount::WithMultiasset {
                coin: 2,
                multiasset: vec![],
            }
        );
    }

    #[test]
    fn test_amount_rejects_wrong_arity() {
        let value = Value::Array(vec![uint(2)]);
        assert_eq!(parse_amount(&value), Err(ParseError::InvalidOutputAmount));
    }

    #[test]
    fn test_output_shape_dispatch() {
        let legacy = Value::Array(vec![Value::Bytes(vec![0; 57]), uint(1)]);
        assert!(matches!(
            parse_output(&legacy).unwrap(),
            TransactionOutput::Legacy(_)
        ));

        let babbage = Value::Map(vec![
            (uint(0), Value::Bytes(vec![0; 57])),
            (uint(1), uint(1)),
        ]);
        assert!(matches!(
            parse_output(&babbage).unwrap(),
            TransactionOutput::Babbage(_)
        ));

        assert_eq!(
            parse_output(&Value::Bool(true)),
            Err(ParseError::InvalidOutput)
        );
    }

    #[test]
    fn test_babbage_output_rejects_unknown_key() {
        let value = Value::Map(vec![
            (uint(0), Value::Bytes(vec![0; 57])),
            (uint(1), uint(1)),
            (uint(4), uint(1)),
        ]);
        assert_eq!(parse_output(&value), Err(ParseError::InvalidOutput));
    }

    #[test]
    fn test_datum_variants() {
        let hash = Value::Array(vec![uint(0), Value::Bytes(vec![7; 32])]);
        assert_eq!(parse_datum(&hash).unwrap(), Datum::Hash([7; 32]));

        let inline = Value::Array(vec![uint(1), embedded_cbor_value(&[0xa0])]);
        assert_eq!(parse_datum(&inline).unwrap(), Datum::Inline(vec![0xa0]));

        let bad = Value::Array(vec![uint(2), Value::Bytes(vec![7; 32])]);
        assert_eq!(parse_datum(&bad), Err(ParseError::InvalidOutputDatum));
    }

    #[test]
    fn test_multiasset_asset_name_bound() {
        let policy = Value::Bytes(vec![1; 28]);
        let oversized = Value::Map(vec![(
            policy,
            Value::Map(vec![(Value::Bytes(vec![0; 33]), uint(1))]),
        )]);
        assert_eq!(
            parse_multiasset(&oversized, |v| parse_uint(v, ParseError::InvalidTokenAmount)),
            Err(ParseError::InvalidAssetName)
        );
    }

    #[test]
    fn test_output_round_trip() {
        let output = TransactionOutput::Babbage(BabbageTransactionOutput {
            address: vec![0x01; 57],
            amount: Amount::WithMultiasset {
                coin: 9,
                multiasset: vec![MultiassetEntry {
                    policy_id: [2; 28],
                    tokens: vec![Token {
                        asset_name: crate::types::AssetName::new(vec![0xca, 0xfe]).unwrap(),
                        amount: 44,
                    }],
                }],
            },
            datum: Some(Datum::Inline(vec![0xa0])),
            reference_script: Some(vec![0x82, 0x01, 0x82]),
        });
        let reparsed = parse_output(&serialize_output(&output)).unwrap();
        assert_eq!(output, reparsed);
    }
}
