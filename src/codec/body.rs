//! Parsing and serialization of the transaction body and the transaction
//! envelopes.

use super::certificates::CERTIFICATE_CODEC;
use super::governance::{
    PROPOSAL_PROCEDURE_CODEC, parse_voting_procedures, serialize_voting_procedures,
};
use super::outputs::{parse_mint, parse_output, serialize_mint, serialize_output};
use super::*;
use crate::error::{ParseError, Result};
use crate::types::{
    KeyHash, RawTransaction, Transaction, TransactionBody, TransactionInput, Withdrawal,
};
use ciborium::Value;

pub const INPUT_CODEC: ItemCodec<TransactionInput> = ItemCodec {
    parse: parse_input,
    serialize: serialize_input,
};

pub const REQUIRED_SIGNER_CODEC: ItemCodec<KeyHash> = ItemCodec {
    parse: |v| parse_fixed_len_bytes(v, ParseError::InvalidRequiredSigner),
    serialize: |signer| bytes_value(signer),
};

pub fn parse_input(value: &Value) -> Result<TransactionInput> {
    let [transaction_id, index] = parse_tuple::<2>(value, ParseError::InvalidInput)?;
    Ok(TransactionInput {
        transaction_id: parse_fixed_len_bytes(transaction_id, ParseError::InvalidTransactionId)?,
        index: parse_uint(index, ParseError::InvalidInputIndex)?,
    })
}

pub fn serialize_input(input: &TransactionInput) -> Value {
    Value::Array(vec![
        bytes_value(&input.transaction_id),
        uint_value(input.index),
    ])
}

/// The fixed body key table. This is the wire contract: keys 10 and 12 were
/// never assigned and any key outside the table is a hard parse failure.
mod body_key {
    pub const INPUTS: u64 = 0;
    pub const OUTPUTS: u64 = 1;
    pub const FEE: u64 = 2;
    pub const TTL: u64 = 3;
    pub const CERTIFICATES: u64 = 4;
    pub const WITHDRAWALS: u64 = 5;
    pub const UPDATE: u64 = 6;
    pub const AUXILIARY_DATA_HASH: u64 = 7;
    pub const VALIDITY_INTERVAL_START: u64 = 8;
    pub const MINT: u64 = 9;
    pub const SCRIPT_DATA_HASH: u64 = 11;
    pub const COLLATERAL_INPUTS: u64 = 13;
    pub const REQUIRED_SIGNERS: u64 = 14;
    pub const NETWORK_ID: u64 = 15;
    pub const COLLATERAL_RETURN: u64 = 16;
    pub const TOTAL_COLLATERAL: u64 = 17;
    pub const REFERENCE_INPUTS: u64 = 18;
    pub const VOTING_PROCEDURES: u64 = 19;
    pub const PROPOSAL_PROCEDURES: u64 = 20;
    pub const TREASURY: u64 = 21;
    pub const DONATION: u64 = 22;

    pub const HIGHEST: u64 = DONATION;
}

/// Parse a transaction body from its decoded map.
pub fn parse_tx_body(value: &Value) -> Result<TransactionBody> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidTransactionBody,
        |k| parse_uint(k, ParseError::InvalidTransactionBody),
        |v| Ok(v.clone()),
    )?;
    let mut fields: [Option<Value>; body_key::HIGHEST as usize + 1] =
        [const { None }; body_key::HIGHEST as usize + 1];
    for (key, val) in entries {
        match key {
            0..=9 | 11 | 13..=22 => fields[key as usize] = Some(val),
            _ => return Err(ParseError::TxBodyUnknownItems),
        }
    }
    let field = |key: u64| fields[key as usize].as_ref();

    Ok(TransactionBody {
        inputs: parse_set(
            field(body_key::INPUTS).ok_or(ParseError::InvalidInputs)?,
            INPUT_CODEC,
            ParseError::InvalidInputs,
            ParseError::InputsNotUnique,
        )?,
        outputs: parse_array(
            field(body_key::OUTPUTS).ok_or(ParseError::InvalidOutputs)?,
            ParseError::InvalidOutputs,
        )?
        .iter()
        .map(parse_output)
        .collect::<Result<Vec<_>>>()?,
        fee: parse_uint(
            field(body_key::FEE).ok_or(ParseError::InvalidFee)?,
            ParseError::InvalidFee,
        )?,
        ttl: parse_optional(field(body_key::TTL), |v| {
            parse_uint(v, ParseError::InvalidTtl)
        })?,
        certificates: parse_optional(field(body_key::CERTIFICATES), |v| {
            parse_set(
                v,
                CERTIFICATE_CODEC,
                ParseError::InvalidCertificates,
                ParseError::CertificatesNotUnique,
            )
        })?,
        withdrawals: parse_optional(field(body_key::WITHDRAWALS), parse_withdrawals)?,
        update: field(body_key::UPDATE).cloned(),
        auxiliary_data_hash: parse_optional(field(body_key::AUXILIARY_DATA_HASH), |v| {
            parse_fixed_len_bytes(v, ParseError::InvalidAuxiliaryDataHash)
        })?,
        validity_interval_start: parse_optional(field(body_key::VALIDITY_INTERVAL_START), |v| {
            parse_uint(v, ParseError::InvalidValidityIntervalStart)
        })?,
        mint: parse_optional(field(body_key::MINT), |v| {
            parse_mint(v).map_err(|err| match err {
                ParseError::InvalidMultiasset => ParseError::InvalidMint,
                other => other,
            })
        })?,
        script_data_hash: parse_optional(field(body_key::SCRIPT_DATA_HASH), |v| {
            parse_fixed_len_bytes(v, ParseError::InvalidScriptDataHash)
        })?,
        collateral_inputs: parse_optional(field(body_key::COLLATERAL_INPUTS), |v| {
            parse_set(
                v,
                INPUT_CODEC,
                ParseError::InvalidCollateralInputs,
                ParseError::CollateralInputsNotUnique,
            )
        })?,
        required_signers: parse_optional(field(body_key::REQUIRED_SIGNERS), |v| {
            parse_set(
                v,
                REQUIRED_SIGNER_CODEC,
                ParseError::InvalidRequiredSigners,
                ParseError::RequiredSignersNotUnique,
            )
        })?,
        network_id: parse_optional(field(body_key::NETWORK_ID), |v| {
            parse_uint(v, ParseError::InvalidNetworkId)
        })?,
        collateral_return: parse_optional(field(body_key::COLLATERAL_RETURN), |v| {
            parse_output(v).map_err(|err| match err {
                ParseError::InvalidOutput => ParseError::InvalidCollateralReturnOutput,
                other => other,
            })
        })?,
        total_collateral: parse_optional(field(body_key::TOTAL_COLLATERAL), |v| {
            parse_uint(v, ParseError::InvalidTotalCollateral)
        })?,
        reference_inputs: parse_optional(field(body_key::REFERENCE_INPUTS), |v| {
            parse_set(
                v,
                INPUT_CODEC,
                ParseError::InvalidReferenceInputs,
                ParseError::ReferenceInputsNotUnique,
            )
        })?,
        voting_procedures: parse_optional(
            field(body_key::VOTING_PROCEDURES),
            parse_voting_procedures,
        )?,
        proposal_procedures: parse_optional(field(body_key::PROPOSAL_PROCEDURES), |v| {
            parse_set(
                v,
                PROPOSAL_PROCEDURE_CODEC,
                ParseError::InvalidProposalProcedures,
                ParseError::ProposalProceduresNotUnique,
            )
        })?,
        treasury: parse_optional(field(body_key::TREASURY), |v| {
            parse_uint(v, ParseError::InvalidTreasury)
        })?,
        donation: parse_optional(field(body_key::DONATION), |v| {
            parse_uint(v, ParseError::InvalidDonation)
        })?,
    })
}

fn parse_withdrawals(value: &Value) -> Result<Vec<Withdrawal>> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidWithdrawals,
        |k| parse_fixed_len_bytes(k, ParseError::InvalidWithdrawalAddress),
        |v| parse_uint(v, ParseError::InvalidWithdrawalAmount),
    )?;
    Ok(entries
        .into_iter()
        .map(|(reward_account, amount)| Withdrawal {
            reward_account,
            amount,
        })
        .collect())
}

pub fn serialize_tx_body(body: &TransactionBody) -> Value {
    let mut entries = vec![
        (
            uint_value(body_key::INPUTS),
            serialize_set(&body.inputs, INPUT_CODEC),
        ),
        (
            uint_value(body_key::OUTPUTS),
            Value::Array(body.outputs.iter().map(serialize_output).collect()),
        ),
        (uint_value(body_key::FEE), uint_value(body.fee)),
    ];
    let mut push = |key: u64, value: Option<Value>| {
        if let Some(value) = value {
            entries.push((uint_value(key), value));
        }
    };
    push(body_key::TTL, body.ttl.map(uint_value));
    push(
        body_key::CERTIFICATES,
        body.certificates
            .as_ref()
            .map(|set| serialize_set(set, CERTIFICATE_CODEC)),
    );
    push(
        body_key::WITHDRAWALS,
        body.withdrawals.as_ref().map(|w| serialize_withdrawals(w)),
    );
    push(body_key::UPDATE, body.update.clone());
    push(
        body_key::AUXILIARY_DATA_HASH,
        body.auxiliary_data_hash.as_ref().map(|h| bytes_value(h)),
    );
    push(
        body_key::VALIDITY_INTERVAL_START,
        body.validity_interval_start.map(uint_value),
    );
    push(body_key::MINT, body.mint.as_ref().map(serialize_mint));
    push(
        body_key::SCRIPT_DATA_HASH,
        body.script_data_hash.as_ref().map(|h| bytes_value(h)),
    );
    push(
        body_key::COLLATERAL_INPUTS,
        body.collateral_inputs
            .as_ref()
            .map(|set| serialize_set(set, INPUT_CODEC)),
    );
    push(
        body_key::REQUIRED_SIGNERS,
        body.required_signers
            .as_ref()
            .map(|set| serialize_set(set, REQUIRED_SIGNER_CODEC)),
    );
    push(body_key::NETWORK_ID, body.network_id.map(uint_value));
    push(
        body_key::COLLATERAL_RETURN,
        body.collateral_return.as_ref().map(serialize_output),
    );
    push(
        body_key::TOTAL_COLLATERAL,
        body.total_collateral.map(uint_value),
    );
    push(
        body_key::REFERENCE_INPUTS,
        body.reference_inputs
            .as_ref()
            .map(|set| serialize_set(set, INPUT_CODEC)),
    );
    push(
        body_key::VOTING_PROCEDURES,
        body.voting_procedures
            .as_ref()
            .map(|v| serialize_voting_procedures(v)),
    );
    push(
        body_key::PROPOSAL_PROCEDURES,
        body.proposal_procedures
            .as_ref()
            .map(|set| serialize_set(set, PROPOSAL_PROCEDURE_CODEC)),
    );
    push(body_key::TREASURY, body.treasury.map(uint_value));
    push(body_key::DONATION, body.donation.map(uint_value));
    Value::Map(entries)
}

fn serialize_withdrawals(withdrawals: &[Withdrawal]) -> Value {
    Value::Map(
        withdrawals
            .iter()
            .map(|w| (bytes_value(&w.reward_account), uint_value(w.amount)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

// The envelope arity tables below describe observed producer behavior, not a
// declared schema. Signing tools and CLI versions across eras emit different
// numbers of trailing slots; new producer variants may require extending the
// tables.

/// Parse a signed transaction envelope.
///
/// Producer arity table:
/// - 2 elements: `[body, witness_set]`
/// - 3 elements: `[body, witness_set, auxiliary_data]`
/// - 4 elements: `[body, witness_set, script_validity, auxiliary_data]`
pub fn parse_tx(value: &Value) -> Result<Transaction> {
    let slots = parse_tuple_with_undefined::<4>(value, ParseError::InvalidTransaction)?;
    let present = slots.iter().flatten().count();
    let body = parse_tx_body(slots[0].ok_or(ParseError::InvalidTransaction)?)?;
    let witness_set = slots[1].ok_or(ParseError::InvalidTransaction)?.clone();
    let (script_validity, auxiliary_data) = match present {
        2 => (None, None),
        3 => (None, Some(slots[2].cloned().ok_or(ParseError::InvalidTransaction)?)),
        4 => (
            Some(parse_bool(
                slots[2].ok_or(ParseError::InvalidTransaction)?,
                ParseError::InvalidScriptValidity,
            )?),
            Some(slots[3].cloned().ok_or(ParseError::InvalidTransaction)?),
        ),
        _ => return Err(ParseError::InvalidTransaction),
    };
    Ok(Transaction {
        body,
        witness_set,
        script_validity,
        auxiliary_data,
    })
}

/// Parse an unsigned (raw) transaction envelope.
///
/// Producer arity table. The last present slot is always the auxiliary
/// data; intermediate witness slots fill in order:
/// - 2 elements: `[body, auxiliary_data]`
/// - 3 elements: `[body, script_witnesses, auxiliary_data]`
/// - 4 elements: `[body, script_witnesses, datum_witnesses, auxiliary_data]`
/// - 5 elements: `[body, script_witnesses, datum_witnesses,
///   redeemer_witnesses, auxiliary_data]`
pub fn parse_raw_tx(value: &Value) -> Result<RawTransaction> {
    let slots = parse_tuple_with_undefined::<5>(value, ParseError::InvalidRawTransaction)?;
    let present = slots.iter().flatten().count();
    if !(2..=5).contains(&present) {
        return Err(ParseError::InvalidRawTransaction);
    }
    let body = parse_tx_body(slots[0].ok_or(ParseError::InvalidRawTransaction)?)?;
    let trailing: Vec<Value> = slots[1..present]
        .iter()
        .filter_map(|slot| slot.cloned())
        .collect();
    let (witnesses, auxiliary_data) = trailing.split_at(trailing.len() - 1);
    Ok(RawTransaction {
        body,
        script_witnesses: witnesses.first().cloned(),
        datum_witnesses: witnesses.get(1).cloned(),
        redeemer_witnesses: witnesses.get(2).cloned(),
        auxiliary_data: auxiliary_data.first().cloned(),
    })
}

pub fn serialize_tx(tx: &Transaction) -> Value {
    let mut items = vec![serialize_tx_body(&tx.body), tx.witness_set.clone()];
    if let Some(script_validity) = tx.script_validity {
        items.push(Value::Bool(script_validity));
    }
    if let Some(auxiliary_data) = &tx.auxiliary_data {
        items.push(auxiliary_data.clone());
    }
    Value::Array(items)
}

pub fn serialize_raw_tx(tx: &RawTransaction) -> Value {
    let mut items = vec![serialize_tx_body(&tx.body)];
    for witness_slot in [
        &tx.script_witnesses,
        &tx.datum_witnesses,
        &tx.redeemer_witnesses,
    ] {
        if let Some(witnesses) = witness_slot {
            items.push(witnesses.clone());
        }
    }
    if let Some(auxiliary_data) = &tx.auxiliary_data {
        items.push(auxiliary_data.clone());
    }
    Value::Array(items)
}
