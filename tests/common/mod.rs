//! Shared fixtures for the integration tests.
//!
//! Fixtures are hand-assembled canonical CBOR hex strings plus the model
//! values they decode to, so every test can compare both directions.

#![allow(dead_code)]

use txcanon::types::{
    Amount, CddlSet, LegacyTransactionOutput, TransactionBody, TransactionInput, TransactionOutput,
};

pub const TX_ID_HEX: &str = "ba638246bd16e49eacfd46b40b26e15dc8e456eec02b78b84ffa8c44be74a6a9";

/// A 57-byte base address (header byte + two 28-byte hashes).
pub const ADDRESS_HEX: &str = "019493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e32c728d3861e164cab28cb8f006448139c8f1740ffb8e7aa9e5232dc";

pub const KEY_HASH_HEX: &str = "1730b1b700d616d51555538e83d67f13c113ad5f9b22212703482cb3";

pub const POLICY_ID_HEX: &str = "d6cfdbedd242056674c0e51ead01785497e3a48afbbb146dc72ee1e2";

pub const FEE: u64 = 123456;
pub const OUTPUT_COIN: u64 = 3000000;

pub fn tx_id() -> [u8; 32] {
    hex::decode(TX_ID_HEX).unwrap().try_into().unwrap()
}

pub fn address() -> Vec<u8> {
    hex::decode(ADDRESS_HEX).unwrap()
}

pub fn key_hash() -> [u8; 28] {
    hex::decode(KEY_HASH_HEX).unwrap().try_into().unwrap()
}

pub fn policy_id() -> [u8; 28] {
    hex::decode(POLICY_ID_HEX).unwrap().try_into().unwrap()
}

/// `{0: [[tx_id, 0]], 1: [[address, 3000000]], 2: 123456}` — one untagged
/// input, one legacy output, a fee and nothing else.
pub fn simple_body_hex() -> String {
    format!(
        "a3\
         0081825820{TX_ID_HEX}00\
         0181825839{ADDRESS_HEX}1a002dc6c0\
         021a0001e240"
    )
}

/// The model value `simple_body_hex` decodes to.
pub fn simple_body() -> TransactionBody {
    TransactionBody {
        inputs: CddlSet::new(
            vec![TransactionInput {
                transaction_id: tx_id(),
                index: 0,
            }],
            false,
        ),
        outputs: vec![TransactionOutput::Legacy(LegacyTransactionOutput {
            address: address(),
            amount: Amount::WithoutMultiasset { coin: OUTPUT_COIN },
            datum_hash: None,
        })],
        fee: FEE,
        ttl: None,
        certificates: None,
        withdrawals: None,
        update: None,
        auxiliary_data_hash: None,
        validity_interval_start: None,
        mint: None,
        script_data_hash: None,
        collateral_inputs: None,
        required_signers: None,
        network_id: None,
        collateral_return: None,
        total_collateral: None,
        reference_inputs: None,
        voting_procedures: None,
        proposal_procedures: None,
        treasury: None,
        donation: None,
    }
}

pub fn from_hex(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap()
}
