//! Round-trip and canonical-form properties of the codec.

mod common;

use common::*;
use ciborium::Value;
use txcanon::types::{
    Amount, Anchor, AssetName, BabbageTransactionOutput, CddlSet, Certificate, Credential, Datum,
    DnsName, Drep, GovActionId, Int, MultiassetEntry, PoolMetadata, PoolParams, Relay, Token,
    TransactionInput, TransactionOutput, UnitInterval, Url, Vote, VoteOption, Voter, VoterVotes,
    VotingProcedure, Withdrawal,
};
use txcanon::{Transaction, decode_tx, decode_tx_body, encode_tx, encode_tx_body};

/// A body exercising every supported optional field, built in canonical
/// order so the round-trip compares equal structurally and byte-wise.
fn rich_body() -> txcanon::TransactionBody {
    let mut body = simple_body();
    body.ttl = Some(75_000_000);
    body.certificates = Some(CddlSet::new(
        vec![
            Certificate::StakeRegistration {
                stake_credential: Credential::KeyHash(key_hash()),
            },
            Certificate::StakeDelegation {
                stake_credential: Credential::KeyHash(key_hash()),
                pool_key_hash: [0x21; 28],
            },
            Certificate::VoteDelegation {
                stake_credential: Credential::ScriptHash([0x31; 28]),
                drep: Drep::AlwaysAbstain,
            },
            Certificate::DrepRegistration {
                drep_credential: Credential::KeyHash([0x41; 28]),
                deposit: 500_000_000,
                anchor: Some(Anchor {
                    url: Url::new("https://example.com/drep.json".into()).unwrap(),
                    data_hash: [0x42; 32],
                }),
            },
            Certificate::ResignCommitteeCold {
                cold_credential: Credential::KeyHash([0x51; 28]),
                anchor: None,
            },
        ],
        true,
    ));
    body.withdrawals = Some(vec![
        Withdrawal {
            reward_account: [0xe1; 29],
            amount: 1_000_000,
        },
        Withdrawal {
            reward_account: [0xe2; 29],
            amount: 2_000_000,
        },
    ]);
    body.auxiliary_data_hash = Some([0x61; 32]);
    body.validity_interval_start = Some(74_000_000);
    body.mint = Some(vec![MultiassetEntry {
        policy_id: policy_id(),
        tokens: vec![
            Token {
                asset_name: AssetName::new(vec![0x01]).unwrap(),
                amount: Int::from(-5),
            },
            Token {
                asset_name: AssetName::new(vec![0x01, 0x02]).unwrap(),
                amount: Int::from(400),
            },
        ],
    }]);
    body.script_data_hash = Some([0x71; 32]);
    body.collateral_inputs = Some(CddlSet::new(
        vec![TransactionInput {
            transaction_id: [0x81; 32],
            index: 1,
        }],
        true,
    ));
    body.required_signers = Some(CddlSet::new(vec![[0x91; 28]], true));
    body.network_id = Some(1);
    body.collateral_return = Some(TransactionOutput::Babbage(BabbageTransactionOutput {
        address: address(),
        amount: Amount::WithoutMultiasset { coin: 4_000_000 },
        datum: None,
        reference_script: None,
    }));
    body.total_collateral = Some(5_000_000);
    body.reference_inputs = Some(CddlSet::new(
        vec![TransactionInput {
            transaction_id: [0xa1; 32],
            index: 2,
        }],
        true,
    ));
    body.voting_procedures = Some(vec![VoterVotes {
        voter: Voter::DrepKeyHash([0xb1; 28]),
        votes: vec![Vote {
            gov_action_id: GovActionId {
                transaction_id: [0xc1; 32],
                index: 0,
            },
            voting_procedure: VotingProcedure {
                vote: VoteOption::Yes,
                anchor: None,
            },
        }],
    }]);
    body.treasury = Some(10_000_000);
    body.donation = Some(1_000_000);
    // Tagged sets everywhere, matching the other sets above.
    body.inputs.has_tag = true;
    body
}

#[test]
fn test_simple_body_reencodes_identically() {
    let bytes = from_hex(&simple_body_hex());
    let body = decode_tx_body(&bytes).unwrap();
    assert_eq!(hex::encode(encode_tx_body(&body)), simple_body_hex());
}

#[test]
fn test_hand_built_body_round_trips() {
    let body = rich_body();
    let decoded = decode_tx_body(&encode_tx_body(&body)).unwrap();
    assert_eq!(body, decoded);
}

#[test]
fn test_encoding_is_a_fixed_point() {
    let bytes = encode_tx_body(&rich_body());
    let decoded = decode_tx_body(&bytes).unwrap();
    let reencoded = encode_tx_body(&decoded);
    assert_eq!(bytes, reencoded);
}

#[test]
fn test_babbage_output_with_datum_round_trips() {
    let mut body = simple_body();
    body.outputs = vec![
        TransactionOutput::Babbage(BabbageTransactionOutput {
            address: address(),
            amount: Amount::WithMultiasset {
                coin: 1_500_000,
                multiasset: vec![MultiassetEntry {
                    policy_id: policy_id(),
                    tokens: vec![Token {
                        asset_name: AssetName::new(b"pixel".to_vec()).unwrap(),
                        amount: 1u64,
                    }],
                }],
            },
            datum: Some(Datum::Inline(from_hex("d87980"))),
            reference_script: Some(from_hex(&format!("82015820{}", "11".repeat(32)))),
        }),
        TransactionOutput::Babbage(BabbageTransactionOutput {
            address: address(),
            amount: Amount::WithoutMultiasset { coin: 2_000_000 },
            datum: Some(Datum::Hash([0x0d; 32])),
            reference_script: None,
        }),
    ];
    let decoded = decode_tx_body(&encode_tx_body(&body)).unwrap();
    assert_eq!(body, decoded);
}

#[test]
fn test_pool_registration_round_trips() {
    let mut body = simple_body();
    body.certificates = Some(CddlSet::new(
        vec![Certificate::PoolRegistration {
            pool_params: PoolParams {
                operator: [0x01; 28],
                vrf_key_hash: [0x02; 32],
                pledge: 100_000_000,
                cost: 340_000_000,
                margin: UnitInterval {
                    numerator: 3,
                    denominator: 100,
                },
                reward_account: [0xe1; 29],
                pool_owners: CddlSet::new(vec![[0x03; 28], [0x04; 28]], false),
                relays: vec![
                    Relay::SingleHostAddress {
                        port: Some(6000),
                        ipv4: Some([10, 0, 0, 1]),
                        ipv6: Some([0; 16]),
                    },
                    Relay::SingleHostName {
                        port: Some(6001),
                        dns_name: DnsName::new("relay1.example.com".into()).unwrap(),
                    },
                    Relay::MultiHostName {
                        dns_name: DnsName::new("relays.example.com".into()).unwrap(),
                    },
                ],
                metadata: Some(PoolMetadata {
                    url: Url::new("https://example.com/pool.json".into()).unwrap(),
                    metadata_hash: [0x05; 32],
                }),
            },
        }],
        false,
    ));
    let decoded = decode_tx_body(&encode_tx_body(&body)).unwrap();
    assert_eq!(body, decoded);
}

#[test]
fn test_non_canonical_input_normalizes() {
    // Fee encoded in eight bytes instead of the minimal four.
    let wide_fee_hex = format!(
        "a3\
         0081825820{TX_ID_HEX}00\
         0181825839{ADDRESS_HEX}1a002dc6c0\
         021b000000000001e240"
    );
    let body = decode_tx_body(&from_hex(&wide_fee_hex)).unwrap();
    assert_eq!(body.fee, FEE);
    assert_eq!(hex::encode(encode_tx_body(&body)), simple_body_hex());
}

#[test]
fn test_unsorted_body_keys_normalize() {
    // Same fields as the simple body, fee key first.
    let unsorted_hex = format!(
        "a3\
         021a0001e240\
         0081825820{TX_ID_HEX}00\
         0181825839{ADDRESS_HEX}1a002dc6c0"
    );
    let body = decode_tx_body(&from_hex(&unsorted_hex)).unwrap();
    assert_eq!(body, simple_body());
    assert_eq!(hex::encode(encode_tx_body(&body)), simple_body_hex());
}

#[test]
fn test_indefinite_length_input_normalizes() {
    // Outputs as an indefinite-length array (9f...ff).
    let indefinite_hex = format!(
        "a3\
         0081825820{TX_ID_HEX}00\
         019f825839{ADDRESS_HEX}1a002dc6c0ff\
         021a0001e240"
    );
    let body = decode_tx_body(&from_hex(&indefinite_hex)).unwrap();
    assert_eq!(hex::encode(encode_tx_body(&body)), simple_body_hex());
}

#[test]
fn test_tx_envelope_round_trips() {
    let tx = Transaction {
        body: rich_body(),
        witness_set: Value::Map(vec![]),
        script_validity: Some(true),
        auxiliary_data: Some(Value::Null),
    };
    let bytes = encode_tx(&tx);
    let decoded = decode_tx(&bytes).unwrap();
    assert_eq!(tx, decoded);
    assert_eq!(encode_tx(&decoded), bytes);
}
