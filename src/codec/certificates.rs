//! Parsing and serialization of certificates and their component entities.

use super::governance::{parse_anchor, serialize_anchor};
use super::*;
use crate::cbor;
use crate::error::{ParseError, Result};
use crate::types::{
    Certificate, Credential, Drep, KeyHash, MAX_PORT, PoolMetadata, PoolParams, Relay,
    UnitInterval,
};
use ciborium::Value;

pub const POOL_OWNER_CODEC: ItemCodec<KeyHash> = ItemCodec {
    parse: |v| parse_fixed_len_bytes(v, ParseError::InvalidPoolOwner),
    serialize: |owner| bytes_value(owner),
};

pub const CERTIFICATE_CODEC: ItemCodec<Certificate> = ItemCodec {
    parse: parse_certificate,
    serialize: serialize_certificate,
};

/// Parse one certificate, dispatching on the leading integer discriminator.
///
/// Discriminators 5 and 6 (genesis key delegation, instantaneous rewards)
/// are deprecated: their payload is carried verbatim so the certificate can
/// round-trip, and validation rejects them.
pub fn parse_certificate(value: &Value) -> Result<Certificate> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidCertificate)?;
    match kind {
        0 => {
            let [credential] = parse_rest::<1>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeRegistration {
                stake_credential: parse_credential(credential)?,
            })
        }
        1 => {
            let [credential] = parse_rest::<1>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeDeregistration {
                stake_credential: parse_credential(credential)?,
            })
        }
        2 => {
            let [credential, pool] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeDelegation {
                stake_credential: parse_credential(credential)?,
                pool_key_hash: parse_fixed_len_bytes(pool, ParseError::InvalidPoolKeyHash)?,
            })
        }
        3 => Ok(Certificate::PoolRegistration {
            pool_params: parse_pool_params(rest)?,
        }),
        4 => {
            let [pool, epoch] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::PoolRetirement {
                pool_key_hash: parse_fixed_len_bytes(pool, ParseError::InvalidPoolKeyHash)?,
                epoch: parse_uint(epoch, ParseError::InvalidRetirementEpoch)?,
            })
        }
        5 => Ok(Certificate::GenesisKeyDelegation {
            rest: rest.to_vec(),
        }),
        6 => Ok(Certificate::MoveInstantaneousRewards {
            rest: rest.to_vec(),
        }),
        7 => {
            let [credential, deposit] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::Registration {
                stake_credential: parse_credential(credential)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        8 => {
            let [credential, deposit] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::Deregistration {
                stake_credential: parse_credential(credential)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        9 => {
            let [credential, drep] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::VoteDelegation {
                stake_credential: parse_credential(credential)?,
                drep: parse_drep(drep)?,
            })
        }
        10 => {
            let [credential, pool, drep] = parse_rest::<3>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeAndVoteDelegation {
                stake_credential: parse_credential(credential)?,
                pool_key_hash: parse_fixed_len_bytes(pool, ParseError::InvalidPoolKeyHash)?,
                drep: parse_drep(drep)?,
            })
        }
        11 => {
            let [credential, pool, deposit] =
                parse_rest::<3>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeRegistrationAndDelegation {
                stake_credential: parse_credential(credential)?,
                pool_key_hash: parse_fixed_len_bytes(pool, ParseError::InvalidPoolKeyHash)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        12 => {
            let [credential, drep, deposit] =
                parse_rest::<3>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::VoteRegistrationAndDelegation {
                stake_credential: parse_credential(credential)?,
                drep: parse_drep(drep)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        13 => {
            let [credential, pool, drep, deposit] =
                parse_rest::<4>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::StakeVoteRegistrationAndDelegation {
                stake_credential: parse_credential(credential)?,
                pool_key_hash: parse_fixed_len_bytes(pool, ParseError::InvalidPoolKeyHash)?,
                drep: parse_drep(drep)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        14 => {
            let [cold, hot] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::AuthorizeCommitteeHot {
                cold_credential: parse_credential(cold)?,
                hot_credential: parse_credential(hot)?,
            })
        }
        15 => {
            let [cold, anchor] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::ResignCommitteeCold {
                cold_credential: parse_credential(cold)?,
                anchor: parse_nullable(anchor, parse_anchor)?,
            })
        }
        16 => {
            let [credential, deposit, anchor] =
                parse_rest::<3>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::DrepRegistration {
                drep_credential: parse_credential(credential)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
                anchor: parse_nullable(anchor, parse_anchor)?,
            })
        }
        17 => {
            let [credential, deposit] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::DrepDeregistration {
                drep_credential: parse_credential(credential)?,
                deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
            })
        }
        18 => {
            let [credential, anchor] = parse_rest::<2>(rest, ParseError::InvalidCertificate)?;
            Ok(Certificate::DrepUpdate {
                drep_credential: parse_credential(credential)?,
                anchor: parse_nullable(anchor, parse_anchor)?,
            })
        }
        _ => Err(ParseError::InvalidCertificateType),
    }
}

pub fn parse_credential(value: &Value) -> Result<Credential> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidCredential)?;
    match kind {
        0 => {
            let [hash] = parse_rest::<1>(rest, ParseError::InvalidCredential)?;
            parse_fixed_len_bytes(hash, ParseError::InvalidCredentialKeyHash)
                .map(Credential::KeyHash)
        }
        1 => {
            let [hash] = parse_rest::<1>(rest, ParseError::InvalidCredential)?;
            parse_fixed_len_bytes(hash, ParseError::InvalidCredentialScriptHash)
                .map(Credential::ScriptHash)
        }
        _ => Err(ParseError::InvalidCredentialType),
    }
}

pub fn parse_drep(value: &Value) -> Result<Drep> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidDrep)?;
    match (kind, rest) {
        (0, [hash]) => {
            parse_fixed_len_bytes(hash, ParseError::InvalidDrepKeyHash).map(Drep::KeyHash)
        }
        (1, [hash]) => {
            parse_fixed_len_bytes(hash, ParseError::InvalidDrepScriptHash).map(Drep::ScriptHash)
        }
        (2, []) => Ok(Drep::AlwaysAbstain),
        (3, []) => Ok(Drep::AlwaysNoConfidence),
        (0..=3, _) => Err(ParseError::InvalidDrep),
        _ => Err(ParseError::InvalidDrepType),
    }
}

fn parse_pool_params(rest: &[Value]) -> Result<PoolParams> {
    let [operator, vrf, pledge, cost, margin, reward_account, owners, relays, metadata] =
        parse_rest::<9>(rest, ParseError::InvalidCertificate)?;
    Ok(PoolParams {
        operator: parse_fixed_len_bytes(operator, ParseError::InvalidPoolKeyHash)?,
        vrf_key_hash: parse_fixed_len_bytes(vrf, ParseError::InvalidVrfKeyHash)?,
        pledge: parse_uint(pledge, ParseError::InvalidPledge)?,
        cost: parse_uint(cost, ParseError::InvalidCost)?,
        margin: parse_unit_interval(margin)?,
        reward_account: parse_fixed_len_bytes(reward_account, ParseError::InvalidRewardAccount)?,
        pool_owners: parse_set(
            owners,
            POOL_OWNER_CODEC,
            ParseError::InvalidPoolOwners,
            ParseError::PoolOwnersNotUnique,
        )?,
        relays: parse_array(relays, ParseError::InvalidRelays)?
            .iter()
            .map(parse_relay)
            .collect::<Result<Vec<_>>>()?,
        metadata: parse_nullable(metadata, parse_pool_metadata)?,
    })
}

fn parse_unit_interval(value: &Value) -> Result<UnitInterval> {
    let inner = match value {
        Value::Tag(tag, inner) if *tag == cbor::RATIONAL_TAG => inner.as_ref(),
        _ => return Err(ParseError::InvalidMargin),
    };
    let [numerator, denominator] = parse_tuple::<2>(inner, ParseError::InvalidMargin)?;
    Ok(UnitInterval {
        numerator: parse_uint(numerator, ParseError::InvalidMargin)?,
        denominator: parse_uint(denominator, ParseError::InvalidMargin)?,
    })
}

fn parse_port(value: &Value) -> Result<u16> {
    let port = parse_uint(value, ParseError::InvalidRelayPort)?;
    if port > MAX_PORT {
        return Err(ParseError::InvalidRelayPort);
    }
    Ok(port as u16)
}

fn parse_relay(value: &Value) -> Result<Relay> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidRelay)?;
    match kind {
        0 => {
            let [port, ipv4, ipv6] = parse_rest::<3>(rest, ParseError::InvalidRelay)?;
            Ok(Relay::SingleHostAddress {
                port: parse_nullable(port, parse_port)?,
                ipv4: parse_nullable(ipv4, |v| {
                    parse_fixed_len_bytes(v, ParseError::InvalidRelayIpv4)
                })?,
                ipv6: parse_nullable(ipv6, |v| {
                    parse_fixed_len_bytes(v, ParseError::InvalidRelayIpv6)
                })?,
            })
        }
        1 => {
            let [port, dns_name] = parse_rest::<2>(rest, ParseError::InvalidRelay)?;
            Ok(Relay::SingleHostName {
                port: parse_nullable(port, parse_port)?,
                dns_name: parse_max_len_string(dns_name, ParseError::InvalidRelayDnsName)?,
            })
        }
        2 => {
            let [dns_name] = parse_rest::<1>(rest, ParseError::InvalidRelay)?;
            Ok(Relay::MultiHostName {
                dns_name: parse_max_len_string(dns_name, ParseError::InvalidRelayDnsName)?,
            })
        }
        _ => Err(ParseError::InvalidRelayType),
    }
}

fn parse_pool_metadata(value: &Value) -> Result<PoolMetadata> {
    let [url, hash] = parse_tuple::<2>(value, ParseError::InvalidPoolMetadata)?;
    Ok(PoolMetadata {
        url: parse_max_len_string(url, ParseError::InvalidPoolMetadataUrl)?,
        metadata_hash: parse_fixed_len_bytes(hash, ParseError::InvalidPoolMetadataHash)?,
    })
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

pub fn serialize_certificate(certificate: &Certificate) -> Value {
    let items = match certificate {
        Certificate::StakeRegistration { stake_credential } => {
            vec![uint_value(0), serialize_credential(stake_credential)]
        }
        Certificate::StakeDeregistration { stake_credential } => {
            vec![uint_value(1), serialize_credential(stake_credential)]
        }
        Certificate::StakeDelegation {
            stake_credential,
            pool_key_hash,
        } => vec![
            uint_value(2),
            serialize_credential(stake_credential),
            bytes_value(pool_key_hash),
        ],
        Certificate::PoolRegistration { pool_params } => {
            let mut items = vec![uint_value(3)];
            items.extend(serialize_pool_params(pool_params));
            items
        }
        Certificate::PoolRetirement {
            pool_key_hash,
            epoch,
        } => vec![uint_value(4), bytes_value(pool_key_hash), uint_value(*epoch)],
        Certificate::GenesisKeyDelegation { rest } => {
            let mut items = vec![uint_value(5)];
            items.extend(rest.iter().cloned());
            items
        }
        Certificate::MoveInstantaneousRewards { rest } => {
            let mut items = vec![uint_value(6)];
            items.extend(rest.iter().cloned());
            items
        }
        Certificate::Registration {
            stake_credential,
            deposit,
        } => vec![
            uint_value(7),
            serialize_credential(stake_credential),
            uint_value(*deposit),
        ],
        Certificate::Deregistration {
            stake_credential,
            deposit,
        } => vec![
            uint_value(8),
            serialize_credential(stake_credential),
            uint_value(*deposit),
        ],
        Certificate::VoteDelegation {
            stake_credential,
            drep,
        } => vec![
            uint_value(9),
            serialize_credential(stake_credential),
            serialize_drep(drep),
        ],
        Certificate::StakeAndVoteDelegation {
            stake_credential,
            pool_key_hash,
            drep,
        } => vec![
            uint_value(10),
            serialize_credential(stake_credential),
            bytes_value(pool_key_hash),
            serialize_drep(drep),
        ],
        Certificate::StakeRegistrationAndDelegation {
            stake_credential,
            pool_key_hash,
            deposit,
        } => vec![
            uint_value(11),
            serialize_credential(stake_credential),
            bytes_value(pool_key_hash),
            uint_value(*deposit),
        ],
        Certificate::VoteRegistrationAndDelegation {
            stake_credential,
            drep,
            deposit,
        } => vec![
            uint_value(12),
            serialize_credential(stake_credential),
            serialize_drep(drep),
            uint_value(*deposit),
        ],
        Certificate::StakeVoteRegistrationAndDelegation {
            stake_credential,
            pool_key_hash,
            drep,
            deposit,
        } => vec![
            uint_value(13),
            serialize_credential(stake_credential),
            bytes_value(pool_key_hash),
            serialize_drep(drep),
            uint_value(*deposit),
        ],
        Certificate::AuthorizeCommitteeHot {
            cold_credential,
            hot_credential,
        } => vec![
            uint_value(14),
            serialize_credential(cold_credential),
            serialize_credential(hot_credential),
        ],
        Certificate::ResignCommitteeCold {
            cold_credential,
            anchor,
        } => vec![
            uint_value(15),
            serialize_credential(cold_credential),
            nullable_value(anchor.as_ref(), serialize_anchor),
        ],
        Certificate::DrepRegistration {
            drep_credential,
            deposit,
            anchor,
        } => vec![
            uint_value(16),
            serialize_credential(drep_credential),
            uint_value(*deposit),
            nullable_value(anchor.as_ref(), serialize_anchor),
        ],
        Certificate::DrepDeregistration {
            drep_credential,
            deposit,
        } => vec![
            uint_value(17),
            serialize_credential(drep_credential),
            uint_value(*deposit),
        ],
        Certificate::DrepUpdate {
            drep_credential,
            anchor,
        } => vec![
            uint_value(18),
            serialize_credential(drep_credential),
            nullable_value(anchor.as_ref(), serialize_anchor),
        ],
    };
    Value::Array(items)
}

pub fn serialize_credential(credential: &Credential) -> Value {
    match credential {
        Credential::KeyHash(hash) => Value::Array(vec![uint_value(0), bytes_value(hash)]),
        Credential::ScriptHash(hash) => Value::Array(vec![uint_value(1), bytes_value(hash)]),
    }
}

pub fn serialize_drep(drep: &Drep) -> Value {
    match drep {
        Drep::KeyHash(hash) => Value::Array(vec![uint_value(0), bytes_value(hash)]),
        Drep::ScriptHash(hash) => Value::Array(vec![uint_value(1), bytes_value(hash)]),
        Drep::AlwaysAbstain => Value::Array(vec![uint_value(2)]),
        Drep::AlwaysNoConfidence => Value::Array(vec![uint_value(3)]),
    }
}

fn serialize_pool_params(params: &PoolParams) -> Vec<Value> {
    vec![
        bytes_value(&params.operator),
        bytes_value(&params.vrf_key_hash),
        uint_value(params.pledge),
        uint_value(params.cost),
        serialize_unit_interval(&params.margin),
        bytes_value(&params.reward_account),
        serialize_set(&params.pool_owners, POOL_OWNER_CODEC),
        Value::Array(params.relays.iter().map(serialize_relay).collect()),
        nullable_value(params.metadata.as_ref(), serialize_pool_metadata),
    ]
}

fn serialize_unit_interval(interval: &UnitInterval) -> Value {
    Value::Tag(
        cbor::RATIONAL_TAG,
        Box::new(Value::Array(vec![
            uint_value(interval.numerator),
            uint_value(interval.denominator),
        ])),
    )
}

fn serialize_relay(relay: &Relay) -> Value {
    match relay {
        Relay::SingleHostAddress { port, ipv4, ipv6 } => Value::Array(vec![
            uint_value(0),
            nullable_value(port.as_ref(), |p| uint_value(u64::from(*p))),
            nullable_value(ipv4.as_ref(), |ip| bytes_value(ip)),
            nullable_value(ipv6.as_ref(), |ip| bytes_value(ip)),
        ]),
        Relay::SingleHostName { port, dns_name } => Value::Array(vec![
            uint_value(1),
            nullable_value(port.as_ref(), |p| uint_value(u64::from(*p))),
            text_value(dns_name.as_str()),
        ]),
        Relay::MultiHostName { dns_name } => {
            Value::Array(vec![uint_value(2), text_value(dns_name.as_str())])
        }
    }
}

fn serialize_pool_metadata(metadata: &PoolMetadata) -> Value {
    Value::Array(vec![
        text_value(metadata.url.as_str()),
        bytes_value(&metadata.metadata_hash),
    ])
}
