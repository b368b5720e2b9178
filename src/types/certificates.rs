//! Certificate entities: credentials, the certificate union, pool parameters
//! and relays.

use super::{Coin, Epoch, Ipv4, Ipv6, KeyHash, RewardAccount, ScriptHash, Uint, Url, VrfKeyHash};
use super::{CddlSet, DnsName};
use crate::types::governance::Anchor;
use ciborium::Value;

/// A key- or script-based credential, reused for stake, DRep and committee
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    KeyHash(KeyHash),
    ScriptHash(ScriptHash),
}

/// A delegated representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drep {
    KeyHash(KeyHash),
    ScriptHash(ScriptHash),
    AlwaysAbstain,
    AlwaysNoConfidence,
}

/// A rational number carried under wire tag 30, e.g. the pool margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInterval {
    pub numerator: Uint,
    pub denominator: Uint,
}

/// How a stake pool can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    SingleHostAddress {
        port: Option<u16>,
        ipv4: Option<Ipv4>,
        ipv6: Option<Ipv6>,
    },
    SingleHostName {
        port: Option<u16>,
        dns_name: DnsName,
    },
    MultiHostName {
        dns_name: DnsName,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMetadata {
    pub url: Url,
    pub metadata_hash: [u8; 32],
}

/// Registration parameters of a stake pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolParams {
    pub operator: KeyHash,
    pub vrf_key_hash: VrfKeyHash,
    pub pledge: Coin,
    pub cost: Coin,
    pub margin: UnitInterval,
    pub reward_account: RewardAccount,
    pub pool_owners: CddlSet<KeyHash>,
    pub relays: Vec<Relay>,
    pub metadata: Option<PoolMetadata>,
}

/// The certificate union, discriminated on the wire by a leading integer
/// (0-18).
///
/// The two deprecated kinds are carried with their remaining elements opaque:
/// this crate cannot construct them, only pass them through. The four
/// combined-delegation kinds parse structurally but are flagged as
/// unsupported by validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Certificate {
    StakeRegistration {
        stake_credential: Credential,
    },
    StakeDeregistration {
        stake_credential: Credential,
    },
    StakeDelegation {
        stake_credential: Credential,
        pool_key_hash: KeyHash,
    },
    PoolRegistration {
        pool_params: PoolParams,
    },
    PoolRetirement {
        pool_key_hash: KeyHash,
        epoch: Epoch,
    },
    /// Deprecated; elements after the discriminator are kept verbatim.
    GenesisKeyDelegation {
        rest: Vec<Value>,
    },
    /// Deprecated; elements after the discriminator are kept verbatim.
    MoveInstantaneousRewards {
        rest: Vec<Value>,
    },
    Registration {
        stake_credential: Credential,
        deposit: Coin,
    },
    Deregistration {
        stake_credential: Credential,
        deposit: Coin,
    },
    VoteDelegation {
        stake_credential: Credential,
        drep: Drep,
    },
    StakeAndVoteDelegation {
        stake_credential: Credential,
        pool_key_hash: KeyHash,
        drep: Drep,
    },
    StakeRegistrationAndDelegation {
        stake_credential: Credential,
        pool_key_hash: KeyHash,
        deposit: Coin,
    },
    VoteRegistrationAndDelegation {
        stake_credential: Credential,
        drep: Drep,
        deposit: Coin,
    },
    StakeVoteRegistrationAndDelegation {
        stake_credential: Credential,
        pool_key_hash: KeyHash,
        drep: Drep,
        deposit: Coin,
    },
    AuthorizeCommitteeHot {
        cold_credential: Credential,
        hot_credential: Credential,
    },
    ResignCommitteeCold {
        cold_credential: Credential,
        anchor: Option<Anchor>,
    },
    DrepRegistration {
        drep_credential: Credential,
        deposit: Coin,
        anchor: Option<Anchor>,
    },
    DrepDeregistration {
        drep_credential: Credential,
        deposit: Coin,
    },
    DrepUpdate {
        drep_credential: Credential,
        anchor: Option<Anchor>,
    },
}
