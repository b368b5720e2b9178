//! The transaction data model.
//!
//! All entities are immutable value types: they are constructed once by a
//! parser (or by hand, for serialization) and never mutated afterwards; the
//! transform engine produces new values instead of editing in place.

pub mod certificates;
pub mod governance;

pub use certificates::*;
pub use governance::*;

use ciborium::Value;
use std::marker::PhantomData;

/// Unsigned wire integer. CBOR unsigned integers cover exactly the uint64
/// range, so the 0..2^64-1 bound holds by construction.
pub type Uint = u64;

/// Signed wire integer. Parsing admits the full CBOR integer range
/// (-2^64..2^64-1); validation narrows mint amounts to int64.
pub type Int = ciborium::value::Integer;

/// An amount of lovelace.
pub type Coin = u64;

pub type Epoch = u64;

pub type TransactionId = [u8; 32];
pub type KeyHash = [u8; 28];
pub type ScriptHash = [u8; 28];
pub type PolicyId = [u8; 28];
pub type VrfKeyHash = [u8; 32];
pub type DatumHash = [u8; 32];
pub type ScriptDataHash = [u8; 32];
pub type AuxiliaryDataHash = [u8; 32];
pub type AnchorDataHash = [u8; 32];
pub type RewardAccount = [u8; 29];
pub type Ipv4 = [u8; 4];
pub type Ipv6 = [u8; 16];

/// Raw output address bytes. Addresses are carried opaquely; this crate does
/// not interpret their header or payload.
pub type Address = Vec<u8>;

pub const MAX_ASSET_NAME_LENGTH: usize = 32;
pub const MAX_DNS_NAME_LENGTH: usize = 64;
pub const MAX_URL_LENGTH: usize = 64;
pub const MAX_PORT: u64 = 65535;

/// Ceiling on the element count of every list and map in a transaction.
pub const MAX_LIST_LENGTH: usize = 65535;

/// A byte string whose length is bounded by `N` at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxLenBytes<const N: usize>(Vec<u8>);

impl<const N: usize> MaxLenBytes<N> {
    /// Wrap `bytes`, refusing anything longer than `N`.
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() <= N).then_some(MaxLenBytes(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> AsRef<[u8]> for MaxLenBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A text string whose byte length is bounded by `N` at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxLenString<const N: usize>(String);

impl<const N: usize> MaxLenString<N> {
    /// Wrap `text`, refusing anything longer than `N` bytes.
    pub fn new(text: String) -> Option<Self> {
        (text.len() <= N).then_some(MaxLenString(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> AsRef<str> for MaxLenString<N> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub type AssetName = MaxLenBytes<MAX_ASSET_NAME_LENGTH>;
pub type DnsName = MaxLenString<MAX_DNS_NAME_LENGTH>;
pub type Url = MaxLenString<MAX_URL_LENGTH>;

/// Flavor marker for a set that may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeEmpty;

/// Flavor marker for a set the schema declares non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonEmpty;

/// Flavor marker for a non-empty set whose element order is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonEmptyOrdered;

/// A CDDL set: an element sequence that may or may not be wrapped in wire
/// tag 258, with pairwise-distinct elements under canonical serialization.
///
/// The flavor marker records the schema-level may-be-empty / order-significant
/// distinction at the type level; the runtime shape is identical for all
/// three flavors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CddlSet<T, Flavor = MaybeEmpty> {
    pub items: Vec<T>,
    /// Whether the wire representation carried tag 258.
    pub has_tag: bool,
    flavor: PhantomData<Flavor>,
}

impl<T, Flavor> CddlSet<T, Flavor> {
    pub fn new(items: Vec<T>, has_tag: bool) -> Self {
        CddlSet {
            items,
            has_tag,
            flavor: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type CddlNonEmptySet<T> = CddlSet<T, NonEmpty>;
pub type CddlNonEmptyOrderedSet<T> = CddlSet<T, NonEmptyOrdered>;

/// A reference to a UTxO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub transaction_id: TransactionId,
    pub index: Uint,
}

/// One token bundle under a policy id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<A> {
    pub asset_name: AssetName,
    pub amount: A,
}

/// All token bundles of one policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiassetEntry<A> {
    pub policy_id: PolicyId,
    pub tokens: Vec<Token<A>>,
}

/// An ordered multiasset map, generic over the token amount type: unsigned
/// for output amounts, signed for mint.
pub type Multiasset<A> = Vec<MultiassetEntry<A>>;

/// An output amount: either a bare coin or a coin paired with a multiasset
/// map. The wire distinguishes the two by shape (bare integer vs 2-tuple),
/// not by a discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    WithoutMultiasset {
        coin: Coin,
    },
    WithMultiasset {
        coin: Coin,
        multiasset: Multiasset<Coin>,
    },
}

impl Amount {
    pub fn coin(&self) -> Coin {
        match self {
            Amount::WithoutMultiasset { coin } | Amount::WithMultiasset { coin, .. } => *coin,
        }
    }
}

/// The datum attached to a map-format output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    Hash(DatumHash),
    /// Embedded CBOR bytes carried under tag 24.
    Inline(Vec<u8>),
}

/// Embedded CBOR bytes of a reference script, carried under tag 24.
pub type ReferenceScript = Vec<u8>;

/// The older, tuple-shaped output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransactionOutput {
    pub address: Address,
    pub amount: Amount,
    pub datum_hash: Option<DatumHash>,
}

/// The newer, map-shaped output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BabbageTransactionOutput {
    pub address: Address,
    pub amount: Amount,
    pub datum: Option<Datum>,
    pub reference_script: Option<ReferenceScript>,
}

/// A transaction output in either wire shape. The variant is inferred from
/// whether the decoded value is an array or a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutput {
    Legacy(LegacyTransactionOutput),
    Babbage(BabbageTransactionOutput),
}

/// One withdrawal entry: a reward account and the amount withdrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub reward_account: RewardAccount,
    pub amount: Coin,
}

/// The transaction body: required inputs, outputs and fee plus the optional
/// fields, keyed on the wire by fixed small integers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBody {
    pub inputs: CddlSet<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: Coin,
    pub ttl: Option<Uint>,
    pub certificates: Option<CddlNonEmptyOrderedSet<Certificate>>,
    pub withdrawals: Option<Vec<Withdrawal>>,
    /// Legacy protocol-parameter update field, carried opaquely; populating
    /// it is an unfixable validation error.
    pub update: Option<Value>,
    pub auxiliary_data_hash: Option<AuxiliaryDataHash>,
    pub validity_interval_start: Option<Uint>,
    pub mint: Option<Multiasset<Int>>,
    pub script_data_hash: Option<ScriptDataHash>,
    pub collateral_inputs: Option<CddlNonEmptySet<TransactionInput>>,
    pub required_signers: Option<CddlNonEmptySet<KeyHash>>,
    pub network_id: Option<Uint>,
    pub collateral_return: Option<TransactionOutput>,
    pub total_collateral: Option<Coin>,
    pub reference_inputs: Option<CddlNonEmptySet<TransactionInput>>,
    pub voting_procedures: Option<Vec<VoterVotes>>,
    pub proposal_procedures: Option<CddlNonEmptyOrderedSet<ProposalProcedure>>,
    pub treasury: Option<Coin>,
    pub donation: Option<Coin>,
}

impl TransactionBody {
    /// The `has_tag` flag of every CDDL set present anywhere in the body,
    /// including pool-owner sets inside pool registration certificates.
    /// Mixed flags mean the producer tagged some sets and not others.
    pub fn set_tag_flags(&self) -> Vec<bool> {
        let mut flags = vec![self.inputs.has_tag];
        if let Some(set) = &self.certificates {
            flags.push(set.has_tag);
            for certificate in &set.items {
                if let Certificate::PoolRegistration { pool_params } = certificate {
                    flags.push(pool_params.pool_owners.has_tag);
                }
            }
        }
        if let Some(set) = &self.collateral_inputs {
            flags.push(set.has_tag);
        }
        if let Some(set) = &self.required_signers {
            flags.push(set.has_tag);
        }
        if let Some(set) = &self.reference_inputs {
            flags.push(set.has_tag);
        }
        if let Some(set) = &self.proposal_procedures {
            flags.push(set.has_tag);
        }
        flags
    }
}

/// A signed transaction envelope. The witness set and auxiliary data are not
/// interpreted beyond presence, so they are carried as raw wire values; which
/// trailing slots were present is preserved so the envelope re-encodes with
/// its original arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub body: TransactionBody,
    pub witness_set: Value,
    pub script_validity: Option<bool>,
    pub auxiliary_data: Option<Value>,
}

/// An unsigned transaction envelope as produced by CLI tooling, with all
/// witness slots carried opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub body: TransactionBody,
    pub script_witnesses: Option<Value>,
    pub datum_witnesses: Option<Value>,
    pub redeemer_witnesses: Option<Value>,
    pub auxiliary_data: Option<Value>,
}
