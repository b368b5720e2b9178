//! Error types for txcanon.
//!
//! Two disjoint taxonomies: [`ParseError`] is raised the moment a structural
//! expectation is violated and aborts the parse in progress; [`ValidationError`]
//! is never raised; validation collects findings into a list, each tagged with
//! a reason, a dotted position and whether a canonical re-encode (possibly after
//! [`transform`](crate::transform_tx_body)) can repair it.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Result type alias for txcanon operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Reasons a transaction or transaction body can fail to parse.
///
/// Each reason names the specific field or structure that violated the wire
/// contract, so callers can diagnose producer bugs precisely.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    // Envelopes
    #[error("transaction is not valid CBOR")]
    InvalidTransactionCbor,
    #[error("raw transaction is not valid CBOR")]
    InvalidRawTransactionCbor,
    #[error("transaction body is not valid CBOR")]
    InvalidTransactionBodyCbor,
    #[error("invalid transaction structure")]
    InvalidTransaction,
    #[error("invalid raw transaction structure")]
    InvalidRawTransaction,
    #[error("invalid script validity flag")]
    InvalidScriptValidity,
    #[error("transaction body is not a map keyed by small unsigned integers")]
    InvalidTransactionBody,
    #[error("transaction body contains unknown items")]
    TxBodyUnknownItems,

    // Inputs
    #[error("invalid transaction inputs")]
    InvalidInputs,
    #[error("transaction inputs are not unique")]
    InputsNotUnique,
    #[error("invalid transaction input")]
    InvalidInput,
    #[error("invalid transaction id")]
    InvalidTransactionId,
    #[error("invalid transaction input index")]
    InvalidInputIndex,

    // Outputs
    #[error("invalid transaction outputs")]
    InvalidOutputs,
    #[error("invalid transaction output")]
    InvalidOutput,
    #[error("invalid output address")]
    InvalidOutputAddress,
    #[error("invalid output amount")]
    InvalidOutputAmount,
    #[error("invalid output datum hash")]
    InvalidOutputDatumHash,
    #[error("invalid output datum")]
    InvalidOutputDatum,
    #[error("invalid output reference script")]
    InvalidOutputReferenceScript,

    // Multiasset
    #[error("invalid multiasset map")]
    InvalidMultiasset,
    #[error("invalid policy id")]
    InvalidPolicyId,
    #[error("invalid asset name")]
    InvalidAssetName,
    #[error("invalid token amount")]
    InvalidTokenAmount,
    #[error("invalid mint amount")]
    InvalidMintAmount,

    // Plain body fields
    #[error("invalid fee")]
    InvalidFee,
    #[error("invalid ttl")]
    InvalidTtl,
    #[error("invalid validity interval start")]
    InvalidValidityIntervalStart,
    #[error("invalid auxiliary data hash")]
    InvalidAuxiliaryDataHash,
    #[error("invalid script data hash")]
    InvalidScriptDataHash,
    #[error("invalid network id")]
    InvalidNetworkId,
    #[error("invalid total collateral")]
    InvalidTotalCollateral,
    #[error("invalid treasury amount")]
    InvalidTreasury,
    #[error("invalid donation amount")]
    InvalidDonation,

    // Certificates
    #[error("invalid certificates")]
    InvalidCertificates,
    #[error("certificates are not unique")]
    CertificatesNotUnique,
    #[error("invalid certificate")]
    InvalidCertificate,
    #[error("invalid certificate type")]
    InvalidCertificateType,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("invalid credential type")]
    InvalidCredentialType,
    #[error("invalid credential key hash")]
    InvalidCredentialKeyHash,
    #[error("invalid credential script hash")]
    InvalidCredentialScriptHash,
    #[error("invalid pool key hash")]
    InvalidPoolKeyHash,
    #[error("invalid VRF key hash")]
    InvalidVrfKeyHash,
    #[error("invalid pledge")]
    InvalidPledge,
    #[error("invalid cost")]
    InvalidCost,
    #[error("invalid margin")]
    InvalidMargin,
    #[error("invalid reward account")]
    InvalidRewardAccount,
    #[error("invalid pool owners")]
    InvalidPoolOwners,
    #[error("pool owners are not unique")]
    PoolOwnersNotUnique,
    #[error("invalid pool owner")]
    InvalidPoolOwner,
    #[error("invalid relays")]
    InvalidRelays,
    #[error("invalid relay")]
    InvalidRelay,
    #[error("invalid relay type")]
    InvalidRelayType,
    #[error("invalid relay port")]
    InvalidRelayPort,
    #[error("invalid relay IPv4 address")]
    InvalidRelayIpv4,
    #[error("invalid relay IPv6 address")]
    InvalidRelayIpv6,
    #[error("invalid relay DNS name")]
    InvalidRelayDnsName,
    #[error("invalid pool metadata")]
    InvalidPoolMetadata,
    #[error("invalid pool metadata url")]
    InvalidPoolMetadataUrl,
    #[error("invalid pool metadata hash")]
    InvalidPoolMetadataHash,
    #[error("invalid retirement epoch")]
    InvalidRetirementEpoch,
    #[error("invalid deposit")]
    InvalidDeposit,
    #[error("invalid DRep")]
    InvalidDrep,
    #[error("invalid DRep type")]
    InvalidDrepType,
    #[error("invalid DRep key hash")]
    InvalidDrepKeyHash,
    #[error("invalid DRep script hash")]
    InvalidDrepScriptHash,
    #[error("invalid anchor")]
    InvalidAnchor,
    #[error("invalid anchor url")]
    InvalidAnchorUrl,
    #[error("invalid anchor data hash")]
    InvalidAnchorDataHash,

    // Withdrawals
    #[error("invalid withdrawals")]
    InvalidWithdrawals,
    #[error("invalid withdrawal reward account")]
    InvalidWithdrawalAddress,
    #[error("invalid withdrawal amount")]
    InvalidWithdrawalAmount,

    // Mint
    #[error("invalid mint map")]
    InvalidMint,

    // Collateral and signers
    #[error("invalid collateral inputs")]
    InvalidCollateralInputs,
    #[error("collateral inputs are not unique")]
    CollateralInputsNotUnique,
    #[error("invalid required signers")]
    InvalidRequiredSigners,
    #[error("required signers are not unique")]
    RequiredSignersNotUnique,
    #[error("invalid required signer")]
    InvalidRequiredSigner,
    #[error("invalid collateral return output")]
    InvalidCollateralReturnOutput,
    #[error("invalid reference inputs")]
    InvalidReferenceInputs,
    #[error("reference inputs are not unique")]
    ReferenceInputsNotUnique,

    // Governance
    #[error("invalid voting procedures")]
    InvalidVotingProcedures,
    #[error("invalid voter")]
    InvalidVoter,
    #[error("invalid voter type")]
    InvalidVoterType,
    #[error("invalid voter key hash")]
    InvalidVoterKeyHash,
    #[error("invalid voter script hash")]
    InvalidVoterScriptHash,
    #[error("invalid votes of a voter")]
    InvalidVoterVotes,
    #[error("invalid governance action id")]
    InvalidGovActionId,
    #[error("invalid governance action transaction id")]
    InvalidGovActionTransactionId,
    #[error("invalid governance action index")]
    InvalidGovActionIndex,
    #[error("invalid voting procedure")]
    InvalidVotingProcedure,
    #[error("invalid vote option")]
    InvalidVoteOption,
    #[error("invalid proposal procedures")]
    InvalidProposalProcedures,
    #[error("proposal procedures are not unique")]
    ProposalProceduresNotUnique,
    #[error("invalid proposal procedure")]
    InvalidProposalProcedure,
}

/// Reasons a structurally valid transaction can violate the rule set.
///
/// Whether a reason is fixable is a static property of the reason itself,
/// looked up via [`ValidationErrorReason::fixable`], never computed per
/// instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationErrorReason {
    CborIsNotCanonical,
    OptionalEmptyListsAndMapsMustNotBeIncluded,
    TxInconsistentSetTags,
    NumberOfElementsExceedsUint16,
    IntegerNotInt64,
    OutputInlineDatumMustNotBeEmpty,
    OutputReferenceScriptMustNotBeEmpty,
    OutputAmountWithoutTokensMustNotBeATuple,
    CollateralReturnMustNotContainDatum,
    CollateralReturnMustNotContainReferenceScript,
    PoolRegistrationCertificateWithOtherCertificates,
    PoolRegistrationCertificateWithWithdrawals,
    PoolRegistrationCertificateWithMintEntry,
    PoolRegistrationCertificateWithPlutusOutput,
    PoolRegistrationCertificateWithScriptDataHash,
    PoolRegistrationCertificateWithCollateralInputs,
    PoolRegistrationCertificateWithRequiredSigners,
    PoolRegistrationCertificateWithCollateralReturn,
    PoolRegistrationCertificateWithTotalCollateral,
    PoolRegistrationCertificateWithReferenceInputs,
    PoolRegistrationCertificateWithVotingProcedures,
    PoolRegistrationCertificateWithTreasury,
    PoolRegistrationCertificateWithDonation,
    UnsupportedTxUpdate,
    UnsupportedTxProposalProcedures,
    UnsupportedCertificateGenesisKeyDelegation,
    UnsupportedCertificateMoveInstantaneousRewards,
    UnsupportedCertificateStakeAndVoteDelegation,
    UnsupportedCertificateStakeRegistrationAndDelegation,
    UnsupportedCertificateVoteRegistrationAndDelegation,
    UnsupportedCertificateStakeVoteRegistrationAndDelegation,
    TxVotingProceduresMustHaveAtMostOneVoter,
    VoterVotesMustHaveExactlyOneVote,
}

impl ValidationErrorReason {
    /// Whether a canonical re-encode (possibly after transformation) resolves
    /// this violation.
    pub const fn fixable(self) -> bool {
        match self {
            ValidationErrorReason::CborIsNotCanonical
            | ValidationErrorReason::OptionalEmptyListsAndMapsMustNotBeIncluded
            | ValidationErrorReason::TxInconsistentSetTags
            | ValidationErrorReason::OutputInlineDatumMustNotBeEmpty
            | ValidationErrorReason::OutputReferenceScriptMustNotBeEmpty
            | ValidationErrorReason::OutputAmountWithoutTokensMustNotBeATuple => true,
            ValidationErrorReason::NumberOfElementsExceedsUint16
            | ValidationErrorReason::IntegerNotInt64
            | ValidationErrorReason::CollateralReturnMustNotContainDatum
            | ValidationErrorReason::CollateralReturnMustNotContainReferenceScript
            | ValidationErrorReason::PoolRegistrationCertificateWithOtherCertificates
            | ValidationErrorReason::PoolRegistrationCertificateWithWithdrawals
            | ValidationErrorReason::PoolRegistrationCertificateWithMintEntry
            | ValidationErrorReason::PoolRegistrationCertificateWithPlutusOutput
            | ValidationErrorReason::PoolRegistrationCertificateWithScriptDataHash
            | ValidationErrorReason::PoolRegistrationCertificateWithCollateralInputs
            | ValidationErrorReason::PoolRegistrationCertificateWithRequiredSigners
            | ValidationErrorReason::PoolRegistrationCertificateWithCollateralReturn
            | ValidationErrorReason::PoolRegistrationCertificateWithTotalCollateral
            | ValidationErrorReason::PoolRegistrationCertificateWithReferenceInputs
            | ValidationErrorReason::PoolRegistrationCertificateWithVotingProcedures
            | ValidationErrorReason::PoolRegistrationCertificateWithTreasury
            | ValidationErrorReason::PoolRegistrationCertificateWithDonation
            | ValidationErrorReason::UnsupportedTxUpdate
            | ValidationErrorReason::UnsupportedTxProposalProcedures
            | ValidationErrorReason::UnsupportedCertificateGenesisKeyDelegation
            | ValidationErrorReason::UnsupportedCertificateMoveInstantaneousRewards
            | ValidationErrorReason::UnsupportedCertificateStakeAndVoteDelegation
            | ValidationErrorReason::UnsupportedCertificateStakeRegistrationAndDelegation
            | ValidationErrorReason::UnsupportedCertificateVoteRegistrationAndDelegation
            | ValidationErrorReason::UnsupportedCertificateStakeVoteRegistrationAndDelegation
            | ValidationErrorReason::TxVotingProceduresMustHaveAtMostOneVoter
            | ValidationErrorReason::VoterVotesMustHaveExactlyOneVote => false,
        }
    }

    /// The stable wire name of this reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            ValidationErrorReason::CborIsNotCanonical => "CBOR_IS_NOT_CANONICAL",
            ValidationErrorReason::OptionalEmptyListsAndMapsMustNotBeIncluded => {
                "OPTIONAL_EMPTY_LISTS_AND_MAPS_MUST_NOT_BE_INCLUDED"
            }
            ValidationErrorReason::TxInconsistentSetTags => "TX_INCONSISTENT_SET_TAGS",
            ValidationErrorReason::NumberOfElementsExceedsUint16 => {
                "NUMBER_OF_ELEMENTS_EXCEEDS_UINT16"
            }
            ValidationErrorReason::IntegerNotInt64 => "INTEGER_NOT_INT64",
            ValidationErrorReason::OutputInlineDatumMustNotBeEmpty => {
                "OUTPUT_INLINE_DATUM_MUST_NOT_BE_EMPTY"
            }
            ValidationErrorReason::OutputReferenceScriptMustNotBeEmpty => {
                "OUTPUT_REFERENCE_SCRIPT_MUST_NOT_BE_EMPTY"
            }
            ValidationErrorReason::OutputAmountWithoutTokensMustNotBeATuple => {
                "OUTPUT_AMOUNT_WITHOUT_TOKENS_MUST_NOT_BE_A_TUPLE"
            }
            ValidationErrorReason::CollateralReturnMustNotContainDatum => {
                "COLLATERAL_RETURN_MUST_NOT_CONTAIN_DATUM"
            }
            ValidationErrorReason::CollateralReturnMustNotContainReferenceScript => {
                "COLLATERAL_RETURN_MUST_NOT_CONTAIN_REFERENCE_SCRIPT"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithOtherCertificates => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_OTHER_CERTIFICATES"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithWithdrawals => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_WITHDRAWALS"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithMintEntry => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_MINT_ENTRY"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithPlutusOutput => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_PLUTUS_OUTPUT"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithScriptDataHash => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_SCRIPT_DATA_HASH"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithCollateralInputs => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_COLLATERAL_INPUTS"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithRequiredSigners => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_REQUIRED_SIGNERS"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithCollateralReturn => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_COLLATERAL_RETURN"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithTotalCollateral => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_TOTAL_COLLATERAL"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithReferenceInputs => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_REFERENCE_INPUTS"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithVotingProcedures => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_VOTING_PROCEDURES"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithTreasury => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_TREASURY"
            }
            ValidationErrorReason::PoolRegistrationCertificateWithDonation => {
                "POOL_REGISTRATION_CERTIFICATE_WITH_DONATION"
            }
            ValidationErrorReason::UnsupportedTxUpdate => "UNSUPPORTED_TX_UPDATE",
            ValidationErrorReason::UnsupportedTxProposalProcedures => {
                "UNSUPPORTED_TX_PROPOSAL_PROCEDURES"
            }
            ValidationErrorReason::UnsupportedCertificateGenesisKeyDelegation => {
                "UNSUPPORTED_CERTIFICATE_GENESIS_KEY_DELEGATION"
            }
            ValidationErrorReason::UnsupportedCertificateMoveInstantaneousRewards => {
                "UNSUPPORTED_CERTIFICATE_MOVE_INSTANTANEOUS_REWARDS"
            }
            ValidationErrorReason::UnsupportedCertificateStakeAndVoteDelegation => {
                "UNSUPPORTED_CERTIFICATE_STAKE_AND_VOTE_DELEGATION"
            }
            ValidationErrorReason::UnsupportedCertificateStakeRegistrationAndDelegation => {
                "UNSUPPORTED_CERTIFICATE_STAKE_REGISTRATION_AND_DELEGATION"
            }
            ValidationErrorReason::UnsupportedCertificateVoteRegistrationAndDelegation => {
                "UNSUPPORTED_CERTIFICATE_VOTE_REGISTRATION_AND_DELEGATION"
            }
            ValidationErrorReason::UnsupportedCertificateStakeVoteRegistrationAndDelegation => {
                "UNSUPPORTED_CERTIFICATE_STAKE_VOTE_REGISTRATION_AND_DELEGATION"
            }
            ValidationErrorReason::TxVotingProceduresMustHaveAtMostOneVoter => {
                "TX_VOTING_PROCEDURES_MUST_HAVE_AT_MOST_ONE_VOTER"
            }
            ValidationErrorReason::VoterVotesMustHaveExactlyOneVote => {
                "VOTER_VOTES_MUST_HAVE_EXACTLY_ONE_VOTE"
            }
        }
    }
}

impl std::fmt::Display for ValidationErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValidationErrorReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Whether a canonical re-encode (possibly after transformation) repairs it.
    pub fixable: bool,
    /// What rule was violated.
    pub reason: ValidationErrorReason,
    /// Dotted path locating the offending field, e.g.
    /// `transaction_body.certificates[2].pool_params.pledge`.
    pub position: String,
}

impl ValidationError {
    /// Create a finding at the given position; fixability comes from the reason.
    pub fn new(reason: ValidationErrorReason, position: impl Into<String>) -> Self {
        ValidationError {
            fixable: reason.fixable(),
            reason,
            position: position.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.reason, self.position)
    }
}
