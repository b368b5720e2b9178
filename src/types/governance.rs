//! Governance entities: voters, votes and proposal procedures.

use super::{AnchorDataHash, Coin, KeyHash, RewardAccount, ScriptHash, TransactionId, Uint, Url};
use ciborium::Value;

/// A URL plus the hash of the document it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub url: Url,
    pub data_hash: AnchorDataHash,
}

/// Who is casting a vote, discriminated on the wire by a leading integer
/// (0-4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voter {
    CommitteeKeyHash(KeyHash),
    CommitteeScriptHash(ScriptHash),
    DrepKeyHash(KeyHash),
    DrepScriptHash(ScriptHash),
    StakePoolKeyHash(KeyHash),
}

/// The governance action a vote refers to: the proposing transaction and the
/// action's index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovActionId {
    pub transaction_id: TransactionId,
    pub index: Uint,
}

/// The ballot options, discriminated on the wire by 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOption {
    No,
    Yes,
    Abstain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingProcedure {
    pub vote: VoteOption,
    pub anchor: Option<Anchor>,
}

/// One cast vote: the action voted on and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub gov_action_id: GovActionId,
    pub voting_procedure: VotingProcedure,
}

/// All votes of one voter, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterVotes {
    pub voter: Voter,
    pub votes: Vec<Vote>,
}

/// A governance proposal. The proposed action itself is carried opaquely:
/// submitting proposals is unsupported, but the entry still participates in
/// set-tag bookkeeping and uniqueness checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalProcedure {
    pub deposit: Coin,
    pub reward_account: RewardAccount,
    pub gov_action: Value,
    pub anchor: Anchor,
}
