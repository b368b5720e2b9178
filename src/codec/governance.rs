//! Parsing and serialization of voting procedures and governance proposals.

use super::*;
use crate::error::{ParseError, Result};
use crate::types::{
    Anchor, GovActionId, ProposalProcedure, Vote, VoteOption, Voter, VoterVotes, VotingProcedure,
};
use ciborium::Value;

pub const PROPOSAL_PROCEDURE_CODEC: ItemCodec<ProposalProcedure> = ItemCodec {
    parse: parse_proposal_procedure,
    serialize: serialize_proposal_procedure,
};

/// Parse the voting procedures map: voter to (governance action id to voting
/// procedure). Wire order of voters and votes is preserved.
pub fn parse_voting_procedures(value: &Value) -> Result<Vec<VoterVotes>> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidVotingProcedures,
        parse_voter,
        parse_voter_votes,
    )?;
    Ok(entries
        .into_iter()
        .map(|(voter, votes)| VoterVotes { voter, votes })
        .collect())
}

fn parse_voter_votes(value: &Value) -> Result<Vec<Vote>> {
    let entries = parse_map_entries(
        value,
        ParseError::InvalidVoterVotes,
        parse_gov_action_id,
        parse_voting_procedure,
    )?;
    Ok(entries
        .into_iter()
        .map(|(gov_action_id, voting_procedure)| Vote {
            gov_action_id,
            voting_procedure,
        })
        .collect())
}

pub fn parse_voter(value: &Value) -> Result<Voter> {
    let (kind, rest) = split_discriminated(value, ParseError::InvalidVoter)?;
    let [hash] = parse_rest::<1>(rest, ParseError::InvalidVoter)?;
    match kind {
        0 => parse_fixed_len_bytes(hash, ParseError::InvalidVoterKeyHash)
            .map(Voter::CommitteeKeyHash),
        1 => parse_fixed_len_bytes(hash, ParseError::InvalidVoterScriptHash)
            .map(Voter::CommitteeScriptHash),
        2 => parse_fixed_len_bytes(hash, ParseError::InvalidVoterKeyHash).map(Voter::DrepKeyHash),
        3 => parse_fixed_len_bytes(hash, ParseError::InvalidVoterScriptHash)
            .map(Voter::DrepScriptHash),
        4 => parse_fixed_len_bytes(hash, ParseError::InvalidVoterKeyHash)
            .map(Voter::StakePoolKeyHash),
        _ => Err(ParseError::InvalidVoterType),
    }
}

fn parse_gov_action_id(value: &Value) -> Result<GovActionId> {
    let [transaction_id, index] = parse_tuple::<2>(value, ParseError::InvalidGovActionId)?;
    Ok(GovActionId {
        transaction_id: parse_fixed_len_bytes(
            transaction_id,
            ParseError::InvalidGovActionTransactionId,
        )?,
        index: parse_uint(index, ParseError::InvalidGovActionIndex)?,
    })
}

fn parse_voting_procedure(value: &Value) -> Result<VotingProcedure> {
    let [vote, anchor] = parse_tuple::<2>(value, ParseError::InvalidVotingProcedure)?;
    Ok(VotingProcedure {
        vote: parse_vote_option(vote)?,
        anchor: parse_nullable(anchor, parse_anchor)?,
    })
}

fn parse_vote_option(value: &Value) -> Result<VoteOption> {
    match parse_uint(value, ParseError::InvalidVoteOption)? {
        0 => Ok(VoteOption::No),
        1 => Ok(VoteOption::Yes),
        2 => Ok(VoteOption::Abstain),
        _ => Err(ParseError::InvalidVoteOption),
    }
}

pub fn parse_anchor(value: &Value) -> Result<Anchor> {
    let [url, data_hash] = parse_tuple::<2>(value, ParseError::InvalidAnchor)?;
    Ok(Anchor {
        url: parse_max_len_string(url, ParseError::InvalidAnchorUrl)?,
        data_hash: parse_fixed_len_bytes(data_hash, ParseError::InvalidAnchorDataHash)?,
    })
}

/// Parse one governance proposal. The proposed action is not interpreted
/// (proposals are unsupported downstream), but the entry still participates in
/// uniqueness and set-tag bookkeeping, so its frame is parsed structurally.
pub fn parse_proposal_procedure(value: &Value) -> Result<ProposalProcedure> {
    let [deposit, reward_account, gov_action, anchor] =
        parse_tuple::<4>(value, ParseError::InvalidProposalProcedure)?;
    Ok(ProposalProcedure {
        deposit: parse_uint(deposit, ParseError::InvalidDeposit)?,
        reward_account: parse_fixed_len_bytes(reward_account, ParseError::InvalidRewardAccount)?,
        gov_action: gov_action.clone(),
        anchor: parse_anchor(anchor)?,
    })
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

pub fn serialize_voting_procedures(procedures: &[VoterVotes]) -> Value {
    Value::Map(
        procedures
            .iter()
            .map(|entry| {
                (
                    serialize_voter(&entry.voter),
                    Value::Map(
                        entry
                            .votes
                            .iter()
                            .map(|vote| {
                                (
                                    serialize_gov_action_id(&vote.gov_action_id),
                                    serialize_voting_procedure(&vote.voting_procedure),
                                )
                            })
                            .collect(),
                    ),
                )
            })
            .collect(),
    )
}

pub fn serialize_voter(voter: &Voter) -> Value {
    let (kind, hash) = match voter {
        Voter::CommitteeKeyHash(hash) => (0, hash),
        Voter::CommitteeScriptHash(hash) => (1, hash),
        Voter::DrepKeyHash(hash) => (2, hash),
        Voter::DrepScriptHash(hash) => (3, hash),
        Voter::StakePoolKeyHash(hash) => (4, hash),
    };
    Value::Array(vec![uint_value(kind), bytes_value(hash)])
}

fn serialize_gov_action_id(id: &GovActionId) -> Value {
    Value::Array(vec![
        bytes_value(&id.transaction_id),
        uint_value(id.index),
    ])
}

fn serialize_voting_procedure(procedure: &VotingProcedure) -> Value {
    let vote = match procedure.vote {
        VoteOption::No => 0,
        VoteOption::Yes => 1,
        VoteOption::Abstain => 2,
    };
    Value::Array(vec![
        uint_value(vote),
        nullable_value(procedure.anchor.as_ref(), serialize_anchor),
    ])
}

pub fn serialize_anchor(anchor: &Anchor) -> Value {
    Value::Array(vec![
        text_value(anchor.url.as_str()),
        bytes_value(&anchor.data_hash),
    ])
}

pub fn serialize_proposal_procedure(procedure: &ProposalProcedure) -> Value {
    Value::Array(vec![
        uint_value(procedure.deposit),
        bytes_value(&procedure.reward_account),
        procedure.gov_action.clone(),
        serialize_anchor(&procedure.anchor),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Url;

    fn uint(n: u64) -> Value {
        Value::Integer(n.into())
    }

    fn voter_value(kind: u64) -> Value {
        Value::Array(vec![uint(kind), Value::Bytes(vec![0x55; 28])])
    }

    fn procedure_value(vote: u64) -> Value {
        Value::Array(vec![uint(vote), Value::Null])
    }

    fn action_id_value(index: u64) -> Value {
        Value::Array(vec![Value::Bytes(vec![0x66; 32]), uint(index)])
    }

    #[test]
    fn test_voter_kinds() {
        assert!(matches!(
            parse_voter(&voter_value(4)).unwrap(),
            Voter::StakePoolKeyHash(_)
        ));
        assert_eq!(
            parse_voter(&voter_value(5)),
            Err(ParseError::InvalidVoterType)
        );
    }

    #[test]
    fn test_vote_option_bound() {
        let bad = Value::Array(vec![uint(3), Value::Null]);
        assert_eq!(
            parse_voting_procedure(&bad),
            Err(ParseError::InvalidVoteOption)
        );
    }

    #[test]
    fn test_voting_procedures_round_trip() {
        let value = Value::Map(vec![(
            voter_value(2),
            Value::Map(vec![
                (action_id_value(0), procedure_value(1)),
                (action_id_value(1), procedure_value(2)),
            ]),
        )]);
        let procedures = parse_voting_procedures(&value).unwrap();
        assert_eq!(procedures.len(), 1);
        assert_eq!(procedures[0].votes.len(), 2);
        assert_eq!(serialize_voting_procedures(&procedures), value);
    }

    #[test]
    fn test_voting_procedures_reject_duplicate_voter() {
        let value = Value::Map(vec![
            (voter_value(2), Value::Map(vec![])),
            (voter_value(2), Value::Map(vec![])),
        ]);
        assert_eq!(
            parse_voting_procedures(&value),
            Err(ParseError::InvalidVotingProcedures)
        );
    }

    #[test]
    fn test_anchor_url_bound() {
        let long_url = "x".repeat(65);
        let value = Value::Array(vec![
            Value::Text(long_url),
            Value::Bytes(vec![0x77; 32]),
        ]);
        assert_eq!(parse_anchor(&value), Err(ParseError::InvalidAnchorUrl));
    }

    #[test]
    fn test_proposal_procedure_round_trip() {
        let procedure = ProposalProcedure {
            deposit: 100_000_000,
            reward_account: [0xe1; 29],
            gov_action: Value::Array(vec![uint(6)]),
            anchor: Anchor {
                url: Url::new("https://example.com/proposal.json".into()).unwrap(),
                data_hash: [0x88; 32],
            },
        };
        let reparsed = parse_proposal_procedure(&serialize_proposal_procedure(&procedure)).unwrap();
        assert_eq!(procedure, reparsed);
    }
}
