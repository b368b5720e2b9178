//! The validation engine.
//!
//! A single pass over a parsed body yields every rule violation it can find;
//! nothing short-circuits, so callers always see the full list. The canonical
//! round-trip check lives with the public entry points in the crate root,
//! since it needs the original bytes.

use crate::error::{ValidationError, ValidationErrorReason};
use crate::types::{
    Amount, BabbageTransactionOutput, CddlNonEmptyOrderedSet, Certificate, Datum,
    LegacyTransactionOutput, MAX_LIST_LENGTH, TransactionBody, TransactionOutput,
};

/// Validate everything about a parsed body except canonicity of its original
/// bytes. Findings are appended to `errors` with positions rooted at
/// `transaction_body`.
pub fn validate_body(body: &TransactionBody, errors: &mut Vec<ValidationError>) {
    check_max_len(body.inputs.len(), "transaction_body.inputs", errors);

    check_max_len(body.outputs.len(), "transaction_body.outputs", errors);
    for (i, output) in body.outputs.iter().enumerate() {
        validate_output(
            output,
            &format!("transaction_body.outputs[{i}]"),
            false,
            errors,
        );
    }

    if let Some(certificates) = &body.certificates {
        check_optional_list(certificates.len(), "transaction_body.certificates", errors);
        for (i, certificate) in certificates.items.iter().enumerate() {
            validate_certificate(
                certificate,
                &format!("transaction_body.certificates[{i}]"),
                errors,
            );
        }
        validate_pool_registration_exclusivity(body, certificates, errors);
    }

    if let Some(withdrawals) = &body.withdrawals {
        check_optional_list(withdrawals.len(), "transaction_body.withdrawals", errors);
    }

    if body.update.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::UnsupportedTxUpdate,
            "transaction_body.update",
        ));
    }

    if let Some(mint) = &body.mint {
        check_optional_list(mint.len(), "transaction_body.mint", errors);
        for (i, entry) in mint.iter().enumerate() {
            check_optional_list(
                entry.tokens.len(),
                &format!("transaction_body.mint[{i}].tokens"),
                errors,
            );
            for (j, token) in entry.tokens.iter().enumerate() {
                let amount = i128::from(token.amount);
                if amount < i128::from(i64::MIN) || amount > i128::from(i64::MAX) {
                    errors.push(ValidationError::new(
                        ValidationErrorReason::IntegerNotInt64,
                        format!("transaction_body.mint[{i}].tokens[{j}].amount"),
                    ));
                }
            }
        }
    }

    if let Some(collateral_inputs) = &body.collateral_inputs {
        check_optional_list(
            collateral_inputs.len(),
            "transaction_body.collateral_inputs",
            errors,
        );
    }

    if let Some(required_signers) = &body.required_signers {
        check_optional_list(
            required_signers.len(),
            "transaction_body.required_signers",
            errors,
        );
    }

    if let Some(collateral_return) = &body.collateral_return {
        validate_output(
            collateral_return,
            "transaction_body.collateral_return",
            true,
            errors,
        );
    }

    if let Some(reference_inputs) = &body.reference_inputs {
        check_optional_list(
            reference_inputs.len(),
            "transaction_body.reference_inputs",
            errors,
        );
    }

    if let Some(procedures) = &body.voting_procedures {
        check_optional_list(
            procedures.len(),
            "transaction_body.voting_procedures",
            errors,
        );
        if procedures.len() > 1 {
            errors.push(ValidationError::new(
                ValidationErrorReason::TxVotingProceduresMustHaveAtMostOneVoter,
                "transaction_body.voting_procedures",
            ));
        }
        for (i, voter_votes) in procedures.iter().enumerate() {
            check_max_len(
                voter_votes.votes.len(),
                &format!("transaction_body.voting_procedures[{i}].votes"),
                errors,
            );
            if voter_votes.votes.len() != 1 {
                errors.push(ValidationError::new(
                    ValidationErrorReason::VoterVotesMustHaveExactlyOneVote,
                    format!("transaction_body.voting_procedures[{i}].votes"),
                ));
            }
        }
    }

    if let Some(procedures) = &body.proposal_procedures {
        check_optional_list(
            procedures.len(),
            "transaction_body.proposal_procedures",
            errors,
        );
        errors.push(ValidationError::new(
            ValidationErrorReason::UnsupportedTxProposalProcedures,
            "transaction_body.proposal_procedures",
        ));
    }

    let tag_flags = body.set_tag_flags();
    if tag_flags.iter().any(|tagged| *tagged) && tag_flags.iter().any(|tagged| !*tagged) {
        errors.push(ValidationError::new(
            ValidationErrorReason::TxInconsistentSetTags,
            "transaction_body",
        ));
    }
}

fn validate_output(
    output: &TransactionOutput,
    position: &str,
    is_collateral_return: bool,
    errors: &mut Vec<ValidationError>,
) {
    match output {
        TransactionOutput::Legacy(LegacyTransactionOutput {
            amount, datum_hash, ..
        }) => {
            validate_amount(amount, &format!("{position}.amount"), errors);
            if is_collateral_return && datum_hash.is_some() {
                errors.push(ValidationError::new(
                    ValidationErrorReason::CollateralReturnMustNotContainDatum,
                    format!("{position}.datum_hash"),
                ));
            }
        }
        TransactionOutput::Babbage(BabbageTransactionOutput {
            amount,
            datum,
            reference_script,
            ..
        }) => {
            validate_amount(amount, &format!("{position}.amount"), errors);
            if is_collateral_return {
                if datum.is_some() {
                    errors.push(ValidationError::new(
                        ValidationErrorReason::CollateralReturnMustNotContainDatum,
                        format!("{position}.datum"),
                    ));
                }
                if reference_script.is_some() {
                    errors.push(ValidationError::new(
                        ValidationErrorReason::CollateralReturnMustNotContainReferenceScript,
                        format!("{position}.reference_script"),
                    ));
                }
            } else {
                if matches!(datum, Some(Datum::Inline(bytes)) if bytes.is_empty()) {
                    errors.push(ValidationError::new(
                        ValidationErrorReason::OutputInlineDatumMustNotBeEmpty,
                        format!("{position}.datum"),
                    ));
                }
                if matches!(reference_script, Some(script) if script.is_empty()) {
                    errors.push(ValidationError::new(
                        ValidationErrorReason::OutputReferenceScriptMustNotBeEmpty,
                        format!("{position}.reference_script"),
                    ));
                }
            }
        }
    }
}

fn validate_amount(amount: &Amount, position: &str, errors: &mut Vec<ValidationError>) {
    match amount {
        Amount::WithoutMultiasset { .. } => {}
        Amount::WithMultiasset { multiasset, .. } => {
            if multiasset.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorReason::OutputAmountWithoutTokensMustNotBeATuple,
                    position,
                ));
            }
            check_max_len(multiasset.len(), &format!("{position}.multiasset"), errors);
            for (i, entry) in multiasset.iter().enumerate() {
                check_optional_list(
                    entry.tokens.len(),
                    &format!("{position}.multiasset[{i}].tokens"),
                    errors,
                );
            }
        }
    }
}

fn validate_certificate(
    certificate: &Certificate,
    position: &str,
    errors: &mut Vec<ValidationError>,
) {
    let unsupported = match certificate {
        Certificate::GenesisKeyDelegation { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateGenesisKeyDelegation)
        }
        Certificate::MoveInstantaneousRewards { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateMoveInstantaneousRewards)
        }
        Certificate::StakeAndVoteDelegation { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateStakeAndVoteDelegation)
        }
        Certificate::StakeRegistrationAndDelegation { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateStakeRegistrationAndDelegation)
        }
        Certificate::VoteRegistrationAndDelegation { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateVoteRegistrationAndDelegation)
        }
        Certificate::StakeVoteRegistrationAndDelegation { .. } => {
            Some(ValidationErrorReason::UnsupportedCertificateStakeVoteRegistrationAndDelegation)
        }
        Certificate::PoolRegistration { pool_params } => {
            check_max_len(
                pool_params.pool_owners.len(),
                &format!("{position}.pool_params.pool_owners"),
                errors,
            );
            check_max_len(
                pool_params.relays.len(),
                &format!("{position}.pool_params.relays"),
                errors,
            );
            None
        }
        Certificate::StakeRegistration { .. }
        | Certificate::StakeDeregistration { .. }
        | Certificate::StakeDelegation { .. }
        | Certificate::PoolRetirement { .. }
        | Certificate::Registration { .. }
        | Certificate::Deregistration { .. }
        | Certificate::VoteDelegation { .. }
        | Certificate::AuthorizeCommitteeHot { .. }
        | Certificate::ResignCommitteeCold { .. }
        | Certificate::DrepRegistration { .. }
        | Certificate::DrepDeregistration { .. }
        | Certificate::DrepUpdate { .. } => None,
    };
    if let Some(reason) = unsupported {
        errors.push(ValidationError::new(reason, position));
    }
}

/// A pool registration certificate forbids nearly everything else in the
/// body; each co-present field reports its own reason.
fn validate_pool_registration_exclusivity(
    body: &TransactionBody,
    certificates: &CddlNonEmptyOrderedSet<Certificate>,
    errors: &mut Vec<ValidationError>,
) {
    let has_pool_registration = certificates
        .items
        .iter()
        .any(|certificate| matches!(certificate, Certificate::PoolRegistration { .. }));
    if !has_pool_registration {
        return;
    }

    if certificates.len() > 1 {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithOtherCertificates,
            "transaction_body.certificates",
        ));
    }
    if body.withdrawals.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithWithdrawals,
            "transaction_body.withdrawals",
        ));
    }
    if body.mint.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithMintEntry,
            "transaction_body.mint",
        ));
    }
    for (i, output) in body.outputs.iter().enumerate() {
        if output_carries_plutus_elements(output) {
            errors.push(ValidationError::new(
                ValidationErrorReason::PoolRegistrationCertificateWithPlutusOutput,
                format!("transaction_body.outputs[{i}]"),
            ));
        }
    }
    if body.script_data_hash.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithScriptDataHash,
            "transaction_body.script_data_hash",
        ));
    }
    if body.collateral_inputs.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithCollateralInputs,
            "transaction_body.collateral_inputs",
        ));
    }
    if body.required_signers.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithRequiredSigners,
            "transaction_body.required_signers",
        ));
    }
    if body.collateral_return.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithCollateralReturn,
            "transaction_body.collateral_return",
        ));
    }
    if body.total_collateral.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithTotalCollateral,
            "transaction_body.total_collateral",
        ));
    }
    if body.reference_inputs.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithReferenceInputs,
            "transaction_body.reference_inputs",
        ));
    }
    if body.voting_procedures.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithVotingProcedures,
            "transaction_body.voting_procedures",
        ));
    }
    if body.treasury.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithTreasury,
            "transaction_body.treasury",
        ));
    }
    if body.donation.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorReason::PoolRegistrationCertificateWithDonation,
            "transaction_body.donation",
        ));
    }
}

fn output_carries_plutus_elements(output: &TransactionOutput) -> bool {
    match output {
        TransactionOutput::Legacy(output) => output.datum_hash.is_some(),
        TransactionOutput::Babbage(output) => {
            output.datum.is_some() || output.reference_script.is_some()
        }
    }
}

/// Present-but-empty optional lists and maps are fixable; oversized ones are
/// not.
fn check_optional_list(len: usize, position: &str, errors: &mut Vec<ValidationError>) {
    if len == 0 {
        errors.push(ValidationError::new(
            ValidationErrorReason::OptionalEmptyListsAndMapsMustNotBeIncluded,
            position,
        ));
    }
    check_max_len(len, position, errors);
}

fn check_max_len(len: usize, position: &str, errors: &mut Vec<ValidationError>) {
    if len > MAX_LIST_LENGTH {
        errors.push(ValidationError::new(
            ValidationErrorReason::NumberOfElementsExceedsUint16,
            position,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CddlSet, Credential, Int, MultiassetEntry, Token, TransactionInput};

    fn minimal_body() -> TransactionBody {
        TransactionBody {
            inputs: CddlSet::new(
                vec![TransactionInput {
                    transaction_id: [0xaa; 32],
                    index: 0,
                }],
                false,
            ),
            outputs: vec![TransactionOutput::Legacy(LegacyTransactionOutput {
                address: vec![0x01; 57],
                amount: Amount::WithoutMultiasset { coin: 2_000_000 },
                datum_hash: None,
            })],
            fee: 170_000,
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

    fn validate(body: &TransactionBody) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        validate_body(body, &mut errors);
        errors
    }

    #[test]
    fn test_minimal_body_is_clean() {
        assert!(validate(&minimal_body()).is_empty());
    }

    #[test]
    fn test_empty_withdrawals_flagged_fixable() {
        let mut body = minimal_body();
        body.withdrawals = Some(vec![]);
        let errors = validate(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].reason,
            ValidationErrorReason::OptionalEmptyListsAndMapsMustNotBeIncluded
        );
        assert!(errors[0].fixable);
        assert_eq!(errors[0].position, "transaction_body.withdrawals");
    }

    #[test]
    fn test_mint_amount_int64_bound() {
        let mut body = minimal_body();
        body.mint = Some(vec![MultiassetEntry {
            policy_id: [0x02; 28],
            tokens: vec![Token {
                asset_name: crate::types::AssetName::new(vec![]).unwrap(),
                amount: Int::from(u64::MAX),
            }],
        }]);
        let errors = validate(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, ValidationErrorReason::IntegerNotInt64);
        assert!(!errors[0].fixable);
        assert_eq!(
            errors[0].position,
            "transaction_body.mint[0].tokens[0].amount"
        );
    }

    #[test]
    fn test_mint_amount_int64_min_is_accepted() {
        let mut body = minimal_body();
        body.mint = Some(vec![MultiassetEntry {
            policy_id: [0x02; 28],
            tokens: vec![Token {
                asset_name: crate::types::AssetName::new(vec![]).unwrap(),
                amount: Int::from(i64::MIN),
            }],
        }]);
        assert!(validate(&body).is_empty());
    }

    #[test]
    fn test_tuple_amount_without_tokens() {
        let mut body = minimal_body();
        body.outputs = vec![TransactionOutput::Legacy(LegacyTransactionOutput {
            address: vec![0x01; 57],
            amount: Amount::WithMultiasset {
                coin: 1,
                multiasset: vec![],
            },
            datum_hash: None,
        })];
        let errors = validate(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].reason,
            ValidationErrorReason::OutputAmountWithoutTokensMustNotBeATuple
        );
        assert_eq!(errors[0].position, "transaction_body.outputs[0].amount");
    }

    #[test]
    fn test_collateral_return_must_be_plain() {
        let mut body = minimal_body();
        body.collateral_return = Some(TransactionOutput::Babbage(BabbageTransactionOutput {
            address: vec![0x01; 57],
            amount: Amount::WithoutMultiasset { coin: 5 },
            datum: Some(Datum::Hash([0x03; 32])),
            reference_script: Some(vec![0x82]),
        }));
        let errors = validate(&body);
        let reasons: Vec<_> = errors.iter().map(|e| e.reason).collect();
        assert!(reasons.contains(&ValidationErrorReason::CollateralReturnMustNotContainDatum));
        assert!(
            reasons
                .contains(&ValidationErrorReason::CollateralReturnMustNotContainReferenceScript)
        );
        assert!(errors.iter().all(|e| !e.fixable));
    }

    #[test]
    fn test_pool_registration_exclusivity() {
        let mut body = minimal_body();
        body.certificates = Some(CddlSet::new(
            vec![
                Certificate::PoolRegistration {
                    pool_params: crate::types::PoolParams {
                        operator: [0x01; 28],
                        vrf_key_hash: [0x02; 32],
                        pledge: 0,
                        cost: 0,
                        margin: crate::types::UnitInterval {
                            numerator: 0,
                            denominator: 1,
                        },
                        reward_account: [0xe1; 29],
                        pool_owners: CddlSet::new(vec![], false),
                        relays: vec![],
                        metadata: None,
                    },
                },
                Certificate::StakeRegistration {
                    stake_credential: Credential::KeyHash([0x04; 28]),
                },
            ],
            false,
        ));
        body.withdrawals = Some(vec![crate::types::Withdrawal {
            reward_account: [0xe1; 29],
            amount: 1,
        }]);
        let errors = validate(&body);
        let reasons: Vec<_> = errors.iter().map(|e| e.reason).collect();
        assert!(reasons.contains(
            &ValidationErrorReason::PoolRegistrationCertificateWithOtherCertificates
        ));
        assert!(
            reasons.contains(&ValidationErrorReason::PoolRegistrationCertificateWithWithdrawals)
        );
    }

    #[test]
    fn test_voting_procedure_arity_rules() {
        use crate::types::{GovActionId, Vote, VoteOption, Voter, VoterVotes, VotingProcedure};
        let vote = Vote {
            gov_action_id: GovActionId {
                transaction_id: [0x05; 32],
                index: 0,
            },
            voting_procedure: VotingProcedure {
                vote: VoteOption::Yes,
                anchor: None,
            },
        };
        let mut body = minimal_body();
        body.voting_procedures = Some(vec![
            VoterVotes {
                voter: Voter::DrepKeyHash([0x06; 28]),
                votes: vec![vote.clone(), vote.clone()],
            },
            VoterVotes {
                voter: Voter::StakePoolKeyHash([0x07; 28]),
                votes: vec![vote],
            },
        ]);
        let errors = validate(&body);
        let reasons: Vec<_> = errors.iter().map(|e| e.reason).collect();
        assert!(
            reasons.contains(&ValidationErrorReason::TxVotingProceduresMustHaveAtMostOneVoter)
        );
        assert!(reasons.contains(&ValidationErrorReason::VoterVotesMustHaveExactlyOneVote));
    }

    #[test]
    fn test_inconsistent_set_tags() {
        let mut body = minimal_body();
        body.inputs.has_tag = true;
        body.reference_inputs = Some(CddlSet::new(
            vec![TransactionInput {
                transaction_id: [0xbb; 32],
                index: 1,
            }],
            false,
        ));
        let errors = validate(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, ValidationErrorReason::TxInconsistentSetTags);
        assert!(errors[0].fixable);
    }

    #[test]
    fn test_update_field_unsupported() {
        let mut body = minimal_body();
        body.update = Some(ciborium::Value::Null);
        let errors = validate(&body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, ValidationErrorReason::UnsupportedTxUpdate);
        assert!(!errors[0].fixable);
    }
}
