//! The transform engine: a pure, total normalizer over parsed bodies.
//!
//! Transformation removes exactly the violations the validation engine
//! classifies as fixable and leaves everything else untouched, including
//! fields with unfixable violations. It is idempotent: transforming twice
//! yields the same body as transforming once.

use crate::types::{
    Amount, BabbageTransactionOutput, Certificate, Datum, LegacyTransactionOutput, Multiasset,
    RawTransaction, Transaction, TransactionBody, TransactionOutput,
};

/// Produce a body equivalent to the input but free of fixable violations:
/// present-but-empty optional collections are dropped, empty multiasset
/// structure is pruned, tuple amounts without tokens collapse to bare coins,
/// empty inline datums and reference scripts are removed, and mixed set tags
/// are unified to the tagged form.
pub fn transform_tx_body(body: &TransactionBody) -> TransactionBody {
    let mut body = body.clone();

    body.certificates = body.certificates.filter(|set| !set.is_empty());
    body.withdrawals = body.withdrawals.filter(|withdrawals| !withdrawals.is_empty());
    body.mint = body
        .mint
        .map(prune_multiasset)
        .filter(|mint| !mint.is_empty());
    body.collateral_inputs = body.collateral_inputs.filter(|set| !set.is_empty());
    body.required_signers = body.required_signers.filter(|set| !set.is_empty());
    body.reference_inputs = body.reference_inputs.filter(|set| !set.is_empty());
    body.voting_procedures = body
        .voting_procedures
        .filter(|procedures| !procedures.is_empty());
    body.proposal_procedures = body.proposal_procedures.filter(|set| !set.is_empty());

    body.outputs = body.outputs.iter().map(transform_output).collect();
    // The collateral return only gets its amount normalized: its datum and
    // reference script rules are unfixable and stay for the caller to see.
    body.collateral_return = body
        .collateral_return
        .as_ref()
        .map(transform_collateral_return);

    unify_set_tags(&mut body);
    body
}

/// Transform a signed transaction by transforming its body; the opaque
/// witness and auxiliary slots pass through unchanged.
pub fn transform_tx(tx: &Transaction) -> Transaction {
    Transaction {
        body: transform_tx_body(&tx.body),
        witness_set: tx.witness_set.clone(),
        script_validity: tx.script_validity,
        auxiliary_data: tx.auxiliary_data.clone(),
    }
}

/// Transform an unsigned transaction by transforming its body.
pub fn transform_raw_tx(tx: &RawTransaction) -> RawTransaction {
    RawTransaction {
        body: transform_tx_body(&tx.body),
        script_witnesses: tx.script_witnesses.clone(),
        datum_witnesses: tx.datum_witnesses.clone(),
        redeemer_witnesses: tx.redeemer_witnesses.clone(),
        auxiliary_data: tx.auxiliary_data.clone(),
    }
}

fn transform_output(output: &TransactionOutput) -> TransactionOutput {
    match output {
        TransactionOutput::Legacy(output) => {
            TransactionOutput::Legacy(LegacyTransactionOutput {
                address: output.address.clone(),
                amount: transform_amount(&output.amount),
                datum_hash: output.datum_hash,
            })
        }
        TransactionOutput::Babbage(output) => {
            TransactionOutput::Babbage(BabbageTransactionOutput {
                address: output.address.clone(),
                amount: transform_amount(&output.amount),
                datum: output
                    .datum
                    .clone()
                    .filter(|datum| !matches!(datum, Datum::Inline(bytes) if bytes.is_empty())),
                reference_script: output
                    .reference_script
                    .clone()
                    .filter(|script| !script.is_empty()),
            })
        }
    }
}

fn transform_collateral_return(output: &TransactionOutput) -> TransactionOutput {
    match output {
        TransactionOutput::Legacy(output) => {
            TransactionOutput::Legacy(LegacyTransactionOutput {
                address: output.address.clone(),
                amount: transform_amount(&output.amount),
                datum_hash: output.datum_hash,
            })
        }
        TransactionOutput::Babbage(output) => {
            TransactionOutput::Babbage(BabbageTransactionOutput {
                address: output.address.clone(),
                amount: transform_amount(&output.amount),
                datum: output.datum.clone(),
                reference_script: output.reference_script.clone(),
            })
        }
    }
}

/// Drop policy entries whose token list is empty; a tuple amount whose
/// multiasset prunes to nothing collapses to a bare coin.
fn transform_amount(amount: &Amount) -> Amount {
    match amount {
        Amount::WithoutMultiasset { coin } => Amount::WithoutMultiasset { coin: *coin },
        Amount::WithMultiasset { coin, multiasset } => {
            let multiasset = prune_multiasset(multiasset.clone());
            if multiasset.is_empty() {
                Amount::WithoutMultiasset { coin: *coin }
            } else {
                Amount::WithMultiasset {
                    coin: *coin,
                    multiasset,
                }
            }
        }
    }
}

fn prune_multiasset<A>(multiasset: Multiasset<A>) -> Multiasset<A> {
    multiasset
        .into_iter()
        .filter(|entry| !entry.tokens.is_empty())
        .collect()
}

/// If some sets are tagged and some are not, re-tag every set; consistently
/// tagged or consistently untagged bodies keep their form.
fn unify_set_tags(body: &mut TransactionBody) {
    let tag_flags = body.set_tag_flags();
    let mixed = tag_flags.iter().any(|tagged| *tagged) && tag_flags.iter().any(|tagged| !*tagged);
    if !mixed {
        return;
    }
    body.inputs.has_tag = true;
    if let Some(set) = &mut body.certificates {
        set.has_tag = true;
        for certificate in &mut set.items {
            if let Certificate::PoolRegistration { pool_params } = certificate {
                pool_params.pool_owners.has_tag = true;
            }
        }
    }
    if let Some(set) = &mut body.collateral_inputs {
        set.has_tag = true;
    }
    if let Some(set) = &mut body.required_signers {
        set.has_tag = true;
    }
    if let Some(set) = &mut body.reference_inputs {
        set.has_tag = true;
    }
    if let Some(set) = &mut body.proposal_procedures {
        set.has_tag = true;
    }
}
