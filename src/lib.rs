//! txcanon - canonical CBOR codec and validator for Cardano transactions.
//!
//! A pure in-memory library that converts transaction CBOR into a typed
//! model, re-serializes the model canonically (sorted map keys, minimal
//! integer widths, no indefinite-length constructs), checks it against the
//! CIP-0021 rule set, and normalizes away every violation that a canonical
//! re-encode can fix.
//!
//! # Entry points
//!
//! - [`decode_tx_body`] / [`decode_tx`] / [`decode_raw_tx`] parse bytes into
//!   the typed model, failing with a specific [`ParseError`] on any
//!   structural violation.
//! - [`encode_tx_body`] / [`encode_tx`] / [`encode_raw_tx`] always produce
//!   canonical bytes.
//! - [`validate_tx_body`] / [`validate_tx`] / [`validate_raw_tx`] decode,
//!   re-encode and run the full rule set, returning every violation found
//!   with its fixability and position.
//! - [`transform_tx_body`] / [`transform_tx`] / [`transform_raw_tx`] are
//!   pure repair functions removing all fixable violations.
//!
//! # Example
//!
//! ```
//! use txcanon::{decode_tx_body, encode_tx_body, validate_tx_body};
//!
//! let bytes = [
//!     0xa3, 0x00, 0x81, 0x82, 0x58, 0x20, // inputs: [[32-byte id, index]]
//! #   0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba,
//! #   0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba,
//! #   0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba,
//! #   0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba, 0xba,
//! #   0x00,
//!     0x01, 0x80,                         // outputs: []
//!     0x02, 0x19, 0x03, 0xe8,             // fee: 1000
//! ];
//! let body = decode_tx_body(&bytes)?;
//! assert_eq!(body.fee, 1000);
//! assert_eq!(encode_tx_body(&body), bytes);
//! assert!(validate_tx_body(&bytes)?.is_empty());
//! # Ok::<(), txcanon::ParseError>(())
//! ```

pub mod cbor;
mod codec;
pub mod error;
pub mod transform;
pub mod types;
pub mod validate;

pub use error::{ParseError, Result, ValidationError, ValidationErrorReason};
pub use transform::{transform_raw_tx, transform_tx, transform_tx_body};
pub use types::{RawTransaction, Transaction, TransactionBody};

use error::ValidationErrorReason as Reason;

/// Decode a transaction body from CBOR bytes.
pub fn decode_tx_body(bytes: &[u8]) -> Result<TransactionBody> {
    let value = cbor::decode(bytes, ParseError::InvalidTransactionBodyCbor)?;
    codec::body::parse_tx_body(&value)
}

/// Decode a signed transaction envelope from CBOR bytes.
pub fn decode_tx(bytes: &[u8]) -> Result<Transaction> {
    let value = cbor::decode(bytes, ParseError::InvalidTransactionCbor)?;
    codec::body::parse_tx(&value)
}

/// Decode an unsigned (raw) transaction envelope from CBOR bytes.
pub fn decode_raw_tx(bytes: &[u8]) -> Result<RawTransaction> {
    let value = cbor::decode(bytes, ParseError::InvalidRawTransactionCbor)?;
    codec::body::parse_raw_tx(&value)
}

/// Encode a transaction body to canonical CBOR bytes.
pub fn encode_tx_body(body: &TransactionBody) -> Vec<u8> {
    cbor::encode_canonical(&codec::body::serialize_tx_body(body))
}

/// Encode a signed transaction to canonical CBOR bytes.
pub fn encode_tx(tx: &Transaction) -> Vec<u8> {
    cbor::encode_canonical(&codec::body::serialize_tx(tx))
}

/// Encode an unsigned (raw) transaction to canonical CBOR bytes.
pub fn encode_raw_tx(tx: &RawTransaction) -> Vec<u8> {
    cbor::encode_canonical(&codec::body::serialize_raw_tx(tx))
}

/// Decode a transaction body and run the full rule set over it, including
/// the canonical round-trip check against the input bytes.
///
/// Returns the (possibly empty) violation list; only decoding itself can
/// fail.
pub fn validate_tx_body(bytes: &[u8]) -> Result<Vec<ValidationError>> {
    let body = decode_tx_body(bytes)?;
    let mut errors = Vec::new();
    if encode_tx_body(&body) != bytes {
        errors.push(ValidationError::new(
            Reason::CborIsNotCanonical,
            "transaction_body",
        ));
    }
    validate::validate_body(&body, &mut errors);
    Ok(errors)
}

/// Decode a signed transaction and run the full rule set over it.
pub fn validate_tx(bytes: &[u8]) -> Result<Vec<ValidationError>> {
    let tx = decode_tx(bytes)?;
    let mut errors = Vec::new();
    if encode_tx(&tx) != bytes {
        errors.push(ValidationError::new(Reason::CborIsNotCanonical, "transaction"));
    }
    validate::validate_body(&tx.body, &mut errors);
    Ok(errors)
}

/// Decode an unsigned (raw) transaction and run the full rule set over it.
pub fn validate_raw_tx(bytes: &[u8]) -> Result<Vec<ValidationError>> {
    let tx = decode_raw_tx(bytes)?;
    let mut errors = Vec::new();
    if encode_raw_tx(&tx) != bytes {
        errors.push(ValidationError::new(
            Reason::CborIsNotCanonical,
            "raw_transaction",
        ));
    }
    validate::validate_body(&tx.body, &mut errors);
    Ok(errors)
}

