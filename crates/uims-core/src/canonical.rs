//! # Canonical Serialization: Deterministic Byte Production
//!
//! This module defines `CanonicalBytes`, the sole input type accepted by the
//! digest functions, and the two pipelines that can produce it:
//!
//! - [`CanonicalBytes::new()`]: RFC 8785 (JCS) serialization of any
//!   `Serialize` value: sorted keys, compact separators, floats rejected.
//!   Used for composite payloads whose shape is open-ended.
//! - [`CanonicalEncoder`]: a fixed-order, type-tagged binary encoding used
//!   for credential messages, where the field order itself is a wire
//!   contract.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` of `CanonicalBytes` is private. Downstream code cannot
//! hash bytes that did not pass through one of the two pipelines above.
//!
//! ## Encoder Wire Format (version 1)
//!
//! ```text
//! header  := version:u8 (0x01) || string(domain)
//! string  := 0x01 || len:u32be || utf8
//! u64     := 0x02 || 8 bytes big-endian
//! i64     := 0x03 || 8 bytes big-endian (two's complement)
//! date    := 0x04 || len:u32be || "YYYY-MM-DD"
//! nested  := 0x05 || len:u32be || canonical bytes
//! ```
//!
//! Every variable-length field is length-prefixed, so adjacent fields can
//! never be re-split into a different message with the same bytes.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Version byte written at the start of every encoder output.
///
/// Bump this whenever the credential field order or a field encoding
/// changes; previously issued signatures remain verifiable only under the
/// version they were produced with.
pub const ENCODING_VERSION: u8 = 1;

const TAG_STRING: u8 = 0x01;
const TAG_U64: u8 = 0x02;
const TAG_I64: u8 = 0x03;
const TAG_DATE: u8 = 0x04;
const TAG_NESTED: u8 = 0x05;

/// Bytes produced exclusively by a canonical pipeline.
///
/// # Invariants
///
/// - Constructed only by [`CanonicalBytes::new()`] or
///   [`CanonicalEncoder::finish()`].
/// - JCS output has sorted keys, compact separators, and no floats.
/// - Encoder output starts with [`ENCODING_VERSION`] and a domain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value via JCS.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// float numbers, or `SerializationFailed` if serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_json_value(value)?;
        let bytes = serialize_canonical(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fixed-order, type-tagged message builder.
///
/// Callers append fields in their documented order and call
/// [`finish()`](Self::finish). Two encoders fed identical values in identical
/// order produce identical bytes.
#[derive(Debug, Clone)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Start a message for the given domain.
    pub fn new(domain: &str) -> Result<Self, CanonicalizationError> {
        let mut enc = Self {
            buf: Vec::with_capacity(256),
        };
        enc.buf.push(ENCODING_VERSION);
        enc.string(domain)?;
        Ok(enc)
    }

    /// Append a length-prefixed UTF-8 string.
    pub fn string(&mut self, value: &str) -> Result<&mut Self, CanonicalizationError> {
        self.tagged(TAG_STRING, value.as_bytes())
    }

    /// Append an unsigned integer, fixed-width big-endian.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.push(TAG_U64);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Append a signed integer, fixed-width big-endian.
    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.buf.push(TAG_I64);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Append a calendar date as `YYYY-MM-DD`.
    pub fn date(&mut self, value: NaiveDate) -> Result<&mut Self, CanonicalizationError> {
        let rendered = value.format("%Y-%m-%d").to_string();
        self.tagged(TAG_DATE, rendered.as_bytes())
    }

    /// Append previously canonicalized bytes (e.g. a JCS payload).
    pub fn nested(&mut self, value: &CanonicalBytes) -> Result<&mut Self, CanonicalizationError> {
        self.tagged(TAG_NESTED, value.as_bytes())
    }

    /// Seal the message.
    pub fn finish(self) -> CanonicalBytes {
        CanonicalBytes(self.buf)
    }

    fn tagged(&mut self, tag: u8, body: &[u8]) -> Result<&mut Self, CanonicalizationError> {
        let len = u32::try_from(body.len())
            .map_err(|_| CanonicalizationError::FieldTooLong { len: body.len() })?;
        self.buf.push(tag);
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(body);
        Ok(self)
    }
}

/// Recursively reject float values in a JSON tree.
///
/// 1. `null`, `bool`, `string`, `integer`: pass through unchanged.
/// 2. `float` (non-integer): rejected with `FloatRejected`.
/// 3. `object` / `array`: values recursed.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785).
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn encode(fields: &[(String, u64)]) -> CanonicalBytes {
        let mut enc = CanonicalEncoder::new("prop").unwrap();
        for (s, n) in fields {
            enc.string(s).unwrap();
            enc.u64(*n);
        }
        enc.finish()
    }

    proptest! {
        /// Same fields in the same order always produce the same bytes.
        #[test]
        fn encoder_deterministic(fields in prop::collection::vec((".{0,24}", any::<u64>()), 0..8)) {
            prop_assert_eq!(encode(&fields), encode(&fields));
        }

        /// Any change to a string field changes the encoding.
        #[test]
        fn encoder_sensitive_to_strings(a in ".{0,24}", b in ".{0,24}", n in any::<u64>()) {
            prop_assume!(a != b);
            prop_assert_ne!(encode(&[(a, n)]), encode(&[(b, n)]));
        }

        /// Any change to an integer field changes the encoding.
        #[test]
        fn encoder_sensitive_to_integers(s in ".{0,24}", x in any::<u64>(), y in any::<u64>()) {
            prop_assume!(x != y);
            prop_assert_ne!(encode(&[(s.clone(), x)]), encode(&[(s, y)]));
        }

        /// JCS output is valid JSON for float-free objects.
        #[test]
        fn jcs_output_is_json(map in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)) {
            let cb = CanonicalBytes::new(&map).unwrap();
            let parsed: Result<Value, _> = serde_json::from_slice(cb.as_bytes());
            prop_assert!(parsed.is_ok());
        }
    }
}
