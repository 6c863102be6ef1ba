//! # Encoding Contract Vectors
//!
//! Pins the version-1 wire format of `CanonicalEncoder` and the
//! domain-separated credential digest. Previously issued signatures depend on
//! these bytes: if a vector here changes, `ENCODING_VERSION` must change too.

use chrono::NaiveDate;
use uims_core::{credential_digest, CanonicalBytes, CanonicalEncoder, ENCODING_VERSION};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn vector_message() -> CanonicalBytes {
    let payload = CanonicalBytes::new(&serde_json::json!({"a": 1})).expect("payload");
    let mut enc = CanonicalEncoder::new("uims.credential").expect("header");
    enc.string("hello").expect("string");
    enc.u64(1).i64(-2);
    enc.date(NaiveDate::from_ymd_opt(2099, 1, 1).expect("date"))
        .expect("date field");
    enc.nested(&payload).expect("nested");
    enc.finish()
}

#[test]
fn version_is_one() {
    assert_eq!(ENCODING_VERSION, 1);
}

#[test]
fn message_bytes_match_vector() {
    assert_eq!(
        hex(vector_message().as_bytes()),
        "01010000000f75696d732e63726564656e7469616c010000000568656c6c6f\
         020000000000000001\
         03fffffffffffffffe\
         040000000a323039392d30312d3031\
         05000000077b2261223a317d"
    );
}

#[test]
fn digest_matches_vector() {
    assert_eq!(
        credential_digest(&vector_message()).to_hex(),
        "cffad1aae3e1c7bb24932f2f24dfbb5d5c1d95ff4cbc10fa2f592fccfe3f82bc"
    );
}

#[test]
fn digest_is_stable_across_rebuilds() {
    let a = credential_digest(&vector_message());
    let b = credential_digest(&vector_message());
    assert_eq!(a, b);
}
