//! Property tests: any valid draft verifies immediately after issuance,
//! and the verification counter equals the number of attempts.

use chrono::NaiveDate;
use proptest::prelude::*;
use uims_core::{ManualClock, StaticNetwork, Timestamp};
use uims_crypto::{Ed25519Recovery, LocalWallet};
use uims_vc::{
    issue_credential, CredentialDraft, CredentialStore, CredentialType, VerificationStatus,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

fn credential_type() -> impl Strategy<Value = CredentialType> {
    prop_oneof![
        Just(CredentialType::Academic),
        Just(CredentialType::Professional),
        Just(CredentialType::Certification),
        Just(CredentialType::Identity),
        Just(CredentialType::Membership),
        "[a-z]{1,12}".prop_map(|tag| CredentialType::custom(tag).unwrap()),
    ]
}

prop_compose! {
    fn draft_fields()(
        credential_type in credential_type(),
        title in "[A-Za-z0-9 ]{0,40}[A-Za-z]",
        description in ".{0,80}",
        category in "[a-z]{0,12}",
        tags in proptest::collection::btree_set("[a-z]{1,8}", 0..5),
        media in proptest::option::of("ipfs://[a-z0-9]{8,16}"),
        data in ".{0,120}",
        issuance_offset in 0i64..3650,
        validity_days in 1i64..20000,
        network_id in any::<u64>(),
    ) -> (CredentialDraft, u64) {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let issuance = base + chrono::Duration::days(issuance_offset);
        let draft = CredentialDraft {
            credential_type: Some(credential_type),
            title,
            description,
            category,
            tags,
            media_reference: media,
            data,
            issuance_date: Some(issuance),
            expiry_date: Some(issuance + chrono::Duration::days(validity_days)),
            ..CredentialDraft::default()
        };
        (draft, network_id)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn issued_credentials_verify_before_expiry((mut draft, network_id) in draft_fields()) {
        let wallet = LocalWallet::from_seed(&[9u8; 32]);
        draft.issuer = Some(wallet.account().clone());
        let expiry = draft.expiry_date.unwrap();
        // One millisecond before expiry midnight, the credential is still live.
        let now = Timestamp::start_of_day(expiry).plus_millis(-1);
        let clock = ManualClock::new(now);

        let mut store = CredentialStore::new();
        let signed = runtime()
            .block_on(issue_credential(draft, &wallet, &StaticNetwork(network_id), &clock))
            .unwrap();
        let c = store.create_credential(signed);

        prop_assert_eq!(
            store.verify(&c.id, &Ed25519Recovery, &clock).unwrap(),
            VerificationStatus::Verified
        );
    }

    #[test]
    fn verification_count_equals_attempts(attempts in 1usize..12, jumps in proptest::collection::vec(0i64..400, 12)) {
        let wallet = LocalWallet::from_seed(&[3u8; 32]);
        let clock = ManualClock::new(Timestamp::parse("2098-12-01T00:00:00Z").unwrap());
        let draft = CredentialDraft {
            issuer: Some(wallet.account().clone()),
            credential_type: Some(CredentialType::Membership),
            title: "Guild member".to_string(),
            issuance_date: NaiveDate::from_ymd_opt(2098, 1, 1),
            expiry_date: NaiveDate::from_ymd_opt(2099, 1, 1),
            ..CredentialDraft::default()
        };
        let mut store = CredentialStore::new();
        let signed = runtime()
            .block_on(issue_credential(draft, &wallet, &StaticNetwork(1), &clock))
            .unwrap();
        let c = store.create_credential(signed);

        // Jumps of up to 40 days cross the expiry date for some inputs.
        for jump in jumps.iter().take(attempts) {
            clock.advance_millis(jump * 86_400_000 / 10);
            store.verify(&c.id, &Ed25519Recovery, &clock).unwrap();
        }
        prop_assert_eq!(store.get(&c.id).unwrap().verification_count, attempts as u64);
        prop_assert_eq!(store.history(&c.id).unwrap().len(), attempts);
    }
}
