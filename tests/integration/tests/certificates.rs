//! Integration test: from certificate records to authenticated bindings.
//!
//! Feeds JSON certificate synopses through wot-certs into the wot-api
//! facade, covering signature validation, revocation precedence and
//! most-recent-wins merging of re-certifications.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use wot_api::{WebOfTrust, WotConfig};
use wot_certs::{records_from_json, CertsError, SignaturePolicy};
use wot_core::{Identifier, RevocationState, Root};
use wot_integration_tests::*;

const B: usize = 1;
const C: usize = 2;
const D: usize = 3;

fn certificate(fingerprint: &str, user_id: &str) -> Value {
    json!({
        "fingerprint": fingerprint,
        "creation_time": day(-100),
        "validity": {},
        "public_key_algorithm": "EdDSA",
        "user_ids": [{ "value": user_id }],
        "signatures": [],
    })
}

fn certification(issuer: &str, user_id: &str, created: i64, depth: u8, amount: u8) -> Value {
    json!({
        "issuer": issuer,
        "type": "generic_certification",
        "user_id": user_id,
        "creation_time": day(created),
        "trust": { "depth": depth, "amount": amount },
        "hash_algorithm": "SHA256",
    })
}

fn add_signature(certificate: &mut Value, signature: Value) {
    if let Some(signatures) = certificate["signatures"].as_array_mut() {
        signatures.push(signature);
    }
}

/// The two-introducer topology as certificates:
///
/// ```text
/// Alice -(120/2)-> Bob -(60/1)-> Dave
/// Alice  -(30/2)-> Carol -(120/1)-> Dave
/// ```
fn two_introducers() -> Vec<Value> {
    let mut certs = vec![
        certificate(ALICE, ALICE_UID),
        certificate(BOB, BOB_UID),
        certificate(CAROL, CAROL_UID),
        certificate(DAVE, DAVE_UID),
    ];
    add_signature(&mut certs[B], certification(ALICE, BOB_UID, -50, 2, 120));
    add_signature(&mut certs[C], certification(ALICE, CAROL_UID, -50, 2, 30));
    add_signature(&mut certs[D], certification(BOB, DAVE_UID, -50, 1, 60));
    add_signature(&mut certs[D], certification(CAROL, DAVE_UID, -50, 1, 120));
    certs
}

fn config_at(reference_time: DateTime<Utc>) -> WotConfig {
    let mut config = WotConfig::default();
    config.roots = vec![Root::new(ALICE)];
    config.query.reference_time = Some(reference_time);
    config
}

fn wot_with(certs: &[Value], config: &WotConfig) -> WebOfTrust {
    let json = Value::Array(certs.to_vec()).to_string();
    let records = records_from_json(&json).expect("records should parse");
    WebOfTrust::from_records(&records, config).expect("network should build")
}

fn wot(certs: &[Value]) -> WebOfTrust {
    wot_with(certs, &config_at(reference_time()))
}

fn dave_routes(wot: &WebOfTrust) -> Vec<(Vec<Identifier>, u8)> {
    let result = wot
        .authenticate(&id(DAVE), DAVE_UID, false)
        .expect("authentication");
    result
        .binding
        .paths
        .iter()
        .map(|(path, amount)| (path.identifiers(), amount))
        .collect()
}

fn route(fingerprints: &[&str], amount: u8) -> (Vec<Identifier>, u8) {
    (fingerprints.iter().map(|f| id(f)).collect(), amount)
}

// =========================================================================
// Baseline
// =========================================================================

#[test]
fn test_records_build_expected_network() {
    let wot = wot(&two_introducers());

    assert_eq!(wot.network().node_count(), 4);
    assert_eq!(wot.network().edge_count(), 4);
    assert_eq!(
        dave_routes(&wot),
        vec![route(&[ALICE, BOB, DAVE], 60), route(&[ALICE, CAROL, DAVE], 30)]
    );
}

#[test]
fn test_invalid_json_is_an_error() {
    let result = records_from_json("[{\"fingerprint\": 1}]");
    assert!(matches!(result, Err(CertsError::Json(_))));
}

#[test]
fn test_certificate_without_validity_is_left_out() {
    let mut certs = two_introducers();
    certs[C]["validity"] = Value::Null;
    let wot = wot(&certs);

    assert!(wot.network().node(&id(CAROL)).is_none());
    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, BOB, DAVE], 60)]);
}

// =========================================================================
// Revocations
// =========================================================================

#[test]
fn test_hard_revoked_introducer_is_ignored() {
    let mut certs = two_introducers();
    certs[B]["revocations"] = json!([
        { "creation_time": day(-10), "reason": "key_compromised" }
    ]);
    let wot = wot(&certs);

    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, CAROL, DAVE], 30)]);

    let bob = wot.authenticate(&id(BOB), BOB_UID, false).expect("authentication");
    assert_eq!(bob.binding.amount(), 0);
}

#[test]
fn test_soft_revoked_introducer_keeps_older_certifications() {
    let mut certs = two_introducers();
    certs[B]["revocations"] = json!([
        { "creation_time": day(-10), "reason": "key_retired" }
    ]);
    // Made after the retirement, so it must not replace the older one.
    add_signature(&mut certs[D], certification(BOB, DAVE_UID, -5, 1, 120));
    let wot = wot(&certs);

    assert_eq!(
        dave_routes(&wot),
        vec![route(&[ALICE, BOB, DAVE], 60), route(&[ALICE, CAROL, DAVE], 30)]
    );

    // Bob himself can no longer be authenticated.
    let bob = wot.authenticate(&id(BOB), BOB_UID, false).expect("authentication");
    assert_eq!(bob.binding.amount(), 0);
}

#[test]
fn test_soft_revocation_before_certification() {
    let mut certs = two_introducers();
    certs[B]["revocations"] = json!([
        { "creation_time": day(-60), "reason": "key_superseded" }
    ]);
    let wot = wot(&certs);

    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, CAROL, DAVE], 30)]);
}

#[test]
fn test_hard_revocation_after_reference_time_still_applies() {
    let mut certs = two_introducers();
    certs[B]["revocations"] = json!([
        { "creation_time": day(5), "reason": "key_compromised" }
    ]);
    let wot = wot(&certs);

    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, CAROL, DAVE], 30)]);
    assert_eq!(
        wot.network().node(&id(BOB)).map(|n| n.revocation()),
        Some(RevocationState::Hard)
    );
}

#[test]
fn test_soft_revocation_after_reference_time_is_unknown() {
    let mut certs = two_introducers();
    certs[B]["revocations"] = json!([
        { "creation_time": day(5), "reason": "key_retired" }
    ]);
    let wot = wot(&certs);

    assert_eq!(
        dave_routes(&wot),
        vec![route(&[ALICE, BOB, DAVE], 60), route(&[ALICE, CAROL, DAVE], 30)]
    );
    let bob = wot.authenticate(&id(BOB), BOB_UID, false).expect("authentication");
    assert_eq!(bob.binding.amount(), 120);
}

#[test]
fn test_revoked_user_id_is_not_authenticated() {
    let mut certs = two_introducers();
    certs[D]["user_ids"] = json!([{
        "value": DAVE_UID,
        "revocations": [{ "creation_time": day(-10), "reason": "user_id_invalid" }],
    }]);
    let wot = wot(&certs);

    assert!(dave_routes(&wot).is_empty());
}

// =========================================================================
// Re-certification
// =========================================================================

#[test]
fn test_zero_trust_recertification_removes_edge() {
    let mut certs = two_introducers();
    add_signature(
        &mut certs[D],
        json!({
            "issuer": BOB,
            "type": "certification_revocation",
            "user_id": DAVE_UID,
            "creation_time": day(-20),
            "hash_algorithm": "SHA256",
        }),
    );

    let after = wot(&certs);
    assert_eq!(dave_routes(&after), vec![route(&[ALICE, CAROL, DAVE], 30)]);

    // Before the revocation existed Bob's certification still counts.
    let before = wot_with(&certs, &config_at(day(-30)));
    assert_eq!(
        dave_routes(&before),
        vec![route(&[ALICE, BOB, DAVE], 60), route(&[ALICE, CAROL, DAVE], 30)]
    );
}

#[test]
fn test_newer_certification_replaces_older() {
    let mut certs = two_introducers();
    add_signature(&mut certs[D], certification(BOB, DAVE_UID, -20, 1, 120));
    let wot = wot(&certs);

    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, BOB, DAVE], 120)]);
}

#[test]
fn test_expired_certification_falls_back_to_older() {
    let mut certs = two_introducers();
    let mut newer = certification(BOB, DAVE_UID, -20, 1, 120);
    newer["expiration_time"] = json!(day(-1));
    add_signature(&mut certs[D], newer);
    let wot = wot(&certs);

    assert_eq!(
        dave_routes(&wot),
        vec![route(&[ALICE, BOB, DAVE], 60), route(&[ALICE, CAROL, DAVE], 30)]
    );
}

// =========================================================================
// Policy
// =========================================================================

#[test]
fn test_weak_hash_rejected_by_default_policy() {
    let mut certs = two_introducers();
    certs[C]["signatures"][0]["hash_algorithm"] = json!("SHA1");

    let strict = wot(&certs);
    assert_eq!(dave_routes(&strict), vec![route(&[ALICE, BOB, DAVE], 60)]);

    let mut config = config_at(reference_time());
    config.policy = SignaturePolicy::permissive();
    let permissive = wot_with(&certs, &config);
    assert_eq!(dave_routes(&permissive).len(), 2);
}

#[test]
fn test_unverified_signature_is_rejected() {
    let mut certs = two_introducers();
    certs[B]["signatures"][0]["verified"] = json!(false);
    let wot = wot(&certs);

    // Without Alice's certification of Bob, only Carol's route remains.
    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, CAROL, DAVE], 30)]);
}

#[test]
fn test_signature_on_unknown_user_id_is_rejected() {
    let mut certs = two_introducers();
    add_signature(
        &mut certs[D],
        certification(ALICE, "Mallory <mallory@example.org>", -50, 0, 120),
    );
    let wot = wot(&certs);

    let mallory = wot
        .authenticate(&id(DAVE), "Mallory <mallory@example.org>", false)
        .expect("authentication");
    assert_eq!(mallory.binding.amount(), 0);
    assert_eq!(wot.network().edge_count(), 4);
}

#[test]
fn test_certificates_used_with_config_roots() {
    let mut config = config_at(reference_time());
    config.roots = vec![Root::new(ALICE), Root::with_amount(CAROL, 60)];
    let wot = wot_with(&two_introducers(), &config);

    assert_eq!(wot.roots().len(), 2);
    let dave = wot.authenticate(&id(DAVE), DAVE_UID, false).expect("authentication");
    assert!(dave.is_acceptable());
    assert_eq!(dave.percentage(), 100);
}

#[test]
fn test_reference_time_before_certifications() {
    let wot = wot_with(&two_introducers(), &config_at(day(-70)));

    assert_eq!(wot.network().edge_count(), 0);
    assert!(dave_routes(&wot).is_empty());
}

#[test]
fn test_json_config_round_trip_drives_network() {
    let config: WotConfig = serde_json::from_value(json!({
        "query": { "trust_amount": 60, "reference_time": reference_time() },
        "roots": [{ "fingerprint": ALICE }],
    }))
    .expect("config");
    let wot = wot_with(&two_introducers(), &config);

    assert_eq!(wot.required_amount(), 60);
    assert_eq!(dave_routes(&wot), vec![route(&[ALICE, BOB, DAVE], 60)]);
}

#[test]
fn test_reference_time_is_used_for_every_check() {
    let mut certs = two_introducers();
    certs[D]["validity"] = json!({ "expiration_time": day(-1) });
    let wot = wot(&certs);

    assert!(dave_routes(&wot).is_empty());

    let earlier = wot_with(&certs, &config_at(day(-2)));
    assert_eq!(dave_routes(&earlier).len(), 2);
}

#[test]
fn test_dedicated_time_is_reported_by_network() {
    let wot = wot_with(&two_introducers(), &config_at(day(-3)));
    assert_eq!(wot.network().reference_time(), day(-3));
}

// Keeps the identifier helper honest about normalization.
#[test]
fn test_lowercase_fingerprints_match() {
    let mut certs = two_introducers();
    certs[D]["signatures"][0]["issuer"] = json!(BOB.to_lowercase());
    let wot = wot(&certs);

    assert_eq!(dave_routes(&wot).len(), 2);
    assert_eq!(Identifier::new(BOB.to_lowercase()), id(BOB));
}
