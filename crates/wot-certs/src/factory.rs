use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use wot_core::{
    EdgeComponent, Identifier, Network, Node, RegexSet, TrustDepth, FULLY_TRUSTED,
};

use crate::error::CertsError;
use crate::policy::SignaturePolicy;
use crate::record::{revocation_state, CertificateRecord, SignatureRecord, SignatureType};
use crate::verify::check_signature;

/// Build the trust network at `reference_time` from certificate records.
///
/// Certificates without a usable validity calculation are skipped, as is
/// every signature that fails [`check_signature`]. Both are logged at
/// `warn`. When a fingerprint occurs more than once the first record wins.
pub fn build_network<'r, I>(
    records: I,
    policy: &SignaturePolicy,
    reference_time: DateTime<Utc>,
) -> Result<Network, CertsError>
where
    I: IntoIterator<Item = &'r CertificateRecord>,
{
    let mut builder = Network::builder(reference_time);
    let mut usable: BTreeMap<Identifier, &CertificateRecord> = BTreeMap::new();

    for record in records {
        if record.validity.is_none() {
            tracing::warn!(
                fingerprint = %record.fingerprint,
                "skipping certificate without usable key flags or expiration"
            );
            continue;
        }
        if usable.contains_key(&record.fingerprint) {
            tracing::debug!(fingerprint = %record.fingerprint, "ignoring duplicate certificate");
            continue;
        }
        builder.add_node(node_from_record(record, reference_time));
        usable.insert(record.fingerprint.clone(), record);
    }

    let mut accepted = 0usize;
    let mut rejected = 0usize;
    for signee in usable.values() {
        let Some(target) = builder.node(&signee.fingerprint) else {
            continue;
        };
        for signature in &signee.signatures {
            if signature.issuer == signee.fingerprint {
                continue;
            }
            let Some(issuer) = usable.get(&signature.issuer) else {
                tracing::warn!(
                    issuer = %signature.issuer,
                    signee = %signee.fingerprint,
                    "skipping signature by unknown or unusable issuer"
                );
                rejected += 1;
                continue;
            };
            if let Err(rejection) =
                check_signature(signature, issuer, signee, policy, reference_time)
            {
                tracing::warn!(
                    issuer = %signature.issuer,
                    signee = %signee.fingerprint,
                    user_id = signature.user_id.as_deref().unwrap_or(""),
                    reason = %rejection,
                    "skipping signature"
                );
                rejected += 1;
                continue;
            }
            let Some(issuer_node) = builder.node(&signature.issuer) else {
                continue;
            };
            builder.add_component(component_from_signature(
                signature,
                issuer_node,
                target.clone(),
            ))?;
            accepted += 1;
        }
    }

    tracing::info!(
        certificates = usable.len(),
        accepted,
        rejected,
        reference_time = %reference_time,
        "built network from certificates"
    );
    Ok(builder.build())
}

fn node_from_record(record: &CertificateRecord, reference_time: DateTime<Utc>) -> Node {
    let mut node = Node::new(record.fingerprint.clone())
        .with_revocation(record.revocation_state(reference_time));
    if let Some(expiration) = record.expiration_time() {
        node = node.with_expiration(expiration);
    }
    for user_id in &record.user_ids {
        node = node.with_revoked_user_id(
            user_id.value.clone(),
            revocation_state(&user_id.revocations, reference_time),
        );
    }
    node
}

fn component_from_signature(
    signature: &SignatureRecord,
    issuer: Arc<Node>,
    target: Arc<Node>,
) -> EdgeComponent {
    let (amount, depth) = match (signature.signature_type, signature.trust) {
        (SignatureType::CertificationRevocation, _) => (0, TrustDepth::default()),
        (_, Some(trust)) => (trust.amount, TrustDepth::auto(trust.depth)),
        (_, None) => (FULLY_TRUSTED, TrustDepth::default()),
    };

    let component = match &signature.user_id {
        Some(user_id) => {
            EdgeComponent::certification(issuer, target, user_id.clone(), signature.creation_time)
        }
        None => EdgeComponent::delegation(issuer, target, signature.creation_time),
    }
    .with_trust(amount, depth)
    .with_regexes(RegexSet::new(signature.regexes.iter().cloned()))
    .with_exportable(signature.exportable);

    match signature.expiration_time {
        Some(expiration) => component.with_expiration(expiration),
        None => component,
    }
}
