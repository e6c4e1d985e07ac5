use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use wot_core::{EdgeComponent, Identifier, Network, Node, TrustDepth, FULLY_TRUSTED};

use crate::error::QueryError;
use crate::path::Path;

/// A working view over a [`Network`] for one authentication.
///
/// Caps limit the amount of every edge issued by a partially trusted root.
/// Suppression records how much of an (issuer, target) pair earlier paths
/// already consumed. Neither touches the underlying network.
#[derive(Debug)]
pub struct ResidualNetwork<'a> {
    network: &'a Network,
    certification_network: bool,
    caps: HashMap<Identifier, u8>,
    suppressed: HashMap<(Identifier, Identifier), u32>,
}

impl<'a> ResidualNetwork<'a> {
    pub fn new(network: &'a Network, certification_network: bool) -> Self {
        Self {
            network,
            certification_network,
            caps: HashMap::new(),
            suppressed: HashMap::new(),
        }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.network.reference_time()
    }

    pub fn is_certification_network(&self) -> bool {
        self.certification_network
    }

    /// The target node, if the binding `(identifier, user_id)` may be
    /// authenticated at the reference time at all.
    pub fn valid_target(&self, identifier: &Identifier, user_id: &str) -> Option<&'a Arc<Node>> {
        let node = self.network.node(identifier)?;
        let reference_time = self.reference_time();

        if node.is_expired(reference_time) {
            tracing::debug!(target_cert = %identifier, "target certificate is expired");
            return None;
        }
        if node.revocation().is_effective(reference_time) {
            tracing::debug!(target_cert = %identifier, "target certificate is revoked");
            return None;
        }
        if node
            .user_id_revocation(user_id)
            .is_some_and(|revocation| revocation.is_effective(reference_time))
        {
            tracing::debug!(target_cert = %identifier, user_id, "target user-id is revoked");
            return None;
        }
        Some(node)
    }

    /// The certificate's own assertion of `user_id`, as a synthetic full
    /// trust certification. Revocation is not considered here.
    pub fn self_signature(&self, identifier: &Identifier, user_id: &str) -> Option<EdgeComponent> {
        let node = self.network.node(identifier)?;
        if !node.has_user_id(user_id) {
            return None;
        }
        Some(
            EdgeComponent::certification(node.clone(), node.clone(), user_id, self.reference_time())
                .with_trust(FULLY_TRUSTED, TrustDepth::default()),
        )
    }

    /// Components pointing at `signee` that can carry a path towards a
    /// binding for `user_id` needing `min_depth` further hops.
    pub fn certifications_for_signee(
        &self,
        signee: &Identifier,
        user_id: &str,
        min_depth: usize,
    ) -> Vec<&'a EdgeComponent> {
        let components = self
            .network
            .edges_to(signee)
            .iter()
            .flat_map(|edge| edge.components());
        if self.certification_network {
            return components.collect();
        }
        components
            .filter(|c| c.trust_depth().covers(min_depth) && c.regexes().matches(user_id))
            .collect()
    }

    /// Limit the amount of every edge issued by `issuer`.
    pub fn cap_certificate(&mut self, issuer: Identifier, amount: u8) {
        tracing::debug!(issuer = %issuer, amount, "capping partially trusted root");
        self.caps.insert(issuer, amount);
    }

    /// The component's amount after caps and suppression.
    pub fn effective_trust_amount(&self, component: &EdgeComponent) -> u8 {
        let issuer = component.issuer().identifier();
        let mut amount = component.trust_amount();
        if let Some(cap) = self.caps.get(issuer) {
            amount = amount.min(*cap);
        }
        let suppressed = self
            .suppressed
            .get(&(issuer.clone(), component.target().identifier().clone()))
            .copied()
            .unwrap_or(0);
        u8::try_from(u32::from(amount).saturating_sub(suppressed)).unwrap_or(0)
    }

    /// Consume `amount` on every edge of `path`.
    pub fn suppress_path(&mut self, path: &Path, amount: u8) -> Result<(), QueryError> {
        if amount == 0 {
            return Ok(());
        }
        for component in path.edges() {
            let key = (
                component.issuer().identifier().clone(),
                component.target().identifier().clone(),
            );
            let suppressed = self.suppressed.get(&key).copied().unwrap_or(0);
            let total = suppressed + u32::from(amount);
            if total > u32::from(component.trust_amount()) {
                return Err(QueryError::SuppressionOverflow {
                    issuer: key.0,
                    target: key.1,
                    amount,
                    suppressed,
                    capacity: component.trust_amount(),
                });
            }
            tracing::trace!(issuer = %key.0, target_cert = %key.1, suppressed = total, "suppressed edge");
            self.suppressed.insert(key, total);
        }
        Ok(())
    }
}
