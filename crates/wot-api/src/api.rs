use std::sync::Arc;

use wot_certs::{build_network, CertificateRecord, CertsError};
use wot_core::{
    AuthenticationLevel, EdgeComponent, Identifier, Network, Node, Roots, FULLY_TRUSTED,
};
use wot_query::{Path, Query, QueryError, ResidualNetwork};

use crate::binding::{AuthenticationResult, Binding};
use crate::config::WotConfig;

/// Result of verifying a caller-supplied path.
#[derive(Debug, Clone)]
pub enum PathVerdict {
    Verified { path: Path, amount: u8 },
    Rejected { reasons: Vec<String> },
}

impl PathVerdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, PathVerdict::Verified { .. })
    }
}

/// Entry point for authenticating bindings against one network.
///
/// Every operation runs fresh queries against the shared, immutable
/// network, so a `WebOfTrust` can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct WebOfTrust {
    network: Arc<Network>,
    roots: Roots,
    certification_network: bool,
    trust_amount: u32,
}

impl WebOfTrust {
    /// Requires full trust (120) by default.
    pub fn new(network: impl Into<Arc<Network>>, roots: Roots) -> Self {
        Self {
            network: network.into(),
            roots,
            certification_network: false,
            trust_amount: AuthenticationLevel::Fully.amount(),
        }
    }

    pub fn from_config(network: impl Into<Arc<Network>>, config: &WotConfig) -> Self {
        Self::new(network, config.roots())
            .with_certification_network(config.query.certification_network)
            .with_trust_amount(config.query.trust_amount)
    }

    /// Build the network from certificate records using the configured
    /// policy and reference time.
    pub fn from_records(
        records: &[CertificateRecord],
        config: &WotConfig,
    ) -> Result<Self, CertsError> {
        let network = build_network(records, &config.policy, config.query.reference_time())?;
        Ok(Self::from_config(network, config))
    }

    pub fn with_certification_network(mut self, enabled: bool) -> Self {
        self.certification_network = enabled;
        self
    }

    pub fn with_trust_amount(mut self, amount: u32) -> Self {
        self.trust_amount = amount;
        self
    }

    pub fn with_level(self, level: AuthenticationLevel) -> Self {
        self.with_trust_amount(level.amount())
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// The amount a binding needs to be acceptable.
    pub fn required_amount(&self) -> u32 {
        self.trust_amount
    }

    fn query(&self) -> Query<'_> {
        Query::new(&self.network, &self.roots, self.certification_network)
    }

    fn binding(&self, fingerprint: &Identifier, user_id: &str) -> Result<Binding, QueryError> {
        let paths = self
            .query()
            .authenticate(fingerprint, user_id, self.trust_amount)?;
        Ok(Binding::new(fingerprint.clone(), user_id, paths))
    }

    /// Authenticate one binding.
    ///
    /// With `email` set, `user_id` is an email address: every user-id on
    /// the certificate containing `<email>` is tried and the strongest
    /// binding is reported.
    pub fn authenticate(
        &self,
        fingerprint: &Identifier,
        user_id: &str,
        email: bool,
    ) -> Result<AuthenticationResult, QueryError> {
        let candidates = match (email, self.network.node(fingerprint)) {
            (true, Some(node)) => matching_user_ids(node, user_id, true),
            _ => Vec::new(),
        };

        let mut best: Option<Binding> = None;
        for candidate in &candidates {
            let binding = self.binding(fingerprint, candidate)?;
            if best.as_ref().map_or(true, |b| binding.amount() > b.amount()) {
                best = Some(binding);
            }
        }
        let binding = match best {
            Some(binding) => binding,
            None => self.binding(fingerprint, user_id)?,
        };

        Ok(AuthenticationResult {
            binding,
            required_amount: self.trust_amount,
        })
    }

    /// Authenticate every user-id on a certificate, keeping those with any
    /// trust at all.
    pub fn identify(&self, fingerprint: &Identifier) -> Result<Vec<Binding>, QueryError> {
        let Some(node) = self.network.node(fingerprint) else {
            return Ok(Vec::new());
        };
        let mut bindings = Vec::new();
        for user_id in node.user_ids().keys() {
            let binding = self.binding(fingerprint, user_id)?;
            if binding.amount() > 0 {
                bindings.push(binding);
            }
        }
        Ok(bindings)
    }

    /// [`WebOfTrust::identify`] over every certificate in the network.
    pub fn list(&self) -> Result<Vec<Binding>, QueryError> {
        let mut bindings = Vec::new();
        for fingerprint in self.network.nodes().keys() {
            bindings.extend(self.identify(fingerprint)?);
        }
        tracing::debug!(bindings = bindings.len(), "listed authenticated bindings");
        Ok(bindings)
    }

    /// Find certificates carrying `user_id` (or, with `email`, a user-id
    /// containing `<user_id>`) and authenticate each match.
    pub fn lookup(&self, user_id: &str, email: bool) -> Result<Vec<Binding>, QueryError> {
        let mut bindings = Vec::new();
        for (fingerprint, node) in self.network.nodes() {
            for candidate in matching_user_ids(node, user_id, email) {
                let binding = self.binding(fingerprint, &candidate)?;
                if !binding.paths.is_empty() {
                    bindings.push(binding);
                }
            }
        }
        Ok(bindings)
    }

    /// Verify that `hops` (root first, target last) is a valid path for
    /// `user_id` and report its amount, or every reason it is not.
    ///
    /// The final hop is either a certification of `user_id`, or a
    /// delegation followed by the target's own self-signature. Repeating
    /// the target at the end, as returned paths do, asks for the latter.
    pub fn check_path(&self, hops: &[Identifier], user_id: &str) -> Result<PathVerdict, QueryError> {
        let (Some(first), Some(target)) = (hops.first(), hops.last()) else {
            return Ok(PathVerdict::Rejected {
                reasons: vec!["path is empty".into()],
            });
        };

        let mut reasons = Vec::new();
        if !self.roots.is_root(first) {
            reasons.push(format!("{first} is not a trust root"));
        }
        let residual = self.query().residual_network();
        if residual.valid_target(target, user_id).is_none() {
            reasons.push(format!(
                "{target} is unknown, expired or revoked for {user_id:?}"
            ));
        }
        let Some(root_node) = self.network.node(first) else {
            reasons.push(format!("{first} is not in the network"));
            return Ok(PathVerdict::Rejected { reasons });
        };

        let mut path = if self.certification_network {
            Path::unconstrained(root_node.clone())
        } else {
            Path::new(root_node.clone())
        }
        .for_user_id(user_id);

        let explicit_close = matches!(hops, [.., tail, last] if tail == last);
        let walk = if explicit_close {
            &hops[..hops.len() - 1]
        } else {
            hops
        };
        let carries_user_id = residual.self_signature(target, user_id).is_some();

        let mut closing = walk.len() == 1;
        let mut complete = true;
        let edges = walk.len() - 1;
        for (index, pair) in walk.windows(2).enumerate() {
            let (issuer, next) = (&pair[0], &pair[1]);
            let remaining = edges - index - 1;
            let last = remaining == 0;

            let mut component = None;
            if last && !explicit_close {
                component = self.best_component(&residual, issuer, next, user_id, true, 0);
            }
            if component.is_none() && (!last || explicit_close || carries_user_id) {
                let after = remaining.max(1);
                component = self.best_component(&residual, issuer, next, user_id, false, after);
                closing = last && component.is_some();
            }

            let Some(component) = component else {
                let wanted = if last && !explicit_close {
                    format!("certification of {user_id:?}")
                } else {
                    format!("delegation with depth {}", remaining.max(1))
                };
                reasons.push(format!("no usable {wanted} from {issuer} to {next}"));
                complete = false;
                break;
            };
            if let Err(e) = path.append(component.clone()) {
                reasons.push(e.to_string());
                complete = false;
                break;
            }
        }

        if closing && complete {
            match residual.self_signature(target, user_id) {
                Some(self_signature) => {
                    if let Err(e) = path.append(self_signature) {
                        reasons.push(e.to_string());
                    }
                }
                None => reasons.push(format!("{target} does not carry user-id {user_id:?}")),
            }
        }

        if !reasons.is_empty() {
            return Ok(PathVerdict::Rejected { reasons });
        }
        let amount = path
            .edges()
            .iter()
            .map(|component| residual.effective_trust_amount(component))
            .min()
            .unwrap_or(FULLY_TRUSTED);
        Ok(PathVerdict::Verified { path, amount })
    }

    /// The strongest component from `issuer` to `next` that may be followed
    /// by `after` more hops and whose scope admits `user_id`. With
    /// `certifies` set, only certifications of `user_id` qualify.
    fn best_component<'n>(
        &'n self,
        residual: &ResidualNetwork<'_>,
        issuer: &Identifier,
        next: &Identifier,
        user_id: &str,
        certifies: bool,
        after: usize,
    ) -> Option<&'n EdgeComponent> {
        let edge = self.network.edge(issuer, next)?;
        let candidates: Vec<&EdgeComponent> = if certifies {
            edge.certifications(user_id).iter().collect()
        } else {
            edge.components().collect()
        };
        candidates
            .into_iter()
            .map(|c| (residual.effective_trust_amount(c), c))
            .filter(|(amount, _)| *amount > 0)
            .filter(|(_, c)| {
                self.certification_network
                    || (c.trust_depth().covers(after) && c.regexes().matches(user_id))
            })
            .max_by_key(|(amount, c)| (*amount, c.creation_time()))
            .map(|(_, c)| c)
    }
}

fn matching_user_ids(node: &Node, user_id: &str, email: bool) -> Vec<String> {
    let needle = format!("<{user_id}>");
    node.user_ids()
        .keys()
        .filter(|candidate| {
            if email {
                candidate.contains(&needle)
            } else {
                candidate.as_str() == user_id
            }
        })
        .cloned()
        .collect()
}
