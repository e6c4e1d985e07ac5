use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use wot_core::{EdgeComponent, Identifier, Network, Node, Roots, FULLY_TRUSTED};

use crate::cost::Cost;
use crate::error::QueryError;
use crate::path::{Path, Paths};
use crate::queue::PairPriorityQueue;
use crate::residual::ResidualNetwork;

/// Best known continuation from a certificate towards the target binding.
#[derive(Debug, Clone)]
struct ForwardPointer {
    cost: Cost,
    /// `None` only for the target itself when it has no usable
    /// self-signature.
    next: Option<EdgeComponent>,
}

/// Authenticates bindings against a fixed network and set of roots.
///
/// A query holds no mutable state of its own; every call works on a fresh
/// [`ResidualNetwork`], so one query may serve many calls.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    network: &'a Network,
    roots: &'a Roots,
    certification_network: bool,
}

impl<'a> Query<'a> {
    /// In a certification network every edge acts as an unconstrained,
    /// unscoped delegation and roots are never capped.
    pub fn new(network: &'a Network, roots: &'a Roots, certification_network: bool) -> Self {
        Self {
            network,
            roots,
            certification_network,
        }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn roots(&self) -> &'a Roots {
        self.roots
    }

    pub fn is_certification_network(&self) -> bool {
        self.certification_network
    }

    /// Collect paths from the roots to the binding `(target, user_id)`
    /// until their combined amount reaches `required_amount` or no further
    /// path exists.
    ///
    /// Each round runs a backward propagation over the residual network,
    /// picks the root path with the highest amount (then the fewest hops,
    /// then the lowest root identifier) and suppresses its amount before
    /// the next round.
    pub fn authenticate(
        &self,
        target: &Identifier,
        user_id: &str,
        required_amount: u32,
    ) -> Result<Paths, QueryError> {
        tracing::debug!(target_cert = %target, user_id, required_amount, "authenticating binding");

        let mut residual = self.residual_network();
        let mut paths = Paths::new();
        let mut round = 0usize;

        while paths.amount() < required_amount {
            round += 1;
            let candidates = self.propagate(&residual, target, user_id)?;
            let Some((path, amount)) = self.select_best(candidates) else {
                tracing::debug!(round, "no further path");
                break;
            };

            tracing::debug!(
                round,
                root = %path.root().identifier(),
                amount,
                length = path.len(),
                "selected path"
            );
            residual.suppress_path(&path, amount)?;
            paths.add(path, amount)?;
        }

        tracing::debug!(
            target_cert = %target,
            user_id,
            amount = paths.amount(),
            paths = paths.len(),
            "authentication finished"
        );
        Ok(paths)
    }

    /// A single backward propagation from the binding.
    ///
    /// Returns, for every certificate from which the binding is reachable,
    /// the best path and its amount. When roots are configured only roots
    /// are reported.
    pub fn backward_propagate(
        &self,
        target: &Identifier,
        user_id: &str,
    ) -> Result<BTreeMap<Identifier, (Path, u8)>, QueryError> {
        let residual = self.residual_network();
        self.propagate(&residual, target, user_id)
    }

    /// A fresh residual network with every partially trusted root capped
    /// to its amount, except in certification networks.
    pub fn residual_network(&self) -> ResidualNetwork<'a> {
        let mut residual = ResidualNetwork::new(self.network, self.certification_network);
        if !self.certification_network {
            for root in self.roots.iter().filter(|root| !root.is_fully_trusted()) {
                residual.cap_certificate(root.identifier.clone(), root.amount);
            }
        }
        residual
    }

    fn select_best(&self, candidates: BTreeMap<Identifier, (Path, u8)>) -> Option<(Path, u8)> {
        candidates
            .into_iter()
            .filter(|(root, (_, amount))| *amount > 0 && self.roots.is_root(root))
            .max_by(|(a_root, (a_path, a_amount)), (b_root, (b_path, b_amount))| {
                a_amount
                    .cmp(b_amount)
                    .then_with(|| b_path.len().cmp(&a_path.len()))
                    .then_with(|| b_root.cmp(a_root))
            })
            .map(|(_, candidate)| candidate)
    }

    fn propagate(
        &self,
        residual: &ResidualNetwork<'a>,
        target: &Identifier,
        user_id: &str,
    ) -> Result<BTreeMap<Identifier, (Path, u8)>, QueryError> {
        let Some(target_node) = residual.valid_target(target, user_id) else {
            return Ok(BTreeMap::new());
        };
        let target = target_node.identifier();

        let seed = residual
            .self_signature(target, user_id)
            .map(|sig| (residual.effective_trust_amount(&sig), sig))
            .filter(|(amount, _)| *amount > 0)
            .map(|(amount, sig)| ForwardPointer {
                cost: Cost::new(1, amount),
                next: Some(sig),
            })
            .unwrap_or(ForwardPointer {
                cost: Cost::new(0, FULLY_TRUSTED),
                next: None,
            });

        let mut pointers: BTreeMap<Identifier, ForwardPointer> = BTreeMap::new();
        let mut queue = PairPriorityQueue::new();
        let mut visited: HashSet<Identifier> = HashSet::new();
        queue.insert_or_update(target.clone(), seed.cost);
        pointers.insert(target.clone(), seed);

        while let Some((signee, signee_cost)) = queue.pop() {
            visited.insert(signee.clone());

            // Fully trusted roots end a path; nothing beyond them matters.
            if self.roots.is_fully_trusted(&signee) {
                continue;
            }

            let min_depth = signee_cost.length.saturating_sub(1);
            for component in residual.certifications_for_signee(&signee, user_id, min_depth) {
                let issuer = component.issuer().identifier();
                if visited.contains(issuer) {
                    continue;
                }
                let amount = residual.effective_trust_amount(component);
                if amount == 0 {
                    continue;
                }

                let certifies_binding = signee == *target && component.user_id() == Some(user_id);
                let candidate = if certifies_binding {
                    Cost::new(1, amount)
                } else {
                    // Without a self-signature the first hop has to certify
                    // the binding itself.
                    if signee == *target && signee_cost.length == 0 {
                        continue;
                    }
                    if !self.certification_network
                        && !component.trust_depth().covers(signee_cost.length)
                    {
                        continue;
                    }
                    signee_cost.extend_by(amount)
                };

                let improves = pointers
                    .get(issuer)
                    .map_or(true, |known| candidate < known.cost);
                if improves {
                    pointers.insert(
                        issuer.clone(),
                        ForwardPointer {
                            cost: candidate,
                            next: Some(component.clone()),
                        },
                    );
                    queue.insert_or_update(issuer.clone(), candidate);
                }
            }
        }

        let mut results = BTreeMap::new();
        for (issuer, pointer) in &pointers {
            let Some(next) = &pointer.next else {
                continue;
            };
            if !self.roots.is_empty() && !self.roots.is_root(issuer) {
                continue;
            }
            let path = self.assemble_path(&pointers, next.issuer().clone(), target, user_id)?;
            results.insert(issuer.clone(), (path, pointer.cost.amount));
        }

        tracing::trace!(
            target_cert = %target,
            discovered = pointers.len(),
            reported = results.len(),
            "backward propagation finished"
        );
        Ok(results)
    }

    fn assemble_path(
        &self,
        pointers: &BTreeMap<Identifier, ForwardPointer>,
        root: Arc<Node>,
        target: &Identifier,
        user_id: &str,
    ) -> Result<Path, QueryError> {
        let mut current = root.identifier().clone();
        let mut path = if self.certification_network {
            Path::unconstrained(root)
        } else {
            Path::new(root)
        }
        .for_user_id(user_id);

        loop {
            let next = pointers
                .get(&current)
                .and_then(|pointer| pointer.next.clone())
                .ok_or_else(|| QueryError::BrokenChain {
                    identifier: current.clone(),
                })?;
            let completes =
                next.target().identifier() == target && next.user_id() == Some(user_id);
            current = next.target().identifier().clone();
            path.append(next)?;
            if completes {
                return Ok(path);
            }
        }
    }
}
