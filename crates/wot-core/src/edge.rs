use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::depth::TrustDepth;
use crate::error::CoreError;
use crate::node::Node;
use crate::regex_set::RegexSet;
use crate::FULLY_TRUSTED;

/// What an [`EdgeComponent`] vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// Trust in the target certificate as an introducer. Carries no user-id.
    Delegation,
    /// Trust in one specific user-id binding on the target certificate.
    Certification { user_id: String },
}

/// A single verified signature from `issuer` over `target`.
#[derive(Debug, Clone)]
pub struct EdgeComponent {
    issuer: Arc<Node>,
    target: Arc<Node>,
    kind: ComponentKind,
    creation_time: DateTime<Utc>,
    expiration_time: Option<DateTime<Utc>>,
    exportable: bool,
    trust_amount: u8,
    trust_depth: TrustDepth,
    regexes: RegexSet,
}

impl EdgeComponent {
    /// A delegation with full trust amount, depth 0 and no scope restriction.
    pub fn delegation(issuer: Arc<Node>, target: Arc<Node>, creation_time: DateTime<Utc>) -> Self {
        Self::with_kind(issuer, target, ComponentKind::Delegation, creation_time)
    }

    /// A certification of `user_id` with full trust amount, depth 0 and no
    /// scope restriction.
    pub fn certification(
        issuer: Arc<Node>,
        target: Arc<Node>,
        user_id: impl Into<String>,
        creation_time: DateTime<Utc>,
    ) -> Self {
        let kind = ComponentKind::Certification {
            user_id: user_id.into(),
        };
        Self::with_kind(issuer, target, kind, creation_time)
    }

    fn with_kind(
        issuer: Arc<Node>,
        target: Arc<Node>,
        kind: ComponentKind,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            issuer,
            target,
            kind,
            creation_time,
            expiration_time: None,
            exportable: true,
            trust_amount: FULLY_TRUSTED,
            trust_depth: TrustDepth::default(),
            regexes: RegexSet::wildcard(),
        }
    }

    /// Swap in the indexed nodes for the same identifiers.
    pub(crate) fn with_endpoints(mut self, issuer: Arc<Node>, target: Arc<Node>) -> Self {
        self.issuer = issuer;
        self.target = target;
        self
    }

    pub fn with_trust(mut self, amount: u8, depth: TrustDepth) -> Self {
        self.trust_amount = amount;
        self.trust_depth = depth;
        self
    }

    pub fn with_regexes(mut self, regexes: RegexSet) -> Self {
        self.regexes = regexes;
        self
    }

    pub fn with_expiration(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn issuer(&self) -> &Arc<Node> {
        &self.issuer
    }

    pub fn target(&self) -> &Arc<Node> {
        &self.target
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The certified user-id, or `None` for a delegation.
    pub fn user_id(&self) -> Option<&str> {
        match &self.kind {
            ComponentKind::Delegation => None,
            ComponentKind::Certification { user_id } => Some(user_id),
        }
    }

    pub fn is_delegation(&self) -> bool {
        matches!(self.kind, ComponentKind::Delegation)
    }

    /// A certificate certifying one of its own user-ids.
    pub fn is_self_certification(&self) -> bool {
        !self.is_delegation() && self.issuer.identifier() == self.target.identifier()
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.expiration_time
    }

    pub fn exportable(&self) -> bool {
        self.exportable
    }

    pub fn trust_amount(&self) -> u8 {
        self.trust_amount
    }

    pub fn trust_depth(&self) -> TrustDepth {
        self.trust_depth
    }

    pub fn regexes(&self) -> &RegexSet {
        &self.regexes
    }
}

impl fmt::Display for EdgeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.issuer.identifier(),
            self.target.identifier()
        )?;
        if let Some(user_id) = self.user_id() {
            write!(f, " ({user_id})")?;
        }
        write!(f, " [amount {}, depth {}]", self.trust_amount, self.trust_depth)
    }
}

/// All components between one issuer and one target.
///
/// Components are bucketed by datum: one bucket for delegations and one per
/// certified user-id. Within a bucket only the newest components survive;
/// components sharing the newest creation time co-exist.
#[derive(Debug, Clone)]
pub struct Edge {
    issuer: Arc<Node>,
    target: Arc<Node>,
    delegations: Vec<EdgeComponent>,
    certifications: BTreeMap<String, Vec<EdgeComponent>>,
}

impl Edge {
    pub fn new(issuer: Arc<Node>, target: Arc<Node>) -> Self {
        Self {
            issuer,
            target,
            delegations: Vec::new(),
            certifications: BTreeMap::new(),
        }
    }

    pub fn issuer(&self) -> &Arc<Node> {
        &self.issuer
    }

    pub fn target(&self) -> &Arc<Node> {
        &self.target
    }

    /// Merge a component into this edge.
    pub fn add_component(&mut self, component: EdgeComponent) -> Result<(), CoreError> {
        if component.issuer.identifier() != self.issuer.identifier()
            || component.target.identifier() != self.target.identifier()
        {
            return Err(CoreError::ComponentMismatch {
                issuer: component.issuer.identifier().clone(),
                target: component.target.identifier().clone(),
                edge_issuer: self.issuer.identifier().clone(),
                edge_target: self.target.identifier().clone(),
            });
        }

        let bucket = match &component.kind {
            ComponentKind::Delegation => &mut self.delegations,
            ComponentKind::Certification { user_id } => {
                self.certifications.entry(user_id.clone()).or_default()
            }
        };
        merge_most_recent(bucket, component);
        Ok(())
    }

    pub fn delegations(&self) -> &[EdgeComponent] {
        &self.delegations
    }

    pub fn certifications(&self, user_id: &str) -> &[EdgeComponent] {
        self.certifications
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every surviving component: delegations first, then certifications
    /// ordered by user-id.
    pub fn components(&self) -> impl Iterator<Item = &EdgeComponent> {
        self.delegations
            .iter()
            .chain(self.certifications.values().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.delegations.is_empty() && self.certifications.values().all(Vec::is_empty)
    }
}

fn merge_most_recent(bucket: &mut Vec<EdgeComponent>, component: EdgeComponent) {
    let newest = bucket.iter().map(EdgeComponent::creation_time).max();
    match newest {
        Some(newest) if component.creation_time < newest => {}
        Some(newest) if component.creation_time > newest => {
            bucket.clear();
            bucket.push(component);
        }
        _ => bucket.push(component),
    }
}
