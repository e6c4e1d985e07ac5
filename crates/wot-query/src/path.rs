use std::fmt;
use std::sync::Arc;

use wot_core::{EdgeComponent, Identifier, Node, TrustDepth, FULLY_TRUSTED};

use crate::error::QueryError;

/// An ordered walk from a root certificate to a target.
///
/// The amount of a path is the minimum trust amount over its edges. The
/// residual depth is how many more hops the path may be extended by.
#[derive(Debug, Clone)]
pub struct Path {
    root: Arc<Node>,
    edges: Vec<EdgeComponent>,
    residual_depth: TrustDepth,
    certification_network: bool,
    user_id: Option<String>,
}

impl Path {
    /// A path consisting only of `root`.
    pub fn new(root: Arc<Node>) -> Self {
        Self {
            root,
            edges: Vec::new(),
            residual_depth: TrustDepth::unconstrained(),
            certification_network: false,
            user_id: None,
        }
    }

    /// A path that ignores trust depth, used in certification networks.
    pub fn unconstrained(root: Arc<Node>) -> Self {
        Self {
            certification_network: true,
            ..Self::new(root)
        }
    }

    /// Bind the path to the user-id it authenticates. A self-certification
    /// closing the path must then certify exactly that user-id.
    pub fn for_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The user-id this path authenticates, if bound.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// The last certificate on the path.
    pub fn target(&self) -> &Arc<Node> {
        self.edges
            .last()
            .map(EdgeComponent::target)
            .unwrap_or(&self.root)
    }

    pub fn edges(&self) -> &[EdgeComponent] {
        &self.edges
    }

    /// Number of certificates on the path, the root included.
    pub fn len(&self) -> usize {
        self.edges.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn residual_depth(&self) -> TrustDepth {
        self.residual_depth
    }

    pub fn amount(&self) -> u8 {
        self.edges
            .iter()
            .map(EdgeComponent::trust_amount)
            .min()
            .unwrap_or(FULLY_TRUSTED)
    }

    /// Certificates visited by the path, root first.
    pub fn certificates(&self) -> impl Iterator<Item = &Arc<Node>> {
        std::iter::once(&self.root).chain(self.edges.iter().map(EdgeComponent::target))
    }

    pub fn identifiers(&self) -> Vec<Identifier> {
        self.certificates()
            .map(|node| node.identifier().clone())
            .collect()
    }

    /// Extend the path by one edge.
    ///
    /// A certificate may appear twice only when the new edge is a
    /// self-certification closing onto the current tail, the previous edge
    /// is not one already and, for a bound path, it certifies the bound
    /// user-id.
    pub fn append(&mut self, component: EdgeComponent) -> Result<(), QueryError> {
        let tail = self.target().identifier();
        if component.issuer().identifier() != tail {
            return Err(QueryError::NotChained {
                tail: tail.clone(),
                issuer: component.issuer().identifier().clone(),
            });
        }

        let next = component.target().identifier();
        let revisits = self.certificates().any(|node| node.identifier() == next);
        let closes_on_tail = component.is_self_certification()
            && !self.edges.last().is_some_and(EdgeComponent::is_self_certification)
            && self
                .user_id
                .as_deref()
                .map_or(true, |user_id| component.user_id() == Some(user_id));
        if revisits && !closes_on_tail {
            return Err(QueryError::CyclicPath {
                identifier: next.clone(),
            });
        }

        if !self.certification_network {
            let reduced = self.residual_depth.reduce(1)?;
            self.residual_depth = component.trust_depth().min(reduced);
        }
        self.edges.push(component);
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self
            .certificates()
            .map(|node| node.identifier().to_string())
            .collect();
        write!(f, "[{}] amount {}", ids.join(" -> "), self.amount())
    }
}

/// A set of paths together with the amount each one contributes.
#[derive(Debug, Clone, Default)]
pub struct Paths {
    items: Vec<(Path, u8)>,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` contributing `amount`, which may not exceed the
    /// path's own amount.
    pub fn add(&mut self, path: Path, amount: u8) -> Result<(), QueryError> {
        let capacity = path.amount();
        if amount > capacity {
            return Err(QueryError::AmountExceedsCapacity { amount, capacity });
        }
        self.items.push((path, amount));
        Ok(())
    }

    /// Total amount over all paths.
    pub fn amount(&self) -> u32 {
        self.items.iter().map(|(_, amount)| u32::from(*amount)).sum()
    }

    /// Paths in the order they were added, with their contributed amounts.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, u8)> {
        self.items.iter().map(|(path, amount)| (path, *amount))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
