use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::edge::{Edge, EdgeComponent};
use crate::error::CoreError;
use crate::identifier::Identifier;
use crate::node::Node;

/// Directed multigraph of certificates and the signatures between them,
/// evaluated at a fixed reference time.
///
/// Built once through [`NetworkBuilder`] and read-only afterwards, so it
/// can be shared between any number of concurrent queries.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: BTreeMap<Identifier, Arc<Node>>,
    edges: BTreeMap<(Identifier, Identifier), Arc<Edge>>,
    edges_by_issuer: BTreeMap<Identifier, Vec<Arc<Edge>>>,
    edges_by_target: BTreeMap<Identifier, Vec<Arc<Edge>>>,
    reference_time: DateTime<Utc>,
}

impl Network {
    pub fn builder(reference_time: DateTime<Utc>) -> NetworkBuilder {
        NetworkBuilder::new(reference_time)
    }

    /// A network without nodes or edges.
    pub fn empty(reference_time: DateTime<Utc>) -> Self {
        NetworkBuilder::new(reference_time).build()
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// All nodes, ordered by identifier.
    pub fn nodes(&self) -> &BTreeMap<Identifier, Arc<Node>> {
        &self.nodes
    }

    pub fn node(&self, identifier: &Identifier) -> Option<&Arc<Node>> {
        self.nodes.get(identifier)
    }

    pub fn edge(&self, issuer: &Identifier, target: &Identifier) -> Option<&Arc<Edge>> {
        self.edges.get(&(issuer.clone(), target.clone()))
    }

    /// Edges issued by `issuer`, ordered by target.
    pub fn edges_from(&self, issuer: &Identifier) -> &[Arc<Edge>] {
        self.edges_by_issuer
            .get(issuer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges pointing at `target`, ordered by issuer.
    pub fn edges_to(&self, target: &Identifier) -> &[Arc<Edge>] {
        self.edges_by_target
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Incremental construction of a [`Network`].
#[derive(Debug)]
pub struct NetworkBuilder {
    reference_time: DateTime<Utc>,
    nodes: BTreeMap<Identifier, Arc<Node>>,
    edges: BTreeMap<(Identifier, Identifier), Edge>,
}

impl NetworkBuilder {
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        Self {
            reference_time,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    /// Index a node. The first node seen for an identifier wins; the
    /// indexed node is returned either way.
    pub fn add_node(&mut self, node: Node) -> Arc<Node> {
        if let Some(existing) = self.nodes.get(node.identifier()) {
            tracing::debug!(identifier = %node.identifier(), "ignoring duplicate certificate");
            return existing.clone();
        }
        let node = Arc::new(node);
        self.nodes.insert(node.identifier().clone(), node.clone());
        node
    }

    pub fn node(&self, identifier: &Identifier) -> Option<Arc<Node>> {
        self.nodes.get(identifier).cloned()
    }

    /// Merge a component into the edge between its issuer and target.
    /// Endpoints that were never indexed are indexed on the fly; the stored
    /// component always points at the indexed nodes.
    pub fn add_component(&mut self, component: EdgeComponent) -> Result<&mut Self, CoreError> {
        let issuer = self.index(component.issuer());
        let target = self.index(component.target());
        let component = component.with_endpoints(issuer.clone(), target.clone());
        let key = (issuer.identifier().clone(), target.identifier().clone());
        self.edges
            .entry(key)
            .or_insert_with(|| Edge::new(issuer, target))
            .add_component(component)?;
        Ok(self)
    }

    fn index(&mut self, node: &Arc<Node>) -> Arc<Node> {
        self.nodes
            .entry(node.identifier().clone())
            .or_insert_with(|| node.clone())
            .clone()
    }

    pub fn build(self) -> Network {
        let mut edges = BTreeMap::new();
        let mut edges_by_issuer: BTreeMap<Identifier, Vec<Arc<Edge>>> = BTreeMap::new();
        let mut edges_by_target: BTreeMap<Identifier, Vec<Arc<Edge>>> = BTreeMap::new();

        for (key, edge) in self.edges {
            if edge.is_empty() {
                continue;
            }
            let edge = Arc::new(edge);
            edges_by_issuer
                .entry(key.0.clone())
                .or_default()
                .push(edge.clone());
            edges_by_target
                .entry(key.1.clone())
                .or_default()
                .push(edge.clone());
            edges.insert(key, edge);
        }

        tracing::debug!(
            nodes = self.nodes.len(),
            edges = edges.len(),
            reference_time = %self.reference_time,
            "built trust network"
        );

        Network {
            nodes: self.nodes,
            edges,
            edges_by_issuer,
            edges_by_target,
            reference_time: self.reference_time,
        }
    }
}
