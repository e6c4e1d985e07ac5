//! Shared fixtures for the integration tests.
//!
//! [`NetworkFixture`] builds networks directly, without going through the
//! certificate collaborator, and the `*_network` functions below assemble
//! the reference topologies the test suites run against.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use wot_core::{
    CoreError, EdgeComponent, Identifier, Network, NetworkBuilder, Node, RegexSet, TrustDepth,
};

pub const ALICE: &str = "A11CE";
pub const BOB: &str = "B0B";
pub const CAROL: &str = "CA401";
pub const DAVE: &str = "DA7E";
pub const ED: &str = "ED";
pub const FRANK: &str = "F4A4C";
pub const TARGET: &str = "7A46E7";
pub const Y: &str = "E1";
pub const Z: &str = "E2";

pub const ALICE_UID: &str = "Alice <alice@example.org>";
pub const BOB_UID: &str = "Bob <bob@example.org>";
pub const CAROL_UID: &str = "Carol <carol@example.org>";
pub const DAVE_UID: &str = "Dave <dave@example.org>";
pub const ED_UID: &str = "Ed <ed@example.org>";
pub const FRANK_UID: &str = "Frank <frank@other.org>";
pub const TARGET_UID: &str = "Target <target@example.org>";

/// The time every fixture network is evaluated at.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// `days` relative to [`reference_time`].
pub fn day(days: i64) -> DateTime<Utc> {
    reference_time() + Duration::days(days)
}

pub fn id(fingerprint: &str) -> Identifier {
    Identifier::new(fingerprint)
}

/// Builds a network from plain components. Endpoints that were not
/// declared with [`NetworkFixture::node`] are created without user-ids.
pub struct NetworkFixture {
    builder: NetworkBuilder,
    components: Vec<EdgeComponent>,
    creation_time: DateTime<Utc>,
}

impl NetworkFixture {
    pub fn new() -> Self {
        Self::at(reference_time())
    }

    pub fn at(reference_time: DateTime<Utc>) -> Self {
        Self {
            builder: Network::builder(reference_time),
            components: Vec::new(),
            creation_time: reference_time - Duration::days(30),
        }
    }

    pub fn node(self, fingerprint: &str, user_ids: &[&str]) -> Self {
        let node = user_ids
            .iter()
            .fold(Node::new(fingerprint), |node, uid| node.with_user_id(*uid));
        self.add_node(node)
    }

    pub fn add_node(mut self, node: Node) -> Self {
        self.builder.add_node(node);
        self
    }

    /// `issuer` certifies `user_id` on `target` with a trust signature.
    pub fn certify(self, issuer: &str, target: &str, user_id: &str, amount: u8, depth: u8) -> Self {
        let created = self.creation_time;
        self.component(issuer, target, |i, t| {
            EdgeComponent::certification(i, t, user_id, created)
                .with_trust(amount, TrustDepth::auto(depth))
        })
    }

    /// Like [`NetworkFixture::certify`] but scoped to `regexes`.
    pub fn certify_scoped(
        self,
        issuer: &str,
        target: &str,
        user_id: &str,
        amount: u8,
        depth: u8,
        regexes: &[&str],
    ) -> Self {
        let created = self.creation_time;
        self.component(issuer, target, |i, t| {
            EdgeComponent::certification(i, t, user_id, created)
                .with_trust(amount, TrustDepth::auto(depth))
                .with_regexes(RegexSet::new(regexes.iter().copied()))
        })
    }

    /// `issuer` delegates to `target` with a direct-key trust signature.
    pub fn delegate(self, issuer: &str, target: &str, amount: u8, depth: u8) -> Self {
        let created = self.creation_time;
        self.component(issuer, target, |i, t| {
            EdgeComponent::delegation(i, t, created).with_trust(amount, TrustDepth::auto(depth))
        })
    }

    pub fn component(
        mut self,
        issuer: &str,
        target: &str,
        make: impl FnOnce(Arc<Node>, Arc<Node>) -> EdgeComponent,
    ) -> Self {
        let issuer = self.endpoint(issuer);
        let target = self.endpoint(target);
        self.components.push(make(issuer, target));
        self
    }

    pub fn build(mut self) -> Result<Network, CoreError> {
        for component in std::mem::take(&mut self.components) {
            self.builder.add_component(component)?;
        }
        Ok(self.builder.build())
    }

    fn endpoint(&mut self, fingerprint: &str) -> Arc<Node> {
        let identifier = id(fingerprint);
        match self.builder.node(&identifier) {
            Some(node) => node,
            None => self.builder.add_node(Node::new(identifier)),
        }
    }
}

impl Default for NetworkFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A straight chain with shrinking depth:
///
/// ```text
/// Alice -(100/2)-> Bob -(100/1)-> Carol -(100/1)-> Dave -(100/1)-> Ed
/// ```
///
/// Frank is not connected to anyone.
pub fn simple_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_UID])
        .node(CAROL, &[CAROL_UID])
        .node(DAVE, &[DAVE_UID])
        .node(ED, &[ED_UID])
        .node(FRANK, &[FRANK_UID])
        .certify(ALICE, BOB, BOB_UID, 100, 2)
        .certify(BOB, CAROL, CAROL_UID, 100, 1)
        .certify(CAROL, DAVE, DAVE_UID, 100, 1)
        .certify(DAVE, ED, ED_UID, 100, 1)
        .build()
}

/// Bob, Carol and Dave form a ring of unconstrained introducers:
///
/// ```text
/// Alice -(120/3)-> Bob -(90/255)-> Carol -(60/255)-> Dave -(120/255)-> Bob
/// Dave -(30/1)-> Ed -(120/0)-> Frank
/// ```
pub fn cycle_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_UID])
        .node(CAROL, &[CAROL_UID])
        .node(DAVE, &[DAVE_UID])
        .node(ED, &[ED_UID])
        .node(FRANK, &[FRANK_UID])
        .certify(ALICE, BOB, BOB_UID, 120, 3)
        .certify(BOB, CAROL, CAROL_UID, 90, 255)
        .certify(CAROL, DAVE, DAVE_UID, 60, 255)
        .certify(DAVE, BOB, BOB_UID, 120, 255)
        .certify(DAVE, ED, ED_UID, 30, 1)
        .certify(ED, FRANK, FRANK_UID, 120, 0)
        .build()
}

/// Two routes from Alice to the target, one strong and one weak:
///
/// ```text
/// Alice -(120/10)-> Bob -(120/10)-> Carol -(120/10)-> Target
/// Alice  -(50/10)->  Y   -(50/10)->  Z    -(50/10)->  Target
/// ```
pub fn best_via_root_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_UID])
        .node(CAROL, &[CAROL_UID])
        .node(Y, &["Y <y@example.org>"])
        .node(Z, &["Z <z@example.org>"])
        .node(TARGET, &[TARGET_UID])
        .certify(ALICE, BOB, BOB_UID, 120, 10)
        .certify(BOB, CAROL, CAROL_UID, 120, 10)
        .certify(CAROL, TARGET, TARGET_UID, 120, 10)
        .certify(ALICE, Y, "Y <y@example.org>", 50, 10)
        .certify(Y, Z, "Z <z@example.org>", 50, 10)
        .certify(Z, TARGET, TARGET_UID, 50, 10)
        .build()
}

/// Scoped introducers:
///
/// ```text
/// Alice -(100/3, example.org)-> Bob -(120/0)-> Carol
///                               Bob -(100/3, other.org)-> Dave -(120/0)-> Ed, Frank
/// ```
pub fn regex_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_UID])
        .node(CAROL, &[CAROL_UID])
        .node(DAVE, &[DAVE_UID])
        .node(ED, &[ED_UID])
        .node(FRANK, &[FRANK_UID])
        .certify_scoped(ALICE, BOB, BOB_UID, 100, 3, &[r"<[^>]+[@.]example\.org>$"])
        .certify(BOB, CAROL, CAROL_UID, 120, 0)
        .certify_scoped(BOB, DAVE, DAVE_UID, 100, 3, &[r"<[^>]+[@.]other\.org>$"])
        .certify(DAVE, ED, ED_UID, 120, 0)
        .certify(DAVE, FRANK, FRANK_UID, 120, 0)
        .build()
}

pub const BOB_SOME_ORG: &str = "Bob <bob@some.org>";
pub const BOB_OTHER_ORG: &str = "Bob <bob@other.org>";

/// Alice certifies two of Bob's user-ids with different trust:
///
/// ```text
/// Alice -(50/2, bob@some.org)-> Bob -(120/2)-> Carol -(120/0)-> Dave
/// Alice -(70/1, bob@other.org)-> Bob
/// ```
pub fn multiple_user_ids_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_SOME_ORG, BOB_OTHER_ORG])
        .node(CAROL, &[CAROL_UID])
        .node(DAVE, &[DAVE_UID])
        .certify(ALICE, BOB, BOB_SOME_ORG, 50, 2)
        .certify(ALICE, BOB, BOB_OTHER_ORG, 70, 1)
        .certify(BOB, CAROL, CAROL_UID, 120, 2)
        .certify(CAROL, DAVE, DAVE_UID, 120, 0)
        .build()
}

/// Two independent introducers for Dave:
///
/// ```text
/// Alice -(120/2)-> Bob -(60/1)-> Dave
/// Alice  -(30/2)-> Carol -(120/1)-> Dave
/// ```
pub fn two_introducers_network() -> Result<Network, CoreError> {
    NetworkFixture::new()
        .node(ALICE, &[ALICE_UID])
        .node(BOB, &[BOB_UID])
        .node(CAROL, &[CAROL_UID])
        .node(DAVE, &[DAVE_UID])
        .certify(ALICE, BOB, BOB_UID, 120, 2)
        .certify(BOB, DAVE, DAVE_UID, 60, 1)
        .certify(ALICE, CAROL, CAROL_UID, 30, 2)
        .certify(CAROL, DAVE, DAVE_UID, 120, 1)
        .build()
}
