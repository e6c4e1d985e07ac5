//! Web of Trust query engine.
//!
//! This crate provides:
//! - [`Query`]: authenticates a binding by repeated backward propagation
//!   and path suppression over a residual network.
//! - [`ResidualNetwork`]: per-call overlay of root caps and consumed amounts.
//! - [`Path`] and [`Paths`]: trust paths and their contributed amounts.
//! - [`Cost`] and [`PairPriorityQueue`]: the search ordering.

pub mod cost;
pub mod error;
pub mod path;
pub mod query;
pub mod queue;
pub mod residual;

// Re-exports for convenience.
pub use cost::Cost;
pub use error::QueryError;
pub use path::{Path, Paths};
pub use query::Query;
pub use queue::PairPriorityQueue;
pub use residual::ResidualNetwork;
