//! Successor-variable graph.
//!
//! Each route is encoded as a chain of "next" variables running from a
//! vehicle's start marker through visit nodes to its end marker.

mod domain;
mod index;

pub use domain::Domains;
pub use index::{NextVar, NodeIndex, RouteGraph};
