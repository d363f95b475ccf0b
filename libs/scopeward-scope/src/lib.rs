#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Hierarchical permission scopes.
//!
//! Scopes are colon-delimited names (`system:user:read`). Holding a scope
//! grants every scope below it. This crate holds the one hierarchy rule
//! ([`covers`]) and the two operations built on it: [`reduce`] for minimizing
//! a scope set before it is embedded in a token, and [`authorize`] for checking
//! a token's scopes against an endpoint's requirements.

pub mod authorize;
pub mod reduce;
pub mod registry;
pub mod scope;

pub use authorize::{authorize, is_satisfied, unsatisfied};
pub use reduce::reduce;
pub use registry::ScopeRegistry;
pub use scope::{Scope, ScopeError, ancestors, covers, depth, is_descendant_of};
