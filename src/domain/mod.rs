//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `survey` - Survey nodes, branch evaluation, navigation and submission assembly

pub mod foundation;
pub mod survey;
