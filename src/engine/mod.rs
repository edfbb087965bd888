//! Engine module - the generic integrity-guarded mutation pipeline
//!
//! One engine serves every entity type; behavior differences come entirely
//! from the declarative `EntityDef` tables. A write runs the precheck and
//! the merge before it reaches storage; delete swaps the precheck for the
//! dependency guard.

pub mod depguard;
pub mod merge;
pub mod precheck;
pub mod refs;
pub mod service;

pub use service::MutationService;
