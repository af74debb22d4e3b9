//! CDP protocol domain types.
//!
//! Only the `Runtime` shapes [`crate::helpers`] needs are implemented;
//! full per-domain CDP semantics are out of scope (spec.md section 1).

pub mod runtime;
