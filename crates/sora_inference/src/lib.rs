//! sora_inference - Constraint-based type inference core for the sora language.
//!
//! The crate hosts the constraint system that assigns types to sora
//! expression trees: type variables are allocated per expression, equality
//! constraints are solved eagerly against a union-find binding store, and the
//! result is projected back onto the AST through node identities. The AST
//! definitions live in `sora_ast`; constraint generation lives in the checker
//! crate on top of the [`system::ConstraintSystem`] façade.

pub mod binding;
pub mod constraint;
pub mod solver;
pub mod system;
pub mod types;

pub use binding::{Binding, BindingStore};
pub use constraint::{Constraint, ConstraintEntry, ConstraintKind, ConstraintSet, Solution};
pub use solver::{MatchOptions, SolveError, SolveOutcome, SolverTelemetry};
pub use system::{ConstraintSystem, TypedNode};
pub use types::{TypeId, TypeKind};
