//! Type matching and unification over the binding store.
//!
//! The matcher simplifies both sides through the current bindings, then
//! dispatches on the variable/fixed cross-product: two variables merge, a
//! variable against a fixed type assigns after the occurs check, and two
//! fixed types decompose structurally. Matching mutates the store eagerly;
//! there is no backtracking.

use crate::binding::BindingStore;
use crate::constraint::ConstraintKind;
use crate::types::{TypeId, TypeKind};
use std::fmt;

/// Options threaded through a matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Advisory: matchers may park unresolved sub-obligations as deferred
    /// entries instead of propagating ambiguity. No matcher consults the
    /// flag yet; it travels with the pass so future simplifiers can.
    pub generate_constraints_when_ambiguous: bool,
}

/// Failure reasons surfaced by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Structural or name disagreement between two fixed types.
    TypeMismatch { left: TypeKind, right: TypeKind },
    /// A variable would be assigned a type containing itself.
    OccursCheck { id: TypeId, ty: TypeKind },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::TypeMismatch { left, right } => {
                write!(f, "type mismatch between {left} and {right}")
            }
            SolveError::OccursCheck { id, ty } => {
                write!(f, "occurs check failed for {id} in {ty}")
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Outcome of matching two types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The requirement is discharged and the store reflects it.
    Solved,
    /// Not yet resolvable, but not known to fail.
    Ambiguous,
    /// The requirement cannot hold.
    Failure(SolveError),
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, SolveOutcome::Ambiguous)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SolveOutcome::Failure(_))
    }
}

/// Counters collected while constraints are processed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolverTelemetry {
    pub constraints_submitted: usize,
    pub merges_performed: usize,
    pub types_assigned: usize,
    pub constraints_deferred: usize,
}

/// One matching pass borrowing the system's store and telemetry.
#[derive(Debug)]
pub(crate) struct TypeMatcher<'a> {
    bindings: &'a mut BindingStore,
    telemetry: &'a mut SolverTelemetry,
}

impl<'a> TypeMatcher<'a> {
    pub(crate) fn new(
        bindings: &'a mut BindingStore,
        telemetry: &'a mut SolverTelemetry,
    ) -> Self {
        Self {
            bindings,
            telemetry,
        }
    }

    /// Entry point: simplify both sides, then dispatch on what remains.
    pub(crate) fn match_types(
        &mut self,
        left: &TypeKind,
        right: &TypeKind,
        kind: ConstraintKind,
        options: MatchOptions,
    ) -> SolveOutcome {
        let left = self.bindings.simplify(left);
        let right = self.bindings.simplify(right);

        match (left.as_variable(), right.as_variable()) {
            (Some(lv), Some(rv)) => self.match_type_variables(lv, rv, kind),
            (Some(lv), None) => self.match_type_variable_and_fixed(lv, &right, kind),
            (None, Some(rv)) => self.match_type_variable_and_fixed(rv, &left, kind),
            (None, None) => self.match_fixed_types(&left, &right, kind, options),
        }
    }

    /// Both sides are free representatives after simplification.
    fn match_type_variables(
        &mut self,
        a: TypeId,
        b: TypeId,
        kind: ConstraintKind,
    ) -> SolveOutcome {
        if a == b {
            return SolveOutcome::Solved;
        }
        match kind {
            ConstraintKind::Bind => {
                self.bindings.merge(a, b);
                self.telemetry.merges_performed += 1;
                SolveOutcome::Solved
            }
            ConstraintKind::ApplicableFunction => {
                panic!("applicable-function matching cannot relate two type variables")
            }
        }
    }

    /// `variable` is a free representative; `fixed` is simplified and not a
    /// variable.
    fn match_type_variable_and_fixed(
        &mut self,
        variable: TypeId,
        fixed: &TypeKind,
        kind: ConstraintKind,
    ) -> SolveOutcome {
        match kind {
            ConstraintKind::Bind => {
                if fixed.contains_variable(variable) {
                    return SolveOutcome::Failure(SolveError::OccursCheck {
                        id: variable,
                        ty: fixed.clone(),
                    });
                }
                self.bindings.assign(variable, fixed.clone());
                self.telemetry.types_assigned += 1;
                SolveOutcome::Solved
            }
            ConstraintKind::ApplicableFunction => {
                panic!("applicable-function matching has no variable/fixed rule")
            }
        }
    }

    /// Neither side is a variable.
    fn match_fixed_types(
        &mut self,
        left: &TypeKind,
        right: &TypeKind,
        kind: ConstraintKind,
        options: MatchOptions,
    ) -> SolveOutcome {
        match (left, right) {
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => {
                if a == b {
                    SolveOutcome::Solved
                } else {
                    SolveOutcome::Failure(SolveError::TypeMismatch {
                        left: left.clone(),
                        right: right.clone(),
                    })
                }
            }
            (TypeKind::Function { .. }, TypeKind::Function { .. }) => {
                self.match_function_types(left, right, kind, options)
            }
            (TypeKind::Primitive(_), TypeKind::Function { .. })
            | (TypeKind::Function { .. }, TypeKind::Primitive(_)) => {
                SolveOutcome::Failure(SolveError::TypeMismatch {
                    left: left.clone(),
                    right: right.clone(),
                })
            }
            (TypeKind::Variable(_), _) | (_, TypeKind::Variable(_)) => {
                panic!("fixed-type matching received an unresolved type variable")
            }
        }
    }

    /// Matches parameter against parameter and result against result.
    /// Ambiguity accumulates across the two sub-matches; a definite failure
    /// overrides any ambiguity seen so far and short-circuits.
    fn match_function_types(
        &mut self,
        left: &TypeKind,
        right: &TypeKind,
        kind: ConstraintKind,
        options: MatchOptions,
    ) -> SolveOutcome {
        let (
            TypeKind::Function {
                parameter: left_parameter,
                result: left_result,
            },
            TypeKind::Function {
                parameter: right_parameter,
                result: right_result,
            },
        ) = (left, right)
        else {
            panic!("function matching requires two function types")
        };

        let parameter = self.match_types(left_parameter, right_parameter, kind, options);
        if parameter.is_failure() {
            return parameter;
        }
        let result = self.match_types(left_result, right_result, kind, options);
        if result.is_failure() {
            return result;
        }
        if parameter.is_ambiguous() || result.is_ambiguous() {
            SolveOutcome::Ambiguous
        } else {
            SolveOutcome::Solved
        }
    }
}
