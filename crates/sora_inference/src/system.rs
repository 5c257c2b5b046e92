//! Constraint-system façade owning the binding store, the AST-type map, and
//! the deferred constraint queue.
//!
//! External code allocates one type variable per expression, submits
//! constraints derived from expression shapes, and reads the result back
//! through [`ConstraintSystem::normalize`] and
//! [`ConstraintSystem::current_solution`]. Constraints solve eagerly on
//! submission; the first failing submission stays queryable afterwards.

use crate::binding::BindingStore;
use crate::constraint::{Constraint, ConstraintEntry, ConstraintKind, ConstraintSet, Solution};
use crate::solver::{MatchOptions, SolveOutcome, SolverTelemetry, TypeMatcher};
use crate::types::{TypeId, TypeKind};
use rustc_hash::FxHashMap;
use sora_ast::{Expression, FunctionDeclaration, NodeId};

/// Contract an AST node satisfies to participate in inference: a stable
/// identity usable as a map key, plus the node's own type when the source
/// carries one.
pub trait TypedNode {
    /// Stable identity of the node. Must not change for the lifetime of the
    /// constraint system.
    fn node_id(&self) -> NodeId;

    /// The node's intrinsic type: the declared expression type for
    /// expression nodes, the interface type for context nodes.
    fn intrinsic_type(&self) -> Option<TypeKind>;
}

impl TypedNode for Expression {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn intrinsic_type(&self) -> Option<TypeKind> {
        self.type_annotation().map(TypeKind::from)
    }
}

impl TypedNode for FunctionDeclaration {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn intrinsic_type(&self) -> Option<TypeKind> {
        self.interface_type()
            .map(|annotation| TypeKind::from(&annotation))
    }
}

/// Owner of all inference state for one program.
#[derive(Debug, Default)]
pub struct ConstraintSystem {
    bindings: BindingStore,
    node_types: FxHashMap<NodeId, TypeKind>,
    deferred: ConstraintSet,
    failed: Option<ConstraintEntry>,
    telemetry: SolverTelemetry,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh type variable.
    pub fn create_type_variable(&mut self) -> TypeId {
        self.bindings.allocate()
    }

    /// Allocates a fresh type variable and records it as `node`'s AST type.
    pub fn create_type_variable_for(&mut self, node: &impl TypedNode) -> TypeId {
        let id = self.bindings.allocate();
        self.node_types.insert(node.node_id(), TypeKind::Variable(id));
        id
    }

    /// Type currently associated with `node`: the AST-type map entry when one
    /// exists, otherwise the node's intrinsic type.
    pub fn ast_type(&self, node: &impl TypedNode) -> Option<TypeKind> {
        self.node_types
            .get(&node.node_id())
            .cloned()
            .or_else(|| node.intrinsic_type())
    }

    /// Inserts or overwrites the AST-type entry for `node`.
    pub fn set_ast_type(&mut self, node: &impl TypedNode, ty: TypeKind) {
        self.node_types.insert(node.node_id(), ty);
    }

    /// Submits a constraint and solves it eagerly. Bind constraints resolve
    /// immediately against the store; applicable-function constraints have no
    /// simplifier yet and abort as a contract violation. Every solve outcome
    /// is returned to the caller; only the first failure is durably recorded.
    /// A top-level ambiguous resolution is caller misuse and aborts.
    pub fn add_constraint(&mut self, constraint: Constraint) -> SolveOutcome {
        let index = self.next_submission_index();
        match constraint.kind() {
            ConstraintKind::Bind => {
                let options = MatchOptions {
                    generate_constraints_when_ambiguous: true,
                };
                let outcome = TypeMatcher::new(&mut self.bindings, &mut self.telemetry)
                    .match_types(
                        constraint.left(),
                        constraint.right(),
                        ConstraintKind::Bind,
                        options,
                    );
                match &outcome {
                    SolveOutcome::Failure(_) => {
                        if self.failed.is_none() {
                            self.failed = Some(ConstraintEntry::new(index, constraint));
                        }
                    }
                    SolveOutcome::Ambiguous => {
                        panic!("top-level constraints must not resolve ambiguously")
                    }
                    SolveOutcome::Solved => {}
                }
                outcome
            }
            ConstraintKind::ApplicableFunction => {
                panic!("applicable-function constraints have no simplifier")
            }
        }
    }

    /// Low-level hook: appends an entry to the deferred queue without
    /// attempting to solve it. Matchers that park sub-obligations go through
    /// here.
    pub fn defer_constraint(&mut self, constraint: Constraint) {
        let index = self.next_submission_index();
        self.push_deferred(ConstraintEntry::new(index, constraint));
    }

    fn next_submission_index(&mut self) -> usize {
        let index = self.telemetry.constraints_submitted;
        self.telemetry.constraints_submitted += 1;
        index
    }

    fn push_deferred(&mut self, entry: ConstraintEntry) {
        self.telemetry.constraints_deferred += 1;
        self.deferred.push(entry);
    }

    /// Entries parked for a future solving pass, in submission order.
    pub fn deferred_constraints(&self) -> &ConstraintSet {
        &self.deferred
    }

    /// First constraint whose submission failed, if any. Later failures are
    /// reported to their callers but never displace this entry.
    pub fn failed_constraint(&self) -> Option<&ConstraintEntry> {
        self.failed.as_ref()
    }

    /// Rewrites every AST-type entry to its simplified form.
    pub fn normalize(&mut self) {
        for ty in self.node_types.values_mut() {
            *ty = self.bindings.simplify(ty);
        }
    }

    /// True when every allocated variable resolves to a fixed type through
    /// its transfer chain.
    pub fn all_variables_resolved(&self) -> bool {
        self.bindings.all_fixed()
    }

    /// Allocated type variables in allocation order.
    pub fn type_variables(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.bindings.variables()
    }

    /// Read access to the live binding store.
    pub fn bindings(&self) -> &BindingStore {
        &self.bindings
    }

    /// Counters for the work performed so far.
    pub fn telemetry(&self) -> &SolverTelemetry {
        &self.telemetry
    }

    /// Copies the bindings and the AST-type map into an immutable snapshot.
    pub fn current_solution(&self) -> Solution {
        Solution::new(self.bindings.clone(), self.node_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveError;

    /// Bare node with no intrinsic type, standing in for an unannotated
    /// expression.
    struct BareNode(NodeId);

    impl TypedNode for BareNode {
        fn node_id(&self) -> NodeId {
            self.0
        }

        fn intrinsic_type(&self) -> Option<TypeKind> {
            None
        }
    }

    /// Node carrying a declared type, standing in for an annotated context.
    struct DeclaredNode(NodeId, TypeKind);

    impl TypedNode for DeclaredNode {
        fn node_id(&self) -> NodeId {
            self.0
        }

        fn intrinsic_type(&self) -> Option<TypeKind> {
            Some(self.1.clone())
        }
    }

    #[test]
    fn binding_two_fresh_variables_merges_into_the_first() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        let outcome = system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::Variable(v2),
        ));
        assert!(outcome.is_solved());
        assert_eq!(system.bindings().representative(v1), v1);
        assert_eq!(system.bindings().representative(v2), v1);
        assert_eq!(system.bindings().fixed_type(v1), None);
        assert_eq!(system.bindings().fixed_type(v2), None);
    }

    #[test]
    fn transitive_binds_share_the_minimum_id_representative() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();
        let v3 = system.create_type_variable();

        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v3),
            TypeKind::Variable(v1),
        ));
        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v2),
            TypeKind::Variable(v3),
        ));

        for id in [v1, v2, v3] {
            assert_eq!(system.bindings().representative(id), v1);
            assert_eq!(system.bindings().fixed_type(id), None);
        }
    }

    #[test]
    fn binding_a_variable_to_a_primitive_fixes_it() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();

        let outcome = system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::primitive("Int"),
        ));
        assert!(outcome.is_solved());
        assert_eq!(
            system.bindings().fixed_type(v1),
            Some(TypeKind::primitive("Int"))
        );
        assert_eq!(
            system.bindings().simplify(&TypeKind::Variable(v1)),
            TypeKind::primitive("Int")
        );
        assert!(system.all_variables_resolved());
    }

    #[test]
    fn recursive_bind_fails_the_occurs_check_and_is_recorded() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();

        let outcome = system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::function(TypeKind::Variable(v1), TypeKind::primitive("Int")),
        ));
        assert!(matches!(
            outcome,
            SolveOutcome::Failure(SolveError::OccursCheck { .. })
        ));

        let failed = system.failed_constraint().expect("failure must be recorded");
        assert_eq!(failed.index, 0);
        assert_eq!(failed.constraint.kind(), ConstraintKind::Bind);
    }

    #[test]
    fn only_the_first_failure_is_remembered() {
        let mut system = ConstraintSystem::new();

        system.add_constraint(Constraint::bind(
            TypeKind::primitive("Int"),
            TypeKind::primitive("String"),
        ));
        let second = system.add_constraint(Constraint::bind(
            TypeKind::primitive("Bool"),
            TypeKind::primitive("Int"),
        ));

        // The second failure is still reported to its caller.
        assert!(second.is_failure());
        let failed = system.failed_constraint().expect("first failure");
        assert_eq!(failed.index, 0);
        assert_eq!(
            failed.constraint,
            Constraint::bind(TypeKind::primitive("Int"), TypeKind::primitive("String"))
        );
    }

    #[test]
    fn function_decomposition_fixes_variables_in_both_positions() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        let outcome = system.add_constraint(Constraint::bind(
            TypeKind::function(TypeKind::Variable(v1), TypeKind::Variable(v1)),
            TypeKind::function(TypeKind::primitive("Int"), TypeKind::Variable(v2)),
        ));
        assert!(outcome.is_solved());
        assert_eq!(
            system.bindings().fixed_type(v1),
            Some(TypeKind::primitive("Int"))
        );
        assert_eq!(
            system.bindings().fixed_type(v2),
            Some(TypeKind::primitive("Int"))
        );
    }

    #[test]
    fn ast_type_prefers_the_map_and_falls_back_to_the_node() {
        let mut system = ConstraintSystem::new();
        let declared = DeclaredNode(NodeId::new(0), TypeKind::primitive("Bool"));
        let bare = BareNode(NodeId::new(1));

        assert_eq!(system.ast_type(&declared), Some(TypeKind::primitive("Bool")));
        assert_eq!(system.ast_type(&bare), None);

        let v1 = system.create_type_variable_for(&bare);
        assert_eq!(system.ast_type(&bare), Some(TypeKind::Variable(v1)));

        system.set_ast_type(&declared, TypeKind::primitive("Int"));
        assert_eq!(system.ast_type(&declared), Some(TypeKind::primitive("Int")));
    }

    #[test]
    fn normalize_rewrites_registered_node_types() {
        let mut system = ConstraintSystem::new();
        let node = BareNode(NodeId::new(7));
        let v1 = system.create_type_variable_for(&node);

        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::primitive("String"),
        ));
        assert_eq!(system.ast_type(&node), Some(TypeKind::Variable(v1)));

        system.normalize();
        assert_eq!(system.ast_type(&node), Some(TypeKind::primitive("String")));
    }

    #[test]
    #[should_panic(expected = "applicable-function constraints have no simplifier")]
    fn submitting_an_applicable_function_constraint_is_a_contract_violation() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        system.add_constraint(Constraint::applicable_function(
            TypeKind::Variable(v1),
            TypeKind::function(TypeKind::primitive("Int"), TypeKind::Variable(v2)),
        ));
    }

    #[test]
    fn defer_constraint_parks_entries_without_solving() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        system.defer_constraint(Constraint::applicable_function(
            TypeKind::Variable(v1),
            TypeKind::function(TypeKind::primitive("Int"), TypeKind::Variable(v2)),
        ));
        assert_eq!(system.deferred_constraints().len(), 1);
        assert_eq!(system.telemetry().constraints_deferred, 1);
        assert!(system.failed_constraint().is_none());
        // The store is untouched.
        assert_eq!(system.bindings().fixed_type(v1), None);
    }

    #[test]
    fn solutions_are_isolated_from_later_mutation() {
        let mut system = ConstraintSystem::new();
        let node = BareNode(NodeId::new(3));
        let v1 = system.create_type_variable_for(&node);

        let before = system.current_solution();
        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::primitive("Int"),
        ));
        let after = system.current_solution();

        assert_eq!(before.fixed_type_for(NodeId::new(3)), None);
        assert_eq!(
            after.fixed_type_for(NodeId::new(3)),
            Some(TypeKind::primitive("Int"))
        );
    }

    #[test]
    fn telemetry_counts_submissions_merges_and_assignments() {
        let mut system = ConstraintSystem::new();
        let v1 = system.create_type_variable();
        let v2 = system.create_type_variable();

        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v1),
            TypeKind::Variable(v2),
        ));
        system.add_constraint(Constraint::bind(
            TypeKind::Variable(v2),
            TypeKind::primitive("Int"),
        ));

        let telemetry = system.telemetry();
        assert_eq!(telemetry.constraints_submitted, 2);
        assert_eq!(telemetry.merges_performed, 1);
        assert_eq!(telemetry.types_assigned, 1);
        assert_eq!(telemetry.constraints_deferred, 0);
    }
}
