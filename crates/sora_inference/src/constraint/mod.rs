//! Constraint representation and the entry queue consumed by the solver.

pub mod solution;

pub use solution::Solution;

use crate::types::TypeKind;
use std::collections::VecDeque;
use std::fmt;

/// Kind tag shared by constraints and matcher dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Equality between two types.
    Bind,
    /// Function-application shape obligation. Recognised but without a
    /// simplifier; entries reach the queue only through the low-level
    /// deferral hook.
    ApplicableFunction,
}

/// A requirement relating two types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Bind { left: TypeKind, right: TypeKind },
    ApplicableFunction { left: TypeKind, right: TypeKind },
}

impl Constraint {
    /// Creates an equality constraint.
    pub fn bind(left: TypeKind, right: TypeKind) -> Self {
        Constraint::Bind { left, right }
    }

    /// Creates a function-application shape constraint.
    pub fn applicable_function(left: TypeKind, right: TypeKind) -> Self {
        Constraint::ApplicableFunction { left, right }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Bind { .. } => ConstraintKind::Bind,
            Constraint::ApplicableFunction { .. } => ConstraintKind::ApplicableFunction,
        }
    }

    pub fn left(&self) -> &TypeKind {
        match self {
            Constraint::Bind { left, .. } => left,
            Constraint::ApplicableFunction { left, .. } => left,
        }
    }

    pub fn right(&self) -> &TypeKind {
        match self {
            Constraint::Bind { right, .. } => right,
            Constraint::ApplicableFunction { right, .. } => right,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Bind { left, right } => write!(f, "{left} == {right}"),
            Constraint::ApplicableFunction { left, right } => {
                write!(f, "{left} applicable to {right}")
            }
        }
    }
}

/// A submitted constraint plus its submission index, the identity used when
/// reporting failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintEntry {
    pub index: usize,
    pub constraint: Constraint,
}

impl ConstraintEntry {
    pub fn new(index: usize, constraint: Constraint) -> Self {
        Self { index, constraint }
    }
}

/// FIFO queue of constraint entries awaiting a future solving pass.
#[derive(Debug, Default, Clone)]
pub struct ConstraintSet {
    queue: VecDeque<ConstraintEntry>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends an entry at the back of the queue.
    pub fn push(&mut self, entry: ConstraintEntry) {
        self.queue.push_back(entry);
    }

    /// Removes and returns the entry at the front of the queue.
    pub fn pop(&mut self) -> Option<ConstraintEntry> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Iterates entries front to back.
    pub fn iter(&self) -> impl Iterator<Item = &ConstraintEntry> {
        self.queue.iter()
    }
}
