//! Type representation shared by the sora inference engine.
//!
//! Types are immutable values. A [`TypeKind::Variable`] is a placeholder with
//! identity; the state of a variable (free, fixed, or forwarded to another
//! variable) lives in the binding store, never in the type term itself. The
//! closed variant set keeps every structural rule an explicit match arm, so
//! adding a constructor forces each pairwise matching rule to be written out.

use serde::{Deserialize, Serialize};
use sora_ast::TypeAnnotation;
use std::collections::BTreeSet;
use std::fmt;

/// Identifier assigned to type variables during inference.
///
/// Identifiers are handed out in allocation order starting at 1 and are
/// unique within one constraint system. Two variables are the same variable
/// exactly when their identifiers are equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a new type identifier from its raw numeric representation.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Type expressions handled by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// A placeholder type resolved through the binding store.
    Variable(TypeId),
    /// A named concrete type such as `Int` or `String`.
    Primitive(String),
    /// A single-parameter function type.
    Function {
        parameter: Box<TypeKind>,
        result: Box<TypeKind>,
    },
}

impl TypeKind {
    /// Convenience constructor for primitive types.
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeKind::Primitive(name.into())
    }

    /// Convenience constructor for function types.
    pub fn function(parameter: TypeKind, result: TypeKind) -> Self {
        TypeKind::Function {
            parameter: Box::new(parameter),
            result: Box::new(result),
        }
    }

    /// Returns the variable identifier when the type is a bare variable.
    pub fn as_variable(&self) -> Option<TypeId> {
        match self {
            TypeKind::Variable(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns true when the type is a bare variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, TypeKind::Variable(_))
    }

    /// Returns true when `id` occurs anywhere in the type as a sub-term.
    pub fn contains_variable(&self, id: TypeId) -> bool {
        match self {
            TypeKind::Variable(own) => *own == id,
            TypeKind::Primitive(_) => false,
            TypeKind::Function { parameter, result } => {
                parameter.contains_variable(id) || result.contains_variable(id)
            }
        }
    }

    /// Collects the variables occurring in the type, sorted for deterministic
    /// output.
    pub fn free_type_vars(&self) -> Vec<TypeId> {
        let mut vars = BTreeSet::new();
        self.collect_free_type_vars_into(&mut vars);
        vars.into_iter().collect()
    }

    pub(crate) fn collect_free_type_vars_into(&self, acc: &mut BTreeSet<TypeId>) {
        match self {
            TypeKind::Variable(id) => {
                acc.insert(*id);
            }
            TypeKind::Primitive(_) => {}
            TypeKind::Function { parameter, result } => {
                parameter.collect_free_type_vars_into(acc);
                result.collect_free_type_vars_into(acc);
            }
        }
    }

    /// Uniform structural rewrite. `f` is offered every sub-term outside-in;
    /// a `Some` replaces that sub-term as-is, a `None` keeps the constructor
    /// and transforms its children instead.
    pub fn transform<F>(&self, f: &mut F) -> TypeKind
    where
        F: FnMut(&TypeKind) -> Option<TypeKind>,
    {
        if let Some(replacement) = f(self) {
            return replacement;
        }
        match self {
            TypeKind::Variable(_) | TypeKind::Primitive(_) => self.clone(),
            TypeKind::Function { parameter, result } => {
                TypeKind::function(parameter.transform(f), result.transform(f))
            }
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Variable(id) => write!(f, "{id}"),
            TypeKind::Primitive(name) => f.write_str(name),
            TypeKind::Function { parameter, result } => {
                write!(f, "fn({parameter})->{result}")
            }
        }
    }
}

impl From<&TypeAnnotation> for TypeKind {
    fn from(annotation: &TypeAnnotation) -> Self {
        match annotation {
            TypeAnnotation::Simple(name) => TypeKind::primitive(name.clone()),
            TypeAnnotation::Function { parameter, result } => {
                TypeKind::function(TypeKind::from(parameter.as_ref()), TypeKind::from(result.as_ref()))
            }
        }
    }
}
