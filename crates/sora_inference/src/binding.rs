//! Union-find binding store for type variables.
//!
//! Every allocated variable maps to one of three states: free, fixed to a
//! concrete type, or transferring to another variable that carries the state
//! of its equivalence class. Merging is id-directed: the larger id always
//! transfers to the smaller, so the representative of a class is its
//! minimum-id member and representatives are stable across runs. Merges and
//! assignments are never undone.

use crate::types::{TypeId, TypeKind};

/// State recorded for a single type variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// No information yet; the variable represents itself.
    Free,
    /// The class resolved to a concrete type. Never a bare variable.
    Fixed(TypeKind),
    /// Forwarding to the variable that carries the class state.
    Transfer(TypeId),
}

/// Dense table of bindings keyed by variable id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindingStore {
    bindings: Vec<Binding>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables allocated so far.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Allocates the next variable; ids are handed out in order starting at 1.
    pub fn allocate(&mut self) -> TypeId {
        self.bindings.push(Binding::Free);
        TypeId::new(self.bindings.len() as u32)
    }

    fn index(id: TypeId) -> usize {
        (id.to_raw() - 1) as usize
    }

    /// Current binding of `id`.
    pub fn binding(&self, id: TypeId) -> &Binding {
        &self.bindings[Self::index(id)]
    }

    /// Iterates every allocated variable in allocation order.
    pub fn variables(&self) -> impl Iterator<Item = TypeId> + '_ {
        (1..=self.bindings.len() as u32).map(TypeId::new)
    }

    /// Terminal variable of the transfer chain starting at `id`.
    pub fn representative(&self, id: TypeId) -> TypeId {
        match self.binding(id) {
            Binding::Transfer(target) => self.representative(*target),
            _ => id,
        }
    }

    /// True when `id` carries its own class state.
    pub fn is_representative(&self, id: TypeId) -> bool {
        self.representative(id) == id
    }

    /// Concrete type of `id`'s class, resolved through the transfer chain.
    pub fn fixed_type(&self, id: TypeId) -> Option<TypeKind> {
        match self.binding(self.representative(id)) {
            Binding::Fixed(ty) => Some(ty.clone()),
            _ => None,
        }
    }

    /// The class's fixed type when one exists, otherwise its representative
    /// as a variable term.
    pub fn fixed_or_representative(&self, id: TypeId) -> TypeKind {
        let representative = self.representative(id);
        match self.binding(representative) {
            Binding::Fixed(ty) => ty.clone(),
            _ => TypeKind::Variable(representative),
        }
    }

    /// True when every allocated variable resolves to a fixed type.
    pub fn all_fixed(&self) -> bool {
        self.variables().all(|id| self.fixed_type(id).is_some())
    }

    /// Unifies the classes of two free representatives. The larger id becomes
    /// a transfer to the smaller, and every variable already transferring to
    /// the larger is rewritten, keeping all chains one hop long.
    pub fn merge(&mut self, a: TypeId, b: TypeId) {
        debug_assert!(
            matches!(self.binding(a), Binding::Free),
            "merge requires a free representative on the left"
        );
        debug_assert!(
            matches!(self.binding(b), Binding::Free),
            "merge requires a free representative on the right"
        );
        if a == b {
            return;
        }
        let (lo, hi) = if a.to_raw() < b.to_raw() { (a, b) } else { (b, a) };
        self.bindings[Self::index(hi)] = Binding::Transfer(lo);
        for binding in &mut self.bindings {
            if let Binding::Transfer(target) = binding {
                if *target == hi {
                    *target = lo;
                }
            }
        }
    }

    /// Assigns a concrete type to a free representative. The occurs check is
    /// the caller's responsibility and must run before calling.
    pub fn assign(&mut self, id: TypeId, ty: TypeKind) {
        debug_assert!(
            matches!(self.binding(id), Binding::Free),
            "assign requires a free representative"
        );
        debug_assert!(!ty.is_variable(), "assigned types must not be bare variables");
        self.bindings[Self::index(id)] = Binding::Fixed(ty);
    }

    /// Recursively substitutes every variable in `ty` by its fixed type or
    /// representative until a fixpoint. The result contains no forwarded
    /// variable and no representative that already carries a fixed type.
    pub fn simplify(&self, ty: &TypeKind) -> TypeKind {
        match ty {
            TypeKind::Variable(id) => {
                let resolved = self.fixed_or_representative(*id);
                if resolved.is_variable() {
                    resolved
                } else {
                    self.simplify(&resolved)
                }
            }
            TypeKind::Primitive(_) => ty.clone(),
            TypeKind::Function { parameter, result } => {
                TypeKind::function(self.simplify(parameter), self.simplify(result))
            }
        }
    }
}
