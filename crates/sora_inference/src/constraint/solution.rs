//! Immutable snapshots of a constraint system's state.

use crate::binding::BindingStore;
use crate::types::{TypeId, TypeKind};
use rustc_hash::FxHashMap;
use sora_ast::NodeId;

/// By-value snapshot of the bindings and the AST-type map taken at a point in
/// time. The live system can keep merging and assigning without affecting
/// snapshots already handed out.
#[derive(Debug, Clone)]
pub struct Solution {
    bindings: BindingStore,
    node_types: FxHashMap<NodeId, TypeKind>,
}

impl Solution {
    pub(crate) fn new(bindings: BindingStore, node_types: FxHashMap<NodeId, TypeKind>) -> Self {
        Self {
            bindings,
            node_types,
        }
    }

    /// Fully concrete type recorded for `node`, resolving stored variables
    /// through the snapshot's own bindings. `None` while any variable in the
    /// node's type is still free.
    pub fn fixed_type_for(&self, node: NodeId) -> Option<TypeKind> {
        let stored = self.node_types.get(&node)?;
        let simplified = self.bindings.simplify(stored);
        if simplified.free_type_vars().is_empty() {
            Some(simplified)
        } else {
            None
        }
    }

    /// Concrete type of a variable's class inside the snapshot.
    pub fn fixed_type_of(&self, id: TypeId) -> Option<TypeKind> {
        self.bindings.fixed_type(id)
    }

    /// Nodes recorded in the snapshot with their stored (possibly still
    /// variable) types.
    pub fn node_types(&self) -> impl Iterator<Item = (NodeId, &TypeKind)> {
        self.node_types.iter().map(|(node, ty)| (*node, ty))
    }
}
