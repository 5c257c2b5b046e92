// sora_ast/walker - Generic pre/post traversal over expression trees

use crate::Expression;

/// Hooks invoked around every expression during a walk.
///
/// The default hooks do nothing, so implementors override only the phase they
/// need. Returning a replacement from [`ExpressionWalker::post_visit`] swaps
/// the node in place; node identities of untouched subtrees are preserved.
pub trait ExpressionWalker {
    /// Called before the children of `expr` are visited.
    fn pre_visit(&mut self, expr: &mut Expression) {
        let _ = expr;
    }

    /// Called after the children of `expr` have been visited.
    fn post_visit(&mut self, expr: &mut Expression) -> Option<Expression> {
        let _ = expr;
        None
    }
}

/// Walks `expr` depth-first, invoking `walker`'s hooks around each node.
pub fn walk_expression<W: ExpressionWalker>(walker: &mut W, expr: &mut Expression) {
    walker.pre_visit(expr);

    match expr {
        Expression::Literal { .. } | Expression::Identifier { .. } => {}
        Expression::Call {
            callee, argument, ..
        } => {
            walk_expression(walker, callee);
            walk_expression(walker, argument);
        }
        Expression::Closure { body, .. } => walk_expression(walker, body),
        Expression::Ascription { expr: inner, .. } => walk_expression(walker, inner),
    }

    if let Some(replacement) = walker.post_visit(expr) {
        *expr = replacement;
    }
}
