// sora_ast/expression - Expression and declaration nodes for the sora language
use crate::{Literal, NodeId, Span, TypeAnnotation};
use serde::{Deserialize, Serialize};

/// AST Expression node representing all expression forms in sora
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // Literals
    Literal {
        id: NodeId,
        value: Literal,
        span: Span,
    },

    // Identifiers
    Identifier {
        id: NodeId,
        name: String,
        span: Span,
    },

    // Function application; sora functions take a single argument
    Call {
        id: NodeId,
        callee: Box<Expression>,
        argument: Box<Expression>,
        span: Span,
    },

    // Single-parameter closures
    Closure {
        id: NodeId,
        parameter: ClosureParameter,
        body: Box<Expression>,
        span: Span,
    },

    // Explicitly typed expression, `expr: Type`
    Ascription {
        id: NodeId,
        expr: Box<Expression>,
        annotation: TypeAnnotation,
        span: Span,
    },
}

/// Parameter of a closure expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureParameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub span: Span,
}

// Helper traits and implementations
impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Literal { id, .. } => *id,
            Expression::Identifier { id, .. } => *id,
            Expression::Call { id, .. } => *id,
            Expression::Closure { id, .. } => *id,
            Expression::Ascription { id, .. } => *id,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Expression::Literal { span, .. } => span,
            Expression::Identifier { span, .. } => span,
            Expression::Call { span, .. } => span,
            Expression::Closure { span, .. } => span,
            Expression::Ascription { span, .. } => span,
        }
    }

    /// Declared type of the expression, when the source carries one.
    pub fn type_annotation(&self) -> Option<&TypeAnnotation> {
        match self {
            Expression::Ascription { annotation, .. } => Some(annotation),
            _ => None,
        }
    }
}

/// Parameter of a function declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub span: Span,
}

/// Top-level function declaration, the context node of the language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub name: String,
    pub parameter: Parameter,
    pub return_annotation: Option<TypeAnnotation>,
    pub body: Expression,
    pub span: Span,
}

impl FunctionDeclaration {
    /// Interface type of the declaration: available once both the parameter
    /// and the return position are annotated.
    pub fn interface_type(&self) -> Option<TypeAnnotation> {
        let parameter = self.parameter.type_annotation.clone()?;
        let result = self.return_annotation.clone()?;
        Some(TypeAnnotation::Function {
            parameter: Box::new(parameter),
            result: Box::new(result),
        })
    }
}

/// A sora program: function declarations plus an optional trailing expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub declarations: Vec<FunctionDeclaration>,
    pub expression: Option<Expression>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(id: u32, name: &str) -> Expression {
        Expression::Identifier {
            id: NodeId::new(id),
            name: name.to_string(),
            span: Span::dummy(),
        }
    }

    #[test]
    fn id_accessor_covers_every_variant() {
        let call = Expression::Call {
            id: NodeId::new(3),
            callee: Box::new(identifier(1, "f")),
            argument: Box::new(identifier(2, "x")),
            span: Span::dummy(),
        };
        assert_eq!(call.id(), NodeId::new(3));
        assert_eq!(call.span(), &Span::dummy());
    }

    #[test]
    fn ascription_exposes_its_annotation() {
        let expr = Expression::Ascription {
            id: NodeId::new(1),
            expr: Box::new(identifier(0, "x")),
            annotation: TypeAnnotation::Simple("Int".to_string()),
            span: Span::dummy(),
        };
        assert_eq!(
            expr.type_annotation(),
            Some(&TypeAnnotation::Simple("Int".to_string()))
        );
        assert_eq!(identifier(0, "x").type_annotation(), None);
    }

    #[test]
    fn interface_type_requires_both_annotations() {
        let declaration = FunctionDeclaration {
            id: NodeId::new(0),
            name: "increment".to_string(),
            parameter: Parameter {
                name: "n".to_string(),
                type_annotation: Some(TypeAnnotation::Simple("Int".to_string())),
                span: Span::dummy(),
            },
            return_annotation: None,
            body: identifier(1, "n"),
            span: Span::dummy(),
        };
        assert_eq!(declaration.interface_type(), None);

        let mut annotated = declaration.clone();
        annotated.return_annotation = Some(TypeAnnotation::Simple("Int".to_string()));
        assert_eq!(
            annotated.interface_type(),
            Some(TypeAnnotation::Function {
                parameter: Box::new(TypeAnnotation::Simple("Int".to_string())),
                result: Box::new(TypeAnnotation::Simple("Int".to_string())),
            })
        );
    }
}
