//! AST を走査して型制約を生成するビジター実装。
//!
//! `ConstraintGenerator` はスコープ管理を `TypeEnvironment` に委ねつつ、
//! 式ノードごとに型変数を払い出し、式の形から Bind 制約を積み上げる。
//! 解決そのものは `ConstraintSystem` が提出時に行う。

use crate::environment::TypeEnvironment;
use crate::{CheckError, CheckResult};
use sora_ast::{Expression, FunctionDeclaration, Literal, Program};
use sora_inference::{Constraint, ConstraintSystem, TypeKind};

/// AST から制約を抽出するジェネレータ。
#[derive(Debug)]
pub struct ConstraintGenerator<'a> {
    system: &'a mut ConstraintSystem,
    env: &'a mut TypeEnvironment,
}

impl<'a> ConstraintGenerator<'a> {
    /// 制約システムと環境への可変参照を受け取ってジェネレータを初期化する。
    pub fn new(system: &'a mut ConstraintSystem, env: &'a mut TypeEnvironment) -> Self {
        Self { system, env }
    }

    /// プログラム全体を走査して制約を登録する。
    pub fn generate(mut self, program: &Program) -> CheckResult<()> {
        // 相互再帰に備えて宣言の型を先に環境へ登録する。
        for declaration in &program.declarations {
            let ty = match declaration.interface_type() {
                Some(annotation) => {
                    let ty = TypeKind::from(&annotation);
                    self.system.set_ast_type(declaration, ty.clone());
                    ty
                }
                None => TypeKind::Variable(self.system.create_type_variable_for(declaration)),
            };
            self.env.define(declaration.name.clone(), ty);
        }

        for declaration in &program.declarations {
            self.check_declaration(declaration)?;
        }

        if let Some(expression) = &program.expression {
            self.infer_expression(expression)?;
        }
        Ok(())
    }

    fn check_declaration(&mut self, declaration: &FunctionDeclaration) -> CheckResult<()> {
        let parameter_ty = declaration
            .parameter
            .type_annotation
            .as_ref()
            .map(TypeKind::from)
            .unwrap_or_else(|| TypeKind::Variable(self.system.create_type_variable()));
        let return_ty = declaration
            .return_annotation
            .as_ref()
            .map(TypeKind::from)
            .unwrap_or_else(|| TypeKind::Variable(self.system.create_type_variable()));

        // 宣言済みの型（インターフェース型または型変数）と関数型を一致させる。
        if let Some(declared) = self.env.lookup(&declaration.name).cloned() {
            self.system.add_constraint(Constraint::bind(
                declared,
                TypeKind::function(parameter_ty.clone(), return_ty.clone()),
            ));
        }

        self.env.enter_scope();
        self.env
            .define(declaration.parameter.name.clone(), parameter_ty);
        let body_ty = self.infer_expression(&declaration.body)?;
        // 本体の型は宣言された戻り型を満たす必要がある。
        self.system
            .add_constraint(Constraint::bind(body_ty, return_ty));
        self.env.leave_scope();
        Ok(())
    }

    /// 式に対応する型変数を払い出し、形に応じた制約を登録する。
    fn infer_expression(&mut self, expression: &Expression) -> CheckResult<TypeKind> {
        let result = TypeKind::Variable(self.system.create_type_variable_for(expression));
        match expression {
            Expression::Literal { value, .. } => {
                self.system
                    .add_constraint(Constraint::bind(result.clone(), literal_type(value)));
            }
            Expression::Identifier { name, .. } => {
                let ty = self.env.lookup(name).cloned().ok_or_else(|| {
                    CheckError::UndefinedIdentifier { name: name.clone() }
                })?;
                self.system
                    .add_constraint(Constraint::bind(result.clone(), ty));
            }
            Expression::Call {
                callee, argument, ..
            } => {
                let callee_ty = self.infer_expression(callee)?;
                let argument_ty = self.infer_expression(argument)?;
                // 呼び出し先は引数を受け取り結果型を返す関数でなければならない。
                self.system.add_constraint(Constraint::bind(
                    callee_ty,
                    TypeKind::function(argument_ty, result.clone()),
                ));
            }
            Expression::Closure {
                parameter, body, ..
            } => {
                let parameter_ty = parameter
                    .type_annotation
                    .as_ref()
                    .map(TypeKind::from)
                    .unwrap_or_else(|| TypeKind::Variable(self.system.create_type_variable()));

                self.env.enter_scope();
                self.env
                    .define(parameter.name.clone(), parameter_ty.clone());
                let body_ty = self.infer_expression(body)?;
                self.env.leave_scope();

                self.system.add_constraint(Constraint::bind(
                    result.clone(),
                    TypeKind::function(parameter_ty, body_ty),
                ));
            }
            Expression::Ascription {
                expr, annotation, ..
            } => {
                let inner_ty = self.infer_expression(expr)?;
                let declared = TypeKind::from(annotation);
                self.system
                    .add_constraint(Constraint::bind(inner_ty, declared.clone()));
                self.system
                    .add_constraint(Constraint::bind(result.clone(), declared));
            }
        }
        Ok(result)
    }
}

/// リテラルから基本型を導出する。小数点を含む数値は `Double` とみなす。
fn literal_type(literal: &Literal) -> TypeKind {
    match literal {
        Literal::Number(text) => {
            if text.contains('.') {
                TypeKind::primitive("Double")
            } else {
                TypeKind::primitive("Int")
            }
        }
        Literal::String(_) => TypeKind::primitive("String"),
        Literal::Boolean(_) => TypeKind::primitive("Bool"),
    }
}
