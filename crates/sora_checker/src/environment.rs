//! 型検査におけるレキシカルスコープを管理する環境。
//!
//! `TypeEnvironment` は識別子に対応するモノタイプを保持し、スコープ境界の
//! push/pop を提供する。ジェネリクスを扱わないため型スキームは持たず、
//! クロージャや関数本体の検査では単純なシャドーイングのみを許す。

use sora_inference::TypeKind;
use std::collections::HashMap;

/// スコープごとの型束縛を管理する。
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    scopes: Vec<HashMap<String, TypeKind>>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    /// 新しい環境を構築する。グローバルスコープを1つ持った状態で初期化する。
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// 現在のスコープ深度を取得する。
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// スコープを1段深くする。
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// スコープを1段戻る。グローバルスコープは破棄しない。
    pub fn leave_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    /// 現在のスコープへ型を登録する。
    pub fn define(&mut self, name: impl Into<String>, ty: TypeKind) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty);
        }
    }

    /// もっとも内側のスコープから順にシンボルを探索する。
    pub fn lookup(&self, name: &str) -> Option<&TypeKind> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
