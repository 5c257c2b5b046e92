// sora_checker - Type checking entry points for the sora language

pub mod environment;
pub mod generator;

pub use environment::TypeEnvironment;
pub use generator::ConstraintGenerator;

use sora_ast::Program;
use sora_inference::{ConstraintSystem, Solution};
use thiserror::Error;

/// 型検査で発生し得るエラーを表す。
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("undefined identifier `{name}`")]
    UndefinedIdentifier { name: String },
    #[error("type error in constraint #{index}: {detail}")]
    TypeError { index: usize, detail: String },
}

/// 型検査関数の共通戻り値エイリアス。
pub type CheckResult<T> = Result<T, CheckError>;

/// 制約生成と制約システムを束ねる型検査のエントリーポイント。
#[derive(Debug, Default)]
pub struct TypeChecker {
    system: ConstraintSystem,
}

impl TypeChecker {
    /// 空の検査コンテキストを生成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// プログラム全体を検査し、解のスナップショットを返す。
    ///
    /// 制約は提出時に逐次解決される。最初に失敗した制約があれば型エラーと
    /// して報告し、なければ AST 型表を正規化してスナップショットを取る。
    pub fn check_program(&mut self, program: &Program) -> CheckResult<Solution> {
        self.system = ConstraintSystem::new();

        let mut environment = TypeEnvironment::new();
        ConstraintGenerator::new(&mut self.system, &mut environment).generate(program)?;

        if let Some(entry) = self.system.failed_constraint() {
            return Err(CheckError::TypeError {
                index: entry.index,
                detail: entry.constraint.to_string(),
            });
        }

        self.system.normalize();
        Ok(self.system.current_solution())
    }

    /// 直近の検査で使われた制約システムへアクセスする（テスト・後続フェーズ向け）。
    pub fn system(&self) -> &ConstraintSystem {
        &self.system
    }
}
