//! Structural substitution: exact sub-tree match and replace.
//!
//! A [`SubsMap`] is an ordered list of `(pattern, replacement)` pairs.
//! At each node the pairs are tried in order; on a match the whole node is
//! replaced and the rewrite does not recurse into the replacement, so a
//! fully applied map is idempotent.
//!
//! Substitution must run only after all differentiation is done: replacing
//! `theta'` with an independent symbol `u` severs the chain-rule link, and
//! differentiating the flattened expression would silently drop terms.
//! [`SubsMap::apply_checked`] enforces the "no residual derivatives"
//! contract for call sites that feed the numeric compiler.

use crate::error::{ExprError, Result};
use crate::expr::Expr;
use crate::symtab::SymTable;

/// Ordered pattern → replacement rewrite map.
#[derive(Debug, Clone, Default)]
pub struct SubsMap {
    pairs: Vec<(Expr, Expr)>,
}

impl SubsMap {
    pub fn new(pairs: Vec<(Expr, Expr)>) -> Self {
        Self { pairs }
    }

    pub fn push(&mut self, pattern: Expr, replacement: Expr) {
        self.pairs.push((pattern, replacement));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rewrite every matching sub-tree of `expr`.
    pub fn apply(&self, expr: &Expr) -> Expr {
        for (pattern, replacement) in &self.pairs {
            if expr == pattern {
                return replacement.clone();
            }
        }
        match expr {
            Expr::Const(_) | Expr::Sym(_) | Expr::Deriv { .. } => expr.clone(),
            Expr::Bin { op, lhs, rhs } => Expr::Bin {
                op: *op,
                lhs: Box::new(self.apply(lhs)),
                rhs: Box::new(self.apply(rhs)),
            },
            Expr::Neg(e) => Expr::Neg(Box::new(self.apply(e))),
            Expr::Sin(e) => Expr::Sin(Box::new(self.apply(e))),
            Expr::Cos(e) => Expr::Cos(Box::new(self.apply(e))),
        }
    }

    /// Rewrite, then fail if any time-derivative node survived.
    ///
    /// This is the malformed-substitution guard: a map that only covers
    /// first derivatives applied to an expression containing second
    /// derivatives leaves `Deriv` nodes behind, and those can never be
    /// evaluated numerically.
    pub fn apply_checked(&self, expr: &Expr, table: &SymTable) -> Result<Expr> {
        let out = self.apply(expr);
        if let Some((sym, order)) = out.first_deriv() {
            return Err(ExprError::ResidualDerivative {
                name: table.name(sym).to_string(),
                order,
            });
        }
        Ok(out)
    }
}
