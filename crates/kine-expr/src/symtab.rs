//! Symbol table: interned names with constant/dynamic kinds.

use std::collections::HashMap;

use crate::error::{ExprError, Result};
use crate::expr::Expr;

/// Handle to an interned symbol. Cheap to copy; identity is the table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a symbol is a plain constant or a function of time.
///
/// Time-differentiation of a `Const` symbol is zero; differentiation of a
/// `Dynamic` symbol produces a `Deriv` node of the next order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymKind {
    Const,
    Dynamic,
}

/// Interning table mapping names to [`Symbol`] handles.
///
/// One table per derivation session. Re-interning a name returns the
/// existing handle; asking for the same name with a different kind is an
/// error rather than a silent shadow.
#[derive(Debug, Default)]
pub struct SymTable {
    names: Vec<String>,
    kinds: Vec<SymKind>,
    index: HashMap<String, Symbol>,
}

impl SymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a constant (time-invariant) symbol: lengths, masses, rates.
    pub fn sym(&mut self, name: &str) -> Result<Symbol> {
        self.intern(name, SymKind::Const)
    }

    /// Intern a dynamic symbol: a function of time with well-defined
    /// time-derivatives of any order.
    pub fn dynamic(&mut self, name: &str) -> Result<Symbol> {
        self.intern(name, SymKind::Dynamic)
    }

    fn intern(&mut self, name: &str, kind: SymKind) -> Result<Symbol> {
        if let Some(&sym) = self.index.get(name) {
            let existing = self.kinds[sym.index()];
            if existing != kind {
                return Err(ExprError::KindMismatch {
                    name: name.to_string(),
                    existing,
                    requested: kind,
                });
            }
            return Ok(sym);
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_string());
        self.kinds.push(kind);
        self.index.insert(name.to_string(), sym);
        Ok(sym)
    }

    pub fn name(&self, sym: Symbol) -> &str {
        &self.names[sym.index()]
    }

    pub fn kind(&self, sym: Symbol) -> SymKind {
        self.kinds[sym.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render an expression with symbol names resolved through this table.
    pub fn pretty(&self, expr: &Expr) -> String {
        use crate::expr::BinOp;
        match expr {
            Expr::Const(c) => format!("{c}"),
            Expr::Sym(s) => self.name(*s).to_string(),
            Expr::Deriv { sym, order } => {
                format!("{}{}", self.name(*sym), "'".repeat(*order as usize))
            }
            Expr::Bin { op, lhs, rhs } => {
                let op = match op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Div => "/",
                };
                format!("({} {} {})", self.pretty(lhs), op, self.pretty(rhs))
            }
            Expr::Neg(e) => format!("-{}", self.pretty(e)),
            Expr::Sin(e) => format!("sin({})", self.pretty(e)),
            Expr::Cos(e) => format!("cos({})", self.pretty(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_returns_identical_handles() {
        let mut table = SymTable::new();
        let a = table.sym("L1").unwrap();
        let b = table.sym("L1").unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut table = SymTable::new();
        table.dynamic("theta1").unwrap();
        let err = table.sym("theta1").unwrap_err();
        assert!(matches!(err, ExprError::KindMismatch { .. }));
    }

    #[test]
    fn pretty_renders_derivatives_with_primes() {
        let mut table = SymTable::new();
        let theta = table.dynamic("theta").unwrap();
        let expr = Expr::Deriv { sym: theta, order: 2 };
        assert_eq!(table.pretty(&expr), "theta''");
    }
}
