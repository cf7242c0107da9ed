//! Tagged-variant expression AST with differentiation and evaluation.
//!
//! Expressions are ordinary owned trees (`Box` children). Structural
//! equality (`PartialEq`) is what substitution matches on, so two
//! expressions built the same way from the same symbol handles compare
//! equal regardless of where they were built.

use std::collections::{BTreeSet, HashMap};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{ExprError, Result};
use crate::symtab::{SymKind, SymTable, Symbol};

/// Binary operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Symbolic scalar expression.
///
/// `Deriv` is the time-derivative of a dynamic symbol: `theta.dt()` is
/// `Deriv { sym: theta, order: 1 }`, its derivative order 2, and so on.
/// Derivatives stay opaque nodes until substitution replaces them with
/// independent rate/acceleration symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Sym(Symbol),
    Deriv { sym: Symbol, order: u32 },
    Bin {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Neg(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
}

impl Default for Expr {
    fn default() -> Self {
        Expr::ZERO
    }
}

impl From<Symbol> for Expr {
    fn from(sym: Symbol) -> Self {
        Expr::Sym(sym)
    }
}

impl From<f64> for Expr {
    fn from(c: f64) -> Self {
        Expr::Const(c)
    }
}

impl Expr {
    pub const ZERO: Expr = Expr::Const(0.0);
    pub const ONE: Expr = Expr::Const(1.0);

    fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Bin {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Time-derivative node of a dynamic symbol.
    ///
    /// Fails for constant symbols: their derivative is identically zero
    /// and a `Deriv` pattern over one would never match anything.
    pub fn deriv(sym: Symbol, order: u32, table: &SymTable) -> Result<Expr> {
        if table.kind(sym) == SymKind::Const {
            return Err(ExprError::DeriveConstant(table.name(sym).to_string()));
        }
        Ok(Expr::Deriv { sym, order })
    }

    pub fn sin(self) -> Expr {
        Expr::Sin(Box::new(self))
    }

    pub fn cos(self) -> Expr {
        Expr::Cos(Box::new(self))
    }

    /// Integer power by repeated multiplication (exponents here are small).
    pub fn powi(self, n: u32) -> Expr {
        match n {
            0 => Expr::ONE,
            _ => {
                let mut acc = self.clone();
                for _ in 1..n {
                    acc = acc * self.clone();
                }
                acc
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 1.0)
    }

    /// Differentiate with respect to time.
    ///
    /// Constant symbols differentiate to zero, dynamic symbols to a
    /// first-order `Deriv` node, `Deriv` nodes to the next order. The
    /// usual sum/product/quotient and chain rules apply through the tree.
    pub fn dt(&self, table: &SymTable) -> Expr {
        match self {
            Expr::Const(_) => Expr::ZERO,
            Expr::Sym(s) => match table.kind(*s) {
                SymKind::Const => Expr::ZERO,
                SymKind::Dynamic => Expr::Deriv { sym: *s, order: 1 },
            },
            Expr::Deriv { sym, order } => Expr::Deriv {
                sym: *sym,
                order: order + 1,
            },
            Expr::Bin { op, lhs, rhs } => {
                let dl = lhs.dt(table);
                let dr = rhs.dt(table);
                match op {
                    BinOp::Add => dl + dr,
                    BinOp::Sub => dl - dr,
                    BinOp::Mul => dl * (**rhs).clone() + (**lhs).clone() * dr,
                    BinOp::Div => {
                        // (l/r)' = (l'r - l r') / r^2
                        (dl * (**rhs).clone() - (**lhs).clone() * dr)
                            / (**rhs).clone().powi(2)
                    }
                }
            }
            Expr::Neg(e) => -e.dt(table),
            Expr::Sin(e) => (**e).clone().cos() * e.dt(table),
            Expr::Cos(e) => -((**e).clone().sin()) * e.dt(table),
        }
    }

    /// True if any `Deriv` node remains anywhere in the tree.
    pub fn contains_deriv(&self) -> bool {
        self.first_deriv().is_some()
    }

    /// First remaining `Deriv` node, if any (for error reporting).
    pub fn first_deriv(&self) -> Option<(Symbol, u32)> {
        match self {
            Expr::Const(_) | Expr::Sym(_) => None,
            Expr::Deriv { sym, order } => Some((*sym, *order)),
            Expr::Bin { lhs, rhs, .. } => lhs.first_deriv().or_else(|| rhs.first_deriv()),
            Expr::Neg(e) | Expr::Sin(e) | Expr::Cos(e) => e.first_deriv(),
        }
    }

    /// Collect every symbol occurring as a free `Sym` node.
    ///
    /// A residual `Deriv` is not a free symbol; the compiler rejects it
    /// separately before this set is consulted.
    pub fn free_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Const(_) | Expr::Deriv { .. } => {}
            Expr::Sym(s) => {
                out.insert(*s);
            }
            Expr::Bin { lhs, rhs, .. } => {
                lhs.free_symbols(out);
                rhs.free_symbols(out);
            }
            Expr::Neg(e) | Expr::Sin(e) | Expr::Cos(e) => e.free_symbols(out),
        }
    }

    /// Algebraic cleanup: constant folding, identity/annihilator removal,
    /// trig of constants. Run after differentiation, which produces many
    /// `x*0` and `x+0` shapes.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Sym(_) | Expr::Deriv { .. } => self.clone(),
            Expr::Bin { op, lhs, rhs } => {
                let l = lhs.simplify();
                let r = rhs.simplify();
                if let (Expr::Const(a), Expr::Const(b)) = (&l, &r) {
                    let folded = match op {
                        BinOp::Add => Some(a + b),
                        BinOp::Sub => Some(a - b),
                        BinOp::Mul => Some(a * b),
                        BinOp::Div if *b != 0.0 => Some(a / b),
                        BinOp::Div => None,
                    };
                    if let Some(v) = folded {
                        return Expr::Const(v);
                    }
                }
                match op {
                    BinOp::Add => {
                        if l.is_zero() {
                            r
                        } else if r.is_zero() {
                            l
                        } else {
                            Expr::bin(BinOp::Add, l, r)
                        }
                    }
                    BinOp::Sub => {
                        if r.is_zero() {
                            l
                        } else if l.is_zero() {
                            (-r).simplify()
                        } else {
                            Expr::bin(BinOp::Sub, l, r)
                        }
                    }
                    BinOp::Mul => {
                        if l.is_zero() || r.is_zero() {
                            Expr::ZERO
                        } else if l.is_one() {
                            r
                        } else if r.is_one() {
                            l
                        } else {
                            Expr::bin(BinOp::Mul, l, r)
                        }
                    }
                    BinOp::Div => {
                        if r.is_one() {
                            l
                        } else {
                            Expr::bin(BinOp::Div, l, r)
                        }
                    }
                }
            }
            Expr::Neg(e) => match e.simplify() {
                Expr::Const(c) => Expr::Const(-c),
                Expr::Neg(inner) => *inner,
                other => Expr::Neg(Box::new(other)),
            },
            Expr::Sin(e) => match e.simplify() {
                Expr::Const(c) => Expr::Const(c.sin()),
                other => Expr::Sin(Box::new(other)),
            },
            Expr::Cos(e) => match e.simplify() {
                Expr::Const(c) => Expr::Const(c.cos()),
                other => Expr::Cos(Box::new(other)),
            },
        }
    }

    /// Interpret the expression against a symbol → value binding.
    pub fn eval(&self, vals: &HashMap<Symbol, f64>, table: &SymTable) -> Result<f64> {
        match self {
            Expr::Const(c) => Ok(*c),
            Expr::Sym(s) => vals
                .get(s)
                .copied()
                .ok_or_else(|| ExprError::UnboundSymbol(table.name(*s).to_string())),
            Expr::Deriv { sym, order } => Err(ExprError::ResidualDerivative {
                name: table.name(*sym).to_string(),
                order: *order,
            }),
            Expr::Bin { op, lhs, rhs } => {
                let l = lhs.eval(vals, table)?;
                let r = rhs.eval(vals, table)?;
                Ok(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                })
            }
            Expr::Neg(e) => Ok(-e.eval(vals, table)?),
            Expr::Sin(e) => Ok(e.eval(vals, table)?.sin()),
            Expr::Cos(e) => Ok(e.eval(vals, table)?.cos()),
        }
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::bin(BinOp::Add, self, rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::bin(BinOp::Sub, self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::bin(BinOp::Mul, self, rhs)
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::bin(BinOp::Div, self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        match self {
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }
}
