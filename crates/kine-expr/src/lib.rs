//! Symbolic expression engine for the kinematics derivation pipeline.
//!
//! `kine-expr` provides the scalar symbolic layer everything else is built
//! on: an interned symbol table with constant and time-varying (dynamic)
//! symbols, a tagged-variant expression AST with operator overloads,
//! time-differentiation up to arbitrary order, structural substitution,
//! simplification, and direct interpretation.
//!
//! Symbol identity is by table lookup, not by name comparison inside
//! expressions: interning the same name twice yields the same `Symbol`
//! handle, and every expression node carries handles only.
//!
//! # Example
//!
//! ```
//! use kine_expr::{Expr, SymTable};
//!
//! let mut table = SymTable::new();
//! let theta = table.dynamic("theta").unwrap();
//! let l = table.sym("L").unwrap();
//!
//! // x-coordinate of a pendulum bob: L * sin(theta)
//! let x = Expr::from(l) * Expr::from(theta).sin();
//!
//! // d/dt x = L * cos(theta) * theta'
//! let xdot = x.dt(&table).simplify();
//! assert!(xdot.contains_deriv());
//! ```

pub mod error;
pub mod expr;
pub mod subs;
pub mod symtab;

pub use error::{ExprError, Result};
pub use expr::{BinOp, Expr};
pub use subs::SubsMap;
pub use symtab::{SymKind, SymTable, Symbol};
