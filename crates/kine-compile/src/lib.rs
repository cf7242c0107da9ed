//! Numeric compilation of symbolic expressions (lambdify).
//!
//! Converts an [`Expr`] plus an ordered list of free symbols into a
//! callable that takes that many `f64` arguments in exactly that order.
//! Lowering builds a closure tree indexing the argument slice by
//! position, so evaluation does no symbol lookups.
//!
//! Validation happens at compile time: a free symbol missing from the
//! declared list is an `UnboundSymbol` error when [`compile`] is called,
//! never a silent zero at evaluation. Residual time-derivative nodes
//! (an expression compiled before rate substitution) are rejected the
//! same way. The only call-time error is a wrong argument count.
//!
//! Compiled functions are pure and `Send + Sync`; once built they can be
//! evaluated repeatedly and concurrently.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{DMatrix, Vector3};
use thiserror::Error;

use kine_expr::{BinOp, Expr, SymTable, Symbol};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("free symbol `{0}` is not in the declared argument list")]
    UnboundSymbol(String),

    #[error("residual time-derivative of `{name}` (order {order}); substitute rates before compiling")]
    ResidualDerivative { name: String, order: u32 },

    #[error("wrong argument count: expected {expected}, got {got}")]
    ArgCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Compiled scalar closure: maps an argument slice to a value.
type ScalarFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A compiled scalar-valued numeric function.
pub struct CompiledFn {
    f: ScalarFn,
    arity: usize,
}

impl CompiledFn {
    /// Number of arguments, equal to the declared symbol list's length.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Evaluate at `args`, which must match the declared list in both
    /// length and order.
    pub fn eval(&self, args: &[f64]) -> Result<f64> {
        if args.len() != self.arity {
            return Err(CompileError::ArgCount {
                expected: self.arity,
                got: args.len(),
            });
        }
        Ok((self.f)(args))
    }
}

// The closure tree itself is opaque; show the callable's shape.
impl fmt::Debug for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFn")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A compiled 3-vector-valued numeric function.
pub struct CompiledVecFn {
    comps: [ScalarFn; 3],
    arity: usize,
}

impl CompiledVecFn {
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn eval(&self, args: &[f64]) -> Result<Vector3<f64>> {
        if args.len() != self.arity {
            return Err(CompileError::ArgCount {
                expected: self.arity,
                got: args.len(),
            });
        }
        Ok(Vector3::new(
            (self.comps[0])(args),
            (self.comps[1])(args),
            (self.comps[2])(args),
        ))
    }

    /// Vectorized evaluation over a trajectory: each row of `inputs` is
    /// one argument tuple; the output has one row of (x, y, z) per input
    /// row.
    pub fn eval_batch(&self, inputs: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if inputs.ncols() != self.arity {
            return Err(CompileError::ArgCount {
                expected: self.arity,
                got: inputs.ncols(),
            });
        }
        let mut out = DMatrix::zeros(inputs.nrows(), 3);
        let mut row = vec![0.0; self.arity];
        for i in 0..inputs.nrows() {
            for (j, slot) in row.iter_mut().enumerate() {
                *slot = inputs[(i, j)];
            }
            for (k, f) in self.comps.iter().enumerate() {
                out[(i, k)] = f(&row);
            }
        }
        Ok(out)
    }
}

impl fmt::Debug for CompiledVecFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledVecFn")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Compile a scalar expression over an ordered argument list.
pub fn compile(expr: &Expr, args: &[Symbol], table: &SymTable) -> Result<CompiledFn> {
    let positions = arg_positions(args);
    let f = lower(expr, &positions, table)?;
    Ok(CompiledFn {
        f,
        arity: args.len(),
    })
}

/// Compile a component triple (e.g. a `FrameVec` projected onto a frame)
/// over one shared argument list.
pub fn compile_vec(
    comps: &[Expr; 3],
    args: &[Symbol],
    table: &SymTable,
) -> Result<CompiledVecFn> {
    let positions = arg_positions(args);
    let x = lower(&comps[0], &positions, table)?;
    let y = lower(&comps[1], &positions, table)?;
    let z = lower(&comps[2], &positions, table)?;
    Ok(CompiledVecFn {
        comps: [x, y, z],
        arity: args.len(),
    })
}

fn arg_positions(args: &[Symbol]) -> HashMap<Symbol, usize> {
    args.iter().enumerate().map(|(i, &s)| (s, i)).collect()
}

/// Recursively lower an expression to a closure tree. Unbound symbols and
/// residual derivatives surface here, at compile time.
fn lower(
    expr: &Expr,
    positions: &HashMap<Symbol, usize>,
    table: &SymTable,
) -> Result<ScalarFn> {
    match expr {
        Expr::Const(c) => {
            let c = *c;
            Ok(Box::new(move |_| c))
        }
        Expr::Sym(s) => match positions.get(s) {
            Some(&i) => Ok(Box::new(move |a: &[f64]| a[i])),
            None => Err(CompileError::UnboundSymbol(table.name(*s).to_string())),
        },
        Expr::Deriv { sym, order } => Err(CompileError::ResidualDerivative {
            name: table.name(*sym).to_string(),
            order: *order,
        }),
        Expr::Bin { op, lhs, rhs } => {
            let l = lower(lhs, positions, table)?;
            let r = lower(rhs, positions, table)?;
            Ok(match op {
                BinOp::Add => Box::new(move |a: &[f64]| l(a) + r(a)),
                BinOp::Sub => Box::new(move |a: &[f64]| l(a) - r(a)),
                BinOp::Mul => Box::new(move |a: &[f64]| l(a) * r(a)),
                BinOp::Div => Box::new(move |a: &[f64]| l(a) / r(a)),
            })
        }
        Expr::Neg(e) => {
            let inner = lower(e, positions, table)?;
            Ok(Box::new(move |a: &[f64]| -inner(a)))
        }
        Expr::Sin(e) => {
            let inner = lower(e, positions, table)?;
            Ok(Box::new(move |a: &[f64]| inner(a).sin()))
        }
        Expr::Cos(e) => {
            let inner = lower(e, positions, table)?;
            Ok(Box::new(move |a: &[f64]| inner(a).cos()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SymTable, Symbol, Symbol) {
        let mut table = SymTable::new();
        let u1 = table.sym("u1").unwrap();
        let u2 = table.sym("u2").unwrap();
        (table, u1, u2)
    }

    #[test]
    fn compiles_and_evaluates_in_declared_order() {
        let (table, u1, u2) = setup();
        // u1 - 2*u2 is order-sensitive
        let e = Expr::from(u1) - Expr::Const(2.0) * Expr::from(u2);
        let f = compile(&e, &[u1, u2], &table).unwrap();
        assert_eq!(f.eval(&[5.0, 1.0]).unwrap(), 3.0);

        let swapped = compile(&e, &[u2, u1], &table).unwrap();
        assert_ne!(
            f.eval(&[5.0, 1.0]).unwrap(),
            swapped.eval(&[5.0, 1.0]).unwrap()
        );
    }

    #[test]
    fn unbound_symbol_fails_at_compile_time() {
        let (table, u1, u2) = setup();
        let e = Expr::from(u1) + Expr::from(u2);
        let err = compile(&e, &[u1], &table).unwrap_err();
        assert!(matches!(err, CompileError::UnboundSymbol(name) if name == "u2"));
    }

    #[test]
    fn residual_derivative_is_rejected() {
        let mut table = SymTable::new();
        let theta = table.dynamic("theta").unwrap();
        let e = Expr::deriv(theta, 1, &table).unwrap();
        let err = compile(&e, &[], &table).unwrap_err();
        assert!(matches!(err, CompileError::ResidualDerivative { .. }));
    }

    #[test]
    fn wrong_arity_is_a_call_time_error() {
        let (table, u1, u2) = setup();
        let e = Expr::from(u1) * Expr::from(u2);
        let f = compile(&e, &[u1, u2], &table).unwrap();
        assert!(matches!(
            f.eval(&[1.0]),
            Err(CompileError::ArgCount {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn extra_declared_arguments_are_allowed() {
        let (mut table, u1, u2) = setup();
        let unused = table.sym("m1").unwrap();
        let e = Expr::from(u1) + Expr::from(u2);
        let f = compile(&e, &[u1, u2, unused], &table).unwrap();
        assert_eq!(f.eval(&[1.0, 2.0, 99.0]).unwrap(), 3.0);
    }

    #[test]
    fn compiled_functions_are_debuggable() {
        // Result<CompiledFn, _>::unwrap_err in callers needs Debug on the
        // Ok type; make sure both wrappers format without exposing the
        // closure tree.
        let (table, u1, u2) = setup();
        let f = compile(&(Expr::from(u1) + Expr::from(u2)), &[u1, u2], &table).unwrap();
        assert!(format!("{f:?}").contains("arity: 2"));
        let comps = [Expr::from(u1), Expr::from(u2), Expr::ZERO];
        let v = compile_vec(&comps, &[u1, u2], &table).unwrap();
        assert!(format!("{v:?}").contains("CompiledVecFn"));
    }

    #[test]
    fn batch_evaluation_matches_pointwise() {
        let (table, u1, u2) = setup();
        let comps = [
            Expr::from(u1).sin(),
            Expr::from(u2).cos(),
            Expr::from(u1) * Expr::from(u2),
        ];
        let f = compile_vec(&comps, &[u1, u2], &table).unwrap();

        let inputs = DMatrix::from_row_slice(2, 2, &[0.1, 0.2, 0.3, 0.4]);
        let batch = f.eval_batch(&inputs).unwrap();
        for i in 0..2 {
            let single = f.eval(&[inputs[(i, 0)], inputs[(i, 1)]]).unwrap();
            for k in 0..3 {
                assert!((batch[(i, k)] - single[k]).abs() < 1e-15);
            }
        }
    }
}
