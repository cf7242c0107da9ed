//! Error types for kine-expr.

use thiserror::Error;

use crate::symtab::SymKind;

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("symbol `{name}` already interned as {existing:?}, requested {requested:?}")]
    KindMismatch {
        name: String,
        existing: SymKind,
        requested: SymKind,
    },

    #[error("cannot form a time-derivative of constant symbol `{0}`")]
    DeriveConstant(String),

    #[error("unbound symbol `{0}` during evaluation")]
    UnboundSymbol(String),

    #[error("residual time-derivative of `{name}` (order {order}) after substitution")]
    ResidualDerivative { name: String, order: u32 },
}

pub type Result<T> = std::result::Result<T, ExprError>;
