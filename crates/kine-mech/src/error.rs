//! Error types for kine-mech.

use thiserror::Error;

use crate::frame::FrameId;

#[derive(Debug, Error)]
pub enum MechError {
    #[error("velocity/acceleration of point `{point}` not established in frame `{frame}`")]
    UnsetKinematics { point: String, frame: String },

    #[error("frame mismatch: vectors resolved in {expected:?} and {found:?}")]
    FrameMismatch { expected: FrameId, found: FrameId },

    #[error("frame `{frame}` is not reachable from ancestor `{ancestor}`")]
    NoPath { frame: String, ancestor: String },

    #[error("point `{point}` is not located from reference point `{reference}`")]
    NotLocated { point: String, reference: String },

    #[error(transparent)]
    Expr(#[from] kine_expr::ExprError),
}

pub type Result<T> = std::result::Result<T, MechError>;
