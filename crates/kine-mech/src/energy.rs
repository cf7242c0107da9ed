//! Kinetic energy from point velocities.

use kine_expr::{Expr, Symbol};

use crate::error::{MechError, Result};
use crate::vector::FrameVec;

/// Total kinetic energy of the two bobs:
/// `0.5*m1*(v1.v1) + 0.5*m2*(v2.v2)`.
///
/// Both velocities must already be resolved in a common frame; the dot
/// product surfaces a `FrameMismatch` otherwise.
pub fn kinetic_energy(
    m1: Symbol,
    m2: Symbol,
    v1: &FrameVec,
    v2: &FrameVec,
) -> Result<Expr> {
    // each self-dot is trivially frame-consistent, so the two velocities
    // must be checked against each other explicitly
    if v1.frame != v2.frame {
        return Err(MechError::FrameMismatch {
            expected: v1.frame,
            found: v2.frame,
        });
    }
    let ke1 = Expr::Const(0.5) * Expr::from(m1) * v1.dot(v1)?;
    let ke2 = Expr::Const(0.5) * Expr::from(m2) * v2.dot(v2)?;
    Ok((ke1 + ke2).simplify())
}
