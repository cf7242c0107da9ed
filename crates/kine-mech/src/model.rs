//! Double-pendulum frame construction.

use kine_expr::{Expr, SymTable, Symbol};

use crate::error::Result;
use crate::frame::{FrameId, FrameSys, RotAxis};

/// The double pendulum's frame triple and its angle symbols.
pub struct DoublePendulum {
    pub frames: FrameSys,
    /// Inertial frame.
    pub n: FrameId,
    /// First link frame, N rotated about N.z by theta1.
    pub a: FrameId,
    /// Second link frame, A rotated about A.z by theta2.
    pub b: FrameId,
    pub theta1: Symbol,
    pub theta2: Symbol,
}

/// Build the frame tree N -> A -> B.
///
/// Registers `theta1`, `theta2` as dynamic symbols (idempotent if they are
/// already interned as such), then chains A off N and B off A, each by a
/// z-axis rotation. Pure construction, no other state.
pub fn double_pendulum_frames(table: &mut SymTable) -> Result<DoublePendulum> {
    let theta1 = table.dynamic("theta1")?;
    let theta2 = table.dynamic("theta2")?;

    let (mut frames, n) = FrameSys::new("N");
    let a = frames.orient_axis(n, "A", RotAxis::Z, Expr::from(theta1));
    let b = frames.orient_axis(a, "B", RotAxis::Z, Expr::from(theta2));

    Ok(DoublePendulum {
        frames,
        n,
        a,
        b,
        theta1,
        theta2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kine_expr::SymKind;

    #[test]
    fn builder_registers_dynamic_angles() {
        let mut table = SymTable::new();
        let dp = double_pendulum_frames(&mut table).unwrap();
        assert_eq!(table.kind(dp.theta1), SymKind::Dynamic);
        assert_eq!(table.kind(dp.theta2), SymKind::Dynamic);
        // calling twice reuses the interned angles
        let dp2 = double_pendulum_frames(&mut table).unwrap();
        assert_eq!(dp.theta1, dp2.theta1);
    }

    #[test]
    fn builder_rejects_angles_previously_interned_as_constants() {
        let mut table = SymTable::new();
        table.sym("theta1").unwrap();
        assert!(double_pendulum_frames(&mut table).is_err());
    }
}
