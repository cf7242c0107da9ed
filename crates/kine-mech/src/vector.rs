//! Symbolic 3-vectors resolved in a frame's basis.

use kine_expr::{Expr, SubsMap, SymTable};

use crate::error::{MechError, Result};
use crate::frame::{mat_apply, FrameId, FrameSys, RotAxis};

/// A vector with components resolved in one frame's basis.
///
/// Combining two `FrameVec`s (add/sub/dot/cross) requires both to be
/// resolved in the same frame; mixing frames without an explicit
/// [`FrameVec::express_in`] is a `FrameMismatch` error, never a silent
/// component-wise operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVec {
    pub frame: FrameId,
    pub x: Expr,
    pub y: Expr,
    pub z: Expr,
}

impl FrameVec {
    pub fn new(frame: FrameId, x: Expr, y: Expr, z: Expr) -> Self {
        Self { frame, x, y, z }
    }

    pub fn zero(frame: FrameId) -> Self {
        Self::new(frame, Expr::ZERO, Expr::ZERO, Expr::ZERO)
    }

    /// Unit basis vector of `frame`.
    pub fn axis(frame: FrameId, axis: RotAxis) -> Self {
        let mut v = Self::zero(frame);
        match axis {
            RotAxis::X => v.x = Expr::ONE,
            RotAxis::Y => v.y = Expr::ONE,
            RotAxis::Z => v.z = Expr::ONE,
        }
        v
    }

    pub fn comps(&self) -> [Expr; 3] {
        [self.x.clone(), self.y.clone(), self.z.clone()]
    }

    fn check_frame(&self, other: &FrameVec) -> Result<()> {
        if self.frame != other.frame {
            return Err(MechError::FrameMismatch {
                expected: self.frame,
                found: other.frame,
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &FrameVec) -> Result<FrameVec> {
        self.check_frame(other)?;
        Ok(FrameVec::new(
            self.frame,
            self.x.clone() + other.x.clone(),
            self.y.clone() + other.y.clone(),
            self.z.clone() + other.z.clone(),
        ))
    }

    pub fn sub(&self, other: &FrameVec) -> Result<FrameVec> {
        self.check_frame(other)?;
        Ok(FrameVec::new(
            self.frame,
            self.x.clone() - other.x.clone(),
            self.y.clone() - other.y.clone(),
            self.z.clone() - other.z.clone(),
        ))
    }

    pub fn scale(&self, factor: Expr) -> FrameVec {
        FrameVec::new(
            self.frame,
            factor.clone() * self.x.clone(),
            factor.clone() * self.y.clone(),
            factor * self.z.clone(),
        )
    }

    /// Standard inner product of two vectors resolved in the same frame.
    pub fn dot(&self, other: &FrameVec) -> Result<Expr> {
        self.check_frame(other)?;
        Ok((self.x.clone() * other.x.clone()
            + self.y.clone() * other.y.clone()
            + self.z.clone() * other.z.clone())
        .simplify())
    }

    pub fn cross(&self, other: &FrameVec) -> Result<FrameVec> {
        self.check_frame(other)?;
        Ok(FrameVec::new(
            self.frame,
            self.y.clone() * other.z.clone() - self.z.clone() * other.y.clone(),
            self.z.clone() * other.x.clone() - self.x.clone() * other.z.clone(),
            self.x.clone() * other.y.clone() - self.y.clone() * other.x.clone(),
        ))
    }

    /// Re-resolve the components in another frame's basis through the DCM.
    pub fn express_in(&self, frame: FrameId, sys: &FrameSys) -> Result<FrameVec> {
        if frame == self.frame {
            return Ok(self.clone());
        }
        let rot = sys.dcm(self.frame, frame);
        let [x, y, z] = mat_apply(&rot, &self.comps());
        Ok(FrameVec::new(frame, x, y, z))
    }

    /// Time derivative as observed from `observer`, via the transport
    /// theorem: `dv/dt|_N = dv/dt|_F + w_F/N x v`, with F the frame the
    /// components are resolved in. The result stays resolved in F.
    pub fn dt_in(
        &self,
        observer: FrameId,
        sys: &FrameSys,
        table: &SymTable,
    ) -> Result<FrameVec> {
        let local = FrameVec::new(
            self.frame,
            self.x.dt(table),
            self.y.dt(table),
            self.z.dt(table),
        );
        if self.frame == observer {
            return Ok(local);
        }
        let w = sys.ang_vel_in(self.frame, observer, table)?;
        local.add(&w.cross(self)?)
    }

    /// Component-wise structural substitution.
    pub fn subs(&self, map: &SubsMap) -> FrameVec {
        FrameVec::new(
            self.frame,
            map.apply(&self.x),
            map.apply(&self.y),
            map.apply(&self.z),
        )
    }

    /// Substitution that fails on residual time-derivatives.
    pub fn subs_checked(&self, map: &SubsMap, table: &SymTable) -> Result<FrameVec> {
        Ok(FrameVec::new(
            self.frame,
            map.apply_checked(&self.x, table)?,
            map.apply_checked(&self.y, table)?,
            map.apply_checked(&self.z, table)?,
        ))
    }

    pub fn simplify(&self) -> FrameVec {
        FrameVec::new(
            self.frame,
            self.x.simplify(),
            self.y.simplify(),
            self.z.simplify(),
        )
    }

    /// Project onto `frame`'s basis and return the component column,
    /// ready for the numeric compiler.
    pub fn to_matrix(&self, frame: FrameId, sys: &FrameSys) -> Result<[Expr; 3]> {
        Ok(self.express_in(frame, sys)?.simplify().comps())
    }
}
