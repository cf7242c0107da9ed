//! Points and the two-point moving-frame theorem.
//!
//! A point either has its velocity set explicitly in some frame (the
//! origin) or is located from a parent point by a symbolic offset. The
//! two-point theorem is applied eagerly by [`PointSys::v2pt`] — it
//! establishes both velocity and acceleration the moment the chain is
//! built, so a later query can never observe a half-derived state.

use kine_expr::SymTable;

use crate::error::{MechError, Result};
use crate::frame::{FrameId, FrameSys};
use crate::vector::FrameVec;

/// Handle to a point inside a [`PointSys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointId(u32);

impl PointId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct PointNode {
    name: String,
    /// Parent point and the offset from it, for located points.
    located: Option<(PointId, FrameVec)>,
    /// Established velocities, per observer frame.
    vel: Vec<(FrameId, FrameVec)>,
    /// Established accelerations, per observer frame.
    acc: Vec<(FrameId, FrameVec)>,
}

/// Registry of points built during one derivation session.
#[derive(Default)]
pub struct PointSys {
    points: Vec<PointNode>,
}

impl PointSys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a free-standing point (kinematics unset until `set_vel`).
    pub fn point(&mut self, name: &str) -> PointId {
        self.push(name, None)
    }

    /// Create a point at a symbolic `offset` from `parent`.
    pub fn locate(&mut self, parent: PointId, name: &str, offset: FrameVec) -> PointId {
        self.push(name, Some((parent, offset)))
    }

    fn push(&mut self, name: &str, located: Option<(PointId, FrameVec)>) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(PointNode {
            name: name.to_string(),
            located,
            vel: Vec::new(),
            acc: Vec::new(),
        });
        id
    }

    pub fn name(&self, point: PointId) -> &str {
        &self.points[point.index()].name
    }

    /// Set the velocity of `point` as observed from `frame` directly
    /// (used for the fixed origin, which has zero velocity).
    pub fn set_vel(&mut self, point: PointId, frame: FrameId, vel: FrameVec) {
        upsert(&mut self.points[point.index()].vel, frame, vel);
    }

    pub fn set_acc(&mut self, point: PointId, frame: FrameId, acc: FrameVec) {
        upsert(&mut self.points[point.index()].acc, frame, acc);
    }

    /// Velocity of `point` in `frame`; `UnsetKinematics` until the
    /// transport theorem (or `set_vel`) has established it.
    pub fn vel(&self, point: PointId, frame: FrameId, sys: &FrameSys) -> Result<FrameVec> {
        lookup(&self.points[point.index()].vel, frame).ok_or_else(|| {
            MechError::UnsetKinematics {
                point: self.name(point).to_string(),
                frame: sys.name(frame).to_string(),
            }
        })
    }

    /// Acceleration of `point` in `frame`; same policy as [`PointSys::vel`].
    pub fn acc(&self, point: PointId, frame: FrameId, sys: &FrameSys) -> Result<FrameVec> {
        lookup(&self.points[point.index()].acc, frame).ok_or_else(|| {
            MechError::UnsetKinematics {
                point: self.name(point).to_string(),
                frame: sys.name(frame).to_string(),
            }
        })
    }

    /// Two-point theorem for a point fixed in a rotating frame.
    ///
    /// `point` must be located from `reference`, both fixed in
    /// `fixed_frame`, observed from `observer`:
    ///
    /// ```text
    /// v_P = v_O + w x r
    /// a_P = a_O + alpha x r + w x (w x r)
    /// ```
    ///
    /// with `w` the angular velocity of `fixed_frame` in `observer`,
    /// `alpha` its time derivative, and `r` the locating offset. Both the
    /// velocity and the acceleration of `point` in `observer` are
    /// established here, resolved in `observer`'s basis. If the reference
    /// point has no established acceleration it is derived from its
    /// velocity by direct time-differentiation (zero for a fixed origin).
    pub fn v2pt(
        &mut self,
        point: PointId,
        reference: PointId,
        observer: FrameId,
        fixed_frame: FrameId,
        frames: &FrameSys,
        table: &SymTable,
    ) -> Result<()> {
        let offset = match &self.points[point.index()].located {
            Some((parent, offset)) if *parent == reference => offset.clone(),
            _ => {
                return Err(MechError::NotLocated {
                    point: self.name(point).to_string(),
                    reference: self.name(reference).to_string(),
                })
            }
        };

        let w = frames.ang_vel_in(fixed_frame, observer, table)?;
        let r = offset.express_in(fixed_frame, frames)?;

        // Velocity level.
        let v_ref = self
            .vel(reference, observer, frames)?
            .express_in(fixed_frame, frames)?;
        let v = v_ref.add(&w.cross(&r)?)?;
        self.set_vel(point, observer, v.express_in(observer, frames)?.simplify());

        // Acceleration level, established immediately — never deferred.
        let a_ref = match self.acc(reference, observer, frames) {
            Ok(a) => a,
            Err(MechError::UnsetKinematics { .. }) => {
                let a = self
                    .vel(reference, observer, frames)?
                    .dt_in(observer, frames, table)?
                    .express_in(observer, frames)?
                    .simplify();
                self.set_acc(reference, observer, a.clone());
                a
            }
            Err(e) => return Err(e),
        };
        let a_ref = a_ref.express_in(fixed_frame, frames)?;
        let alpha = w.dt_in(observer, frames, table)?;
        let a = a_ref
            .add(&alpha.cross(&r)?)?
            .add(&w.cross(&w.cross(&r)?)?)?;
        self.set_acc(point, observer, a.express_in(observer, frames)?.simplify());

        Ok(())
    }
}

fn upsert(slots: &mut Vec<(FrameId, FrameVec)>, frame: FrameId, value: FrameVec) {
    for (f, v) in slots.iter_mut() {
        if *f == frame {
            *v = value;
            return;
        }
    }
    slots.push((frame, value));
}

fn lookup(slots: &[(FrameId, FrameVec)], frame: FrameId) -> Option<FrameVec> {
    slots
        .iter()
        .find(|(f, _)| *f == frame)
        .map(|(_, v)| v.clone())
}
