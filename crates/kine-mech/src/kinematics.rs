//! Double-pendulum kinematics derivation.
//!
//! Mirrors the classic two-link derivation: angular velocities by
//! composition along N -> A -> B, then the point chain O -> P1 -> P2 with
//! velocity and acceleration established through the two-point theorem at
//! each link. All outputs are resolved in the inertial frame. The link
//! lengths enter as symbols, never as numbers, so the derived expressions
//! are reusable across configurations.

use kine_expr::{Expr, SymTable, Symbol};

use crate::error::Result;
use crate::frame::RotAxis;
use crate::model::DoublePendulum;
use crate::point::PointSys;
use crate::vector::FrameVec;

/// The four derived point-kinematic vectors, resolved in N.
pub struct PointKinematics {
    pub vel_p1: FrameVec,
    pub vel_p2: FrameVec,
    pub acc_p1: FrameVec,
    pub acc_p2: FrameVec,
}

/// Angular velocities of A and B in N, each resolved in its own frame.
///
/// w_B/N is composed as w_B/A + w_A/N along the frame tree.
pub fn angular_velocities(
    dp: &DoublePendulum,
    table: &SymTable,
) -> Result<(FrameVec, FrameVec)> {
    let w_a = dp.frames.ang_vel_in(dp.a, dp.n, table)?;
    let w_b = dp.frames.ang_vel_in(dp.b, dp.n, table)?;
    Ok((w_a, w_b))
}

/// Derive velocity and acceleration of both link endpoints in N.
///
/// O is fixed in N (zero velocity); P1 sits at `l1` along A.x from O and
/// P2 at `l2` along B.x from P1. Each link applies the two-point theorem
/// the moment the point is created.
pub fn point_kinematics(
    dp: &DoublePendulum,
    l1: Symbol,
    l2: Symbol,
    table: &SymTable,
) -> Result<PointKinematics> {
    let mut points = PointSys::new();

    let o = points.point("O");
    points.set_vel(o, dp.n, FrameVec::zero(dp.n));

    let p1 = points.locate(
        o,
        "P1",
        FrameVec::axis(dp.a, RotAxis::X).scale(Expr::from(l1)),
    );
    points.v2pt(p1, o, dp.n, dp.a, &dp.frames, table)?;

    let p2 = points.locate(
        p1,
        "P2",
        FrameVec::axis(dp.b, RotAxis::X).scale(Expr::from(l2)),
    );
    points.v2pt(p2, p1, dp.n, dp.b, &dp.frames, table)?;

    Ok(PointKinematics {
        vel_p1: points.vel(p1, dp.n, &dp.frames)?,
        vel_p2: points.vel(p2, dp.n, &dp.frames)?,
        acc_p1: points.acc(p1, dp.n, &dp.frames)?,
        acc_p2: points.acc(p2, dp.n, &dp.frames)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::double_pendulum_frames;
    use crate::rates::RateSubs;
    use std::collections::HashMap;

    #[test]
    fn vel_p1_is_the_textbook_tangent_vector() {
        let mut table = SymTable::new();
        let dp = double_pendulum_frames(&mut table).unwrap();
        let l1 = table.sym("L1").unwrap();
        let l2 = table.sym("L2").unwrap();
        let rates = RateSubs::new(&mut table, dp.theta1, dp.theta2).unwrap();

        let kin = point_kinematics(&dp, l1, l2, &table).unwrap();
        let v = kin
            .vel_p1
            .subs_checked(&rates.velocity_map(), &table)
            .unwrap();

        // v_P1 in N = L1*u1*(-sin theta1, cos theta1, 0)
        let mut vals = HashMap::new();
        vals.insert(l1, 2.0);
        vals.insert(dp.theta1, 0.4);
        vals.insert(rates.u1, 3.0);
        vals.insert(rates.u2, 0.0);
        let vx = v.x.eval(&vals, &table).unwrap();
        let vy = v.y.eval(&vals, &table).unwrap();
        let vz = v.z.eval(&vals, &table).unwrap();
        assert!((vx + 2.0 * 3.0 * 0.4f64.sin()).abs() < 1e-12);
        assert!((vy - 2.0 * 3.0 * 0.4f64.cos()).abs() < 1e-12);
        assert!(vz.abs() < 1e-12);
    }

    #[test]
    fn acceleration_matches_differentiated_velocity() {
        // a2pt must agree with d/dt|_N of the v2pt velocity: the
        // substitution is applied only after all differentiation, so both
        // routes flatten to the same numbers.
        let mut table = SymTable::new();
        let dp = double_pendulum_frames(&mut table).unwrap();
        let l1 = table.sym("L1").unwrap();
        let l2 = table.sym("L2").unwrap();
        let rates = RateSubs::new(&mut table, dp.theta1, dp.theta2).unwrap();

        let kin = point_kinematics(&dp, l1, l2, &table).unwrap();
        let map = rates.acceleration_map();

        let direct = kin.acc_p2.subs_checked(&map, &table).unwrap();
        let differentiated = kin
            .vel_p2
            .dt_in(dp.n, &dp.frames, &table)
            .unwrap()
            .subs_checked(&map, &table)
            .unwrap();

        let mut vals = HashMap::new();
        vals.insert(l1, 1.0);
        vals.insert(l2, 0.7);
        vals.insert(dp.theta1, 0.3);
        vals.insert(dp.theta2, -1.1);
        vals.insert(rates.u1, 0.9);
        vals.insert(rates.u2, 2.2);
        vals.insert(rates.a1, -0.5);
        vals.insert(rates.a2, 1.3);

        for (d, e) in direct.comps().iter().zip(differentiated.comps().iter()) {
            let dv = d.eval(&vals, &table).unwrap();
            let ev = e.eval(&vals, &table).unwrap();
            assert!((dv - ev).abs() < 1e-9, "{dv} vs {ev}");
        }
    }
}
