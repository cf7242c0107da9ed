//! Integration tests for the full derive → substitute → compile pipeline.

use approx::assert_relative_eq;

use kine::{
    angular_velocities, compile, compile_vec, double_pendulum_frames,
    kinetic_energy, point_kinematics, CompileError, CompiledFn, CompiledVecFn,
    Expr, FrameVec, MechError, RateSubs, RotAxis, SymTable, Symbol,
};

/// Everything the pipeline produces, compiled over fixed argument lists:
/// f_vel_p1(L1, th1, u1, u2); f_vel_p2(L1, L2, th1, th2, u1, u2);
/// f_acc_*(L1, L2, th1, th2, u1, u2, a1, a2);
/// f_ke(m1, m2, L1, L2, th1, th2, u1, u2).
struct Pipeline {
    table: SymTable,
    m1: Symbol,
    m2: Symbol,
    ke_expr: Expr,
    vel_p2_comps: [Expr; 3],
    vel_args: [Symbol; 6],
    f_vel_p1: CompiledVecFn,
    f_vel_p2: CompiledVecFn,
    f_acc_p1: CompiledVecFn,
    f_acc_p2: CompiledVecFn,
    f_ke: CompiledFn,
}

fn pipeline() -> Pipeline {
    let mut table = SymTable::new();
    let dp = double_pendulum_frames(&mut table).unwrap();
    let l1 = table.sym("L1").unwrap();
    let l2 = table.sym("L2").unwrap();
    let m1 = table.sym("m1").unwrap();
    let m2 = table.sym("m2").unwrap();
    let rates = RateSubs::new(&mut table, dp.theta1, dp.theta2).unwrap();

    let kin = point_kinematics(&dp, l1, l2, &table).unwrap();
    let vel_map = rates.velocity_map();
    let acc_map = rates.acceleration_map();

    let vel_p1 = kin.vel_p1.subs_checked(&vel_map, &table).unwrap();
    let vel_p2 = kin.vel_p2.subs_checked(&vel_map, &table).unwrap();
    let acc_p1 = kin.acc_p1.subs_checked(&acc_map, &table).unwrap();
    let acc_p2 = kin.acc_p2.subs_checked(&acc_map, &table).unwrap();

    let vel_args = [l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2];
    let full_args = [
        l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2, rates.a1, rates.a2,
    ];

    let vel_p2_comps = vel_p2.to_matrix(dp.n, &dp.frames).unwrap();
    let f_vel_p1 = compile_vec(
        &vel_p1.to_matrix(dp.n, &dp.frames).unwrap(),
        &[l1, dp.theta1, rates.u1, rates.u2],
        &table,
    )
    .unwrap();
    let f_vel_p2 = compile_vec(&vel_p2_comps, &vel_args, &table).unwrap();
    let f_acc_p1 = compile_vec(
        &acc_p1.to_matrix(dp.n, &dp.frames).unwrap(),
        &full_args,
        &table,
    )
    .unwrap();
    let f_acc_p2 = compile_vec(
        &acc_p2.to_matrix(dp.n, &dp.frames).unwrap(),
        &full_args,
        &table,
    )
    .unwrap();

    let ke = kinetic_energy(m1, m2, &kin.vel_p1, &kin.vel_p2).unwrap();
    let ke_expr = vel_map.apply_checked(&ke, &table).unwrap();
    let f_ke = compile(
        &ke_expr,
        &[m1, m2, l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2],
        &table,
    )
    .unwrap();

    Pipeline {
        table,
        m1,
        m2,
        ke_expr,
        vel_p2_comps,
        vel_args,
        f_vel_p1,
        f_vel_p2,
        f_acc_p1,
        f_acc_p2,
        f_ke,
    }
}

#[test]
fn rest_state_has_zero_kinematics_and_energy() {
    let p = pipeline();
    let v1 = p.f_vel_p1.eval(&[1.0, 0.0, 0.0, 0.0]).unwrap();
    let v2 = p.f_vel_p2.eval(&[1.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    let zeros8 = [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let a1 = p.f_acc_p1.eval(&zeros8).unwrap();
    let a2 = p.f_acc_p2.eval(&zeros8).unwrap();
    for v in [v1, v2, a1, a2] {
        assert_relative_eq!(v.norm(), 0.0);
    }
    let ke = p
        .f_ke
        .eval(&[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0])
        .unwrap();
    assert_relative_eq!(ke, 0.0);
}

#[test]
fn vel_p1_golden_value() {
    // f_velP1(L1=1.0, theta1=0.5, u1=1.0, u2=2.0) = (-sin 0.5, cos 0.5, 0)
    let p = pipeline();
    let v = p.f_vel_p1.eval(&[1.0, 0.5, 1.0, 2.0]).unwrap();
    assert_relative_eq!(v[0], -(0.5f64.sin()), epsilon = 1e-12);
    assert_relative_eq!(v[1], 0.5f64.cos(), epsilon = 1e-12);
    assert_relative_eq!(v[2], 0.0, epsilon = 1e-12);
}

#[test]
fn theta2_zero_reduces_to_a_single_pendulum() {
    // With theta2 = u2 = a2 = 0, frame B coincides with A and P2 behaves
    // like a single bob at distance L1 + L2: tangential (L1+L2)*a1 along
    // A.y, centripetal -(L1+L2)*u1^2 along A.x, rotated into N by theta1.
    let p = pipeline();
    let (l1, l2) = (1.3, 0.6);
    for &(theta1, u1, a1) in &[(0.0, 1.0, 0.0), (0.8, -0.4, 2.0), (-1.2, 2.5, -0.7)] {
        let acc = p
            .f_acc_p2
            .eval(&[l1, l2, theta1, 0.0, u1, 0.0, a1, 0.0])
            .unwrap();
        let r = l1 + l2;
        let (ax_a, ay_a) = (-r * u1 * u1, r * a1);
        let (s, c) = theta1.sin_cos();
        let expected_x = c * ax_a - s * ay_a;
        let expected_y = s * ax_a + c * ay_a;
        assert_relative_eq!(acc[0], expected_x, epsilon = 1e-9);
        assert_relative_eq!(acc[1], expected_y, epsilon = 1e-9);
        assert_relative_eq!(acc[2], 0.0, epsilon = 1e-12);
    }
}

#[test]
fn kinetic_energy_is_nonnegative() {
    let p = pipeline();
    for &theta1 in &[-2.0, -0.3, 0.0, 1.1, 3.0] {
        for &theta2 in &[-1.5, 0.0, 0.4, 2.8] {
            for &u1 in &[-3.0, 0.0, 0.5, 2.0] {
                for &u2 in &[-1.0, 0.0, 4.0] {
                    let ke = p
                        .f_ke
                        .eval(&[0.7, 2.1, 1.0, 1.5, theta1, theta2, u1, u2])
                        .unwrap();
                    assert!(ke >= -1e-12, "KE = {ke} at ({theta1}, {theta2}, {u1}, {u2})");
                }
            }
        }
    }
}

#[test]
fn argument_order_is_significant() {
    // Swapping u1 and u2 in the declared list must change the numbers for
    // asymmetric rates; a silent argument-order bug would keep them equal.
    let p = pipeline();
    let mut swapped_args = p.vel_args;
    swapped_args.swap(4, 5);
    let f_swapped = compile_vec(&p.vel_p2_comps, &swapped_args, &p.table).unwrap();

    let inputs = [1.0, 1.0, 0.5, 0.3, 1.0, 2.0]; // u1 != u2
    let a = p.f_vel_p2.eval(&inputs).unwrap();
    let b = f_swapped.eval(&inputs).unwrap();
    assert!((a - b).norm() > 1e-6);
}

#[test]
fn unbound_symbol_is_rejected_at_compile_time() {
    let p = pipeline();
    // omit m1 from the declared list: must error, not treat m1 as zero
    let mut args = p.vel_args.to_vec();
    args.push(p.m2);
    assert!(!args.contains(&p.m1));
    let err = compile(&p.ke_expr, &args, &p.table).unwrap_err();
    assert!(matches!(err, CompileError::UnboundSymbol(name) if name == "m1"));
}

#[test]
fn mixed_frame_energy_input_is_a_frame_mismatch() {
    let mut table = SymTable::new();
    let dp = double_pendulum_frames(&mut table).unwrap();
    let m1 = table.sym("m1").unwrap();
    let m2 = table.sym("m2").unwrap();

    let in_n = FrameVec::axis(dp.n, RotAxis::X);
    let in_a = FrameVec::axis(dp.a, RotAxis::X);
    assert!(matches!(
        kinetic_energy(m1, m2, &in_n, &in_a),
        Err(MechError::FrameMismatch { .. })
    ));
}

#[test]
fn angular_velocity_of_b_composes_both_rates() {
    let mut table = SymTable::new();
    let dp = double_pendulum_frames(&mut table).unwrap();
    let rates = RateSubs::new(&mut table, dp.theta1, dp.theta2).unwrap();

    let (w_a, w_b) = angular_velocities(&dp, &table).unwrap();
    let vel_map = rates.velocity_map();
    let w_a = w_a.subs_checked(&vel_map, &table).unwrap();
    let w_b = w_b.subs_checked(&vel_map, &table).unwrap();

    let f_w_a = compile_vec(
        &w_a.to_matrix(dp.n, &dp.frames).unwrap(),
        &[rates.u1, rates.u2],
        &table,
    )
    .unwrap();
    let f_w_b = compile_vec(
        &w_b.to_matrix(dp.n, &dp.frames).unwrap(),
        &[rates.u1, rates.u2],
        &table,
    )
    .unwrap();

    let wa = f_w_a.eval(&[1.0, 2.0]).unwrap();
    let wb = f_w_b.eval(&[1.0, 2.0]).unwrap();
    assert_relative_eq!(wa[2], 1.0, epsilon = 1e-12);
    assert_relative_eq!(wb[2], 3.0, epsilon = 1e-12);
    assert_relative_eq!(wa[0], 0.0);
    assert_relative_eq!(wb[1], 0.0);
}

#[test]
fn compiled_energy_matches_the_closed_form() {
    // KE = 0.5 m1 L1^2 u1^2
    //    + 0.5 m2 (L1^2 u1^2 + L2^2 (u1+u2)^2
    //              + 2 L1 L2 u1 (u1+u2) cos theta2)
    let p = pipeline();
    let (m1, m2, l1, l2) = (1.4, 0.9, 1.2, 0.8);
    let (theta1, theta2, u1, u2) = (0.6, -0.9, 1.7, -0.3);
    let ke = p
        .f_ke
        .eval(&[m1, m2, l1, l2, theta1, theta2, u1, u2])
        .unwrap();
    let expected = 0.5 * m1 * l1 * l1 * u1 * u1
        + 0.5 * m2
            * (l1 * l1 * u1 * u1
                + l2 * l2 * (u1 + u2) * (u1 + u2)
                + 2.0 * l1 * l2 * u1 * (u1 + u2) * theta2.cos());
    assert_relative_eq!(ke, expected, epsilon = 1e-9);
}
