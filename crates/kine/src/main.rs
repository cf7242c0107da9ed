//! Driver: derive the double-pendulum kinematics and energy symbolically,
//! compile to numeric functions, and print example evaluations.
//!
//! Optional first argument: path to a JSON config with l1/l2/m1/m2.

use std::env;
use std::error::Error;

use kine::{
    angular_velocities, compile, compile_vec, double_pendulum_frames,
    kinetic_energy, point_kinematics, PendulumConfig, RateSubs, SymTable,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cfg = match env::args().nth(1) {
        Some(path) => PendulumConfig::load(path)?,
        None => PendulumConfig::default(),
    };

    // 1) Symbols and frames.
    let mut table = SymTable::new();
    let dp = double_pendulum_frames(&mut table)?;
    let l1 = table.sym("L1")?;
    let l2 = table.sym("L2")?;
    let m1 = table.sym("m1")?;
    let m2 = table.sym("m2")?;
    let rates = RateSubs::new(&mut table, dp.theta1, dp.theta2)?;

    // 2) Angular velocities, rates substituted, compiled over (u1, u2).
    let (w_a, w_b) = angular_velocities(&dp, &table)?;
    let vel_map = rates.velocity_map();
    let w_a = w_a.subs_checked(&vel_map, &table)?;
    let w_b = w_b.subs_checked(&vel_map, &table)?;

    let f_w_a = compile_vec(
        &w_a.to_matrix(dp.n, &dp.frames)?,
        &[rates.u1, rates.u2],
        &table,
    )?;
    let f_w_b = compile_vec(
        &w_b.to_matrix(dp.n, &dp.frames)?,
        &[rates.u1, rates.u2],
        &table,
    )?;

    println!("Angular velocity of frame A in N:");
    println!("{}", f_w_a.eval(&[1.0, 2.0])?);
    println!("Angular velocity of frame B in N:");
    println!("{}", f_w_b.eval(&[1.0, 2.0])?);

    // 3) Point kinematics via the two-point theorem, then substitution:
    //    velocity map for velocities, acceleration map for accelerations.
    let kin = point_kinematics(&dp, l1, l2, &table)?;
    let acc_map = rates.acceleration_map();

    let vel_p1 = kin.vel_p1.subs_checked(&vel_map, &table)?;
    let vel_p2 = kin.vel_p2.subs_checked(&vel_map, &table)?;
    let acc_p1 = kin.acc_p1.subs_checked(&acc_map, &table)?;
    let acc_p2 = kin.acc_p2.subs_checked(&acc_map, &table)?;

    let f_vel_p1 = compile_vec(
        &vel_p1.to_matrix(dp.n, &dp.frames)?,
        &[l1, dp.theta1, rates.u1, rates.u2],
        &table,
    )?;
    let full_args = [
        l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2, rates.a1, rates.a2,
    ];
    let f_vel_p2 = compile_vec(
        &vel_p2.to_matrix(dp.n, &dp.frames)?,
        &[l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2],
        &table,
    )?;
    let f_acc_p1 = compile_vec(&acc_p1.to_matrix(dp.n, &dp.frames)?, &full_args, &table)?;
    let f_acc_p2 = compile_vec(&acc_p2.to_matrix(dp.n, &dp.frames)?, &full_args, &table)?;

    let (theta1, theta2, u1, u2, a1, a2) = (0.5, 0.3, 1.0, 2.0, 0.25, -0.5);

    println!("Velocity of P1 in N (L1={}, theta1={theta1}, u1={u1}, u2={u2}):", cfg.l1);
    println!("{}", f_vel_p1.eval(&[cfg.l1, theta1, u1, u2])?);
    println!("Velocity of P2 in N:");
    println!(
        "{}",
        f_vel_p2.eval(&[cfg.l1, cfg.l2, theta1, theta2, u1, u2])?
    );
    println!("Acceleration of P1 in N:");
    println!(
        "{}",
        f_acc_p1.eval(&[cfg.l1, cfg.l2, theta1, theta2, u1, u2, a1, a2])?
    );
    println!("Acceleration of P2 in N:");
    println!(
        "{}",
        f_acc_p2.eval(&[cfg.l1, cfg.l2, theta1, theta2, u1, u2, a1, a2])?
    );

    // 4) Kinetic energy: velocity-only, so only the velocity map applies.
    let ke = kinetic_energy(m1, m2, &kin.vel_p1, &kin.vel_p2)?;
    let ke = vel_map.apply_checked(&ke, &table)?;
    let f_ke = compile(
        &ke,
        &[m1, m2, l1, l2, dp.theta1, dp.theta2, rates.u1, rates.u2],
        &table,
    )?;

    println!("Total kinetic energy (m1={}, m2={}):", cfg.m1, cfg.m2);
    println!(
        "{}",
        f_ke.eval(&[cfg.m1, cfg.m2, cfg.l1, cfg.l2, theta1, theta2, u1, u2])?
    );

    Ok(())
}
