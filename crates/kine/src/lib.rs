//! kine — symbolic-to-numeric kinematics for the double pendulum.
//!
//! This is the umbrella crate: it re-exports the symbolic engine
//! (`kine-expr`), the rigid-body kinematics layer (`kine-mech`) and the
//! numeric compiler (`kine-compile`), and hosts the scalar configuration
//! loader plus the driver binary.
//!
//! The pipeline runs in one fixed order: build frames → derive angular
//! velocities and point kinematics via the transport theorems → derive
//! kinetic energy → substitute time-derivatives with independent rate and
//! acceleration symbols → compile to numeric functions. Only the compiled
//! functions survive the session; they are pure and repeatedly callable.

pub use kine_compile::{
    self, compile, compile_vec, CompileError, CompiledFn, CompiledVecFn,
};
pub use kine_expr::{self, Expr, ExprError, SubsMap, SymKind, SymTable, Symbol};
pub use kine_mech::{
    self, angular_velocities, double_pendulum_frames, kinetic_energy,
    point_kinematics, DoublePendulum, FrameId, FrameSys, FrameVec, MechError,
    PointId, PointKinematics, PointSys, RateSubs, RotAxis,
};

pub mod config;

pub use config::{ConfigError, PendulumConfig};
