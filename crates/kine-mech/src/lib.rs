//! Rigid-body kinematics over symbolic scalars.
//!
//! `kine-mech` builds on `kine-expr` to express the classical derivation
//! machinery: a tree of reference frames chained by axis/angle rotations,
//! direction cosine matrices composed along the tree, angular velocity by
//! composition (never re-derived from rotation matrices), frame-resolved
//! symbolic vectors with the transport-theorem time derivative, and points
//! whose velocity/acceleration are established through the two-point
//! moving-frame theorem at construction time.
//!
//! The crate also carries the concrete double-pendulum model the pipeline
//! derives: frames N → A → B rotated about z by dynamic angles θ1, θ2,
//! points O → P1 → P2 along the link x-axes, and the rate/acceleration
//! substitution symbols u1, u2, a1, a2.

pub mod energy;
pub mod error;
pub mod frame;
pub mod kinematics;
pub mod model;
pub mod point;
pub mod rates;
pub mod vector;

pub use energy::kinetic_energy;
pub use error::{MechError, Result};
pub use frame::{ExprMat3, FrameId, FrameSys, RotAxis};
pub use kinematics::{angular_velocities, point_kinematics, PointKinematics};
pub use model::{double_pendulum_frames, DoublePendulum};
pub use point::{PointId, PointSys};
pub use rates::RateSubs;
pub use vector::FrameVec;
