//! Reference frame tree: axis/angle links, DCMs, angular velocity.

use kine_expr::{Expr, SymTable};

use crate::error::{MechError, Result};
use crate::vector::FrameVec;

/// Handle to a frame inside a [`FrameSys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub(crate) u32);

impl FrameId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rotation axis of a frame relative to its parent (a parent basis vector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotAxis {
    X,
    Y,
    Z,
}

struct FrameLink {
    parent: FrameId,
    axis: RotAxis,
    angle: Expr,
}

struct FrameNode {
    name: String,
    link: Option<FrameLink>,
}

/// 3x3 matrix of expressions; `m[row][col]`.
pub type ExprMat3 = [[Expr; 3]; 3];

fn mat_identity() -> ExprMat3 {
    let mut m: ExprMat3 = Default::default();
    for (i, row) in m.iter_mut().enumerate() {
        for (j, e) in row.iter_mut().enumerate() {
            *e = if i == j { Expr::ONE } else { Expr::ZERO };
        }
    }
    m
}

fn mat_mul(a: &ExprMat3, b: &ExprMat3) -> ExprMat3 {
    let mut out: ExprMat3 = Default::default();
    for i in 0..3 {
        for j in 0..3 {
            let mut acc = Expr::ZERO;
            for (k, b_row) in b.iter().enumerate() {
                acc = acc + a[i][k].clone() * b_row[j].clone();
            }
            out[i][j] = acc.simplify();
        }
    }
    out
}

fn mat_transpose(m: &ExprMat3) -> ExprMat3 {
    let mut out: ExprMat3 = Default::default();
    for (i, row) in m.iter().enumerate() {
        for (j, e) in row.iter().enumerate() {
            out[j][i] = e.clone();
        }
    }
    out
}

pub(crate) fn mat_apply(m: &ExprMat3, v: &[Expr; 3]) -> [Expr; 3] {
    let mut out: [Expr; 3] = Default::default();
    for (i, row) in m.iter().enumerate() {
        let acc = row[0].clone() * v[0].clone()
            + row[1].clone() * v[1].clone()
            + row[2].clone() * v[2].clone();
        out[i] = acc.simplify();
    }
    out
}

/// Rotation matrix taking child-basis components to parent-basis components
/// for a rotation of `angle` about the given parent axis.
fn rot_parent_from_child(axis: RotAxis, angle: &Expr) -> ExprMat3 {
    let c = angle.clone().cos();
    let s = angle.clone().sin();
    let z = Expr::ZERO;
    let o = Expr::ONE;
    match axis {
        RotAxis::X => [
            [o, z.clone(), z.clone()],
            [z.clone(), c.clone(), -s.clone()],
            [z, s, c],
        ],
        RotAxis::Y => [
            [c.clone(), z.clone(), s.clone()],
            [z.clone(), o, z.clone()],
            [-s, z, c],
        ],
        RotAxis::Z => [
            [c.clone(), -s.clone(), z.clone()],
            [s, c, z.clone()],
            [z.clone(), z, o],
        ],
    }
}

/// Tree of reference frames rooted at a single inertial frame.
///
/// Frames are append-only; every non-root frame is defined by a rotation
/// about one of its parent's basis axes by a (possibly time-varying) angle.
pub struct FrameSys {
    frames: Vec<FrameNode>,
}

impl FrameSys {
    /// Create a system containing only the inertial root frame.
    pub fn new(root_name: &str) -> (Self, FrameId) {
        let sys = Self {
            frames: vec![FrameNode {
                name: root_name.to_string(),
                link: None,
            }],
        };
        (sys, FrameId(0))
    }

    /// Add a frame rotated about `axis` of `parent` by `angle`.
    pub fn orient_axis(
        &mut self,
        parent: FrameId,
        name: &str,
        axis: RotAxis,
        angle: Expr,
    ) -> FrameId {
        let id = FrameId(self.frames.len() as u32);
        self.frames.push(FrameNode {
            name: name.to_string(),
            link: Some(FrameLink {
                parent,
                axis,
                angle,
            }),
        });
        id
    }

    pub fn name(&self, frame: FrameId) -> &str {
        &self.frames[frame.index()].name
    }

    /// Chain of frames from `ancestor` (exclusive) down to `frame`
    /// (inclusive). Fails if `ancestor` is not on `frame`'s lineage.
    fn chain(&self, frame: FrameId, ancestor: FrameId) -> Result<Vec<FrameId>> {
        let mut chain = Vec::new();
        let mut cursor = frame;
        while cursor != ancestor {
            chain.push(cursor);
            match &self.frames[cursor.index()].link {
                Some(link) => cursor = link.parent,
                None => {
                    return Err(MechError::NoPath {
                        frame: self.name(frame).to_string(),
                        ancestor: self.name(ancestor).to_string(),
                    })
                }
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Rotation taking `frame`-basis components to root-basis components.
    fn root_from(&self, frame: FrameId) -> ExprMat3 {
        let mut rots = Vec::new();
        let mut cursor = frame;
        while let Some(link) = &self.frames[cursor.index()].link {
            rots.push(rot_parent_from_child(link.axis, &link.angle));
            cursor = link.parent;
        }
        let mut rot = mat_identity();
        for r in rots.into_iter().rev() {
            rot = mat_mul(&rot, &r);
        }
        rot
    }

    /// Direction cosine matrix taking `from`-basis components to
    /// `to`-basis components, composed along the frame tree.
    pub fn dcm(&self, from: FrameId, to: FrameId) -> ExprMat3 {
        if from == to {
            return mat_identity();
        }
        // R(to <- from) = R(root <- to)^T * R(root <- from). Both frames
        // live in one tree, so the root path always exists.
        let root_from_src = self.root_from(from);
        let root_from_dst = self.root_from(to);
        mat_mul(&mat_transpose(&root_from_dst), &root_from_src)
    }

    /// Angular velocity of `frame` in `ancestor`, resolved in `frame`'s
    /// own basis.
    ///
    /// Computed by composition along the rotation chain — each link
    /// contributes `angle' * axis` — never by differentiating rotation
    /// matrices, so it stays exact at singular configurations.
    pub fn ang_vel_in(
        &self,
        frame: FrameId,
        ancestor: FrameId,
        table: &SymTable,
    ) -> Result<FrameVec> {
        let chain = self.chain(frame, ancestor)?;
        let mut total = FrameVec::zero(frame);
        for id in chain {
            // chain() never yields the root, so the link is always
            // present; still propagate rather than panic
            let link = match &self.frames[id.index()].link {
                Some(link) => link,
                None => {
                    return Err(MechError::NoPath {
                        frame: self.name(frame).to_string(),
                        ancestor: self.name(ancestor).to_string(),
                    })
                }
            };
            // axis is fixed in both parent and child; resolve it in the
            // child and carry it down to `frame`.
            let rate = link.angle.dt(table);
            let contribution = FrameVec::axis(id, link.axis).scale(rate);
            total = total.add(&contribution.express_in(frame, self)?)?;
        }
        Ok(total.simplify())
    }
}
