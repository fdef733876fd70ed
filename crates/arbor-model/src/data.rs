//! Mutable evaluation workspace.
//!
//! `Data` owns every buffer the solvers write, sized once from a `Model` so
//! the recursions themselves allocate nothing. All per-body quantities are
//! indexed like the model's body arrays; slot 0 belongs to the world root.

use arbor_math::{DVec, Force, Mat6, Motion, SpatialTransform};

use crate::joint::JointData;
use crate::model::Model;

/// Solver workspace for one model.
#[derive(Debug, Clone)]
pub struct Data {
    /// Per-joint caches (placement, velocity, articulated factorization).
    pub joints: Vec<JointData>,
    /// Placement of body i in its parent body frame.
    pub local_placements: Vec<SpatialTransform>,
    /// Placement of body i in the world frame.
    pub world_placements: Vec<SpatialTransform>,
    /// Spatial velocity of body i, in the body frame.
    pub v: Vec<Motion>,
    /// Spatial acceleration of body i, in the body frame.
    pub a: Vec<Motion>,
    /// Bias force of body i during the backward sweep, in the body frame.
    pub f: Vec<Force>,
    /// Articulated-body inertia of body i, as a dense symmetric 6×6.
    pub articulated_inertias: Vec<Mat6>,
    /// Joint-space bias terms, packed like v.
    pub u: DVec,
    /// Joint accelerations, packed like v.
    pub ddq: DVec,
    /// Joint torques computed by inverse dynamics, packed like v.
    pub tau: DVec,
}

impl Data {
    /// Workspace sized for `model`, zero-initialized.
    pub fn new(model: &Model) -> Self {
        let n = model.nbodies();
        Self {
            joints: model.joints.iter().map(|j| j.create_data()).collect(),
            local_placements: vec![SpatialTransform::identity(); n],
            world_placements: vec![SpatialTransform::identity(); n],
            v: vec![Motion::zero(); n],
            a: vec![Motion::zero(); n],
            f: vec![Force::zero(); n],
            articulated_inertias: vec![Mat6::zeros(); n],
            u: DVec::zeros(model.nv),
            ddq: DVec::zeros(model.nv),
            tau: DVec::zeros(model.nv),
        }
    }
}
