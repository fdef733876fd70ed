//! Kinematic tree description.
//!
//! A `Model` is an immutable description of a rigid-body tree: bodies indexed
//! `0..nbodies()` with body 0 the fixed world root, a parent array satisfying
//! `parents[i] < i`, one joint per non-world body, the constant placement of
//! each joint frame in its parent body frame, and each body's spatial
//! inertia. Configuration and velocity vectors are packed per joint at
//! `idx_q[i]` / `idx_v[i]`.
//!
//! Models are assembled through `ModelBuilder`, which rejects malformed
//! topology at build time so the solvers can index without checks.

use std::collections::HashSet;

use arbor_math::{DVec, GRAVITY, Motion, SpatialInertia, SpatialTransform, Vec3};
use thiserror::Error;
use tracing::debug;

use crate::data::Data;
use crate::joint::JointModel;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Model construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A body references a parent that is not an earlier body in the tree.
    #[error("body '{name}' (index {index}) has parent {parent}, which is not an earlier body")]
    InvalidParent {
        name: String,
        index: usize,
        parent: usize,
    },
    /// Two bodies share a name.
    #[error("duplicate body name '{name}'")]
    DuplicateName { name: String },
}

/// Immutable rigid-body tree.
#[derive(Debug, Clone)]
pub struct Model {
    /// Configuration dimension (sum of joint nq).
    pub nq: usize,
    /// Velocity dimension (sum of joint nv).
    pub nv: usize,
    /// Parent body index per body; `parents[i] < i` for i > 0.
    pub parents: Vec<usize>,
    /// Joint connecting each body to its parent. Slot 0 is a fixed
    /// placeholder for the world.
    pub joints: Vec<JointModel>,
    /// Constant placement of joint i's frame in the parent body frame.
    pub joint_placements: Vec<SpatialTransform>,
    /// Spatial inertia of each body, in the body frame.
    pub inertias: Vec<SpatialInertia>,
    /// Body names, unique across the model.
    pub names: Vec<String>,
    /// Offset of joint i's configuration block in q.
    pub idx_q: Vec<usize>,
    /// Offset of joint i's velocity block in v.
    pub idx_v: Vec<usize>,
    /// Gravity as a spatial motion in the world frame.
    pub gravity: Motion,
}

impl Model {
    /// Number of bodies, counting the world root.
    pub fn nbodies(&self) -> usize {
        self.parents.len()
    }

    /// Joint i's configuration block of `q`.
    pub fn joint_q<'a>(&self, i: usize, q: &'a [f64]) -> &'a [f64] {
        &q[self.idx_q[i]..self.idx_q[i] + self.joints[i].nq()]
    }

    /// Joint i's velocity block of `v` (or any nv-sized vector).
    pub fn joint_v<'a>(&self, i: usize, v: &'a [f64]) -> &'a [f64] {
        &v[self.idx_v[i]..self.idx_v[i] + self.joints[i].nv()]
    }

    /// The neutral configuration: zeros, with identity quaternions in the
    /// slots that hold one.
    pub fn neutral_config(&self) -> DVec {
        let mut q = DVec::zeros(self.nq);
        for i in 1..self.nbodies() {
            let lo = self.idx_q[i];
            let hi = lo + self.joints[i].nq();
            self.joints[i].neutral(&mut q.as_mut_slice()[lo..hi]);
        }
        q
    }

    /// Fresh evaluation workspace sized for this model.
    pub fn create_data(&self) -> Data {
        Data::new(self)
    }
}

struct BodyEntry {
    name: String,
    parent: usize,
    joint: JointModel,
    placement: SpatialTransform,
    inertia: SpatialInertia,
}

/// Incremental model assembly. Bodies are appended in topological order; the
/// first added body gets index 1 (the world is index 0).
pub struct ModelBuilder {
    gravity: Motion,
    entries: Vec<BodyEntry>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            gravity: Motion::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -GRAVITY)),
            entries: Vec::new(),
        }
    }

    /// Override the gravity vector (world-frame linear acceleration).
    pub fn gravity(mut self, g: Vec3) -> Self {
        self.gravity = Motion::new(Vec3::zeros(), g);
        self
    }

    /// Append a body connected to `parent` by `joint`, with the joint frame
    /// placed at `placement` in the parent body frame.
    pub fn add_joint(
        mut self,
        name: &str,
        parent: usize,
        joint: JointModel,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.entries.push(BodyEntry {
            name: name.to_string(),
            parent,
            joint,
            placement,
            inertia,
        });
        self
    }

    pub fn add_revolute(
        self,
        name: &str,
        parent: usize,
        axis: nalgebra::Unit<Vec3>,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::revolute(axis), placement, inertia)
    }

    pub fn add_prismatic(
        self,
        name: &str,
        parent: usize,
        axis: nalgebra::Unit<Vec3>,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::prismatic(axis), placement, inertia)
    }

    pub fn add_spherical(
        self,
        name: &str,
        parent: usize,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::Spherical, placement, inertia)
    }

    pub fn add_translation(
        self,
        name: &str,
        parent: usize,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::Translation, placement, inertia)
    }

    pub fn add_free_flyer(
        self,
        name: &str,
        parent: usize,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::FreeFlyer, placement, inertia)
    }

    pub fn add_fixed(
        self,
        name: &str,
        parent: usize,
        placement: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_joint(name, parent, JointModel::Fixed, placement, inertia)
    }

    /// Validate the topology and freeze the model.
    pub fn build(self) -> Result<Model> {
        let nbodies = self.entries.len() + 1;

        let mut parents = Vec::with_capacity(nbodies);
        let mut joints = Vec::with_capacity(nbodies);
        let mut joint_placements = Vec::with_capacity(nbodies);
        let mut inertias = Vec::with_capacity(nbodies);
        let mut names = Vec::with_capacity(nbodies);
        let mut idx_q = Vec::with_capacity(nbodies);
        let mut idx_v = Vec::with_capacity(nbodies);

        // World root.
        parents.push(0);
        joints.push(JointModel::Fixed);
        joint_placements.push(SpatialTransform::identity());
        inertias.push(SpatialInertia::zero());
        names.push("world".to_string());
        idx_q.push(0);
        idx_v.push(0);

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert("world".to_string());

        let mut nq = 0;
        let mut nv = 0;
        for (k, entry) in self.entries.into_iter().enumerate() {
            let index = k + 1;
            if entry.parent >= index {
                return Err(ModelError::InvalidParent {
                    name: entry.name,
                    index,
                    parent: entry.parent,
                });
            }
            if !seen.insert(entry.name.clone()) {
                return Err(ModelError::DuplicateName { name: entry.name });
            }
            idx_q.push(nq);
            idx_v.push(nv);
            nq += entry.joint.nq();
            nv += entry.joint.nv();
            parents.push(entry.parent);
            joints.push(entry.joint);
            joint_placements.push(entry.placement);
            inertias.push(entry.inertia);
            names.push(entry.name);
        }

        debug!(bodies = nbodies, nq, nv, "built model");

        Ok(Model {
            nq,
            nv,
            parents,
            joints,
            joint_placements,
            inertias,
            names,
            idx_q,
            idx_v,
            gravity: self.gravity,
        })
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
