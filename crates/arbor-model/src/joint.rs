//! Joint models and their per-joint workspace.
//!
//! The joint catalogue is a closed set of variants dispatched by match; each
//! variant fixes its configuration dimension `nq`, velocity dimension `nv`,
//! and motion subspace S (6 × nv, [angular; linear] rows). The per-variant
//! arithmetic exploits the structure of S instead of multiplying dense 6×nv
//! matrices.
//!
//! `JointModel` is the static description (lives in the model); `JointData`
//! holds the per-evaluation caches: the joint placement M(q), the joint
//! velocity S·v, and the articulated-inertia factorization U = Ia·S,
//! D⁻¹ = (Sᵀ·U)⁻¹, U·D⁻¹.

use arbor_math::{DMat, Force, Mat3, Mat6, Motion, SpatialTransform, Vec3, Vec6};
use nalgebra as na;
use thiserror::Error;

type Mat63 = na::Matrix6x3<f64>;

/// Joint evaluation errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JointError {
    /// The joint-space inertia D = Sᵀ·Ia·S is not invertible, e.g. a
    /// massless body on an articulated dof.
    #[error("singular joint-space inertia (D is not invertible)")]
    SingularInertia,
}

/// Static joint description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointModel {
    /// One rotational dof about a unit axis. nq = nv = 1.
    Revolute { axis: na::Unit<Vec3> },
    /// One translational dof along a unit axis. nq = nv = 1.
    Prismatic { axis: na::Unit<Vec3> },
    /// Three rotational dof. nq = 4 (unit quaternion [x, y, z, w]), nv = 3.
    Spherical,
    /// Three translational dof. nq = nv = 3.
    Translation,
    /// Six dof. nq = 7 ([x, y, z] translation then quaternion [x, y, z, w]),
    /// nv = 6 ([angular; linear] in the joint frame).
    FreeFlyer,
    /// Rigid attachment. nq = nv = 0.
    Fixed,
}

impl JointModel {
    /// Revolute joint about an arbitrary unit axis.
    pub fn revolute(axis: na::Unit<Vec3>) -> Self {
        JointModel::Revolute { axis }
    }

    /// Revolute joint about the X axis.
    pub fn revolute_x() -> Self {
        JointModel::Revolute {
            axis: na::Vector3::x_axis(),
        }
    }

    /// Revolute joint about the Y axis.
    pub fn revolute_y() -> Self {
        JointModel::Revolute {
            axis: na::Vector3::y_axis(),
        }
    }

    /// Revolute joint about the Z axis.
    pub fn revolute_z() -> Self {
        JointModel::Revolute {
            axis: na::Vector3::z_axis(),
        }
    }

    /// Prismatic joint along an arbitrary unit axis.
    pub fn prismatic(axis: na::Unit<Vec3>) -> Self {
        JointModel::Prismatic { axis }
    }

    /// Prismatic joint along the Z axis.
    pub fn prismatic_z() -> Self {
        JointModel::Prismatic {
            axis: na::Vector3::z_axis(),
        }
    }

    /// Configuration dimension.
    pub fn nq(&self) -> usize {
        match self {
            JointModel::Revolute { .. } | JointModel::Prismatic { .. } => 1,
            JointModel::Spherical => 4,
            JointModel::Translation => 3,
            JointModel::FreeFlyer => 7,
            JointModel::Fixed => 0,
        }
    }

    /// Velocity (tangent) dimension.
    pub fn nv(&self) -> usize {
        match self {
            JointModel::Revolute { .. } | JointModel::Prismatic { .. } => 1,
            JointModel::Spherical | JointModel::Translation => 3,
            JointModel::FreeFlyer => 6,
            JointModel::Fixed => 0,
        }
    }

    /// Fresh workspace matching this joint.
    pub fn create_data(&self) -> JointData {
        match self {
            JointModel::Revolute { .. } => JointData::Revolute(Dof1Data::default()),
            JointModel::Prismatic { .. } => JointData::Prismatic(Dof1Data::default()),
            JointModel::Spherical => JointData::Spherical(Dof3Data::default()),
            JointModel::Translation => JointData::Translation(Dof3Data::default()),
            JointModel::FreeFlyer => JointData::FreeFlyer(FreeFlyerData::default()),
            JointModel::Fixed => JointData::Fixed,
        }
    }

    /// Write the neutral configuration into `q` (length `nq`). Quaternion
    /// slots become the identity rotation.
    pub fn neutral(&self, q: &mut [f64]) {
        q.fill(0.0);
        match self {
            JointModel::Spherical => q[3] = 1.0,
            JointModel::FreeFlyer => q[6] = 1.0,
            _ => {}
        }
    }

    /// The joint motion S·coords for a velocity-space vector (length `nv`).
    pub fn joint_motion(&self, coords: &[f64]) -> Motion {
        match self {
            JointModel::Revolute { axis } => {
                Motion::new(axis.into_inner() * coords[0], Vec3::zeros())
            }
            JointModel::Prismatic { axis } => {
                Motion::new(Vec3::zeros(), axis.into_inner() * coords[0])
            }
            JointModel::Spherical => Motion::new(
                Vec3::new(coords[0], coords[1], coords[2]),
                Vec3::zeros(),
            ),
            JointModel::Translation => Motion::new(
                Vec3::zeros(),
                Vec3::new(coords[0], coords[1], coords[2]),
            ),
            JointModel::FreeFlyer => Motion::new(
                Vec3::new(coords[0], coords[1], coords[2]),
                Vec3::new(coords[3], coords[4], coords[5]),
            ),
            JointModel::Fixed => Motion::zero(),
        }
    }

    /// Dense 6 × nv motion subspace, for consumers that need a matrix form.
    pub fn motion_subspace(&self) -> DMat {
        let nv = self.nv();
        let mut s = DMat::zeros(6, nv);
        match self {
            JointModel::Revolute { axis } => {
                s.fixed_view_mut::<3, 1>(0, 0).copy_from(&axis.into_inner());
            }
            JointModel::Prismatic { axis } => {
                s.fixed_view_mut::<3, 1>(3, 0).copy_from(&axis.into_inner());
            }
            JointModel::Spherical => {
                s.fixed_view_mut::<3, 3>(0, 0).copy_from(&Mat3::identity());
            }
            JointModel::Translation => {
                s.fixed_view_mut::<3, 3>(3, 0).copy_from(&Mat3::identity());
            }
            JointModel::FreeFlyer => {
                s.fixed_view_mut::<6, 6>(0, 0).copy_from(&Mat6::identity());
            }
            JointModel::Fixed => {}
        }
        s
    }

    /// Project a spatial force onto the joint dofs: `out = Sᵀ·f`
    /// (`out` has length `nv`).
    pub fn project_force(&self, f: &Force, out: &mut [f64]) {
        match self {
            JointModel::Revolute { axis } => out[0] = axis.dot(&f.angular),
            JointModel::Prismatic { axis } => out[0] = axis.dot(&f.linear),
            JointModel::Spherical => out.copy_from_slice(f.angular.as_slice()),
            JointModel::Translation => out.copy_from_slice(f.linear.as_slice()),
            JointModel::FreeFlyer => {
                out[..3].copy_from_slice(f.angular.as_slice());
                out[3..].copy_from_slice(f.linear.as_slice());
            }
            JointModel::Fixed => {}
        }
    }

    /// Cache the joint placement M(q) and joint velocity S·v for the given
    /// configuration and velocity slices (lengths `nq` and `nv`).
    pub fn calc(&self, data: &mut JointData, q: &[f64], v: &[f64]) {
        match (self, data) {
            (JointModel::Revolute { axis }, JointData::Revolute(d)) => {
                d.placement = SpatialTransform::rot_axis(axis, q[0]);
                d.velocity = Motion::new(axis.into_inner() * v[0], Vec3::zeros());
            }
            (JointModel::Prismatic { axis }, JointData::Prismatic(d)) => {
                d.placement =
                    SpatialTransform::translation(axis.into_inner() * q[0]);
                d.velocity = Motion::new(Vec3::zeros(), axis.into_inner() * v[0]);
            }
            (JointModel::Spherical, JointData::Spherical(d)) => {
                d.placement = SpatialTransform::new(quat_to_rot(q), Vec3::zeros());
                d.velocity = Motion::new(Vec3::new(v[0], v[1], v[2]), Vec3::zeros());
            }
            (JointModel::Translation, JointData::Translation(d)) => {
                d.placement =
                    SpatialTransform::translation(Vec3::new(q[0], q[1], q[2]));
                d.velocity = Motion::new(Vec3::zeros(), Vec3::new(v[0], v[1], v[2]));
            }
            (JointModel::FreeFlyer, JointData::FreeFlyer(d)) => {
                d.placement = SpatialTransform::new(
                    quat_to_rot(&q[3..]),
                    Vec3::new(q[0], q[1], q[2]),
                );
                d.velocity = Motion::new(
                    Vec3::new(v[0], v[1], v[2]),
                    Vec3::new(v[3], v[4], v[5]),
                );
            }
            (JointModel::Fixed, JointData::Fixed) => {}
            _ => unreachable!("joint data does not match joint model"),
        }
    }

    /// Factorize the articulated inertia seen by this joint: cache
    /// U = Ia·S, D⁻¹ = (Sᵀ·U)⁻¹ and U·D⁻¹. When `update` is set the
    /// articulated inertia is reduced in place, `Ia ← Ia − (U·D⁻¹)·Uᵀ`,
    /// which is the part of Ia transmitted to the parent.
    pub fn calc_aba(
        &self,
        data: &mut JointData,
        ia: &mut Mat6,
        update: bool,
    ) -> Result<(), JointError> {
        match (self, data) {
            (JointModel::Revolute { axis }, JointData::Revolute(d)) => {
                let u: Vec6 = ia.fixed_view::<6, 3>(0, 0) * axis.into_inner();
                let dd = axis.dot(&u.fixed_rows::<3>(0));
                if dd.abs() < 1e-20 {
                    return Err(JointError::SingularInertia);
                }
                d.u = u;
                d.d_inv = 1.0 / dd;
                d.u_dinv = u * d.d_inv;
                if update {
                    *ia -= u * u.transpose() * d.d_inv;
                }
            }
            (JointModel::Prismatic { axis }, JointData::Prismatic(d)) => {
                let u: Vec6 = ia.fixed_view::<6, 3>(0, 3) * axis.into_inner();
                let dd = axis.dot(&u.fixed_rows::<3>(3));
                if dd.abs() < 1e-20 {
                    return Err(JointError::SingularInertia);
                }
                d.u = u;
                d.d_inv = 1.0 / dd;
                d.u_dinv = u * d.d_inv;
                if update {
                    *ia -= u * u.transpose() * d.d_inv;
                }
            }
            (JointModel::Spherical, JointData::Spherical(d)) => {
                let u: Mat63 = ia.fixed_view::<6, 3>(0, 0).into_owned();
                let dd: Mat3 = u.fixed_rows::<3>(0).into_owned();
                d.d_inv = dd.try_inverse().ok_or(JointError::SingularInertia)?;
                d.u = u;
                d.u_dinv = u * d.d_inv;
                if update {
                    *ia -= d.u_dinv * u.transpose();
                }
            }
            (JointModel::Translation, JointData::Translation(d)) => {
                let u: Mat63 = ia.fixed_view::<6, 3>(0, 3).into_owned();
                let dd: Mat3 = u.fixed_rows::<3>(3).into_owned();
                d.d_inv = dd.try_inverse().ok_or(JointError::SingularInertia)?;
                d.u = u;
                d.u_dinv = u * d.d_inv;
                if update {
                    *ia -= d.u_dinv * u.transpose();
                }
            }
            (JointModel::FreeFlyer, JointData::FreeFlyer(d)) => {
                // S = identity: U = Ia, D = Ia, U·D⁻¹ = identity; the
                // reduced inertia is exactly zero.
                d.d_inv = ia.try_inverse().ok_or(JointError::SingularInertia)?;
                if update {
                    ia.fill(0.0);
                }
            }
            (JointModel::Fixed, JointData::Fixed) => {
                // nv = 0: nothing to factorize, the whole inertia propagates.
            }
            _ => unreachable!("joint data does not match joint model"),
        }
        Ok(())
    }

    /// Configuration step on the joint manifold: `out = q ⊕ dq` where `dq`
    /// is a velocity-space displacement (length `nv`, e.g. v·dt).
    pub fn integrate(&self, q: &[f64], dq: &[f64], out: &mut [f64]) {
        match self {
            JointModel::Revolute { .. } | JointModel::Prismatic { .. } => {
                out[0] = q[0] + dq[0];
            }
            JointModel::Translation => {
                for k in 0..3 {
                    out[k] = q[k] + dq[k];
                }
            }
            JointModel::Spherical => {
                let next = quat_step(q, &Vec3::new(dq[0], dq[1], dq[2]));
                out.copy_from_slice(next.coords.as_slice());
            }
            JointModel::FreeFlyer => {
                // Velocity is expressed in the joint frame: rotate the
                // linear step into the parent frame before accumulating.
                let rot = quat_to_rot(&q[3..]);
                let dp = rot * Vec3::new(dq[3], dq[4], dq[5]);
                for k in 0..3 {
                    out[k] = q[k] + dp[k];
                }
                let next = quat_step(&q[3..], &Vec3::new(dq[0], dq[1], dq[2]));
                out[3..].copy_from_slice(next.coords.as_slice());
            }
            JointModel::Fixed => {}
        }
    }
}

/// Rotation matrix from a stored quaternion slice [x, y, z, w].
fn quat_to_rot(q: &[f64]) -> Mat3 {
    let quat = na::UnitQuaternion::from_quaternion(na::Quaternion::new(
        q[3], q[0], q[1], q[2],
    ));
    *quat.to_rotation_matrix().matrix()
}

/// Right-multiply a stored quaternion [x, y, z, w] by the rotation vector
/// exponential exp(w) (body-frame angular step).
fn quat_step(q: &[f64], w: &Vec3) -> na::UnitQuaternion<f64> {
    let quat = na::UnitQuaternion::from_quaternion(na::Quaternion::new(
        q[3], q[0], q[1], q[2],
    ));
    quat * na::UnitQuaternion::from_scaled_axis(*w)
}

/// Workspace for a single-dof joint.
#[derive(Debug, Clone, Copy)]
pub struct Dof1Data {
    pub placement: SpatialTransform,
    pub velocity: Motion,
    pub u: Vec6,
    pub d_inv: f64,
    pub u_dinv: Vec6,
}

impl Default for Dof1Data {
    fn default() -> Self {
        Self {
            placement: SpatialTransform::identity(),
            velocity: Motion::zero(),
            u: Vec6::zeros(),
            d_inv: 0.0,
            u_dinv: Vec6::zeros(),
        }
    }
}

/// Workspace for a three-dof joint (spherical, translation).
#[derive(Debug, Clone, Copy)]
pub struct Dof3Data {
    pub placement: SpatialTransform,
    pub velocity: Motion,
    pub u: Mat63,
    pub d_inv: Mat3,
    pub u_dinv: Mat63,
}

impl Default for Dof3Data {
    fn default() -> Self {
        Self {
            placement: SpatialTransform::identity(),
            velocity: Motion::zero(),
            u: Mat63::zeros(),
            d_inv: Mat3::zeros(),
            u_dinv: Mat63::zeros(),
        }
    }
}

/// Workspace for the free-flyer joint. U·D⁻¹ is the identity and is not
/// stored.
#[derive(Debug, Clone, Copy)]
pub struct FreeFlyerData {
    pub placement: SpatialTransform,
    pub velocity: Motion,
    pub d_inv: Mat6,
}

impl Default for FreeFlyerData {
    fn default() -> Self {
        Self {
            placement: SpatialTransform::identity(),
            velocity: Motion::zero(),
            d_inv: Mat6::zeros(),
        }
    }
}

/// Per-joint evaluation workspace, variant-matched to `JointModel`.
#[derive(Debug, Clone, Copy)]
pub enum JointData {
    Revolute(Dof1Data),
    Prismatic(Dof1Data),
    Spherical(Dof3Data),
    Translation(Dof3Data),
    FreeFlyer(FreeFlyerData),
    Fixed,
}

impl JointData {
    /// Joint placement M(q) cached by the last `calc`.
    pub fn placement(&self) -> SpatialTransform {
        match self {
            JointData::Revolute(d) | JointData::Prismatic(d) => d.placement,
            JointData::Spherical(d) | JointData::Translation(d) => d.placement,
            JointData::FreeFlyer(d) => d.placement,
            JointData::Fixed => SpatialTransform::identity(),
        }
    }

    /// Joint velocity S·v cached by the last `calc`.
    pub fn velocity(&self) -> Motion {
        match self {
            JointData::Revolute(d) | JointData::Prismatic(d) => d.velocity,
            JointData::Spherical(d) | JointData::Translation(d) => d.velocity,
            JointData::FreeFlyer(d) => d.velocity,
            JointData::Fixed => Motion::zero(),
        }
    }

    /// Velocity-product bias of the joint. Every subspace in the catalogue
    /// is constant in the joint frame, so this is identically zero; it is
    /// kept so the tree recursions read like the textbook formulation.
    pub fn bias(&self) -> Motion {
        Motion::zero()
    }

    /// Solve the joint-space system: `ddq = D⁻¹·u` (both length `nv`).
    pub fn solve(&self, u: &[f64], ddq: &mut [f64]) {
        match self {
            JointData::Revolute(d) | JointData::Prismatic(d) => {
                ddq[0] = d.d_inv * u[0];
            }
            JointData::Spherical(d) | JointData::Translation(d) => {
                let x = d.d_inv * Vec3::new(u[0], u[1], u[2]);
                ddq.copy_from_slice(x.as_slice());
            }
            JointData::FreeFlyer(d) => {
                let x = d.d_inv * Vec6::from_column_slice(u);
                ddq.copy_from_slice(x.as_slice());
            }
            JointData::Fixed => {}
        }
    }

    /// The bias-force correction transmitted to the parent: `U·D⁻¹·u`.
    pub fn bias_correction(&self, u: &[f64]) -> Force {
        match self {
            JointData::Revolute(d) | JointData::Prismatic(d) => {
                Force::from_vector(&(d.u_dinv * u[0]))
            }
            JointData::Spherical(d) | JointData::Translation(d) => {
                Force::from_vector(&(d.u_dinv * Vec3::new(u[0], u[1], u[2])))
            }
            JointData::FreeFlyer(_) => Force::new(
                Vec3::new(u[0], u[1], u[2]),
                Vec3::new(u[3], u[4], u[5]),
            ),
            JointData::Fixed => Force::zero(),
        }
    }

    /// Acceleration back-substitution: `ddq −= (U·D⁻¹)ᵀ·a`.
    pub fn ddq_correction(&self, a: &Motion, ddq: &mut [f64]) {
        match self {
            JointData::Revolute(d) | JointData::Prismatic(d) => {
                ddq[0] -= d.u_dinv.dot(&a.to_vector());
            }
            JointData::Spherical(d) | JointData::Translation(d) => {
                let x = d.u_dinv.transpose() * a.to_vector();
                for k in 0..3 {
                    ddq[k] -= x[k];
                }
            }
            JointData::FreeFlyer(_) => {
                let av = a.to_vector();
                for k in 0..6 {
                    ddq[k] -= av[k];
                }
            }
            JointData::Fixed => {}
        }
    }
}
