//! 6D spatial algebra following Featherstone's "Rigid Body Dynamics Algorithms".
//!
//! Convention: spatial vectors are [angular; linear], always in this order.
//! Motions (twists: velocities, accelerations) and forces (wrenches) are
//! distinct types; the only cross-category product is `Motion::cross_force`,
//! the dual of the motion cross product.

use crate::{Mat3, Mat6, Vec3, Vec6, skew};
use nalgebra as na;

/// Spatial motion vector (twist): angular velocity/acceleration plus the
/// linear part at the frame origin.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    /// Angular component ω.
    pub angular: Vec3,
    /// Linear component v at the frame origin.
    pub linear: Vec3,
}

impl Motion {
    /// Create from angular and linear parts.
    #[inline]
    pub fn new(angular: Vec3, linear: Vec3) -> Self {
        Self { angular, linear }
    }

    /// Zero motion.
    #[inline]
    pub fn zero() -> Self {
        Self {
            angular: Vec3::zeros(),
            linear: Vec3::zeros(),
        }
    }

    /// Pack as [angular; linear].
    #[inline]
    pub fn to_vector(&self) -> Vec6 {
        Vec6::new(
            self.angular.x,
            self.angular.y,
            self.angular.z,
            self.linear.x,
            self.linear.y,
            self.linear.z,
        )
    }

    /// Unpack from [angular; linear].
    #[inline]
    pub fn from_vector(v: &Vec6) -> Self {
        Self {
            angular: Vec3::new(v[0], v[1], v[2]),
            linear: Vec3::new(v[3], v[4], v[5]),
        }
    }

    /// Screw cross product of two motions: self ×ₘ other.
    ///
    /// Propagates velocity products through the tree (Coriolis terms).
    pub fn cross(&self, other: &Motion) -> Motion {
        Motion::new(
            self.angular.cross(&other.angular),
            self.angular.cross(&other.linear) + self.linear.cross(&other.angular),
        )
    }

    /// Dual cross product of a motion with a force: self ×f other.
    ///
    /// Yields the velocity bias force; dual of `cross` under the power
    /// pairing.
    pub fn cross_force(&self, other: &Force) -> Force {
        Force::new(
            self.angular.cross(&other.angular) + self.linear.cross(&other.linear),
            self.angular.cross(&other.linear),
        )
    }

    /// Dense 6x6 operator C of the motion cross product, so that
    /// `C * b.to_vector() == self.cross(&b).to_vector()`.
    ///
    /// C = | [ω]×   0  |
    ///     | [v]× [ω]× |
    pub fn cross_matrix(&self) -> Mat6 {
        let wx = skew(&self.angular);
        let vx = skew(&self.linear);

        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&wx);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&vx);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&wx);
        m
    }
}

impl std::ops::Add for Motion {
    type Output = Motion;
    #[inline]
    fn add(self, rhs: Motion) -> Motion {
        Motion::new(self.angular + rhs.angular, self.linear + rhs.linear)
    }
}

impl std::ops::AddAssign for Motion {
    #[inline]
    fn add_assign(&mut self, rhs: Motion) {
        self.angular += rhs.angular;
        self.linear += rhs.linear;
    }
}

impl std::ops::Sub for Motion {
    type Output = Motion;
    #[inline]
    fn sub(self, rhs: Motion) -> Motion {
        Motion::new(self.angular - rhs.angular, self.linear - rhs.linear)
    }
}

impl std::ops::Mul<f64> for Motion {
    type Output = Motion;
    #[inline]
    fn mul(self, rhs: f64) -> Motion {
        Motion::new(self.angular * rhs, self.linear * rhs)
    }
}

impl std::ops::Neg for Motion {
    type Output = Motion;
    #[inline]
    fn neg(self) -> Motion {
        Motion::new(-self.angular, -self.linear)
    }
}

/// Spatial force vector (wrench): moment about the frame origin plus the
/// linear force.
#[derive(Debug, Clone, Copy)]
pub struct Force {
    /// Moment component n about the frame origin.
    pub angular: Vec3,
    /// Linear force component f.
    pub linear: Vec3,
}

impl Force {
    /// Create from angular (moment) and linear (force) parts.
    #[inline]
    pub fn new(angular: Vec3, linear: Vec3) -> Self {
        Self { angular, linear }
    }

    /// Zero force.
    #[inline]
    pub fn zero() -> Self {
        Self {
            angular: Vec3::zeros(),
            linear: Vec3::zeros(),
        }
    }

    /// Pack as [angular; linear].
    #[inline]
    pub fn to_vector(&self) -> Vec6 {
        Vec6::new(
            self.angular.x,
            self.angular.y,
            self.angular.z,
            self.linear.x,
            self.linear.y,
            self.linear.z,
        )
    }

    /// Unpack from [angular; linear].
    #[inline]
    pub fn from_vector(v: &Vec6) -> Self {
        Self {
            angular: Vec3::new(v[0], v[1], v[2]),
            linear: Vec3::new(v[3], v[4], v[5]),
        }
    }

    /// Power pairing with a motion: n·ω + f·v.
    #[inline]
    pub fn dot(&self, m: &Motion) -> f64 {
        self.angular.dot(&m.angular) + self.linear.dot(&m.linear)
    }
}

impl std::ops::Add for Force {
    type Output = Force;
    #[inline]
    fn add(self, rhs: Force) -> Force {
        Force::new(self.angular + rhs.angular, self.linear + rhs.linear)
    }
}

impl std::ops::AddAssign for Force {
    #[inline]
    fn add_assign(&mut self, rhs: Force) {
        self.angular += rhs.angular;
        self.linear += rhs.linear;
    }
}

impl std::ops::Sub for Force {
    type Output = Force;
    #[inline]
    fn sub(self, rhs: Force) -> Force {
        Force::new(self.angular - rhs.angular, self.linear - rhs.linear)
    }
}

impl std::ops::Mul<f64> for Force {
    type Output = Force;
    #[inline]
    fn mul(self, rhs: f64) -> Force {
        Force::new(self.angular * rhs, self.linear * rhs)
    }
}

impl std::ops::Neg for Force {
    type Output = Force;
    #[inline]
    fn neg(self) -> Force {
        Force::new(-self.angular, -self.linear)
    }
}

/// Rigid placement of a child frame in its parent frame.
///
/// Stored as rotation R (child axes in parent coordinates) and translation p
/// (child origin in parent coordinates). `act_*` maps spatial quantities
/// expressed in the child frame to the parent frame; `act_inv_*` goes the
/// other way.
#[derive(Debug, Clone, Copy)]
pub struct SpatialTransform {
    /// Rotation of the child frame expressed in the parent frame.
    pub rot: Mat3,
    /// Position of the child origin expressed in the parent frame.
    pub pos: Vec3,
}

impl SpatialTransform {
    /// Create from rotation matrix and translation.
    pub fn new(rot: Mat3, pos: Vec3) -> Self {
        Self { rot, pos }
    }

    /// Identity placement.
    pub fn identity() -> Self {
        Self {
            rot: Mat3::identity(),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the X axis.
    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the Y axis.
    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
            pos: Vec3::zeros(),
        }
    }

    /// Pure rotation about the Z axis.
    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rot: Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
            pos: Vec3::zeros(),
        }
    }

    /// Pure translation.
    pub fn translation(pos: Vec3) -> Self {
        Self {
            rot: Mat3::identity(),
            pos,
        }
    }

    /// Rotation about an arbitrary unit axis.
    pub fn rot_axis(axis: &na::Unit<Vec3>, angle: f64) -> Self {
        let rot = na::Rotation3::from_axis_angle(axis, angle);
        Self {
            rot: *rot.matrix(),
            pos: Vec3::zeros(),
        }
    }

    /// Map a motion from the child frame to the parent frame.
    pub fn act_motion(&self, m: &Motion) -> Motion {
        let w = self.rot * m.angular;
        Motion::new(w, self.rot * m.linear + self.pos.cross(&w))
    }

    /// Map a motion from the parent frame to the child frame.
    pub fn act_inv_motion(&self, m: &Motion) -> Motion {
        let rt = self.rot.transpose();
        Motion::new(
            rt * m.angular,
            rt * (m.linear - self.pos.cross(&m.angular)),
        )
    }

    /// Map a force from the child frame to the parent frame.
    pub fn act_force(&self, f: &Force) -> Force {
        let lin = self.rot * f.linear;
        Force::new(self.rot * f.angular + self.pos.cross(&lin), lin)
    }

    /// Map a force from the parent frame to the child frame.
    pub fn act_inv_force(&self, f: &Force) -> Force {
        let rt = self.rot.transpose();
        Force::new(
            rt * (f.angular - self.pos.cross(&f.linear)),
            rt * f.linear,
        )
    }

    /// Inverse placement (parent expressed in the child frame).
    pub fn inverse(&self) -> SpatialTransform {
        let rt = self.rot.transpose();
        SpatialTransform {
            rot: rt,
            pos: -(rt * self.pos),
        }
    }

    /// Dense 6x6 operator of `act_motion`.
    ///
    /// X = |   R    0 |
    ///     | [p]×R  R |
    pub fn to_motion_matrix(&self) -> Mat6 {
        let px_r = skew(&self.pos) * self.rot;

        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rot);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&px_r);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.rot);
        m
    }

    /// Dense 6x6 operator of `act_force` (inverse-transpose of the motion
    /// operator).
    ///
    /// X* = | R  [p]×R |
    ///      | 0    R   |
    pub fn to_force_matrix(&self) -> Mat6 {
        let px_r = skew(&self.pos) * self.rot;

        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rot);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&px_r);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.rot);
        m
    }
}

impl std::ops::Mul for SpatialTransform {
    type Output = SpatialTransform;

    /// Placement composition: if `self` places frame B in A and `rhs` places
    /// C in B, the product places C in A.
    fn mul(self, rhs: SpatialTransform) -> SpatialTransform {
        SpatialTransform {
            rot: self.rot * rhs.rot,
            pos: self.rot * rhs.pos + self.pos,
        }
    }
}
