//! Spatial inertia of a rigid body.
//!
//! Stored in compact form (mass, center of mass, rotational inertia about
//! the center of mass); the 6x6 form is materialized only where an algorithm
//! needs a dense symmetric operator.

use crate::{Force, Mat3, Mat6, Motion, Vec3, skew};

/// Spatial inertia expressed in the body frame.
#[derive(Debug, Clone, Copy)]
pub struct SpatialInertia {
    /// Mass of the body.
    pub mass: f64,
    /// Center of mass position in the body frame.
    pub com: Vec3,
    /// Rotational inertia about the center of mass (3x3, symmetric).
    pub inertia: Mat3,
}

impl SpatialInertia {
    /// Create a spatial inertia with the given mass, CoM offset, and
    /// rotational inertia about the CoM.
    pub fn new(mass: f64, com: Vec3, inertia: Mat3) -> Self {
        Self { mass, com, inertia }
    }

    /// Massless placeholder (world slot, frames without dynamics).
    pub fn zero() -> Self {
        Self {
            mass: 0.0,
            com: Vec3::zeros(),
            inertia: Mat3::zeros(),
        }
    }

    /// Point mass at a given position in the body frame.
    pub fn point_mass(mass: f64, pos: Vec3) -> Self {
        Self {
            mass,
            com: pos,
            inertia: Mat3::zeros(),
        }
    }

    /// Uniform rod of given mass and length along the Y axis, centered at
    /// the origin.
    pub fn rod(mass: f64, length: f64) -> Self {
        let i = mass * length * length / 12.0;
        Self {
            mass,
            com: Vec3::zeros(),
            inertia: Mat3::new(i, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, i),
        }
    }

    /// Uniform solid sphere centered at the origin.
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 2.0 / 5.0 * mass * radius * radius;
        Self {
            mass,
            com: Vec3::zeros(),
            inertia: Mat3::from_diagonal(&Vec3::new(i, i, i)),
        }
    }

    /// Uniform solid cuboid with full side lengths (x, y, z), centered at
    /// the origin.
    pub fn cuboid(mass: f64, x: f64, y: f64, z: f64) -> Self {
        let k = mass / 12.0;
        Self {
            mass,
            com: Vec3::zeros(),
            inertia: Mat3::from_diagonal(&Vec3::new(
                k * (y * y + z * z),
                k * (x * x + z * z),
                k * (x * x + y * y),
            )),
        }
    }

    /// Dense 6x6 spatial inertia about the body frame origin.
    ///
    /// I = | I_com + m[c]×[c]×ᵀ   m[c]× |
    ///     | m[c]×ᵀ               m·E   |
    ///
    /// Exactly symmetric by construction (given a symmetric `inertia`).
    pub fn matrix(&self) -> Mat6 {
        let cx = skew(&self.com);
        let m = self.mass;
        let mcx = cx * m;

        let mut mat = Mat6::zeros();
        let top_left = self.inertia + cx * cx.transpose() * m;
        mat.fixed_view_mut::<3, 3>(0, 0).copy_from(&top_left);
        mat.fixed_view_mut::<3, 3>(0, 3).copy_from(&mcx);
        mat.fixed_view_mut::<3, 3>(3, 0).copy_from(&mcx.transpose());
        mat.fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(Mat3::identity() * m));
        mat
    }

    /// Momentum-style product I·v without materializing the 6x6 form.
    ///
    /// p = m(v + ω×c), n = I_com·ω + c×p.
    pub fn mul_motion(&self, m: &Motion) -> Force {
        let p = (m.linear + m.angular.cross(&self.com)) * self.mass;
        let n = self.inertia * m.angular + self.com.cross(&p);
        Force::new(n, p)
    }

    /// Velocity bias force v ×f (I·v), the gyroscopic wrench of a body
    /// moving with spatial velocity v.
    pub fn vxiv(&self, v: &Motion) -> Force {
        v.cross_force(&self.mul_motion(v))
    }
}

impl std::ops::Add for SpatialInertia {
    type Output = SpatialInertia;

    /// Compose two inertias expressed in a common frame. The 6x6 forms add;
    /// this keeps the compact representation consistent with that sum.
    fn add(self, rhs: SpatialInertia) -> SpatialInertia {
        let mass = self.mass + rhs.mass;
        let com = if mass > 0.0 {
            (self.com * self.mass + rhs.com * rhs.mass) / mass
        } else {
            Vec3::zeros()
        };
        let cx = skew(&com);
        let c1x = skew(&self.com);
        let c2x = skew(&rhs.com);
        let inertia = self.inertia + rhs.inertia + c1x * c1x.transpose() * self.mass
            + c2x * c2x.transpose() * rhs.mass
            - cx * cx.transpose() * mass;
        SpatialInertia { mass, com, inertia }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_mass_matrix() {
        let si = SpatialInertia::point_mass(2.0, Vec3::new(0.0, 1.0, 0.0));
        let mat = si.matrix();
        assert_relative_eq!(mat[(3, 3)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(4, 4)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(5, 5)], 2.0, epsilon = 1e-12);
        // Parallel axis: a point mass at +y has m about the x and z axes.
        assert_relative_eq!(mat[(0, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(1, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(mat[(2, 2)], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_inertia() {
        let si = SpatialInertia::sphere(5.0, 0.1);
        let expected = 2.0 / 5.0 * 5.0 * 0.01;
        assert_relative_eq!(si.inertia[(0, 0)], expected, epsilon = 1e-12);
        assert_relative_eq!(si.inertia[(1, 1)], expected, epsilon = 1e-12);
        assert_relative_eq!(si.inertia[(2, 2)], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_cuboid_inertia() {
        let si = SpatialInertia::cuboid(12.0, 1.0, 2.0, 3.0);
        assert_relative_eq!(si.inertia[(0, 0)], 4.0 + 9.0, epsilon = 1e-12);
        assert_relative_eq!(si.inertia[(1, 1)], 1.0 + 9.0, epsilon = 1e-12);
        assert_relative_eq!(si.inertia[(2, 2)], 1.0 + 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mul_motion_matches_matrix() {
        let si = SpatialInertia::new(
            3.0,
            Vec3::new(0.1, -0.2, 0.3),
            Mat3::new(2.0, 0.1, 0.0, 0.1, 1.5, -0.2, 0.0, -0.2, 1.0),
        );
        let v = Motion::new(Vec3::new(0.5, -1.0, 2.0), Vec3::new(1.0, 0.0, -0.5));
        let structured = si.mul_motion(&v).to_vector();
        let dense = si.matrix() * v.to_vector();
        assert_relative_eq!(structured, dense, epsilon = 1e-12);
    }

    #[test]
    fn test_vxiv_matches_dense() {
        let si = SpatialInertia::new(
            2.0,
            Vec3::new(-0.3, 0.1, 0.2),
            Mat3::new(1.0, 0.0, 0.1, 0.0, 0.8, 0.0, 0.1, 0.0, 0.6),
        );
        let v = Motion::new(Vec3::new(1.0, 2.0, -1.0), Vec3::new(0.2, 0.0, 0.9));
        let iv = Force::from_vector(&(si.matrix() * v.to_vector()));
        let dense = v.cross_force(&iv).to_vector();
        assert_relative_eq!(si.vxiv(&v).to_vector(), dense, epsilon = 1e-12);
    }

    #[test]
    fn test_vxiv_pure_translation_is_zero() {
        let si = SpatialInertia::sphere(4.0, 0.2);
        let v = Motion::new(Vec3::zeros(), Vec3::new(1.0, -2.0, 0.5));
        assert_relative_eq!(si.vxiv(&v).to_vector().norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_add_matches_matrix_sum() {
        let a = SpatialInertia::point_mass(2.0, Vec3::new(0.5, 0.0, 0.0));
        let b = SpatialInertia::sphere(1.0, 0.3);
        let sum = (a + b).matrix();
        let expected = a.matrix() + b.matrix();
        assert_relative_eq!(sum, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_is_exactly_symmetric() {
        let si = SpatialInertia::new(
            7.0,
            Vec3::new(0.11, 0.22, -0.37),
            Mat3::new(2.0, 0.3, -0.1, 0.3, 1.7, 0.05, -0.1, 0.05, 0.9),
        );
        let mat = si.matrix();
        for i in 0..6 {
            for j in 0..6 {
                assert!(
                    mat[(i, j)] == mat[(j, i)],
                    "not bitwise symmetric at ({}, {}): {} vs {}",
                    i,
                    j,
                    mat[(i, j)],
                    mat[(j, i)]
                );
            }
        }
    }
}
