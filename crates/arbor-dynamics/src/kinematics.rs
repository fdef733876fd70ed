//! Forward kinematics.

use arbor_math::DVec;
use arbor_model::{Data, Model};

use crate::error::{check_data, check_dim, Result};

/// Update body placements and velocities for a state:
/// `data.local_placements[i]` becomes body i's placement in its parent
/// frame, `data.world_placements[i]` its placement in the world frame, and
/// `data.v[i]` its spatial velocity in the body frame.
pub fn forward_kinematics(
    model: &Model,
    data: &mut Data,
    q: &DVec,
    v: &DVec,
) -> Result<()> {
    check_dim("q", model.nq, q.len())?;
    check_dim("v", model.nv, v.len())?;
    check_data(model, data)?;

    let qs = q.as_slice();
    let vs = v.as_slice();
    for i in 1..model.nbodies() {
        let joint = &model.joints[i];
        joint.calc(&mut data.joints[i], model.joint_q(i, qs), model.joint_v(i, vs));
        data.local_placements[i] =
            model.joint_placements[i] * data.joints[i].placement();

        let parent = model.parents[i];
        data.world_placements[i] =
            data.world_placements[parent] * data.local_placements[i];

        let vj = data.joints[i].velocity();
        data.v[i] = if parent == 0 {
            vj
        } else {
            data.local_placements[i].act_inv_motion(&data.v[parent]) + vj
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arbor_math::{SpatialInertia, SpatialTransform, Vec3};
    use arbor_model::ModelBuilder;

    fn two_link_arm() -> arbor_model::Model {
        ModelBuilder::new()
            .add_revolute(
                "shoulder",
                0,
                nalgebra::Vector3::z_axis(),
                SpatialTransform::identity(),
                SpatialInertia::rod(1.0, 1.0),
            )
            .add_revolute(
                "elbow",
                1,
                nalgebra::Vector3::z_axis(),
                SpatialTransform::translation(Vec3::new(1.0, 0.0, 0.0)),
                SpatialInertia::rod(1.0, 1.0),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_neutral_placements() {
        let model = two_link_arm();
        let mut data = model.create_data();
        let v = DVec::zeros(model.nv);
        forward_kinematics(&model, &mut data, &model.neutral_config(), &v).unwrap();
        assert_relative_eq!(
            data.world_placements[2].pos,
            Vec3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bent_elbow_position() {
        // Shoulder at 90°: the elbow frame sits at world (0, 1, 0) and its
        // axes are rotated with the shoulder.
        let model = two_link_arm();
        let mut data = model.create_data();
        let mut q = DVec::zeros(2);
        q[0] = std::f64::consts::FRAC_PI_2;
        let v = DVec::zeros(2);
        forward_kinematics(&model, &mut data, &q, &v).unwrap();
        assert_relative_eq!(
            data.world_placements[2].pos,
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = 1e-12
        );
        let local_x = data.world_placements[2].rot * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(local_x, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_composition_along_chain() {
        // Both joints spinning: the elbow body sees its parent's angular
        // velocity plus a linear sweep from the 1 m offset.
        let model = two_link_arm();
        let mut data = model.create_data();
        let q = DVec::zeros(2);
        let mut v = DVec::zeros(2);
        v[0] = 2.0;
        v[1] = -0.5;
        forward_kinematics(&model, &mut data, &q, &v).unwrap();

        assert_relative_eq!(
            data.v[1].angular,
            Vec3::new(0.0, 0.0, 2.0),
            epsilon = 1e-12
        );
        // Angular velocities sum; the elbow origin sweeps at
        // w × r = (0,0,2) × (1,0,0) = (0, 2, 0).
        assert_relative_eq!(
            data.v[2].angular,
            Vec3::new(0.0, 0.0, 1.5),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            data.v[2].linear,
            Vec3::new(0.0, 2.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_translation_joint_offsets_world_placement() {
        let model = ModelBuilder::new()
            .add_translation(
                "cart",
                0,
                SpatialTransform::translation(Vec3::new(0.0, 0.0, 1.0)),
                SpatialInertia::sphere(1.0, 0.1),
            )
            .build()
            .unwrap();
        let mut data = model.create_data();
        let mut q = DVec::zeros(3);
        q[0] = 0.5;
        q[1] = -0.5;
        let v = DVec::zeros(3);
        forward_kinematics(&model, &mut data, &q, &v).unwrap();
        assert_relative_eq!(
            data.world_placements[1].pos,
            Vec3::new(0.5, -0.5, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = two_link_arm();
        let mut data = model.create_data();
        let bad = DVec::zeros(5);
        let v = DVec::zeros(2);
        assert!(forward_kinematics(&model, &mut data, &bad, &v).is_err());

        // A workspace from a different model is refused too.
        let single = ModelBuilder::new()
            .add_revolute(
                "only",
                0,
                nalgebra::Vector3::z_axis(),
                SpatialTransform::identity(),
                SpatialInertia::rod(1.0, 1.0),
            )
            .build()
            .unwrap();
        let mut foreign = single.create_data();
        let q = DVec::zeros(2);
        assert!(forward_kinematics(&model, &mut foreign, &q, &v).is_err());
    }
}
