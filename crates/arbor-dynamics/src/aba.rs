//! Articulated-body algorithm, O(n) forward dynamics.
//!
//! Given (q, v, tau), compute the joint accelerations ddq. Three passes over
//! the kinematic tree:
//! 1. Forward: joint placements, body velocities, velocity bias, rigid
//!    inertias and gyroscopic forces.
//! 2. Backward: articulated inertias, their joint-space factorizations, and
//!    articulated bias forces.
//! 3. Forward: accelerations and the packed ddq vector.
//!
//! Gravity enters through the base acceleration trick: the world root is
//! given acceleration −g, so every reported body acceleration is offset by
//! gravity and the world frame never moves.

use arbor_math::{skew, DVec, Force, Mat3, Mat6, Motion, SpatialTransform};
use arbor_model::{Data, Model};

use crate::error::{check_data, check_dim, DynamicsError, Result};

/// Run the articulated-body algorithm.
///
/// Writes every intermediate into `data` and returns the joint accelerations
/// `data.ddq` (dimension `model.nv`).
pub fn aba<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVec,
    v: &DVec,
    tau: &DVec,
) -> Result<&'a DVec> {
    aba_with_external_forces(model, data, q, v, tau, None)
}

/// Run the articulated-body algorithm with external spatial forces applied
/// to each body, expressed in body frames.
pub fn aba_with_external_forces<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVec,
    v: &DVec,
    tau: &DVec,
    external_forces: Option<&[Force]>,
) -> Result<&'a DVec> {
    check_dim("q", model.nq, q.len())?;
    check_dim("v", model.nv, v.len())?;
    check_dim("tau", model.nv, tau.len())?;
    check_data(model, data)?;
    if let Some(ext) = external_forces {
        check_dim("external forces", model.nbodies(), ext.len())?;
    }

    let nb = model.nbodies();
    let qs = q.as_slice();
    let vs = v.as_slice();

    data.v[0] = Motion::zero();
    data.a[0] = -model.gravity;

    // -- Pass 1: forward -- placements, velocities, velocity bias --
    for i in 1..nb {
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
        // Velocity bias c = cJ + v × vj; stashed in a[i] until pass 3.
        data.a[i] = data.joints[i].bias() + data.v[i].cross(&vj);

        data.articulated_inertias[i] = model.inertias[i].matrix();
        data.f[i] = model.inertias[i].vxiv(&data.v[i]);
        if let Some(ext) = external_forces {
            data.f[i] = data.f[i] - ext[i];
        }
    }

    // -- Pass 2: backward -- articulated inertias and bias forces --
    for i in (1..nb).rev() {
        let joint = &model.joints[i];
        let nv_i = joint.nv();
        let iv = model.idx_v[i];
        let parent = model.parents[i];

        let mut s_f = [0.0; 6];
        joint.project_force(&data.f[i], &mut s_f[..nv_i]);
        for k in 0..nv_i {
            data.u[iv + k] = tau[iv + k] - s_f[k];
        }

        joint
            .calc_aba(
                &mut data.joints[i],
                &mut data.articulated_inertias[i],
                parent != 0,
            )
            .map_err(|source| DynamicsError::Joint {
                index: i,
                name: model.names[i].clone(),
                source,
            })?;

        if parent != 0 {
            let ia = data.articulated_inertias[i];
            let bias_corr =
                data.joints[i].bias_correction(&data.u.as_slice()[iv..iv + nv_i]);
            let pa = data.f[i]
                + Force::from_vector(&(ia * data.a[i].to_vector()))
                + bias_corr;

            let li_mi = data.local_placements[i];
            data.articulated_inertias[parent] += transform_inertia(&li_mi, &ia);
            data.f[parent] = data.f[parent] + li_mi.act_force(&pa);
        }
    }

    // -- Pass 3: forward -- accelerations --
    for i in 1..nb {
        let parent = model.parents[i];
        let iv = model.idx_v[i];
        let nv_i = model.joints[i].nv();

        let a_prime =
            data.local_placements[i].act_inv_motion(&data.a[parent]) + data.a[i];

        data.joints[i].solve(
            &data.u.as_slice()[iv..iv + nv_i],
            &mut data.ddq.as_mut_slice()[iv..iv + nv_i],
        );
        data.joints[i]
            .ddq_correction(&a_prime, &mut data.ddq.as_mut_slice()[iv..iv + nv_i]);

        let sq = model.joints[i].joint_motion(&data.ddq.as_slice()[iv..iv + nv_i]);
        data.a[i] = a_prime + sq;
    }

    Ok(&data.ddq)
}

/// Express a child-frame articulated inertia in the parent frame across the
/// placement `m`, without forming 6×6 products. The diagonal blocks of the
/// result are mirrored from their upper triangles and the off-diagonal
/// blocks are exact transposes, so the output is symmetric to the bit.
pub(crate) fn transform_inertia(m: &SpatialTransform, ia: &Mat6) -> Mat6 {
    let r = m.rot;
    let t = skew(&m.pos);

    let aa = ia.fixed_view::<3, 3>(0, 0).into_owned();
    let al = ia.fixed_view::<3, 3>(0, 3).into_owned();
    let ll = ia.fixed_view::<3, 3>(3, 3).into_owned();

    let r_ll = r * ll * r.transpose();
    let r_al = r * al * r.transpose();
    let al_out = r_al + t * r_ll;
    let aa_out = r * aa * r.transpose() + t * r_al.transpose() - al_out * t;

    let mut out = Mat6::zeros();
    out.fixed_view_mut::<3, 3>(0, 0).copy_from(&mirror_upper(&aa_out));
    out.fixed_view_mut::<3, 3>(0, 3).copy_from(&al_out);
    out.fixed_view_mut::<3, 3>(3, 0).copy_from(&al_out.transpose());
    out.fixed_view_mut::<3, 3>(3, 3).copy_from(&mirror_upper(&r_ll));
    out
}

/// Copy the upper triangle onto the lower one.
fn mirror_upper(m: &Mat3) -> Mat3 {
    Mat3::new(
        m[(0, 0)],
        m[(0, 1)],
        m[(0, 2)],
        m[(0, 1)],
        m[(1, 1)],
        m[(1, 2)],
        m[(0, 2)],
        m[(1, 2)],
        m[(2, 2)],
    )
}
