//! Recursive Newton-Euler algorithm, O(n) inverse dynamics.
//!
//! Given (q, v, ddq), compute the joint torques tau that produce those
//! accelerations. Gravity uses the same base-acceleration trick as the
//! forward-dynamics pass, so `rnea` composed with `aba` is the identity on
//! torques.

use arbor_math::{DVec, Motion};
use arbor_model::{Data, Model};

use crate::error::{check_data, check_dim, Result};

/// Run the recursive Newton-Euler algorithm.
///
/// Writes every intermediate into `data` and returns the joint torques
/// `data.tau` (dimension `model.nv`). After the call `data.f[0]` holds the
/// total wrench the support applies to the tree, i.e. the ground reaction.
pub fn rnea<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVec,
    v: &DVec,
    ddq: &DVec,
) -> Result<&'a DVec> {
    check_dim("q", model.nq, q.len())?;
    check_dim("v", model.nv, v.len())?;
    check_dim("ddq", model.nv, ddq.len())?;
    check_data(model, data)?;

    let nb = model.nbodies();
    let qs = q.as_slice();
    let vs = v.as_slice();
    let dds = ddq.as_slice();

    data.v[0] = Motion::zero();
    data.a[0] = -model.gravity;
    data.f[0] = arbor_math::Force::zero();

    // -- Pass 1: forward -- velocities, accelerations, body forces --
    for i in 1..nb {
        let joint = &model.joints[i];
        joint.calc(&mut data.joints[i], model.joint_q(i, qs), model.joint_v(i, vs));
        data.local_placements[i] =
            model.joint_placements[i] * data.joints[i].placement();

        let parent = model.parents[i];
        data.world_placements[i] =
            data.world_placements[parent] * data.local_placements[i];
        let li_mi = data.local_placements[i];
        let vj = data.joints[i].velocity();
        data.v[i] = if parent == 0 {
            vj
        } else {
            li_mi.act_inv_motion(&data.v[parent]) + vj
        };

        let aj = joint.joint_motion(model.joint_v(i, dds));
        data.a[i] = li_mi.act_inv_motion(&data.a[parent])
            + aj
            + data.joints[i].bias()
            + data.v[i].cross(&vj);

        data.f[i] = model.inertias[i].mul_motion(&data.a[i])
            + model.inertias[i].vxiv(&data.v[i]);
    }

    // -- Pass 2: backward -- project torques, propagate forces --
    for i in (1..nb).rev() {
        let joint = &model.joints[i];
        let nv_i = joint.nv();
        let iv = model.idx_v[i];

        let mut s_f = [0.0; 6];
        joint.project_force(&data.f[i], &mut s_f[..nv_i]);
        for k in 0..nv_i {
            data.tau[iv + k] = s_f[k];
        }

        let parent = model.parents[i];
        let transmitted = data.local_placements[i].act_force(&data.f[i]);
        data.f[parent] = data.f[parent] + transmitted;
    }

    Ok(&data.tau)
}
