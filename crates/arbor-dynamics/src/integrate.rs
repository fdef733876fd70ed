//! Configuration-space integration.
//!
//! Configurations live on a manifold (quaternions for rotational joints), so
//! stepping is joint-wise `q ⊕ dq`, not vector addition. `dq` is a
//! velocity-space displacement; scale a velocity by the time step before
//! calling.

use arbor_math::DVec;
use arbor_model::Model;

use crate::error::{check_dim, Result};

/// Step a configuration by the velocity-space displacement `dq`, returning
/// the new configuration. Quaternion blocks stay unit-norm.
pub fn integrate(model: &Model, q: &DVec, dq: &DVec) -> Result<DVec> {
    check_dim("q", model.nq, q.len())?;
    check_dim("dq", model.nv, dq.len())?;

    let mut out = DVec::zeros(model.nq);
    let qs = q.as_slice();
    let ds = dq.as_slice();
    for i in 1..model.nbodies() {
        let joint = &model.joints[i];
        let iq = model.idx_q[i];
        joint.integrate(
            model.joint_q(i, qs),
            model.joint_v(i, ds),
            &mut out.as_mut_slice()[iq..iq + joint.nq()],
        );
    }
    Ok(out)
}
