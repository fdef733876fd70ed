//! arbor — articulated rigid-body dynamics.
//!
//! Umbrella crate: re-exports the math, model, and solver layers, and adds a
//! minimal stepping helper for consumers that just want to march a mechanism
//! forward in time.

pub use arbor_dynamics::{
    self, aba, aba_with_external_forces, forward_kinematics, integrate, rnea,
    total_energy, DynamicsError,
};
pub use arbor_math::{
    self, Force, Motion, SpatialInertia, SpatialTransform, Vec3, GRAVITY,
};
pub use arbor_model::{
    self, Data, JointModel, Model, ModelBuilder, ModelError,
};

use arbor_math::DVec;

/// Advance (q, v) by one semi-implicit Euler step of size `dt`: the velocity
/// is updated from the articulated-body accelerations first, then the
/// configuration is stepped along the updated velocity on the joint
/// manifolds.
pub fn step(
    model: &Model,
    data: &mut Data,
    q: &mut DVec,
    v: &mut DVec,
    tau: &DVec,
    dt: f64,
) -> arbor_dynamics::Result<()> {
    aba(model, data, q, v, tau)?;
    *v += &(&data.ddq * dt);
    let dq = &*v * dt;
    *q = integrate(model, q, &dq)?;
    Ok(())
}
