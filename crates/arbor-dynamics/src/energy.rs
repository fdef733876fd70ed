//! Mechanical energy of a tree state.

use arbor_math::DVec;
use arbor_model::{Data, Model};

use crate::error::Result;
use crate::kinematics::forward_kinematics;

/// Total mechanical energy (kinetic + gravitational potential) of the tree
/// in state (q, v). Runs forward kinematics into `data`. The potential is
/// measured against the world origin, so only differences are meaningful.
pub fn total_energy(model: &Model, data: &mut Data, q: &DVec, v: &DVec) -> Result<f64> {
    forward_kinematics(model, data, q, v)?;

    let g = model.gravity.linear;
    let mut energy = 0.0;
    for i in 1..model.nbodies() {
        let inertia = &model.inertias[i];
        energy += 0.5 * inertia.mul_motion(&data.v[i]).dot(&data.v[i]);

        let placement = &data.world_placements[i];
        let com_world = placement.rot * inertia.com + placement.pos;
        energy -= inertia.mass * g.dot(&com_world);
    }
    Ok(energy)
}
