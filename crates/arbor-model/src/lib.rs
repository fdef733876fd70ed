//! Rigid-body tree description and solver workspace.
//!
//! [`Model`] is the immutable side: topology, joints, placements, inertias.
//! [`Data`] is the mutable side: every buffer the dynamics and kinematics
//! passes write. One `Model` can serve many `Data` instances concurrently.

pub mod data;
pub mod joint;
pub mod model;

pub use data::Data;
pub use joint::{JointData, JointError, JointModel};
pub use model::{Model, ModelBuilder, ModelError};
