//! O(n) rigid-body dynamics over kinematic trees.
//!
//! The solvers take an immutable [`arbor_model::Model`] and write into a
//! caller-owned [`arbor_model::Data`], so repeated evaluation allocates
//! nothing:
//! - [`aba`]: forward dynamics (torques to accelerations) via the
//!   articulated-body algorithm.
//! - [`rnea`]: inverse dynamics (accelerations to torques) via the
//!   recursive Newton-Euler algorithm.
//! - [`forward_kinematics`]: body placements and velocities for a state.
//! - [`integrate`]: configuration stepping on the joint manifolds.
//! - [`total_energy`]: mechanical energy, mostly for validation.

pub mod aba;
pub mod energy;
pub mod error;
pub mod integrate;
pub mod kinematics;
pub mod rnea;

pub use aba::{aba, aba_with_external_forces};
pub use energy::total_energy;
pub use error::{DynamicsError, Result};
pub use integrate::integrate;
pub use kinematics::forward_kinematics;
pub use rnea::rnea;
