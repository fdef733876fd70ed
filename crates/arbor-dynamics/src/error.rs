//! Solver errors.

use arbor_model::{Data, JointError, Model};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DynamicsError>;

/// Errors raised by the dynamics and kinematics passes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DynamicsError {
    /// An input vector does not match the model's dimensions. Raised before
    /// any workspace mutation.
    #[error("{what} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A joint-level failure, tagged with the offending body.
    #[error("joint of body '{name}' (index {index}): {source}")]
    Joint {
        index: usize,
        name: String,
        source: JointError,
    },
}

pub(crate) fn check_dim(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(DynamicsError::DimensionMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Reject a workspace that was not sized for this model, e.g. one built from
/// a different `Model`, before any pass touches it.
pub(crate) fn check_data(model: &Model, data: &Data) -> Result<()> {
    check_dim("data bodies", model.nbodies(), data.joints.len())?;
    check_dim("data u", model.nv, data.u.len())?;
    check_dim("data ddq", model.nv, data.ddq.len())?;
    check_dim("data tau", model.nv, data.tau.len())?;
    Ok(())
}
