//! Error types for the simulation core.

use thiserror::Error;

use crate::simulation::store::BodyId;

/// Failures reported by the simulation core. All of these are synchronous
/// and caller-recoverable; none leaves the store in a modified state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    #[error("maximum number of objects reached ({max})")]
    CapacityExceeded { max: usize },

    #[error("body id {0} is not valid")]
    InvalidId(BodyId),

    #[error("octree subdivision limit reached at depth {depth}; positions may be coincident")]
    SubdivisionLimit { depth: u32 },
}

pub type Result<T> = std::result::Result<T, SimError>;
