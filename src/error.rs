use thiserror::Error;

/// Errors raised by the nodal engine.
///
/// A well with no operating point is not an error; solver calls return
/// `Ok(None)` for that case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodalError {
    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("degenerate intersection on grid segment {segment}: interpolation is undefined")]
    DegenerateIntersection { segment: usize },
}

impl NodalError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { field, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, NodalError>;
