//! Record-level validation errors shared by model types.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a record was rejected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank after trim.
    EmptyField(&'static str),
    /// A shift time is not in `HH:mm` form.
    InvalidShiftTime(String),
    /// Shift end precedes shift start.
    ShiftEndsBeforeStart { start: String, end: String },
    /// Another user already owns this username.
    DuplicateUsername(String),
    /// A commitment must target a positive amount.
    ZeroCommitmentTarget,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidShiftTime(value) => {
                write!(f, "shift time `{value}` must use HH:mm format")
            }
            Self::ShiftEndsBeforeStart { start, end } => {
                write!(f, "shift end time {end} cannot be before start time {start}")
            }
            Self::DuplicateUsername(username) => {
                write!(f, "username `{username}` is already taken")
            }
            Self::ZeroCommitmentTarget => {
                write!(f, "commitment target amount must be greater than zero")
            }
        }
    }
}

impl Error for ValidationError {}

/// Rejects blank text for a required field.
pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
