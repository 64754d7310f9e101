//! User domain model.
//!
//! # Responsibility
//! - Define staff accounts, their role and optional shift window.
//! - Validate shift window ordering.
//!
//! # Invariants
//! - `shift_end_time` must not precede `shift_start_time` when both are set.
//! - Shift times use 24h `HH:mm`.
//! - `password_hash` is a salted hash; clear passwords are never stored.

use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static SHIFT_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid shift time regex"));

/// Staff role, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "Sub-Admin")]
    SubAdmin,
    #[serde(rename = "Team Lead")]
    TeamLead,
    Agent,
    Trainee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::SubAdmin => "Sub-Admin",
            Self::TeamLead => "Team Lead",
            Self::Agent => "Agent",
            Self::Trainee => "Trainee",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Inactive => f.write_str("Inactive"),
        }
    }
}

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub shift_start_time: Option<String>,
    pub shift_end_time: Option<String>,
}

/// Caller input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub shift_start_time: Option<String>,
    pub shift_end_time: Option<String>,
}

impl User {
    /// Validates required fields and the shift window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.id, "user id")?;
        require_text(&self.name, "user name")?;
        require_text(&self.username, "username")?;
        self.shift_window().map(|_| ())
    }

    /// Returns the parsed shift window when both ends are set.
    ///
    /// # Errors
    /// - `InvalidShiftTime` when either end is not `HH:mm`.
    /// - `ShiftEndsBeforeStart` when end < start.
    pub fn shift_window(&self) -> Result<Option<(NaiveTime, NaiveTime)>, ValidationError> {
        let start = self
            .shift_start_time
            .as_deref()
            .map(parse_shift_time)
            .transpose()?;
        let end = self
            .shift_end_time
            .as_deref()
            .map(parse_shift_time)
            .transpose()?;

        match (start, end) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(ValidationError::ShiftEndsBeforeStart {
                        start: self.shift_start_time.clone().unwrap_or_default(),
                        end: self.shift_end_time.clone().unwrap_or_default(),
                    });
                }
                Ok(Some((start, end)))
            }
            _ => Ok(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Parses one `HH:mm` shift time.
pub fn parse_shift_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    if !SHIFT_TIME_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidShiftTime(value.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| ValidationError::InvalidShiftTime(value.to_string()))
}
