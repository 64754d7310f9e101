//! Login session and break tracking for the signed-in user.
//!
//! # Responsibility
//! - Track who is signed in and since when.
//! - Accumulate break time across start/stop toggles.
//!
//! # Invariants
//! - At most one session exists per tracker.
//! - Counters live for the process only and reset on logout.
//! - `total_break_seconds` only grows while a session is active.

use crate::model::user::User;
use chrono::{DateTime, NaiveTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotLoggedIn,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "no user is logged in"),
        }
    }
}

impl Error for SessionError {}

/// Signed-in session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub user: User,
    pub session_start: DateTime<Utc>,
    pub break_start: Option<DateTime<Utc>>,
    pub total_break_seconds: i64,
}

/// Result of one break toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakTransition {
    Started {
        at: DateTime<Utc>,
    },
    Ended {
        /// Length of the break that just ended.
        seconds: i64,
        /// Running total for this session.
        total_seconds: i64,
    },
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub user_id: String,
    pub session_seconds: i64,
    pub total_break_seconds: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, replacing any previous one.
    pub fn login(&mut self, user: User, now: DateTime<Utc>) {
        self.active = Some(ActiveSession {
            user,
            session_start: now,
            break_start: None,
            total_break_seconds: 0,
        });
    }

    /// Ends the session and resets all counters.
    ///
    /// A break still running at logout is counted into the summary.
    pub fn logout(&mut self, now: DateTime<Utc>) -> Option<SessionSummary> {
        let session = self.active.take()?;
        let running_break = session
            .break_start
            .map(|start| elapsed_seconds(start, now))
            .unwrap_or(0);
        Some(SessionSummary {
            user_id: session.user.id,
            session_seconds: elapsed_seconds(session.session_start, now),
            total_break_seconds: session.total_break_seconds + running_break,
        })
    }

    /// Starts a break when working, ends it when on break.
    pub fn toggle_break(&mut self, now: DateTime<Utc>) -> Result<BreakTransition, SessionError> {
        let session = self.active.as_mut().ok_or(SessionError::NotLoggedIn)?;
        match session.break_start.take() {
            None => {
                session.break_start = Some(now);
                Ok(BreakTransition::Started { at: now })
            }
            Some(start) => {
                let seconds = elapsed_seconds(start, now);
                session.total_break_seconds += seconds;
                Ok(BreakTransition::Ended {
                    seconds,
                    total_seconds: session.total_break_seconds,
                })
            }
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.active.as_ref().map(|session| &session.user)
    }

    /// Replaces the cached user record after it was edited.
    pub fn refresh_user(&mut self, user: &User) {
        if let Some(session) = self.active.as_mut() {
            if session.user.id == user.id {
                session.user = user.clone();
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_on_break(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.break_start.is_some())
    }

    pub fn total_break_seconds(&self) -> i64 {
        self.active
            .as_ref()
            .map_or(0, |session| session.total_break_seconds)
    }

    /// Length of the running break, zero when not on break.
    pub fn current_break_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.active
            .as_ref()
            .and_then(|session| session.break_start)
            .map_or(0, |start| elapsed_seconds(start, now))
    }

    pub fn session_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.active
            .as_ref()
            .map_or(0, |session| elapsed_seconds(session.session_start, now))
    }
}

/// Returns whether `at` falls inside the user's shift window.
///
/// Users without a complete, valid window are always considered on shift.
pub fn is_within_shift(user: &User, at: NaiveTime) -> bool {
    match user.shift_window() {
        Ok(Some((start, end))) => start <= at && at <= end,
        _ => true,
    }
}

/// Formats seconds as `HH:MM:SS`. Negative input formats as zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}
