//! Core domain logic for LoanDesk, a loan-origination CRM.
//! This crate is the single source of truth for business invariants.

pub mod access;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod seed;
pub mod service;
pub mod session;

pub use access::{can, check_view, Permission, View, ViewAccess};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ServiceConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use repo::record_repo::{Collection, RecordStore, SqliteRecordStore, StoreError, StoreResult};
pub use repo::settings_repo::{SettingsRepository, Theme};
pub use seed::{demo_seed, init_store, SeedData, SeedOutcome};
pub use service::{CrmError, CrmResult, CrmService, CrmState, LoadStatus, PipelineSummary};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
