//! Application service layer.
//!
//! # Responsibility
//! - Expose every CRM use-case as a method on [`CrmService`].
//! - Keep persistence, permissions, audit and notifications consistent
//!   across handlers.

pub mod audit;
mod clients;
pub mod crm_service;
pub mod error;
mod interactions;
pub mod queries;
mod records;
pub mod state;
mod tasks;
mod teams;
mod users;

pub use crm_service::{CrmService, LoadStatus};
pub use error::{CrmError, CrmResult};
pub use queries::PipelineSummary;
pub use state::{CrmState, UNASSIGNED_LABEL};
