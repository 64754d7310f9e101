//! Role-based permission gate.
//!
//! # Responsibility
//! - Map roles to granted permissions and views to required permissions.
//! - Answer `can(role, permission)` and view access checks.
//!
//! # Invariants
//! - Lookups are static and pure; no per-record ownership rules live here.
//! - Every view requires exactly one permission.

mod permission;
mod view;

pub use permission::{
    can, parse_permission, role_permissions, supported_permission_strings, Permission,
    PermissionError,
};
pub use view::{check_view, View, ViewAccess};
