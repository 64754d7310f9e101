//! Permission declarations and the role grant table.

use crate::model::user::Role;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Action that a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ViewDashboard,
    ViewClients,
    ManageClients,
    DeleteClients,
    AssignClients,
    BulkEmail,
    ViewTasks,
    ManageTasks,
    ManageDocuments,
    ViewReports,
    ManageCommitments,
    ManageUsers,
    ManageTeams,
    ViewActivityLog,
    ResetData,
}

impl Permission {
    pub const ALL: [Permission; 15] = [
        Self::ViewDashboard,
        Self::ViewClients,
        Self::ManageClients,
        Self::DeleteClients,
        Self::AssignClients,
        Self::BulkEmail,
        Self::ViewTasks,
        Self::ManageTasks,
        Self::ManageDocuments,
        Self::ViewReports,
        Self::ManageCommitments,
        Self::ManageUsers,
        Self::ManageTeams,
        Self::ViewActivityLog,
        Self::ResetData,
    ];

    /// Stable string id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ViewClients => "view_clients",
            Self::ManageClients => "manage_clients",
            Self::DeleteClients => "delete_clients",
            Self::AssignClients => "assign_clients",
            Self::BulkEmail => "bulk_email",
            Self::ViewTasks => "view_tasks",
            Self::ManageTasks => "manage_tasks",
            Self::ManageDocuments => "manage_documents",
            Self::ViewReports => "view_reports",
            Self::ManageCommitments => "manage_commitments",
            Self::ManageUsers => "manage_users",
            Self::ManageTeams => "manage_teams",
            Self::ViewActivityLog => "view_activity_log",
            Self::ResetData => "reset_data",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SUB_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewClients,
    Permission::ManageClients,
    Permission::DeleteClients,
    Permission::AssignClients,
    Permission::BulkEmail,
    Permission::ViewTasks,
    Permission::ManageTasks,
    Permission::ManageDocuments,
    Permission::ViewReports,
    Permission::ManageCommitments,
    Permission::ManageUsers,
    Permission::ManageTeams,
    Permission::ViewActivityLog,
];

const TEAM_LEAD_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewClients,
    Permission::ManageClients,
    Permission::AssignClients,
    Permission::BulkEmail,
    Permission::ViewTasks,
    Permission::ManageTasks,
    Permission::ManageDocuments,
    Permission::ViewReports,
    Permission::ManageCommitments,
    Permission::ViewActivityLog,
];

const AGENT_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewClients,
    Permission::ManageClients,
    Permission::BulkEmail,
    Permission::ViewTasks,
    Permission::ManageTasks,
    Permission::ManageDocuments,
];

const TRAINEE_PERMISSIONS: &[Permission] = &[
    Permission::ViewDashboard,
    Permission::ViewClients,
    Permission::ManageClients,
    Permission::ViewTasks,
    Permission::ManageTasks,
];

/// Returns every permission granted to `role`.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &Permission::ALL,
        Role::SubAdmin => SUB_ADMIN_PERMISSIONS,
        Role::TeamLead => TEAM_LEAD_PERMISSIONS,
        Role::Agent => AGENT_PERMISSIONS,
        Role::Trainee => TRAINEE_PERMISSIONS,
    }
}

/// Returns whether `role` is granted `permission`.
pub fn can(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

/// Returns supported permission id strings.
pub fn supported_permission_strings() -> Vec<&'static str> {
    Permission::ALL.iter().map(|p| p.as_str()).collect()
}

/// Parses one permission from its string id.
pub fn parse_permission(value: &str) -> Result<Permission, PermissionError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(PermissionError::EmptyPermission);
    }

    Permission::ALL
        .iter()
        .copied()
        .find(|permission| permission.as_str() == normalized)
        .ok_or_else(|| PermissionError::UnsupportedPermission(normalized.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    EmptyPermission,
    UnsupportedPermission(String),
}

impl Display for PermissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPermission => write!(f, "permission value must not be empty"),
            Self::UnsupportedPermission(value) => write!(f, "permission is unsupported: {value}"),
        }
    }
}

impl Error for PermissionError {}

#[cfg(test)]
mod tests {
    use super::{can, parse_permission, role_permissions, Permission, PermissionError};
    use crate::model::user::Role;

    #[test]
    fn admin_is_granted_everything() {
        for permission in Permission::ALL {
            assert!(can(Role::Admin, permission), "{permission} missing");
        }
    }

    #[test]
    fn only_admin_may_reset_data() {
        for role in [Role::SubAdmin, Role::TeamLead, Role::Agent, Role::Trainee] {
            assert!(!can(role, Permission::ResetData));
        }
    }

    #[test]
    fn lower_roles_are_subsets_of_higher_roles() {
        let chain = [Role::SubAdmin, Role::TeamLead, Role::Agent, Role::Trainee];
        for pair in chain.windows(2) {
            for permission in role_permissions(pair[1]) {
                assert!(
                    can(pair[0], *permission),
                    "{} lacks {permission} granted to {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn trainee_cannot_assign_or_email() {
        assert!(!can(Role::Trainee, Permission::AssignClients));
        assert!(!can(Role::Trainee, Permission::BulkEmail));
        assert!(can(Role::Trainee, Permission::ManageClients));
    }

    #[test]
    fn parses_known_and_rejects_unknown_permissions() {
        assert_eq!(
            parse_permission(" manage_users ").expect("parse"),
            Permission::ManageUsers
        );
        assert_eq!(
            parse_permission("").expect_err("empty must fail"),
            PermissionError::EmptyPermission
        );
        assert_eq!(
            parse_permission("Manage_Users").expect_err("case sensitive"),
            PermissionError::UnsupportedPermission("Manage_Users".to_string())
        );
    }
}
