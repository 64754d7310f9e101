//! View-to-permission mapping.

use crate::access::permission::{can, Permission};
use crate::model::user::Role;

/// Navigable screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Clients,
    Tasks,
    Documents,
    Reports,
    Commitments,
    Users,
    Teams,
    ActivityLog,
    Settings,
}

impl View {
    pub const ALL: [View; 10] = [
        Self::Dashboard,
        Self::Clients,
        Self::Tasks,
        Self::Documents,
        Self::Reports,
        Self::Commitments,
        Self::Users,
        Self::Teams,
        Self::ActivityLog,
        Self::Settings,
    ];

    pub fn required_permission(self) -> Permission {
        match self {
            Self::Dashboard | Self::Settings => Permission::ViewDashboard,
            Self::Clients => Permission::ViewClients,
            Self::Tasks => Permission::ViewTasks,
            Self::Documents => Permission::ManageDocuments,
            Self::Reports => Permission::ViewReports,
            Self::Commitments => Permission::ManageCommitments,
            Self::Users => Permission::ManageUsers,
            Self::Teams => Permission::ManageTeams,
            Self::ActivityLog => Permission::ViewActivityLog,
        }
    }
}

/// Outcome of a view access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAccess {
    Granted(View),
    /// Render the "Access Denied" placeholder instead of the view.
    AccessDenied { view: View, required: Permission },
}

impl ViewAccess {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

pub fn check_view(role: Role, view: View) -> ViewAccess {
    let required = view.required_permission();
    if can(role, required) {
        ViewAccess::Granted(view)
    } else {
        ViewAccess::AccessDenied { view, required }
    }
}
