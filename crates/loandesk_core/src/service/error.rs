//! Service-level error taxonomy.

use crate::access::Permission;
use crate::credentials::CredentialError;
use crate::model::user::Role;
use crate::model::validation::ValidationError;
use crate::repo::record_repo::{Collection, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Debug)]
pub enum CrmError {
    /// Handler requires a signed-in user.
    NotLoggedIn,
    /// The signed-in role lacks the handler's permission.
    PermissionDenied { role: Role, permission: Permission },
    /// Input rejected before any write.
    Validation(ValidationError),
    /// Username or password missing on login.
    MissingCredentials,
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// Account exists but is inactive.
    UserInactive,
    /// Target record does not exist.
    NotFound { collection: Collection, id: String },
    /// A user would end up in two teams.
    TeamMembershipConflict { user_id: String, team_id: String },
    /// The signed-in user tried to delete their own account.
    SelfDeletion,
    Credential(CredentialError),
    Store(StoreError),
}

impl Display for CrmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "you must be logged in"),
            Self::PermissionDenied { role, permission } => {
                write!(f, "role {role} is not permitted to {permission}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingCredentials => write!(f, "username and password are required"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::UserInactive => write!(f, "this account is inactive"),
            Self::NotFound { collection, id } => write!(f, "{id} not found in {collection}"),
            Self::TeamMembershipConflict { user_id, team_id } => {
                write!(f, "user {user_id} already belongs to team {team_id}")
            }
            Self::SelfDeletion => write!(f, "you cannot delete your own account"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CrmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CrmError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for CrmError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

impl From<StoreError> for CrmError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl CrmError {
    pub(crate) fn not_found(collection: Collection, id: &str) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Whether the error should be shown to the user as a blocking message
    /// rather than treated as an internal failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Credential(CredentialError::Hash(_)))
    }
}
