//! Service configuration.

use crate::credentials::MIN_HASH_COST;
use chrono::Duration;

/// Default lifetime of a toast notification.
pub const DEFAULT_TOAST_TTL_SECS: i64 = 5;
/// Default bcrypt cost for newly hashed passwords.
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 10;

/// Tunables for `CrmService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How long a toast stays visible after being pushed.
    pub toast_ttl: Duration,
    /// bcrypt cost used when creating or changing passwords.
    pub password_hash_cost: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            toast_ttl: Duration::seconds(DEFAULT_TOAST_TTL_SECS),
            password_hash_cost: DEFAULT_PASSWORD_HASH_COST,
        }
    }
}

impl ServiceConfig {
    /// Cheapest hashing setup; for tests and throwaway demo databases.
    pub fn fast_hashing() -> Self {
        Self {
            password_hash_cost: MIN_HASH_COST,
            ..Self::default()
        }
    }
}
