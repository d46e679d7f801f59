//! Identity of whoever invokes a registry or workflow operation.

use uuid::Uuid;

use crate::DomainError;

/// Authenticated caller, established by the authentication layer and trusted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Caller {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Fails with [`DomainError::Authorization`] unless the caller is an admin.
    pub fn require_admin(&self, action: &str) -> Result<(), DomainError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(DomainError::Authorization(format!(
                "Admin privileges required to {}",
                action
            )))
        }
    }

    /// Whether the caller may act on behalf of `user_id`.
    pub fn can_act_for(&self, user_id: Uuid) -> bool {
        self.is_admin || self.user_id == user_id
    }
}
