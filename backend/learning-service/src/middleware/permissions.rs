/// Role checks for learning-service
///
/// Teachers manage videos; admin reports are open to the `admin` role and to
/// usernames listed in `ADMIN_USERNAMES`.
use crate::error::AppError;
use crate::models::{Role, User};

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Usernames granted admin access regardless of their stored role
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    usernames: Vec<String>,
}

impl AdminPolicy {
    pub fn new(usernames: Vec<String>) -> Self {
        Self { usernames }
    }

    pub fn allows(&self, user: &User) -> bool {
        user.role == Role::Admin || self.usernames.iter().any(|u| u == &user.username)
    }
}

/// Only teachers may create or delete videos
pub fn require_teacher(user: &User) -> PermissionResult {
    if user.is_teacher() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only teachers can manage videos".to_string(),
        ))
    }
}

pub fn require_admin(user: &User, policy: &AdminPolicy) -> PermissionResult {
    if policy.allows(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}
