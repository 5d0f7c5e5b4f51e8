use crate::errors::internal::AuthorizationError;
use crate::types::internal::Role;

/// Permission a route group requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Any logged-in user
    Authenticated,
    /// Bulk import, arrears report
    EditorOrAdmin,
    /// User management, backup and restore
    Admin,
}

/// Decide whether `role` may perform an action guarded by `permission`
///
/// Pure function of the role; establishing that there *is* an authenticated
/// user is the gate's job.
pub fn authorize(role: Role, permission: Permission) -> Result<(), AuthorizationError> {
    let allowed = match permission {
        Permission::Authenticated => true,
        Permission::EditorOrAdmin => role.is_editor_or_admin(),
        Permission::Admin => role.is_admin(),
    };

    if allowed {
        Ok(())
    } else {
        Err(AuthorizationError { role, required: permission })
    }
}
