use thiserror::Error;

use crate::services::access_policy::Permission;
use crate::types::internal::Role;

/// Produced by the access policy; the gate turns it into a redirect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Role {role} lacks permission {required:?}")]
pub struct AuthorizationError {
    pub role: Role,
    pub required: Permission,
}
