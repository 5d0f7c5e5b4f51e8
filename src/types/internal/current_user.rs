use std::str::FromStr;

use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::Role;

/// Identity of the authenticated user for the current request
///
/// Resolved by the auth gate from the session and inserted into the request
/// extensions; handlers pass it explicitly into store calls that need
/// attribution or a requester id.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl TryFrom<user::Model> for CurrentUser {
    type Error = InternalError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        let role = Role::from_str(&model.role)?;
        Ok(Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            role,
        })
    }
}
