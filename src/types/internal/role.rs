use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::internal::CredentialError;

/// Account role stored in `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control, including user management and backups
    Admin,
    /// May bulk-import reports and view the arrears report
    Editor,
    /// Reads and submits reports
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Label shown in the user management pages
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "مدیر",
            Role::Editor => "ویرایشگر",
            Role::Viewer => "بیننده",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_editor_or_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(CredentialError::UnknownRole(other.to_string())),
        }
    }
}
