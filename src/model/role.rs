use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

/// Row visibility derived from the caller's role.
///
/// Admins see every row, employees only the rows they own. Every read of
/// leave or attendance data takes a `Scope` so the filter is applied in
/// one place instead of at each call site.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Scope {
    All,
    Own(u64),
}

impl Scope {
    pub fn admits(&self, employee_id: u64) -> bool {
        match self {
            Scope::All => true,
            Scope::Own(owner) => *owner == employee_id,
        }
    }

    pub fn owner(&self) -> Option<u64> {
        match self {
            Scope::All => None,
            Scope::Own(owner) => Some(*owner),
        }
    }
}
