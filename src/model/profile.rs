use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, mysql::MySqlRow};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "email": "jane.doe@company.com",
        "name": "Jane Doe",
        "position": "Engineer",
        "date_of_joining": "2024-01-01"
    })
)]
pub struct Profile {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "Engineer", nullable = true)]
    pub position: Option<String>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date_of_joining: NaiveDate,
}

/// Name and email of the profile that owns a leave or attendance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Owner {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
}

/// Authentication identity as stored by the auth layer.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl<'r> FromRow<'r, MySqlRow> for Identity {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            role: role.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".into(),
                source: Box::new(e),
            })?,
        })
    }
}

/// Identity plus profile provisioned together by signup.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub position: Option<String>,
    pub date_of_joining: NaiveDate,
}

/// Writable profile columns. `None` leaves the column untouched; for
/// `position`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub position: Option<Option<String>>,
    pub date_of_joining: Option<NaiveDate>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none() && self.date_of_joining.is_none()
    }

    pub fn apply(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(position) = &self.position {
            profile.position = position.clone();
        }
        if let Some(date) = self.date_of_joining {
            profile.date_of_joining = date;
        }
    }
}
