use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, mysql::MySqlRow};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::{leave::decode_status, profile::Owner};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceWithOwner {
    #[serde(flatten)]
    pub record: Attendance,
    pub profile: Owner,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl<'r> FromRow<'r, MySqlRow> for Attendance {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            date: row.try_get("date")?,
            status: decode_status(row)?,
        })
    }
}

impl<'r> FromRow<'r, MySqlRow> for AttendanceWithOwner {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            record: Attendance::from_row(row)?,
            profile: Owner {
                name: row.try_get("owner_name")?,
                email: row.try_get("owner_email")?,
            },
        })
    }
}
