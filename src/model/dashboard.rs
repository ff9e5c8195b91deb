use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{attendance::AttendanceStatus, leave::LeaveStatus};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "total_employees": 12,
    "pending_leaves": 1,
    "approved_leaves": 2,
    "rejected_leaves": 0,
    "present_today": 9,
    "absent_today": 1
}))]
pub struct DashboardStats {
    pub total_employees: u64,
    pub pending_leaves: u64,
    pub approved_leaves: u64,
    pub rejected_leaves: u64,
    pub present_today: u64,
    pub absent_today: u64,
}

impl DashboardStats {
    pub fn tally_leaves(&mut self, statuses: &[LeaveStatus]) {
        for status in statuses {
            match status {
                LeaveStatus::Pending => self.pending_leaves += 1,
                LeaveStatus::Approved => self.approved_leaves += 1,
                LeaveStatus::Rejected => self.rejected_leaves += 1,
            }
        }
    }

    pub fn tally_attendance(&mut self, statuses: &[AttendanceStatus]) {
        for status in statuses {
            match status {
                AttendanceStatus::Present => self.present_today += 1,
                AttendanceStatus::Absent => self.absent_today += 1,
            }
        }
    }
}
