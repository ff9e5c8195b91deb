//! Workflow rules over [`HrStore`](crate::store::HrStore): who may do what,
//! and what each operation writes. Handlers stay thin and call in here.

pub mod accounts;
pub mod attendance;
pub mod dashboard;
pub mod directory;
pub mod leave;
