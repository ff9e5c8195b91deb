pub mod attendance;
pub mod dashboard;
pub mod leave;
pub mod profile;
pub mod role;
