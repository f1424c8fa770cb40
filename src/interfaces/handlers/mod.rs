pub mod auth;
pub mod home;
pub mod payments;
pub mod resumes;
