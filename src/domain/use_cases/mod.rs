pub mod auth;
pub mod extractors;
pub mod payments;
pub mod resumes;
