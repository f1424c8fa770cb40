pub mod order;
pub mod resume;
pub mod token;
pub mod user;
