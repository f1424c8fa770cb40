pub mod order;
pub mod resume;
pub mod sqlx_repo;
pub mod token;
pub mod user;
