pub mod auth;
pub mod db;
pub mod payment;
pub mod pdf;
pub mod utils;
