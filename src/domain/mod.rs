pub mod draft;
pub mod encode;
pub mod entities;
pub mod password;
pub mod use_cases;
pub mod validation;
