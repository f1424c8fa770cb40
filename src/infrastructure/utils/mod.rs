pub mod uploads;
pub mod valid_uuid;
