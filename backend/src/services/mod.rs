pub mod admin;
pub mod complaints;
pub mod geocode;
