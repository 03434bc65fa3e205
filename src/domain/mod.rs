pub mod table;
pub mod user;
