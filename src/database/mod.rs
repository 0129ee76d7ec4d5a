pub mod db_utils;
pub mod memory;
pub mod models;
pub mod pg;
pub mod store;
