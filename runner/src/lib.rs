pub mod config;
pub mod database;
pub mod executors;
pub mod grid;
pub mod sweep;
