pub mod backend;
pub mod blueprint;
pub mod bridge;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
