pub mod config;
pub mod download;
