pub mod config;
pub mod geometry;
