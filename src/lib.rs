//! Archery target scoring: pointer events to ring scores, ring geometry, and a session buffer
//! that holds shots until they are confirmed into a score store.

pub mod config;
pub mod error;
pub mod logging;
pub mod practice;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;
