pub mod actions;
pub mod classify;
pub mod config;
pub mod digest_api;
pub mod error;
pub mod model;
pub mod notes;
pub mod report;
pub mod source;
pub mod summary;
pub mod window;
