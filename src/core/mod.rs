pub mod app;
pub mod config;
pub mod format;
pub mod message;
pub mod mode;
pub mod submission;
