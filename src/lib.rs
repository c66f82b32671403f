pub mod config;
pub mod course;
pub mod error;
pub mod grading;
pub mod output;
pub mod roster;
pub mod validate;
