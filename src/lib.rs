pub mod catalog;
pub mod config;
pub mod error;
pub mod grading;
pub mod logging;
pub mod output;
pub mod record;

pub use error::GradeError;
