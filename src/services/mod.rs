pub mod authz;
pub mod content;
pub mod grading;
pub mod progress;
pub mod reporting;
