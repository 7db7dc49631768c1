// File: ./src/model/mod.rs
pub mod forms;
pub mod job;
pub mod parser;

pub use job::{Customer, FormKind, FormProgress, FormStatus, Job, JobStatus, JobType, ParsedJob};
pub use parser::parse_job_text;
