pub mod config;
pub mod event_status;
pub mod role;
pub mod scoring;
pub mod storage;
pub mod submission_status;

pub use event_status::EventStatus;
pub use role::Role;
pub use scoring::{Criteria, CriteriaError, ScoreSummary};
pub use submission_status::SubmissionStatus;
