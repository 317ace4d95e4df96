pub mod account;
pub mod scoring;
pub mod submission;
