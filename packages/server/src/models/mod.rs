pub mod auth;
pub mod cms;
pub mod profile;
pub mod score;
pub mod shared;
pub mod submission;
