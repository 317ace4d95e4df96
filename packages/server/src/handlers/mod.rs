pub mod auth;
pub mod cms;
pub mod jury;
pub mod profile;
pub mod submission;
pub mod uploads;
