mod auth;
mod cms;
mod submission;
