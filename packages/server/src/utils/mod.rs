pub mod hash;
pub mod session;
pub mod upload;
