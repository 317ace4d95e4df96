mod error;
mod key;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use key::{ImageFormat, ImageKey};
pub use traits::{BoxReader, ImageStore};
