use std::path::PathBuf;

use serde::Deserialize;

/// Image storage configuration shared by the server and its tests.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded images. Default: "./data/uploads".
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Per-file limit for submission images, in bytes. Default: 10 MiB.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
    /// Per-file limit for CMS images, in bytes. Default: 5 MiB.
    #[serde(default = "default_max_cms_image_size")]
    pub max_cms_image_size: u64,
    /// URL prefix under which stored images are served. Default: "/api/v1/uploads".
    #[serde(default = "default_public_path")]
    pub public_path: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}
fn default_max_image_size() -> u64 {
    10 * 1024 * 1024
}
fn default_max_cms_image_size() -> u64 {
    5 * 1024 * 1024
}
fn default_public_path() -> String {
    "/api/v1/uploads".into()
}

impl StorageConfig {
    /// Public URL of a stored file name.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_path.trim_end_matches('/'), file_name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_image_size: default_max_image_size(),
            max_cms_image_size: default_max_cms_image_size(),
            public_path: default_public_path(),
        }
    }
}
