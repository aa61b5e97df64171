use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_root: PathBuf,
    pub output_root: PathBuf,
    pub sweep_interval: Duration,
    pub max_upload_bytes: usize,
    pub color_tolerance: u8,
}

impl Config {
    /// Configuration rooted at `root`, with `uploads/` and `outputs/` as siblings.
    /// Mostly useful for tests and embedding.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            upload_root: root.join("uploads"),
            output_root: root.join("outputs"),
            sweep_interval: Duration::from_secs(5 * 60 * 60),
            max_upload_bytes: 50 * 1024 * 1024,
            color_tolerance: 32,
        }
    }
}
