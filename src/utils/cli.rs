use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Listening host
    #[arg(long, env = "BGREMOVE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Listening port
    #[arg(short, long, env = "BGREMOVE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Root directory of raw upload namespaces
    #[arg(long, env = "BGREMOVE_UPLOAD_ROOT", default_value = "assets/Uploads")]
    pub upload_root: String,

    /// Root directory of processed output namespaces
    #[arg(long, env = "BGREMOVE_OUTPUT_ROOT", default_value = "assets/Outputs")]
    pub output_root: String,

    /// Seconds between two reclamation sweeps
    #[arg(long, env = "BGREMOVE_SWEEP_INTERVAL_SECS", default_value_t = 5 * 60 * 60)]
    pub sweep_interval_secs: u64,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "BGREMOVE_MAX_UPLOAD_BYTES", default_value_t = 50 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Max per-channel distance from the backdrop colour still treated as background
    #[arg(long, env = "BGREMOVE_COLOR_TOLERANCE", default_value_t = 32)]
    pub color_tolerance: u8,
}
