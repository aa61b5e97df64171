pub mod processed_file;
pub mod session;

pub use processed_file::ProcessedFile;
pub use session::SessionId;
