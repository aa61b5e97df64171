pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod reclaim;
pub mod session;
pub mod upload;
