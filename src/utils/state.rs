use crate::config::Config;
use crate::remover::{BackgroundRemover, ColorKeyRemover};
use crate::storage::{Storage, driver::filesystem::FilesystemStorage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub remover: Arc<dyn BackgroundRemover>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let remover = Arc::new(ColorKeyRemover::new(config.color_tolerance));
        Self::with_remover(config, remover)
    }

    pub fn with_remover(config: Config, remover: Arc<dyn BackgroundRemover>) -> Self {
        let storage = Arc::new(FilesystemStorage::new(
            config.upload_root.clone(),
            config.output_root.clone(),
        ));
        AppState {
            storage,
            remover,
            config: Arc::new(config),
        }
    }
}
