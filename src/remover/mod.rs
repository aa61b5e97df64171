//! The background-removal collaborator.
//!
//! Removal is a pure, blocking transform from a decoded image to an RGBA image
//! whose background pixels are transparent. Callers run it on the blocking pool.

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

pub mod color_key;

pub use color_key::ColorKeyRemover;

#[derive(Error, Debug)]
pub enum RemoverError {
    #[error("image has no pixels")]
    EmptyImage,

    #[error("{0}")]
    Failed(String),
}

pub trait BackgroundRemover: Send + Sync {
    fn remove_background(&self, image: DynamicImage) -> Result<RgbaImage, RemoverError>;
}
