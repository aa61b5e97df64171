use std::io::Cursor;

use image::ImageFormat;

use crate::domain::{ProcessedFile, SessionId};
use crate::error::{AppError, ProcessingError};
use crate::remover::BackgroundRemover;
use crate::service::ingest::IngestedFile;
use crate::utils::state::AppState;

/// Runs background removal over an ingested batch, in ingest order.
///
/// The first failing file aborts the batch. Outputs already written for earlier
/// files stay on disk; the reclaimer clears them with the rest of the session.
#[tracing::instrument(skip_all, fields(session = %session, files = files.len()))]
pub async fn process_batch(
    state: &AppState,
    session: &SessionId,
    files: &[IngestedFile],
) -> Result<Vec<ProcessedFile>, AppError> {
    let mut processed = Vec::with_capacity(files.len());
    for file in files {
        processed.push(process_file(state, session, file).await?);
    }
    Ok(processed)
}

async fn process_file(
    state: &AppState,
    session: &SessionId,
    file: &IngestedFile,
) -> Result<ProcessedFile, AppError> {
    let failed = |source| AppError::Processing {
        filename: file.original_name.clone(),
        source,
    };

    let bytes = state
        .storage
        .read_upload(session, &file.filename)
        .await
        .map_err(|err| failed(ProcessingError::Read(err)))?;

    // CPU bound, keep it off the async workers.
    let remover = state.remover.clone();
    let png = tokio::task::spawn_blocking(move || remove_to_png(remover.as_ref(), &bytes))
        .await?
        .map_err(failed)?;

    let path = state
        .storage
        .write_output(session, &file.filename, &png)
        .await
        .map_err(|err| failed(ProcessingError::Write(err)))?;

    let processed = ProcessedFile::new(session, &file.filename, path);
    tracing::debug!(
        session = %processed.session_id,
        filename = %processed.filename,
        url = %processed.public_url,
        "processed file"
    );
    Ok(processed)
}

/// Decodes `bytes`, strips the background and re-encodes the result as PNG.
pub fn remove_to_png(
    remover: &dyn BackgroundRemover,
    bytes: &[u8],
) -> Result<Vec<u8>, ProcessingError> {
    let decoded = image::load_from_memory(bytes).map_err(ProcessingError::Decode)?;
    let output = remover.remove_background(decoded)?;

    let mut png = Vec::new();
    output
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(ProcessingError::Encode)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remover::ColorKeyRemover;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn output_is_png_with_alpha() {
        let mut img = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 3, Rgba([0, 0, 255, 255]));
        let mut input = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut input), ImageFormat::Png)
            .unwrap();

        let png = remove_to_png(&ColorKeyRemover::default(), &input).unwrap();

        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
        assert_eq!(*decoded.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err =
            remove_to_png(&ColorKeyRemover::default(), b"definitely not an image").unwrap_err();
        assert!(matches!(err, ProcessingError::Decode(_)));
    }
}
