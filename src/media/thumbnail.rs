use image::imageops::FilterType;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::data::PostId;

/// Size of generated thumbnails (square bound, aspect ratio kept)
const THUMBNAIL_SIZE: u32 = 256;

/// Generate a thumbnail for a photo
/// Returns the path to the saved thumbnail
pub fn generate_thumbnail(photo_path: &Path, post_id: PostId, cache_dir: &Path) -> Result<PathBuf> {
    // Ensure the directory exists
    fs::create_dir_all(cache_dir)?;

    // Decode, format guessed from the file contents
    let img = image::ImageReader::open(photo_path)?
        .with_guessed_format()?
        .decode()?;

    // Resize to thumbnail size
    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);

    // JPEG has no alpha channel
    let thumbnail_path = cache_dir.join(format!("{}.jpg", post_id));
    thumbnail.to_rgb8().save(&thumbnail_path)?;

    debug!("📸 Generated thumbnail: {}", thumbnail_path.display());
    Ok(thumbnail_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;

    #[test]
    fn test_thumbnail_fits_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("wide.png");
        image::RgbImage::new(1024, 512).save(&photo).unwrap();

        let cache = dir.path().join("thumbs");
        let thumb = generate_thumbnail(&photo, PostId(7), &cache).unwrap();

        assert_eq!(thumb, cache.join("7.jpg"));
        let (w, h) = image::image_dimensions(&thumb).unwrap();
        assert_eq!((w, h), (256, 128));
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("broken.jpg");
        fs::write(&photo, b"not an image").unwrap();

        let result = generate_thumbnail(&photo, PostId(1), dir.path());

        assert!(matches!(result, Err(JournalError::Image(_))));
    }
}
