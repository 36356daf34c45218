//! Folder import: every photo under a folder becomes a post

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::Path;
use walkdir::WalkDir;

use super::thumbnail::generate_thumbnail;
use crate::config::AppConfig;
use crate::error::{JournalError, Result};
use crate::state::data::{NewPost, UserId};
use crate::state::library::Library;

/// Result of a folder import operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported_count: usize,
    /// Files already in the journal
    pub skipped_count: usize,
    pub failed_count: usize,
}

/// Import all photos under `folder` for `user`.
///
/// Per-file problems are counted and logged, not returned. Only failing to
/// set up the import (e.g. no cache directory) is an error.
pub fn import_folder(
    folder: &Path,
    library: &Library,
    user: UserId,
    config: &AppConfig,
) -> Result<ImportResult> {
    let thumbnail_dir = config.thumbnail_dir()?;
    let mut result = ImportResult::default();

    info!("🔍 Scanning folder: {}", folder.display());

    // Walk the directory tree recursively
    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // Unreadable folder or broken link; whatever is below it is lost
                warn!("⚠️  Cannot read {}: {}", folder_label(&e, folder), e);
                result.failed_count += 1;
                continue;
            }
        };
        let path = entry.path();

        // Only process files (not directories)
        if !path.is_file() {
            continue;
        }

        let accepted = path
            .extension()
            .map(|ext| config.accepts_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if !accepted {
            continue;
        }

        let post = new_post_for(path, user);
        match library.insert_post(&post) {
            Ok(id) => {
                result.imported_count += 1;
                match generate_thumbnail(path, id, &thumbnail_dir) {
                    Ok(thumb) => {
                        if let Err(e) = library.set_thumbnail(id, &thumb.to_string_lossy()) {
                            warn!("⚠️  Could not record thumbnail for {}: {}", post.title, e);
                        }
                    }
                    Err(e) => warn!("⚠️  No thumbnail for {}: {}", post.title, e),
                }
                if result.imported_count % 100 == 0 {
                    info!("⏳ Imported {} files...", result.imported_count);
                }
            }
            Err(JournalError::Duplicate(_)) => result.skipped_count += 1,
            Err(e) => {
                warn!("⚠️  Error importing {}: {}", path.display(), e);
                result.failed_count += 1;
            }
        }
    }

    info!(
        "✅ Import complete: {} new, {} skipped, {} failed",
        result.imported_count, result.skipped_count, result.failed_count
    );
    Ok(result)
}

fn folder_label(error: &walkdir::Error, root: &Path) -> String {
    error.path().unwrap_or(root).display().to_string()
}

/// Title from the file name, tag from the containing folder, time from mtime
fn new_post_for(path: &Path, user: UserId) -> NewPost {
    let title = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let tags = path
        .parent()
        .and_then(|parent| parent.file_name())
        .map(|name| vec![name.to_string_lossy().to_lowercase()])
        .unwrap_or_default();

    let created_at = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    NewPost {
        user_id: user,
        title,
        description: None,
        media_url: path.to_string_lossy().to_string(),
        tags,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::PostSource;
    use std::fs;

    fn config_with_cache(cache: &Path) -> AppConfig {
        AppConfig {
            cache_dir: Some(cache.to_path_buf()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_import_walks_folder_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let photos = dir.path().join("Fitness");
        fs::create_dir_all(photos.join("week2")).unwrap();
        image::RgbImage::new(32, 32).save(photos.join("day1.png")).unwrap();
        image::RgbImage::new(32, 32).save(photos.join("week2").join("day8.jpg")).unwrap();
        fs::write(photos.join("notes.txt"), "ignored").unwrap();

        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;
        let config = config_with_cache(&dir.path().join("cache"));

        let first = import_folder(&photos, &library, user, &config).unwrap();
        assert_eq!(first, ImportResult { imported_count: 2, skipped_count: 0, failed_count: 0 });

        let again = import_folder(&photos, &library, user, &config).unwrap();
        assert_eq!(again, ImportResult { imported_count: 0, skipped_count: 2, failed_count: 0 });

        let posts = library.list_posts_for_user(user).unwrap();
        assert_eq!(posts.len(), 2);
        let day1 = posts.iter().find(|p| p.title == "day1").unwrap();
        assert_eq!(day1.tags, ["fitness"]);
        assert!(day1.thumbnail_path.is_some());
        let day8 = posts.iter().find(|p| p.title == "day8").unwrap();
        assert_eq!(day8.tags, ["week2"]);
    }

    #[test]
    fn test_broken_photo_is_imported_without_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.jpg"), b"not an image").unwrap();

        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;
        let config = config_with_cache(&dir.path().join("cache"));

        let result = import_folder(dir.path(), &library, user, &config).unwrap();

        assert_eq!(result.imported_count, 1);
        let post = library.list_posts_for_user(user).unwrap().remove(0);
        assert!(post.thumbnail_path.is_none());
    }

    #[test]
    fn test_thumbnail_bookkeeping_failure_keeps_importing() {
        let dir = tempfile::tempdir().unwrap();
        let photos = dir.path().join("photos");
        fs::create_dir_all(&photos).unwrap();
        image::RgbImage::new(32, 32).save(photos.join("a.png")).unwrap();
        image::RgbImage::new(32, 32).save(photos.join("b.png")).unwrap();

        let db_path = dir.path().join("journal.db");
        let library = Library::open_at(&db_path).unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;

        // Another connection makes every thumbnail update fail
        rusqlite::Connection::open(&db_path)
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER no_thumbnails BEFORE UPDATE OF thumbnail_path ON posts
                 BEGIN SELECT RAISE(ABORT, 'thumbnails are read-only'); END;",
            )
            .unwrap();

        let config = config_with_cache(&dir.path().join("cache"));
        let result = import_folder(&photos, &library, user, &config).unwrap();

        assert_eq!(result, ImportResult { imported_count: 2, skipped_count: 0, failed_count: 0 });
        let posts = library.list_posts_for_user(user).unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.thumbnail_path.is_none()));
    }

    #[test]
    fn test_missing_folder_is_counted_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;
        let config = config_with_cache(&dir.path().join("cache"));

        let result = import_folder(&dir.path().join("gone"), &library, user, &config).unwrap();

        assert_eq!(result, ImportResult { imported_count: 0, skipped_count: 0, failed_count: 1 });
    }
}
