/// Photo files on disk
///
/// This module handles:
/// - Importing a folder of photos as posts (import.rs)
/// - Generating and caching thumbnails (thumbnail.rs)

pub mod import;
pub mod thumbnail;
