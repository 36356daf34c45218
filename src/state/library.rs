use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use super::data::{Comment, CommentId, NewPost, Post, PostId, Profile, UserId};
use crate::config::AppConfig;
use crate::error::{JournalError, Result};

/// Where the comparison view and the journal pages get a user's posts from.
///
/// Posts come back newest first (`created_at DESC`, then `id DESC`).
pub trait PostSource {
    fn list_posts_for_user(&self, user: UserId) -> Result<Vec<Post>>;
}

/// The Library manages the SQLite catalog database.
/// It stores profiles and their posts, with references to the photo files.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

/// Posts with their like and comment counts
const POST_SELECT: &str = "SELECT p.id, p.user_id, p.title, p.description, p.media_url, p.tags,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id),
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id),
        p.thumbnail_path, p.created_at
     FROM posts p";

/// Comments with the author's username
const COMMENT_SELECT: &str = "SELECT c.id, pr.username, c.content, c.created_at
     FROM comments c JOIN profiles pr ON pr.id = c.user_id";

impl Library {
    /// Open the catalog at the configured location, creating it if needed.
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::open_at(&config.database_path()?)
    }

    /// Open or create the catalog at an explicit path
    pub fn open_at(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Database opened at: {}", db_path.display());

        let mut library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Throwaway catalog, used by tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let mut library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS profiles (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL UNIQUE,
                full_name       TEXT,
                created_at      INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS posts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT,
                media_url       TEXT NOT NULL,
                tags            TEXT NOT NULL DEFAULT '[]',
                thumbnail_path  TEXT,
                created_at      INTEGER NOT NULL,
                UNIQUE(user_id, media_url),
                FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS likes (
                post_id         INTEGER NOT NULL,
                user_id         INTEGER NOT NULL,
                created_at      INTEGER NOT NULL,
                PRIMARY KEY(post_id, user_id),
                FOREIGN KEY(post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS comments (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id         INTEGER NOT NULL,
                user_id         INTEGER NOT NULL,
                content         TEXT NOT NULL,
                created_at      INTEGER NOT NULL,
                FOREIGN KEY(post_id) REFERENCES posts(id) ON DELETE CASCADE,
                FOREIGN KEY(user_id) REFERENCES profiles(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_posts_user_created
            ON posts(user_id, created_at DESC);

            CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(post_id, created_at DESC);",
        )?;

        debug!("✅ Database schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// All profiles, alphabetical by username
    pub fn profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, full_name, created_at FROM profiles ORDER BY username",
        )?;
        let rows = stmt.query_map([], profile_from_row)?;

        let mut profiles = Vec::new();
        for profile in rows {
            profiles.push(profile?);
        }
        Ok(profiles)
    }

    /// Look a profile up by username, creating it on first use
    pub fn find_or_create_profile(&self, username: &str) -> Result<Profile> {
        let username = username.trim();

        let existing = self
            .conn
            .query_row(
                "SELECT id, username, full_name, created_at FROM profiles WHERE username = ?1",
                [username],
                profile_from_row,
            )
            .optional()?;
        if let Some(profile) = existing {
            return Ok(profile);
        }

        let now = Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO profiles (username, created_at) VALUES (?1, ?2)",
            rusqlite::params![username, now],
        )?;
        info!("👤 Created profile @{}", username);

        Ok(Profile {
            id: UserId(self.conn.last_insert_rowid()),
            username: username.to_string(),
            full_name: None,
            created_at: timestamp_to_utc(now, 3)?,
        })
    }

    /// Insert a new post. Returns the new post ID.
    ///
    /// Importing the same file twice for the same user is reported as
    /// `JournalError::Duplicate` rather than a database failure.
    pub fn insert_post(&self, post: &NewPost) -> Result<PostId> {
        let tags = serde_json::to_string(&post.tags)?;

        let result = self.conn.execute(
            "INSERT INTO posts (user_id, title, description, media_url, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                post.user_id.0,
                &post.title,
                &post.description,
                &post.media_url,
                tags,
                post.created_at.timestamp(),
            ],
        );

        match result {
            Ok(_) => Ok(PostId(self.conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(JournalError::Duplicate(post.media_url.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Record a generated thumbnail for a post
    pub fn set_thumbnail(&self, post: PostId, thumbnail_path: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE posts SET thumbnail_path = ?1 WHERE id = ?2",
            rusqlite::params![thumbnail_path, post.0],
        )?;
        Ok(())
    }

    /// Replace a post's description; blank text clears it
    pub fn set_description(&self, post: PostId, description: &str) -> Result<()> {
        let description = description.trim();
        let description = (!description.is_empty()).then_some(description);
        self.conn.execute(
            "UPDATE posts SET description = ?1 WHERE id = ?2",
            rusqlite::params![description, post.0],
        )?;
        Ok(())
    }

    /// Get a count of a user's posts
    pub fn post_count(&self, user: UserId) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?1",
            [user.0],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// A single post with current counts, `None` if it was deleted
    #[cfg(test)]
    pub fn post(&self, id: PostId) -> Result<Option<Post>> {
        let post = self
            .conn
            .query_row(&format!("{} WHERE p.id = ?1", POST_SELECT), [id.0], post_from_row)
            .optional()?;
        Ok(post)
    }

    pub fn is_liked(&self, post: PostId, user: UserId) -> Result<bool> {
        let liked = self
            .conn
            .query_row(
                "SELECT 1 FROM likes WHERE post_id = ?1 AND user_id = ?2",
                [post.0, user.0],
                |_| Ok(()),
            )
            .optional()?;
        Ok(liked.is_some())
    }

    /// Like the post, or remove the like if `user` already liked it.
    /// Returns whether the post is liked afterwards.
    pub fn toggle_like(&self, post: PostId, user: UserId) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;

        let removed = tx.execute(
            "DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2",
            [post.0, user.0],
        )?;
        let liked = if removed == 0 {
            tx.execute(
                "INSERT INTO likes (post_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                [post.0, user.0, Utc::now().timestamp()],
            )?;
            true
        } else {
            false
        };

        tx.commit()?;
        debug!("{} post {} for user {}", if liked { "❤️  Liked" } else { "💔 Unliked" }, post, user);
        Ok(liked)
    }

    /// Add a comment by `user`. Surrounding whitespace is dropped and blank
    /// comments are refused.
    pub fn add_comment(&self, post: PostId, user: UserId, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(JournalError::EmptyComment);
        }

        self.conn.execute(
            "INSERT INTO comments (post_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![post.0, user.0, content, Utc::now().timestamp()],
        )?;
        let id = self.conn.last_insert_rowid();

        let comment = self.conn.query_row(
            &format!("{} WHERE c.id = ?1", COMMENT_SELECT),
            [id],
            comment_from_row,
        )?;
        Ok(comment)
    }

    /// Comments under a post, newest first
    pub fn comments_for_post(&self, post: PostId) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE c.post_id = ?1 ORDER BY c.created_at DESC, c.id DESC",
            COMMENT_SELECT
        ))?;
        let rows = stmt.query_map([post.0], comment_from_row)?;

        let mut comments = Vec::new();
        for comment in rows {
            comments.push(comment?);
        }
        Ok(comments)
    }
}

impl PostSource for Library {
    fn list_posts_for_user(&self, user: UserId) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE p.user_id = ?1 ORDER BY p.created_at DESC, p.id DESC",
            POST_SELECT
        ))?;
        let rows = stmt.query_map([user.0], post_from_row)?;

        let mut posts = Vec::new();
        for post in rows {
            posts.push(post?);
        }

        debug!("📚 Loaded {} posts for user {}", posts.len(), user);
        Ok(posts)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    let tags_json: String = row.get(5)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Post {
        id: PostId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        title: row.get(2)?,
        description: row.get(3)?,
        media_url: row.get(4)?,
        tags,
        like_count: row.get(6)?,
        comment_count: row.get(7)?,
        thumbnail_path: row.get(8)?,
        created_at: timestamp_to_utc(row.get(9)?, 9)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: CommentId(row.get(0)?),
        username: row.get(1)?,
        content: row.get(2)?,
        created_at: timestamp_to_utc(row.get(3)?, 3)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        full_name: row.get(2)?,
        created_at: timestamp_to_utc(row.get(3)?, 3)?,
    })
}

fn timestamp_to_utc(secs: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, secs))
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_post(user: UserId, title: &str, day: u32) -> NewPost {
        NewPost {
            user_id: user,
            title: title.to_string(),
            description: None,
            media_url: format!("/photos/{}.jpg", title),
            tags: vec!["fitness".to_string()],
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_profile_is_created_once() {
        let library = Library::open_in_memory().unwrap();

        let first = library.find_or_create_profile("mika").unwrap();
        let again = library.find_or_create_profile(" mika ").unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(library.profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_posts_are_listed_newest_first() {
        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;

        library.insert_post(&new_post(user, "middle", 10)).unwrap();
        library.insert_post(&new_post(user, "oldest", 1)).unwrap();
        library.insert_post(&new_post(user, "newest", 20)).unwrap();

        let titles: Vec<_> = library
            .list_posts_for_user(user)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;

        let first = library.insert_post(&new_post(user, "a", 5)).unwrap();
        let mut same_time = new_post(user, "b", 5);
        same_time.media_url = "/photos/other.jpg".to_string();
        let second = library.insert_post(&same_time).unwrap();

        let ids: Vec<_> = library
            .list_posts_for_user(user)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, [second, first]);
    }

    #[test]
    fn test_posts_are_scoped_to_user() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;
        let ren = library.find_or_create_profile("ren").unwrap().id;

        library.insert_post(&new_post(mika, "mine", 1)).unwrap();

        assert_eq!(library.post_count(mika).unwrap(), 1);
        assert!(library.list_posts_for_user(ren).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_import_is_reported() {
        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;

        library.insert_post(&new_post(user, "run", 1)).unwrap();
        let again = library.insert_post(&new_post(user, "run", 1));

        assert!(matches!(again, Err(JournalError::Duplicate(url)) if url == "/photos/run.jpg"));
    }

    #[test]
    fn test_tags_and_thumbnail_round_trip_through_rows() {
        let library = Library::open_in_memory().unwrap();
        let user = library.find_or_create_profile("mika").unwrap().id;

        let id = library.insert_post(&new_post(user, "run", 1)).unwrap();
        library.set_thumbnail(id, "/cache/run.jpg").unwrap();

        let post = library.list_posts_for_user(user).unwrap().remove(0);
        assert_eq!(post.tags, ["fitness"]);
        assert_eq!(post.thumbnail_path.as_deref(), Some("/cache/run.jpg"));
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_open_at_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.db");

        let library = Library::open_at(&path).unwrap();

        assert!(path.exists());
        assert_eq!(library.path(), &path);
    }

    #[test]
    fn test_toggle_like_flips_and_counts() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;
        let ren = library.find_or_create_profile("ren").unwrap().id;
        let id = library.insert_post(&new_post(mika, "run", 1)).unwrap();

        assert!(library.toggle_like(id, mika).unwrap());
        assert!(library.toggle_like(id, ren).unwrap());
        assert!(library.is_liked(id, mika).unwrap());
        assert_eq!(library.post(id).unwrap().unwrap().like_count, 2);

        assert!(!library.toggle_like(id, mika).unwrap());
        assert!(!library.is_liked(id, mika).unwrap());
        assert_eq!(library.list_posts_for_user(mika).unwrap()[0].like_count, 1);
    }

    #[test]
    fn test_like_on_missing_post_fails() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;

        assert!(matches!(library.toggle_like(PostId(42), mika), Err(JournalError::Database(_))));
        assert!(!library.is_liked(PostId(42), mika).unwrap());
    }

    #[test]
    fn test_comments_are_newest_first_with_author() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;
        let ren = library.find_or_create_profile("ren").unwrap().id;
        let id = library.insert_post(&new_post(mika, "run", 1)).unwrap();

        let first = library.add_comment(id, ren, "  looking strong  ").unwrap();
        assert_eq!(first.content, "looking strong");
        assert_eq!(first.username, "ren");
        library.add_comment(id, mika, "thanks!").unwrap();

        let comments = library.comments_for_post(id).unwrap();
        let lines: Vec<_> = comments.iter().map(|c| (c.username.as_str(), c.content.as_str())).collect();
        assert_eq!(lines, [("mika", "thanks!"), ("ren", "looking strong")]);
        assert_eq!(library.post(id).unwrap().unwrap().comment_count, 2);
    }

    #[test]
    fn test_blank_comment_is_refused() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;
        let id = library.insert_post(&new_post(mika, "run", 1)).unwrap();

        assert!(matches!(library.add_comment(id, mika, "   "), Err(JournalError::EmptyComment)));
        assert!(library.comments_for_post(id).unwrap().is_empty());
    }

    #[test]
    fn test_set_description_trims_and_clears() {
        let library = Library::open_in_memory().unwrap();
        let mika = library.find_or_create_profile("mika").unwrap().id;
        let id = library.insert_post(&new_post(mika, "run", 1)).unwrap();

        library.set_description(id, " first 5k ").unwrap();
        assert_eq!(library.post(id).unwrap().unwrap().description.as_deref(), Some("first 5k"));

        library.set_description(id, "  ").unwrap();
        assert_eq!(library.post(id).unwrap().unwrap().description, None);
        assert!(library.post(PostId(99)).unwrap().is_none());
    }
}
