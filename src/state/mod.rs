/// State management module
///
/// This module handles all application state, including:
/// - Database connections and queries (library.rs)
/// - Shared data structures (data.rs)
/// - The signed-in user (session.rs)

pub mod library;
pub mod data;
pub mod session;
