//! Book records as stored in the inventory file.

use serde::{Deserialize, Serialize};

/// Circulation status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    /// On the shelf
    Available,
    /// Checked out
    Issued,
}

impl BookStatus {
    /// Human-readable label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Issued => "Issued",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single book in the inventory.
///
/// `book_id` is assigned by [`Library::add`](super::Library::add) and never
/// changes. `issued` is the only field that mutates after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, starting at 1
    pub book_id: u32,

    /// Book title
    pub title: String,

    /// Author name
    pub author: String,

    /// Whether the book is currently checked out
    #[serde(default)]
    pub issued: bool,
}

impl Book {
    /// Create a new, unissued book.
    pub fn new(book_id: u32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Book {
            book_id,
            title: title.into(),
            author: author.into(),
            issued: false,
        }
    }

    pub fn status(&self) -> BookStatus {
        if self.issued {
            BookStatus::Issued
        } else {
            BookStatus::Available
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, keyword: &str) -> bool {
        contains_ignore_case(&self.title, keyword)
    }

    /// Case-insensitive substring match on the author
    pub fn author_contains(&self, keyword: &str) -> bool {
        contains_ignore_case(&self.author, keyword)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} by {} - {}", self.book_id, self.title, self.author, self.status())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
