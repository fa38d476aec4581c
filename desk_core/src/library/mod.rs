//! # Book Inventory
//!
//! [`Library`] is the in-memory record store: a map from book identifier to
//! [`Book`], plus the counter for the next identifier. Every mutation rewrites
//! the backing file through [`crate::file_io`].
//!
//! ## Structure
//!
//! ```text
//! Library
//! ├── path: data file (library_data.json by default)
//! ├── books: BTreeMap<u32, Book> (identifier order == insertion order)
//! └── next_id: u32 (never decreases, persisted with the books)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use desk_core::library::Library;
//!
//! let mut library = Library::open("library_data.json")?;
//! let book = library.add("Dune", "Frank Herbert")?;
//! library.issue(book.book_id)?;
//! assert_eq!(library.count_issued(), 1);
//! # Ok::<(), desk_core::errors::DeskError>(())
//! ```

pub mod book;

pub use book::{Book, BookStatus};

use std::collections::BTreeMap;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::{DeskError, DeskResult};
use crate::file_io::{load_inventory, save_inventory, Inventory};

/// In-memory book store backed by a JSON file.
#[derive(Debug)]
pub struct Library {
    path: PathBuf,
    books: BTreeMap<u32, Book>,
    next_id: u32,
}

impl Library {
    /// Load the store from `path`. A missing file gives an empty store.
    pub fn open(path: impl Into<PathBuf>) -> DeskResult<Self> {
        let path = path.into();
        let inventory = load_inventory(&path)?;
        Self::from_inventory(path, inventory)
    }

    /// Build a store from an already loaded snapshot.
    ///
    /// Duplicate identifiers are rejected. A counter that lags behind the
    /// highest stored identifier is raised so identifiers are never reused.
    pub fn from_inventory(path: impl Into<PathBuf>, inventory: Inventory) -> DeskResult<Self> {
        let path = path.into();
        let mut books = BTreeMap::new();
        for book in inventory.books {
            let book_id = book.book_id;
            if books.insert(book_id, book).is_some() {
                return Err(DeskError::serialization(format!(
                    "Duplicate book_id {} in {}",
                    book_id,
                    path.display()
                )));
            }
        }

        let mut next_id = inventory.next_id.max(1);
        if let Some(&max_id) = books.keys().next_back() {
            if next_id <= max_id {
                warn!(stored = next_id, max_id, "next_id behind stored books, raising it");
                next_id = max_id.saturating_add(1);
            }
        }

        Ok(Library { path, books, next_id })
    }

    /// Snapshot of the current state in file layout
    pub fn to_inventory(&self) -> Inventory {
        Inventory {
            next_id: self.next_id,
            books: self.books.values().cloned().collect(),
        }
    }

    /// Rewrite the backing file with the current state.
    pub fn save(&self) -> DeskResult<()> {
        save_inventory(&self.to_inventory(), &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier the next [`add`](Self::add) will assign
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Add a new, unissued book and persist.
    ///
    /// Title and author are trimmed and must not be empty.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use desk_core::library::Library;
    ///
    /// let mut library = Library::open("library_data.json")?;
    /// let book = library.add("Dune", "Frank Herbert")?;
    /// assert!(!book.issued);
    /// # Ok::<(), desk_core::errors::DeskError>(())
    /// ```
    pub fn add(&mut self, title: &str, author: &str) -> DeskResult<Book> {
        let title = non_empty("title", title)?;
        let author = non_empty("author", author)?;

        let book_id = self.next_id;
        let next_id = book_id
            .checked_add(1)
            .ok_or_else(|| DeskError::invalid_input("next_id", book_id.to_string(), "no identifiers left"))?;

        let book = Book::new(book_id, title, author);
        self.books.insert(book_id, book.clone());
        self.next_id = next_id;

        if let Err(e) = self.save() {
            warn!(book_id, error = %e, "save failed, rolling back add");
            self.books.remove(&book_id);
            self.next_id = book_id;
            return Err(e);
        }

        info!(book_id, title = %book.title, "added book");
        Ok(book)
    }

    /// Look up a book by identifier.
    pub fn find(&self, book_id: u32) -> DeskResult<&Book> {
        self.books.get(&book_id).ok_or(DeskError::NotFound {
            book_id: book_id.into(),
        })
    }

    /// Books whose title contains `keyword`, ignoring case
    pub fn search_by_title(&self, keyword: &str) -> Vec<&Book> {
        self.books.values().filter(|b| b.title_contains(keyword)).collect()
    }

    /// Books whose author contains `keyword`, ignoring case
    pub fn search_by_author(&self, keyword: &str) -> Vec<&Book> {
        self.books.values().filter(|b| b.author_contains(keyword)).collect()
    }

    /// Check a book out.
    ///
    /// Fails with `NotFound` or `AlreadyIssued` without touching any state.
    pub fn issue(&mut self, book_id: u32) -> DeskResult<&Book> {
        self.set_issued(book_id, true)
    }

    /// Check a book back in.
    ///
    /// Fails with `NotFound` or `NotIssued` without touching any state.
    pub fn return_item(&mut self, book_id: u32) -> DeskResult<&Book> {
        self.set_issued(book_id, false)
    }

    fn set_issued(&mut self, book_id: u32, issued: bool) -> DeskResult<&Book> {
        let book = self.books.get_mut(&book_id).ok_or(DeskError::NotFound {
            book_id: book_id.into(),
        })?;
        if book.issued == issued {
            return Err(if issued {
                DeskError::AlreadyIssued { book_id }
            } else {
                DeskError::NotIssued { book_id }
            });
        }
        book.issued = issued;

        if let Err(e) = self.save() {
            warn!(book_id, error = %e, "save failed, rolling back issued flag");
            if let Some(book) = self.books.get_mut(&book_id) {
                book.issued = !issued;
            }
            return Err(e);
        }

        info!(book_id, issued, "updated issued flag");
        self.find(book_id)
    }

    /// All books in identifier order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn count_total(&self) -> usize {
        self.books.len()
    }

    pub fn count_issued(&self) -> usize {
        self.books.values().filter(|b| b.issued).count()
    }
}

/// Parse a user-typed book identifier (surrounding whitespace ignored).
///
/// Anything that is not an integer is `InvalidInput`. An integer no book can
/// carry (zero, negative, beyond `u32`) is `NotFound`, the same answer as an
/// id that simply isn't in the store.
pub fn parse_book_id(input: &str) -> DeskResult<u32> {
    let trimmed = input.trim();
    let value: i64 = match trimmed.parse() {
        Ok(value) => value,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow => DeskError::NotFound { book_id: i64::MAX },
                IntErrorKind::NegOverflow => DeskError::NotFound { book_id: i64::MIN },
                _ => DeskError::invalid_input("book_id", trimmed, "not a valid book id"),
            });
        }
    };
    u32::try_from(value).map_err(|_| DeskError::NotFound { book_id: value })
}

fn non_empty<'a>(field: &str, value: &'a str) -> DeskResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::invalid_input(field, value, "must not be empty"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn open_temp() -> (TempDir, Library) {
        let dir = tempdir().unwrap();
        let library = Library::open(dir.path().join("library_data.json")).unwrap();
        (dir, library)
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_dir, library) = open_temp();
        assert_eq!(library.count_total(), 0);
        assert_eq!(library.next_id(), 1);
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let (_dir, mut library) = open_temp();

        let dune = library.add("Dune", "Herbert").unwrap();
        assert_eq!(dune.book_id, 1);
        assert!(!dune.issued);

        let emma = library.add("Emma", "Austen").unwrap();
        assert_eq!(emma.book_id, dune.book_id + 1);
        assert_eq!(library.next_id(), 3);
        assert_eq!(library.count_total(), 2);
    }

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let (_dir, mut library) = open_temp();

        let book = library.add("  Dune ", " Herbert\n").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Herbert");

        let err = library.add("   ", "Herbert").unwrap_err();
        assert!(matches!(err, DeskError::InvalidInput { ref field, .. } if field == "title"));
        let err = library.add("Dune", "").unwrap_err();
        assert!(matches!(err, DeskError::InvalidInput { ref field, .. } if field == "author"));

        assert_eq!(library.count_total(), 1);
        assert_eq!(library.next_id(), 2);
    }

    #[test]
    fn test_issue_return_lifecycle() {
        let (_dir, mut library) = open_temp();
        let id = library.add("Dune", "Herbert").unwrap().book_id;

        assert!(library.issue(id).unwrap().issued);
        assert_eq!(library.issue(id).unwrap_err(), DeskError::AlreadyIssued { book_id: id });
        assert!(library.find(id).unwrap().issued);

        assert!(!library.return_item(id).unwrap().issued);
        assert_eq!(library.return_item(id).unwrap_err(), DeskError::NotIssued { book_id: id });
        assert!(!library.find(id).unwrap().issued);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (_dir, mut library) = open_temp();
        library.add("Dune", "Herbert").unwrap();

        assert_eq!(library.find(99).unwrap_err(), DeskError::NotFound { book_id: 99 });
        assert_eq!(library.issue(99).unwrap_err(), DeskError::NotFound { book_id: 99 });
        assert_eq!(library.return_item(99).unwrap_err(), DeskError::NotFound { book_id: 99 });
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let (_dir, mut library) = open_temp();
        library.add("The Hobbit", "J.R.R. Tolkien").unwrap();
        library.add("Dune", "Frank Herbert").unwrap();
        library.add("The Silmarillion", "J.R.R. Tolkien").unwrap();

        let ids: Vec<u32> = library.search_by_title("the").iter().map(|b| b.book_id).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<u32> = library.search_by_author("TOLKIEN").iter().map(|b| b.book_id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(library.search_by_title("neuromancer").is_empty());
    }

    #[test]
    fn test_counts() {
        let (_dir, mut library) = open_temp();
        library.add("Dune", "Herbert").unwrap();
        library.add("Emma", "Austen").unwrap();
        library.add("Ulysses", "Joyce").unwrap();
        library.issue(2).unwrap();

        assert_eq!(library.count_total(), 3);
        assert_eq!(library.count_issued(), 1);
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.json");

        {
            let mut library = Library::open(&path).unwrap();
            library.add("Dune", "Herbert").unwrap();
            library.add("Emma", "Austen").unwrap();
            library.issue(2).unwrap();
        }

        let mut reopened = Library::open(&path).unwrap();
        assert_eq!(reopened.count_total(), 2);
        assert!(reopened.find(2).unwrap().issued);
        assert_eq!(reopened.next_id(), 3);
        assert_eq!(reopened.add("Ulysses", "Joyce").unwrap().book_id, 3);
    }

    #[test]
    fn test_save_load_roundtrip_matches_state() {
        let (dir, mut library) = open_temp();
        library.add("Dune", "Herbert").unwrap();
        library.add("Emma", "Austen").unwrap();
        library.issue(1).unwrap();

        let reopened = Library::open(dir.path().join("library_data.json")).unwrap();
        assert_eq!(reopened.to_inventory(), library.to_inventory());
    }

    #[test]
    fn test_lagging_counter_is_raised() {
        let inventory = Inventory {
            next_id: 2,
            books: vec![Book::new(1, "Dune", "Herbert"), Book::new(5, "Emma", "Austen")],
        };
        let library = Library::from_inventory("unused.json", inventory).unwrap();
        assert_eq!(library.next_id(), 6);
    }

    #[test]
    fn test_counter_ahead_of_books_is_kept() {
        let inventory = Inventory {
            next_id: 10,
            books: vec![Book::new(1, "Dune", "Herbert")],
        };
        let library = Library::from_inventory("unused.json", inventory).unwrap();
        assert_eq!(library.next_id(), 10);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let inventory = Inventory {
            next_id: 3,
            books: vec![Book::new(1, "Dune", "Herbert"), Book::new(1, "Emma", "Austen")],
        };
        let err = Library::from_inventory("dupes.json", inventory).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = tempdir().unwrap();
        // Parent directory does not exist, so every save fails
        let path = dir.path().join("missing").join("library_data.json");
        let mut library = Library::from_inventory(
            &path,
            Inventory {
                next_id: 2,
                books: vec![Book::new(1, "Dune", "Herbert")],
            },
        )
        .unwrap();

        let err = library.add("Emma", "Austen").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(library.count_total(), 1);
        assert_eq!(library.next_id(), 2);

        assert!(library.issue(1).is_err());
        assert!(!library.find(1).unwrap().issued);
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_book_id() {
        assert_eq!(parse_book_id(" 12\n").unwrap(), 12);
        assert_eq!(parse_book_id("+7").unwrap(), 7);
        assert!(matches!(
            parse_book_id("twelve").unwrap_err(),
            DeskError::InvalidInput { ref value, .. } if value == "twelve"
        ));
        assert!(matches!(parse_book_id("").unwrap_err(), DeskError::InvalidInput { .. }));
        assert!(matches!(parse_book_id("1.5").unwrap_err(), DeskError::InvalidInput { .. }));
    }

    #[test]
    fn test_parse_book_id_out_of_range_is_not_found() {
        assert_eq!(parse_book_id("-1").unwrap_err(), DeskError::NotFound { book_id: -1 });
        assert_eq!(
            parse_book_id("99999999999").unwrap_err(),
            DeskError::NotFound { book_id: 99_999_999_999 }
        );
        assert_eq!(
            parse_book_id("123456789012345678901234567890").unwrap_err(),
            DeskError::NotFound { book_id: i64::MAX }
        );
        assert_eq!(
            parse_book_id("-123456789012345678901234567890").unwrap_err(),
            DeskError::NotFound { book_id: i64::MIN }
        );
    }

    #[test]
    fn test_exhausted_ids_blame_the_counter() {
        let dir = tempdir().unwrap();
        let mut library = Library::from_inventory(
            dir.path().join("library_data.json"),
            Inventory {
                next_id: u32::MAX,
                books: Vec::new(),
            },
        )
        .unwrap();

        let err = library.add("Dune", "Herbert").unwrap_err();
        assert!(matches!(err, DeskError::InvalidInput { ref field, .. } if field == "next_id"));
        assert_eq!(library.count_total(), 0);
        assert_eq!(library.next_id(), u32::MAX);
    }

    #[test]
    fn test_malformed_file_fails_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.json");
        fs::write(&path, "not json").unwrap();

        assert!(Library::open(&path).is_err());
    }
}
