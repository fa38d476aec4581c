//! # desk_core - Book Inventory and Calculator Engine
//!
//! `desk_core` holds the logic behind the Deskkit terminal apps: the book
//! inventory store with its JSON data file, the arithmetic behind the
//! calculator, and the prompt helper both menus read input through. The
//! binaries (`library_cli`, `calc_cli`) are thin menu loops on top of this
//! crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use desk_core::library::Library;
//!
//! let mut library = Library::open("library_data.json")?;
//! let book = library.add("Dune", "Frank Herbert")?;
//! println!("{}", book); // [1] Dune by Frank Herbert - Available
//! # Ok::<(), desk_core::errors::DeskError>(())
//! ```
//!
//! ## Modules
//!
//! - [`library`] - Book records and the in-memory store
//! - [`file_io`] - Data file load/save and file locking
//! - [`calculator`] - Arithmetic, operand and operator parsing
//! - [`prompt`] - Line-based console prompting for the menu apps
//! - [`errors`] - Structured error types

pub mod calculator;
pub mod errors;
pub mod file_io;
pub mod library;
pub mod prompt;

// Re-export commonly used types at crate root for convenience
pub use errors::{DeskError, DeskResult};
pub use file_io::{load_inventory, save_inventory, FileLock, Inventory, DEFAULT_DATA_FILE};
pub use library::{Book, BookStatus, Library};
pub use prompt::Prompter;
