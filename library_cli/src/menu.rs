//! Menu loop for the book inventory.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use desk_core::library::parse_book_id;
use desk_core::prompt::is_end_of_input;
use desk_core::{Book, DeskError, Library, Prompter};
use tracing::{debug, error};

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    SearchByTitle,
    SearchByAuthor,
    IssueBook,
    ReturnBook,
    ListAll,
    Reports,
    Exit,
}

impl MenuChoice {
    /// Entries in the order they are printed
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::AddBook,
        MenuChoice::SearchByTitle,
        MenuChoice::SearchByAuthor,
        MenuChoice::IssueBook,
        MenuChoice::ReturnBook,
        MenuChoice::ListAll,
        MenuChoice::Reports,
        MenuChoice::Exit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MenuChoice::AddBook => "1",
            MenuChoice::SearchByTitle => "2",
            MenuChoice::SearchByAuthor => "3",
            MenuChoice::IssueBook => "4",
            MenuChoice::ReturnBook => "5",
            MenuChoice::ListAll => "6",
            MenuChoice::Reports => "7",
            MenuChoice::Exit => "0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add Book",
            MenuChoice::SearchByTitle => "Search by Title",
            MenuChoice::SearchByAuthor => "Search by Author",
            MenuChoice::IssueBook => "Issue Book",
            MenuChoice::ReturnBook => "Return Book",
            MenuChoice::ListAll => "List All Books",
            MenuChoice::Reports => "Reports",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<MenuChoice> {
        let key = input.trim();
        MenuChoice::ALL.into_iter().find(|choice| choice.key() == key)
    }
}

/// Console text for an error coming back from the store
fn describe(err: &DeskError) -> String {
    match err {
        DeskError::NotFound { .. } => "Book not found.".to_string(),
        DeskError::AlreadyIssued { .. } => "Book is already issued.".to_string(),
        DeskError::NotIssued { .. } => "Book was not issued.".to_string(),
        DeskError::InvalidInput { field, value, .. } if field == "book_id" => {
            format!("Invalid book id: '{}'", value)
        }
        DeskError::InvalidInput { field, .. } if field == "title" || field == "author" => {
            format!("The {} must not be empty.", field)
        }
        other => format!("Error: {}", other),
    }
}

/// Interactive inventory menu over any line reader and writer.
pub struct InventoryMenu<R, W> {
    library: Library,
    console: Prompter<R, W>,
}

impl<R: BufRead, W: Write> InventoryMenu<R, W> {
    pub fn new(library: Library, input: R, output: W) -> Self {
        InventoryMenu {
            library,
            console: Prompter::new(input, output),
        }
    }

    /// Run until the user picks Exit or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            match self.step() {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => return Ok(()),
                Err(e) if is_end_of_input(&e) => {
                    debug!("input closed, leaving inventory menu");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Show the menu once and handle a single choice.
    fn step(&mut self) -> io::Result<ControlFlow<()>> {
        self.print_menu()?;
        let line = self.console.ask("Enter choice: ")?;

        let Some(choice) = MenuChoice::parse(&line) else {
            self.console.say("Invalid choice. Try again.")?;
            return Ok(ControlFlow::Continue(()));
        };
        debug!(?choice, "menu choice");

        match choice {
            MenuChoice::AddBook => self.add_book()?,
            MenuChoice::SearchByTitle => {
                let keyword = self.console.ask("Enter title keyword: ")?;
                let results = self.library.search_by_title(keyword.trim());
                print_matches(&mut self.console, &results)?;
            }
            MenuChoice::SearchByAuthor => {
                let keyword = self.console.ask("Enter author keyword: ")?;
                let results = self.library.search_by_author(keyword.trim());
                print_matches(&mut self.console, &results)?;
            }
            MenuChoice::IssueBook => {
                let text = self.console.ask("Enter book id to issue: ")?;
                let outcome = parse_book_id(&text).and_then(|id| self.library.issue(id).map(|_| ()));
                self.report(outcome, "Book issued successfully.")?;
            }
            MenuChoice::ReturnBook => {
                let text = self.console.ask("Enter book id to return: ")?;
                let outcome = parse_book_id(&text).and_then(|id| self.library.return_item(id).map(|_| ()));
                self.report(outcome, "Book returned successfully.")?;
            }
            MenuChoice::ListAll => self.list_all()?,
            MenuChoice::Reports => {
                let total = self.library.count_total();
                let issued = self.library.count_issued();
                self.console.say(format!("Total books: {}", total))?;
                self.console.say(format!("Issued books: {}", issued))?;
            }
            MenuChoice::Exit => {
                self.console.say("Exiting... Data saved.")?;
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.console.say("")?;
        self.console.say("===== Library Book Inventory Manager =====")?;
        for choice in MenuChoice::ALL {
            self.console.say(format!("{}. {}", choice.key(), choice.label()))?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> io::Result<()> {
        let title = self.console.ask("Enter title: ")?;
        let author = self.console.ask("Enter author: ")?;
        match self.library.add(&title, &author) {
            Ok(book) => {
                self.console.say("Book added successfully.")?;
                self.console.say(book)
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn list_all(&mut self) -> io::Result<()> {
        if self.library.count_total() == 0 {
            return self.console.say("No books in library.");
        }
        for book in self.library.books() {
            self.console.say(book)?;
        }
        Ok(())
    }

    fn report(&mut self, outcome: Result<(), DeskError>, success: &str) -> io::Result<()> {
        match outcome {
            Ok(()) => self.console.say(success),
            Err(e) => self.report_error(&e),
        }
    }

    fn report_error(&mut self, err: &DeskError) -> io::Result<()> {
        if !err.is_recoverable() {
            error!(code = err.error_code(), error = %err, "inventory operation failed");
        }
        self.console.say(describe(err))
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn into_output(self) -> W {
        self.console.into_output()
    }
}

fn print_matches<R: BufRead, W: Write>(console: &mut Prompter<R, W>, results: &[&Book]) -> io::Result<()> {
    if results.is_empty() {
        return console.say("No matching books found.");
    }
    for book in results {
        console.say(book)?;
    }
    Ok(())
}
