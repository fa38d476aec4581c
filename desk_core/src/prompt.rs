//! Line-oriented console I/O shared by the menu apps.
//!
//! [`Prompter`] is generic over its reader and writer so the menus run the
//! same against a terminal and against an in-memory script in tests.

use std::fmt::Display;
use std::io::{self, BufRead, ErrorKind, Write};

/// Prompt/answer wrapper around a line reader and a writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Print `prompt` without a newline and read one line of input.
    ///
    /// The trailing line ending is stripped. End of input is reported as an
    /// [`ErrorKind::UnexpectedEof`] error so a menu loop can treat it as exit.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// True when `err` only means the input ran out
pub fn is_end_of_input(err: &io::Error) -> bool {
    err.kind() == ErrorKind::UnexpectedEof
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_ask_strips_line_endings() {
        let mut prompter = Prompter::new(Cursor::new("first\r\n second \n"), Vec::new());
        assert_eq!(prompter.ask("> ").unwrap(), "first");
        assert_eq!(prompter.ask("> ").unwrap(), " second ");
        assert_eq!(String::from_utf8(prompter.into_output()).unwrap(), "> > ");
    }

    #[test]
    fn test_end_of_input() {
        let mut prompter = Prompter::new(Cursor::new("last"), Vec::new());
        assert_eq!(prompter.ask("").unwrap(), "last");

        let err = prompter.ask("").unwrap_err();
        assert!(is_end_of_input(&err));
    }

    #[test]
    fn test_say_appends_newline() {
        let mut prompter = Prompter::new(Cursor::new(""), Vec::new());
        prompter.say("hello").unwrap();
        prompter.say(42).unwrap();
        assert_eq!(String::from_utf8(prompter.into_output()).unwrap(), "hello\n42\n");
    }
}
