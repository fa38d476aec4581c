//! Menu loop for the calculator.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use desk_core::calculator::{evaluate, format_result, parse_number, Operator};
use desk_core::prompt::is_end_of_input;
use desk_core::{DeskError, DeskResult, Prompter};
use tracing::debug;

/// Interactive calculator menu over any line reader and writer.
pub struct CalculatorMenu<R, W> {
    console: Prompter<R, W>,
}

impl<R: BufRead, W: Write> CalculatorMenu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        CalculatorMenu {
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
                    debug!("input closed, leaving calculator");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn step(&mut self) -> io::Result<ControlFlow<()>> {
        self.console.say("")?;
        self.console.say("====== SIMPLE CALCULATOR ======")?;
        self.console.say("1. Perform Calculation")?;
        self.console.say("2. Clear Screen")?;
        self.console.say("3. Exit")?;

        let choice = self.console.ask("Choose an option (1/2/3): ")?;
        match choice.trim() {
            "1" => self.calculate()?,
            "2" => self.clear_screen()?,
            "3" => {
                self.console.say("Exiting... Thank you!")?;
                return Ok(ControlFlow::Break(()));
            }
            _ => self.console.say("Invalid choice. Please try again.")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Read two operands and an operator, then print the result or the
    /// reason there is none.
    fn calculate(&mut self) -> io::Result<()> {
        match self.read_and_evaluate()? {
            Ok(value) => self.console.say(format!("\nResult: {}\n", format_result(value))),
            Err(DeskError::InvalidNumber { input }) => {
                debug!(%input, "rejected operand");
                self.console.say("Invalid input! Please enter a valid number.")
            }
            Err(DeskError::InvalidOperator { .. }) => self.console.say("Invalid operator. Please try again."),
            Err(DeskError::DivisionByZero) => self.console.say("\nResult: Error: Cannot divide by zero!\n"),
            Err(other) => self.console.say(format!("Error: {}", other)),
        }
    }

    /// The first operand is checked before anything else is asked for; the
    /// operator only after both operands are in.
    fn read_and_evaluate(&mut self) -> io::Result<DeskResult<f64>> {
        let first = match parse_number(&self.console.ask("Enter first number: ")?) {
            Ok(n) => n,
            Err(e) => return Ok(Err(e)),
        };
        let symbol = self.console.ask("Enter operator (+, -, *, /): ")?;
        let second = match parse_number(&self.console.ask("Enter second number: ")?) {
            Ok(n) => n,
            Err(e) => return Ok(Err(e)),
        };

        Ok(symbol
            .parse::<Operator>()
            .and_then(|op| {
                debug!(first, %op, second, "evaluating");
                evaluate(first, op, second)
            }))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        let out = self.console.output();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn into_output(self) -> W {
        self.console.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str) -> String {
        let mut menu = CalculatorMenu::new(Cursor::new(script.to_string()), Vec::new());
        menu.run().unwrap();
        String::from_utf8(menu.into_output()).unwrap()
    }

    #[test]
    fn test_menu_and_exit() {
        let output = run_script("3\n");
        assert!(output.contains("====== SIMPLE CALCULATOR ======"));
        assert!(output.contains("2. Clear Screen"));
        assert!(output.ends_with("Exiting... Thank you!\n"));
    }

    #[test]
    fn test_division() {
        let output = run_script("1\n10\n/\n2\n3\n");
        assert!(output.contains("Result: 5.0"));
    }

    #[test]
    fn test_divide_by_zero_is_reported() {
        let output = run_script("1\n10\n/\n0\n1\n2\n*\n4\n3\n");
        assert!(output.contains("Error: Cannot divide by zero!"));
        // the loop keeps going after the error
        assert!(output.contains("Result: 8.0"));
        assert!(output.ends_with("Exiting... Thank you!\n"));
    }

    #[test]
    fn test_invalid_first_number_aborts_early() {
        let output = run_script("1\nten\n3\n");
        assert!(output.contains("Invalid input! Please enter a valid number."));
        assert!(!output.contains("Enter operator"));
        assert!(output.ends_with("Exiting... Thank you!\n"));
    }

    #[test]
    fn test_invalid_second_number() {
        let output = run_script("1\n1\n+\nx\n3\n");
        assert!(output.contains("Enter second number: Invalid input! Please enter a valid number."));
    }

    #[test]
    fn test_invalid_operator() {
        let output = run_script("1\n4\n%\n2\n3\n");
        assert!(output.contains("Invalid operator. Please try again."));
        assert!(!output.contains("Result:"));
    }

    #[test]
    fn test_clear_screen_and_bad_choice() {
        let output = run_script("2\n7\n3\n");
        assert!(output.contains("\x1b[2J"));
        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let output = run_script("1\n2\n+\n");
        assert!(output.contains("Enter second number: "));
        assert!(!output.contains("Exiting"));
    }
}
