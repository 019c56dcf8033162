//! Terminal implementations of the engine's presentation and input seams.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use cw_fiction::{Category, InputSource, Presenter};

/// Prints engine output to stdout, styled by category.
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn report(&mut self, text: &str, category: Category) {
        let styled = match category {
            Category::Narration => text.normal(),
            Category::Dialogue => text.cyan(),
            Category::Combat => text.red(),
            Category::Discovery => text.green().bold(),
            Category::System => text.yellow(),
            Category::Audio => text.dimmed(),
        };
        println!("{styled}");
    }
}

/// Reads answers line by line from stdin. End of input reads as closed.
pub struct StdinInput;

impl InputSource for StdinInput {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        print!("{} ", prompt.bold());
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                None
            }
            Ok(_) => Some(line.trim_end().to_string()),
        }
    }
}
