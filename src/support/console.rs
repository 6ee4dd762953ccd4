// SPDX-License-Identifier: MIT

//! Interactive input seam.
//!
//! Steps that need something from the user go through this trait, so tests
//! can script the whole conversation.

use std::io::{self, BufRead, Write};

/// Collects one line of input from the user.
pub trait Console: Send + Sync {
    fn prompt(&self, message: &str) -> io::Result<String>;
}

/// Writes the prompt to stdout and reads one line from stdin.
pub struct StdConsole;

impl Console for StdConsole {
    fn prompt(&self, message: &str) -> io::Result<String> {
        print!("{} ", message);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
